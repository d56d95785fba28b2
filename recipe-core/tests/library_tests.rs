use recipe_core::{JsonStore, LibraryError, MealSummary, PlanOutcome, RecipeLibrary};
use serde_json::{json, Value};

fn meal(id: &str) -> MealSummary {
    MealSummary {
        id: id.into(),
        name: format!("Meal {id}"),
        thumbnail: format!("https://img/{id}.jpg"),
    }
}

async fn read_doc(store: &JsonStore, key: &str) -> Option<Value> {
    let path = store.path_for(key)?;
    let bytes = tokio::fs::read(path).await.ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[tokio::test]
async fn ratings_load_empty_then_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::in_dir(dir.path());

    let first: Value = store.load("ratings", json!({})).await;
    assert_eq!(first, json!({}));

    store.save("ratings", &json!({ "52977": 4 })).await.unwrap();
    let fresh = JsonStore::in_dir(dir.path());
    let loaded: Value = fresh.load("ratings", json!({})).await;
    assert_eq!(loaded, json!({ "52977": 4 }));

    let library = RecipeLibrary::load(fresh).await;
    assert_eq!(library.rating("52977"), Some(4));
}

#[tokio::test]
async fn favorite_toggle_twice_restores_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::in_dir(dir.path());
    let mut library = RecipeLibrary::load(store.clone()).await;

    library.toggle_favorite(&meal("1")).await.unwrap();
    let before = read_doc(&store, "favorites").await.unwrap();

    assert!(library.toggle_favorite(&meal("2")).await.unwrap());
    assert!(library.is_favorite("2"));
    assert!(!library.toggle_favorite(&meal("2")).await.unwrap());
    assert!(!library.is_favorite("2"));

    assert_eq!(read_doc(&store, "favorites").await.unwrap(), before);
    assert_eq!(before["1"]["name"], "Meal 1");
    assert!(before["1"]["dateAdded"].is_string());
}

#[tokio::test]
async fn duplicate_plan_entry_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::in_dir(dir.path());
    let mut library = RecipeLibrary::load(store.clone()).await;

    let outcome = library.add_to_meal_plan("2026-10-14", &meal("52772")).await.unwrap();
    assert_eq!(outcome, PlanOutcome::Added);
    let doc = read_doc(&store, "mealPlan").await.unwrap();
    assert_eq!(doc["2026-10-14"][0]["id"], "52772");

    // Any write would recreate the file.
    let path = store.path_for("mealPlan").unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    let outcome = library.add_to_meal_plan("2026-10-14", &meal("52772")).await.unwrap();
    assert_eq!(outcome, PlanOutcome::AlreadyPlanned);
    assert!(!path.exists());
    assert_eq!(library.meal_plan()["2026-10-14"].len(), 1);
}

#[tokio::test]
async fn removing_last_meal_drops_the_date() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::in_dir(dir.path());
    let mut library = RecipeLibrary::load(store.clone()).await;

    library.add_to_meal_plan("2026-10-14", &meal("1")).await.unwrap();
    library.add_to_meal_plan("2026-10-14", &meal("2")).await.unwrap();
    library.add_to_meal_plan("2026-10-15", &meal("3")).await.unwrap();

    let removed = library.remove_from_meal_plan("2026-10-14", 0).await.unwrap();
    assert_eq!(removed.map(|m| m.id), Some("1".to_string()));
    let removed = library.remove_from_meal_plan("2026-10-14", 0).await.unwrap();
    assert_eq!(removed.map(|m| m.id), Some("2".to_string()));

    assert!(!library.meal_plan().contains_key("2026-10-14"));
    let doc = read_doc(&store, "mealPlan").await.unwrap();
    assert_eq!(doc, json!({ "2026-10-15": [{ "id": "3", "name": "Meal 3", "image": "https://img/3.jpg" }] }));
}

#[tokio::test]
async fn corrupted_document_falls_back_to_tmp_then_default() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("ratings.json"), b"{ this is not json ")
        .await
        .unwrap();
    tokio::fs::write(dir.path().join("favorites.json"), b"[1, 2")
        .await
        .unwrap();
    tokio::fs::write(dir.path().join("ratings.json.tmp"), br#"{ "7": 3 }"#)
        .await
        .unwrap();

    let library = RecipeLibrary::load(JsonStore::in_dir(dir.path())).await;
    assert_eq!(library.rating("7"), Some(3));
    assert_eq!(library.favorites().count(), 0);
}

#[tokio::test]
async fn out_of_range_stored_ratings_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("ratings.json"), br#"{ "1": 9, "2": 5, "3": 0 }"#)
        .await
        .unwrap();

    let library = RecipeLibrary::load(JsonStore::in_dir(dir.path())).await;
    assert_eq!(library.rating("1"), None);
    assert_eq!(library.rating("2"), Some(5));
    assert_eq!(library.rating("3"), None);
}

#[tokio::test]
async fn one_bad_stored_rating_keeps_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("ratings.json"),
        br#"{ "1": 4, "2": -1, "3": 300, "4": 4.5, "5": "3" }"#,
    )
    .await
    .unwrap();

    let store = JsonStore::in_dir(dir.path());
    let mut library = RecipeLibrary::load(store.clone()).await;
    assert_eq!(library.rating("1"), Some(4));
    for id in ["2", "3", "4", "5"] {
        assert_eq!(library.rating(id), None);
    }

    library.rate("9", 3).await.unwrap();
    assert_eq!(read_doc(&store, "ratings").await, Some(json!({ "1": 4, "9": 3 })));
}

#[tokio::test]
async fn failed_save_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    tokio::fs::write(&blocker, b"").await.unwrap();

    let mut library = RecipeLibrary::load(JsonStore::in_dir(&blocker)).await;

    let err = library.toggle_favorite(&meal("1")).await;
    assert!(matches!(err, Err(LibraryError::Store(_))));
    assert!(!library.is_favorite("1"));

    assert!(library.add_to_meal_plan("2026-10-14", &meal("1")).await.is_err());
    assert!(library.meal_plan().is_empty());

    assert!(library.rate("1", 4).await.is_err());
    assert_eq!(library.rating("1"), None);

    assert!(library.toggle_dark_mode().await.is_err());
    assert!(!library.dark_mode());
}

#[tokio::test]
async fn stores_are_written_independently() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::in_dir(dir.path());
    let mut library = RecipeLibrary::load(store.clone()).await;

    library.rate("52977", 4).await.unwrap();
    assert!(store.path_for("ratings").unwrap().exists());
    assert!(!store.path_for("favorites").unwrap().exists());
    assert!(!store.path_for("mealPlan").unwrap().exists());
    assert!(!store.path_for("darkMode").unwrap().exists());
}
