use std::fmt;
use std::str::FromStr;

use crate::gateway::encode_component;
use crate::recipe::Recipe;

pub const SHARE_BASE_URL: &str = "https://recipefinder.example.com/recipe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Facebook,
    Twitter,
    Pinterest,
    Email,
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Ok(Self::Facebook),
            "twitter" => Ok(Self::Twitter),
            "pinterest" => Ok(Self::Pinterest),
            "email" | "mail" => Ok(Self::Email),
            other => Err(format!("unknown share platform {other:?}")),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Pinterest => "pinterest",
            Self::Email => "email",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareContent {
    pub text: String,
    pub url: String,
    pub image: String,
}

impl ShareContent {
    pub fn for_recipe(recipe: &Recipe) -> Self {
        Self {
            text: format!("Check out this delicious {} recipe I found!", recipe.name),
            url: format!("{SHARE_BASE_URL}/{}", recipe.id),
            image: recipe.thumbnail.clone(),
        }
    }

    pub fn link(&self, platform: Platform) -> String {
        let url = encode_component(&self.url);
        let text = encode_component(&self.text);
        match platform {
            Platform::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            Platform::Twitter => format!("https://twitter.com/intent/tweet?text={text}&url={url}"),
            Platform::Pinterest => format!(
                "https://pinterest.com/pin/create/button/?url={url}&media={}&description={text}",
                encode_component(&self.image)
            ),
            Platform::Email => format!(
                "mailto:?subject={}&body={}",
                encode_component("Recipe Recommendation"),
                encode_component(&format!("{}\n\n{}", self.text, self.url))
            ),
        }
    }
}
