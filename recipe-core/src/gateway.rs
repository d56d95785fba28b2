use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{redirect, Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::FetchError;

/// Characters `encodeURIComponent` leaves untouched.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// The endpoint shapes of the recipe API, relative to the versioned base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    SearchByName(&'a str),
    FilterByIngredient(&'a str),
    FilterByCategory(&'a str),
    FilterByArea(&'a str),
    Lookup(&'a str),
    ListAreas,
    Random,
    Categories,
}

impl Endpoint<'_> {
    pub fn path(&self) -> String {
        match self {
            Endpoint::SearchByName(term) => format!("/search.php?s={}", encode_component(term)),
            Endpoint::FilterByIngredient(i) => format!("/filter.php?i={}", encode_component(i)),
            Endpoint::FilterByCategory(c) => format!("/filter.php?c={}", encode_component(c)),
            Endpoint::FilterByArea(a) => format!("/filter.php?a={}", encode_component(a)),
            Endpoint::Lookup(id) => format!("/lookup.php?i={}", encode_component(id)),
            Endpoint::ListAreas => "/list.php?a=list".to_owned(),
            Endpoint::Random => "/random.php".to_owned(),
            Endpoint::Categories => "/categories.php".to_owned(),
        }
    }
}

/// Counts in-flight requests; "loading" while the count is non-zero.
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    tx: Arc<watch::Sender<usize>>,
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }
}

impl LoadingIndicator {
    pub fn is_loading(&self) -> bool {
        *self.tx.borrow() > 0
    }

    /// Receiver over the number of in-flight requests.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }

    pub fn acquire(&self) -> LoadingGuard {
        self.tx.send_modify(|active| *active += 1);
        LoadingGuard {
            tx: Arc::clone(&self.tx),
        }
    }
}

/// Turns its share of the loading indicator off when dropped.
#[must_use = "the indicator is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    tx: Arc<watch::Sender<usize>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tx
            .send_modify(|active| *active = active.saturating_sub(1));
    }
}

#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    loading: LoadingIndicator,
}

impl Gateway {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .redirect(redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("recipe-finder/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            loading: LoadingIndicator::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// GET `base_url + endpoint` and return the JSON body as-is.
    ///
    /// `endpoint` carries its own query string; dynamic segments must already
    /// be percent-encoded.
    pub async fn fetch(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let _loading = self.loading.acquire();
        debug!(%url, "fetching");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "request failed");
            return Err(FetchError::Status { status, url });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode { url, source })
    }

    pub async fn fetch_endpoint(&self, endpoint: &Endpoint<'_>) -> Result<Value, FetchError> {
        self.fetch(&endpoint.path()).await
    }

    /// Like [`Gateway::fetch_endpoint`] but decodes into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint<'_>,
    ) -> Result<T, FetchError> {
        let path = endpoint.path();
        let value = self.fetch(&path).await?;
        serde_json::from_value(value).map_err(|source| FetchError::Decode {
            url: format!("{}{}", self.base_url, path),
            source,
        })
    }
}
