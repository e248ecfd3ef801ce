//! Search API client.
//!
//! The pagination loop talks to a [`SearchClient`] trait so tests and the
//! CLI can swap transports; the production implementation is a blocking
//! reqwest client with bearer authentication.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::CollectConfig;
use crate::error::{CollectError, Result};

/// One page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Expanded objects referenced by the page's tweets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<Value>,
    #[serde(default)]
    pub media: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    pub next_token: Option<String>,
}

impl SearchPage {
    /// Users indexed by id for author attachment.
    pub fn user_lookup(&self) -> BTreeMap<String, &Value> {
        self.includes
            .users
            .iter()
            .filter_map(|user| {
                user.get("id")
                    .and_then(Value::as_str)
                    .map(|id| (id.to_string(), user))
            })
            .collect()
    }

    /// Media indexed by media key for attachment resolution.
    pub fn media_lookup(&self) -> BTreeMap<String, &Value> {
        self.includes
            .media
            .iter()
            .filter_map(|media| {
                media
                    .get("media_key")
                    .and_then(Value::as_str)
                    .map(|key| (key.to_string(), media))
            })
            .collect()
    }
}

/// Transport boundary for the paginated search.
pub trait SearchClient {
    fn search(&self, query: &str, next_token: Option<&str>) -> Result<SearchPage>;
}

/// Blocking HTTP implementation.
pub struct HttpSearchClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token_key: String,
    params: Vec<(&'static str, String)>,
}

impl HttpSearchClient {
    pub fn new(config: &CollectConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()?;
        let params = vec![
            ("tweet.fields", config.fields.tweet_fields.clone()),
            ("user.fields", config.fields.user_fields.clone()),
            ("expansions", config.fields.expansion_fields.clone()),
            ("media.fields", config.fields.media_fields.clone()),
            ("place.fields", config.fields.place_fields.clone()),
            ("poll.fields", config.fields.poll_fields.clone()),
            ("max_results", config.page_size.clone()),
        ];
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token_key: config.token_key.clone(),
            params,
        })
    }
}

impl SearchClient for HttpSearchClient {
    fn search(&self, query: &str, next_token: Option<&str>) -> Result<SearchPage> {
        let mut request = self
            .http
            .get(&self.base_url)
            .bearer_auth(&self.token_key)
            .query(&[("query", query)])
            .query(&self.params);
        if let Some(token) = next_token {
            request = request.query(&[("next_token", token)]);
        }
        debug!(%query, paging = next_token.is_some(), "search request");
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response.json()?)
    }
}
