//! Environment-driven configuration for the collect subsystem.
//!
//! Values come from the process environment, with `.env` loaded first when
//! present. Required keys are validated up front so a misconfigured run
//! fails before any request is made.

use std::collections::BTreeMap;

use crate::error::{CollectError, Result};

/// Search field selections requested from the API.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub tweet_fields: String,
    pub user_fields: String,
    pub expansion_fields: String,
    pub media_fields: String,
    pub place_fields: String,
    pub poll_fields: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            tweet_fields: "id,text,created_at,author_id,lang,public_metrics".to_string(),
            user_fields: "username,verified,location,public_metrics".to_string(),
            expansion_fields: "author_id".to_string(),
            media_fields: "url,preview_image_url".to_string(),
            place_fields: "full_name,id,country,country_code".to_string(),
            poll_fields: "id,state,created_at,updated_at".to_string(),
        }
    }
}

/// Validated collect configuration.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub token_key: String,
    pub base_url: String,
    pub max_tweets: usize,
    /// Page size requested from the API.
    pub page_size: String,
    /// Seconds to wait between pages.
    pub sleep_secs: u64,
    pub only_verified: bool,
    pub fields: FieldConfig,
    /// Search terms per language tag, in a fixed language order.
    pub terms: Vec<(String, Vec<String>)>,
    pub backup_dir: String,
    pub output_dir: String,
}

impl CollectConfig {
    /// Loads configuration from the environment (`.env` honored).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through a key lookup, for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token_key = required(&lookup, "TOKEN_KEY")?;
        let base_url = required(&lookup, "BASE_URL")?;
        let amount = required(&lookup, "AMOUNT_TWEETS")?;
        let max_tweets = amount
            .trim()
            .parse::<usize>()
            .map_err(|error| CollectError::InvalidConfig {
                key: "AMOUNT_TWEETS",
                reason: error.to_string(),
            })?;
        let sleep = required(&lookup, "SLEEP_TIME")?;
        let sleep_secs = sleep
            .trim()
            .parse::<u64>()
            .map_err(|error| CollectError::InvalidConfig {
                key: "SLEEP_TIME",
                reason: error.to_string(),
            })?;

        let only_verified = lookup("ONLY_VERIFIED")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let defaults = FieldConfig::default();
        let fields = FieldConfig {
            tweet_fields: lookup("TWEET_FIELDS").unwrap_or(defaults.tweet_fields),
            user_fields: lookup("USER_FIELDS").unwrap_or(defaults.user_fields),
            expansion_fields: lookup("EXPANSION_FIELDS").unwrap_or(defaults.expansion_fields),
            media_fields: lookup("MEDIA_FIELDS").unwrap_or(defaults.media_fields),
            place_fields: lookup("PLACE_FIELDS").unwrap_or(defaults.place_fields),
            poll_fields: lookup("POLL_FIELDS").unwrap_or(defaults.poll_fields),
        };

        let terms = term_table(&lookup);

        Ok(Self {
            token_key,
            base_url,
            max_tweets,
            page_size: lookup("PAGE_SIZE").unwrap_or_else(|| "100".to_string()),
            sleep_secs,
            only_verified,
            fields,
            terms,
            backup_dir: lookup("BACKUP_DIR").unwrap_or_else(|| "./data/backup".to_string()),
            output_dir: lookup("OUTPUT_DIR").unwrap_or_else(|| "./data/output".to_string()),
        })
    }

    /// Terms keyed by language, for callers that need lookup rather than
    /// iteration order.
    pub fn terms_by_language(&self) -> BTreeMap<&str, &[String]> {
        self.terms
            .iter()
            .map(|(language, terms)| (language.as_str(), terms.as_slice()))
            .collect()
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CollectError::MissingConfig(key)),
    }
}

/// Language tag to env key, in the fixed collection order.
const TERM_KEYS: [(&str, &str); 5] = [
    ("es", "SPANISH_TERMS"),
    ("en", "ENGLISH_TERMS"),
    ("fr", "FRENCH_TERMS"),
    ("de", "GERMAN_TERMS"),
    ("ar", "ARABIC_TERMS"),
];

fn term_table(lookup: &impl Fn(&str) -> Option<String>) -> Vec<(String, Vec<String>)> {
    TERM_KEYS
        .iter()
        .map(|(language, key)| {
            let terms = lookup(key)
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string)
                .collect();
            ((*language).to_string(), terms)
        })
        .collect()
}
