//! Paginated collection loop.
//!
//! For each language with a usable query, pages are pulled until that
//! language's share of the overall quota is filled or the API stops
//! returning a continuation token. Tweets are deduplicated by id across
//! the whole run, and each kept tweet gets its author and media objects
//! attached so downstream flattening needs no page context.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::client::{SearchClient, SearchPage};
use crate::config::CollectConfig;
use crate::error::Result;
use crate::query::build_query;
use crate::session::CollectSession;

/// Outcome of one collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectOutcome {
    /// Kept tweets with includes attached, in arrival order.
    pub rows: Vec<Value>,
    /// Kept-tweet count per language tag.
    pub counts: BTreeMap<String, usize>,
}

/// Runs the collection loop against the given client.
pub fn collect(
    client: &impl SearchClient,
    config: &CollectConfig,
    session: &mut CollectSession,
) -> Result<CollectOutcome> {
    let mut outcome = CollectOutcome::default();
    let mut seen_ids: BTreeSet<String> = BTreeSet::new();

    let language_count = config.terms.iter().filter(|(_, t)| !t.is_empty()).count();
    if language_count == 0 {
        warn!("no search terms configured, nothing to collect");
        return Ok(outcome);
    }
    let per_language = config.max_tweets.div_ceil(language_count);

    for (language, terms) in &config.terms {
        let Some(query) = build_query(language, terms, config.only_verified) else {
            continue;
        };
        info!(%language, quota = per_language, "collecting language");
        let mut next_token: Option<String> = None;
        let mut kept = 0usize;

        while kept < per_language {
            let page = client.search(&query, next_token.as_deref())?;
            session.record_page(page_to_value(&page))?;

            if page.data.is_empty() {
                break;
            }
            let users = page.user_lookup();
            let media = page.media_lookup();

            for tweet in &page.data {
                let Some(id) = tweet.get("id").and_then(Value::as_str) else {
                    continue;
                };
                if !seen_ids.insert(id.to_string()) {
                    continue;
                }
                outcome.rows.push(attach_includes(tweet, &users, &media));
                kept += 1;
            }

            match page.meta.next_token {
                Some(token) => {
                    next_token = Some(token);
                    std::thread::sleep(std::time::Duration::from_secs(config.sleep_secs));
                }
                None => break,
            }
        }
        info!(%language, kept, "language collection finished");
        outcome.counts.insert(language.clone(), kept);
    }
    Ok(outcome)
}

fn page_to_value(page: &SearchPage) -> Value {
    json!({
        "data": page.data,
        "includes": {
            "users": page.includes.users,
            "media": page.includes.media,
        },
        "meta": { "next_token": page.meta.next_token },
    })
}

/// Copies the tweet and embeds its author and media under `includes`.
fn attach_includes(
    tweet: &Value,
    users: &BTreeMap<String, &Value>,
    media: &BTreeMap<String, &Value>,
) -> Value {
    let mut enriched = tweet.clone();

    let author = tweet
        .get("author_id")
        .and_then(Value::as_str)
        .and_then(|id| users.get(id))
        .map(|user| (*user).clone());
    let attached_media: Vec<Value> = tweet
        .get("attachments")
        .and_then(|attachments| attachments.get("media_keys"))
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(Value::as_str)
                .filter_map(|key| media.get(key))
                .map(|item| (*item).clone())
                .collect()
        })
        .unwrap_or_default();

    if let Some(object) = enriched.as_object_mut() {
        object.insert(
            "includes".to_string(),
            json!({
                "users": author.map(|user| vec![user]).unwrap_or_default(),
                "media": attached_media,
            }),
        );
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    use crate::client::SearchPage;
    use crate::config::CollectConfig;

    /// Serves canned pages in order.
    struct MockClient {
        pages: RefCell<Vec<SearchPage>>,
    }

    impl SearchClient for MockClient {
        fn search(&self, _query: &str, _next_token: Option<&str>) -> Result<SearchPage> {
            Ok(self.pages.borrow_mut().remove(0))
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> SearchPage {
        serde_json::from_value(json!({
            "data": ids
                .iter()
                .map(|id| json!({"id": id, "author_id": "u1", "lang": "es", "text": "hola"}))
                .collect::<Vec<_>>(),
            "includes": {"users": [{"id": "u1", "username": "ana"}], "media": []},
            "meta": {"next_token": next},
        }))
        .unwrap()
    }

    fn config() -> CollectConfig {
        CollectConfig::from_lookup(|key| {
            match key {
                "TOKEN_KEY" => Some("secret"),
                "BASE_URL" => Some("https://api.example/search"),
                "AMOUNT_TWEETS" => Some("4"),
                "SLEEP_TIME" => Some("0"),
                "SPANISH_TERMS" => Some("hola"),
                _ => None,
            }
            .map(str::to_string)
        })
        .unwrap()
    }

    #[test]
    fn paginates_until_quota_and_dedupes_ids() {
        let client = MockClient {
            pages: RefCell::new(vec![
                page(&["1", "2", "2"], Some("next")),
                page(&["2", "3", "4", "5"], None),
            ]),
        };
        let dir = TempDir::new().unwrap();
        let mut session = CollectSession::new(dir.path());

        let outcome = collect(&client, &config(), &mut session).unwrap();
        let ids: Vec<&str> = outcome
            .rows
            .iter()
            .map(|row| row.get("id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(outcome.counts["es"], 5);
        assert_eq!(session.page_count(), 2);
    }

    #[test]
    fn author_objects_are_attached() {
        let client = MockClient {
            pages: RefCell::new(vec![page(&["1"], None)]),
        };
        let dir = TempDir::new().unwrap();
        let mut session = CollectSession::new(dir.path());
        let outcome = collect(&client, &config(), &mut session).unwrap();

        let users = &outcome.rows[0]["includes"]["users"];
        assert_eq!(users[0]["username"], "ana");
    }

    #[test]
    fn empty_page_ends_the_language() {
        let client = MockClient {
            pages: RefCell::new(vec![page(&[], Some("next"))]),
        };
        let dir = TempDir::new().unwrap();
        let mut session = CollectSession::new(dir.path());
        let outcome = collect(&client, &config(), &mut session).unwrap();
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.counts["es"], 0);
    }
}
