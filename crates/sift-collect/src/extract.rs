//! Flattening of collected tweets into tabular rows.
//!
//! Each kept tweet becomes one row with a fixed column set: scalar fields
//! first, then the raw user, public-metrics and tweet objects as JSON dump
//! columns so no information is lost in the spreadsheet form.

use std::collections::BTreeMap;

use serde_json::Value;

use sift_model::{CellValue, Row, Sheet};

/// Resolves a display gender for a user object.
///
/// The production resolver is an external enrichment service; the default
/// implementation answers with the unknown marker.
pub trait GenderResolver {
    fn resolve(&self, user: &Value) -> String;
}

/// Marker used when no gender information is available.
pub const UNKNOWN_GENDER: &str = "Desconocido";

/// Resolver that never knows.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownGender;

impl GenderResolver for UnknownGender {
    fn resolve(&self, _user: &Value) -> String {
        UNKNOWN_GENDER.to_string()
    }
}

/// Export column set, in sheet order.
pub const EXPORT_COLUMNS: [&str; 20] = [
    "Tweet ID",
    "Fecha",
    "Lenguaje",
    "Texto",
    "Usuario",
    "Usuario Nombre",
    "Usuario Genero",
    "Verificado",
    "Tipo de Verificación",
    "Ubicación",
    "Seguidores",
    "Siguiendo",
    "Tweets",
    "Retweets",
    "Replies",
    "Likes",
    "Quotes",
    "User Dump",
    "Public Metrics Dump",
    "Tweet Dump",
];

fn text_field(value: &Value, key: &str) -> CellValue {
    match value.get(key) {
        Some(Value::String(text)) => CellValue::Text(text.clone()),
        Some(Value::Number(number)) => CellValue::Number(number.as_f64().unwrap_or(0.0)),
        Some(Value::Bool(flag)) => CellValue::Bool(*flag),
        _ => CellValue::Missing,
    }
}

fn metric(value: &Value, key: &str) -> CellValue {
    match value.get(key).and_then(Value::as_f64) {
        Some(number) => CellValue::Number(number),
        None => CellValue::Missing,
    }
}

fn dump(value: &Value) -> CellValue {
    CellValue::Text(serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string()))
}

/// Flattens one enriched tweet into a tabular row.
pub fn tweet_row(tweet: &Value, genders: &impl GenderResolver) -> Row {
    let empty = Value::Object(serde_json::Map::new());
    let user = tweet
        .get("includes")
        .and_then(|includes| includes.get("users"))
        .and_then(|users| users.get(0))
        .unwrap_or(&empty);
    let public_metrics = tweet.get("public_metrics").unwrap_or(&empty);
    let user_metrics = user.get("public_metrics").unwrap_or(&empty);

    let mut row = Row::new();
    row.set("Tweet ID", text_field(tweet, "id"));
    row.set("Fecha", text_field(tweet, "created_at"));
    row.set("Lenguaje", text_field(tweet, "lang"));
    row.set("Texto", text_field(tweet, "text"));
    row.set("Usuario", text_field(user, "username"));
    row.set("Usuario Nombre", text_field(user, "name"));
    row.set("Usuario Genero", CellValue::Text(genders.resolve(user)));
    row.set("Verificado", text_field(user, "verified"));
    row.set("Tipo de Verificación", text_field(user, "verified_type"));
    row.set("Ubicación", text_field(user, "location"));
    row.set("Seguidores", metric(user_metrics, "followers_count"));
    row.set("Siguiendo", metric(user_metrics, "following_count"));
    row.set("Tweets", metric(user_metrics, "tweet_count"));
    row.set("Retweets", metric(public_metrics, "retweet_count"));
    row.set("Replies", metric(public_metrics, "reply_count"));
    row.set("Likes", metric(public_metrics, "like_count"));
    row.set("Quotes", metric(public_metrics, "quote_count"));
    row.set("User Dump", dump(user));
    row.set("Public Metrics Dump", dump(public_metrics));
    row.set("Tweet Dump", dump(tweet));
    row
}

/// Groups flattened rows into one sheet per language.
///
/// A tweet without a language tag lands in the `unknown` sheet.
pub fn group_by_language(rows: &[Value], genders: &impl GenderResolver) -> BTreeMap<String, Sheet> {
    let columns: Vec<String> = EXPORT_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    let mut sheets: BTreeMap<String, Sheet> = BTreeMap::new();
    for tweet in rows {
        let language = tweet
            .get("lang")
            .and_then(Value::as_str)
            .filter(|lang| !lang.is_empty())
            .unwrap_or("unknown")
            .to_string();
        let sheet = sheets
            .entry(language.clone())
            .or_insert_with(|| Sheet::new(language, columns.clone()));
        sheet.push_row(tweet_row(tweet, genders));
    }
    sheets
}
