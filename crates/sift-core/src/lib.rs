//! Pattern-matching and normalization engine.
//!
//! The pipeline runs in three steps: rules are compiled once per run
//! ([`compile`]), every row of every language partition is evaluated against
//! every compiled rule ([`engine`]), and multi-source loads are merged and
//! deduplicated ([`dedupe`]). Text comparison is accent- and
//! case-insensitive throughout ([`normalize`]).

#![deny(unsafe_code)]

pub mod compile;
pub mod conditions;
pub mod dedupe;
pub mod engine;
pub mod matcher;
pub mod normalize;

pub use compile::{classify_field, compile_rules};
pub use dedupe::{DedupeStats, MergedData, merge_and_dedupe};
pub use engine::MatchEngine;
pub use matcher::row_matches;
pub use normalize::{clean_pattern_text, normalize_column_name, normalize_for_comparison};
