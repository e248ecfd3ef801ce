//! Search query construction.
//!
//! Terms are joined into one quoted OR group per language, bounded by the
//! API's query length budget, then suffixed with the language and retweet
//! filters.

/// Query length budget for the OR group.
const MAX_QUERY_LEN: usize = 900;

/// Takes terms from the front of the list until the length budget is spent.
///
/// Each term accounts for its quoting and ` OR ` joiner; the first term
/// that would overflow stops the scan.
pub fn build_chunks(terms: &[String]) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut length = 0usize;
    for term in terms {
        length += term.len() + 4;
        if length < MAX_QUERY_LEN && !term.is_empty() {
            chunks.push(term.as_str());
        } else {
            break;
        }
    }
    chunks
}

/// Builds the search query for one language, or `None` when no terms fit.
pub fn build_query(language: &str, terms: &[String], only_verified: bool) -> Option<String> {
    let chunks = build_chunks(terms);
    if chunks.is_empty() {
        return None;
    }
    let group = chunks
        .iter()
        .map(|term| format!("\"{term}\""))
        .collect::<Vec<_>>()
        .join(" OR ");
    let mut query = format!("({group}) lang:{language} -is:retweet");
    if only_verified {
        query.push_str(" is:verified");
    }
    Some(query)
}
