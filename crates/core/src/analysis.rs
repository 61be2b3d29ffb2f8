//! Query handling shared by the submission paths.

/// Query used when the caller leaves the `query` field blank or omits it.
pub const DEFAULT_QUERY: &str = "Analyze the uploaded financial report comprehensively.";

/// Normalize a caller-supplied query.
///
/// Blank or absent queries fall back to [`DEFAULT_QUERY`]; anything else is
/// trimmed. Blank input is defaulted rather than rejected.
pub fn normalize_query(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => DEFAULT_QUERY.to_string(),
    }
}
