pub mod config;
pub mod extract;
pub mod inspect;
pub mod schema;

/// Split a comma-separated list, dropping blanks.
pub(crate) fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
