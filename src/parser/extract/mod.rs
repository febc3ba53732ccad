pub mod description;
pub mod duration;
pub mod flags;
pub mod test_type;

use super::Page;

/// One way of pulling a value out of a page. Fallback chains are ordered
/// lists of these, tried until one returns `Some`.
pub trait Strategy<T> {
    fn attempt(&self, page: &Page) -> Option<T>;
}

pub fn first_hit<T>(strategies: &[&dyn Strategy<T>], page: &Page) -> Option<T> {
    strategies.iter().find_map(|s| s.attempt(page))
}

/// True if `text` contains any of `keywords` as a substring.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
