use super::contains_any;
use crate::parser::Page;

const ADAPTIVE_KEYWORDS: &[&str] = &["adaptive", "personalized", "tailored", "dynamic"];
const REMOTE_KEYWORDS: &[&str] = &["remote", "online", "virtual", "digital", "web-based"];

pub fn adaptive_support(page: &Page) -> bool {
    contains_any(page.text(), ADAPTIVE_KEYWORDS)
}

/// Always true: the whole product line is delivered remotely. The keyword
/// hit is only logged.
pub fn remote_support(page: &Page) -> bool {
    let mentioned = contains_any(page.text(), REMOTE_KEYWORDS);
    tracing::trace!(mentioned, "remote delivery keywords");
    true
}
