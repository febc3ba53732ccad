use std::sync::LazyLock;

use scraper::Selector;
use url::Url;

use super::{element_text, Page};

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Bundles and packaged job solutions. Checked first; a hit here always wins.
const DENY_TERMS: &[&str] = &["pre-packaged", "job-solution", "package"];
const ALLOW_TERMS: &[&str] = &[
    "assessment",
    "test",
    "cognitive",
    "personality",
    "behavioral",
    "ability",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    InScope,
    OutOfScope,
}

/// An in-scope catalogue link, already resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueLink {
    pub url: String,
    pub text: String,
}

pub fn classify(href: Option<&str>, text: &str) -> LinkScope {
    let href = match href {
        Some(h) if !h.trim().is_empty() => h.to_lowercase(),
        _ => return LinkScope::OutOfScope,
    };
    let text = text.to_lowercase();
    let hit = |terms: &[&str]| terms.iter().any(|t| href.contains(t) || text.contains(t));

    if hit(DENY_TERMS) {
        LinkScope::OutOfScope
    } else if hit(ALLOW_TERMS) {
        LinkScope::InScope
    } else {
        LinkScope::OutOfScope
    }
}

/// Every in-scope anchor on the page, in document order.
pub fn catalogue_links(page: &Page, base: &Url) -> Vec<CatalogueLink> {
    page.select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href");
            let text = a.text().collect::<String>();
            if classify(href, &text) != LinkScope::InScope {
                return None;
            }
            let url = base.join(href?.trim()).ok()?;
            Some(CatalogueLink {
                url: url.to_string(),
                text: element_text(&a),
            })
        })
        .collect()
}
