pub mod extract;
pub mod links;

use scraper::{ElementRef, Html, Selector};

use crate::record::AssessmentRecord;

/// A parsed page plus its lowercased full text, computed once.
pub struct Page {
    html: Html,
    text: String,
}

impl Page {
    pub fn parse(body: &str) -> Self {
        let html = Html::parse_document(body);
        let text = html
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self { html, text }
    }

    /// Lowercased text of the whole document.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }
}

/// Visible text of an element with whitespace runs collapsed.
pub fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Detail page → record. Name and URL come from the catalogue link.
pub fn extract_record(body: &str, name: &str, url: &str) -> AssessmentRecord {
    let page = Page::parse(body);
    let name = match name.trim() {
        "" => name_from_url(url),
        trimmed => trimmed.to_string(),
    };
    AssessmentRecord {
        test_type: extract::test_type::extract(&page, &name),
        name,
        url: url.to_string(),
        description: extract::description::extract(&page),
        duration: extract::duration::extract(&page),
        adaptive_support: extract::flags::adaptive_support(&page),
        remote_support: extract::flags::remote_support(&page),
    }
}

/// Last non-empty path segment, e.g. `/view/verbal-reasoning/` → `verbal-reasoning`.
fn name_from_url(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .find(|seg| !seg.is_empty())
        .unwrap_or(url)
        .to_string()
}

#[cfg(test)]
pub(crate) fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
}
