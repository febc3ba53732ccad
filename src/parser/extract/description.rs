use std::sync::LazyLock;

use scraper::Selector;

use super::{first_hit, Strategy};
use crate::parser::{collapse_whitespace, element_text, Page};
use crate::record::{DEFAULT_DESCRIPTION, MAX_DESCRIPTION_CHARS};

static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static DESCRIPTION_REGION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".description").unwrap());
static SUMMARY_REGION: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".summary").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// `content` attribute of `<meta name="description">`.
struct MetaDescription;

impl Strategy<String> for MetaDescription {
    fn attempt(&self, page: &Page) -> Option<String> {
        let el = page.select_first(&META_DESCRIPTION)?;
        let content = collapse_whitespace(el.value().attr("content")?);
        non_empty(content)
    }
}

/// Text of the first element matching a selector.
struct Region(&'static LazyLock<Selector>);

impl Strategy<String> for Region {
    fn attempt(&self, page: &Page) -> Option<String> {
        let el = page.select_first(self.0)?;
        non_empty(element_text(&el))
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn truncate(s: &str) -> String {
    s.chars()
        .take(MAX_DESCRIPTION_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn extract(page: &Page) -> String {
    let chain: [&dyn Strategy<String>; 4] = [
        &MetaDescription,
        &Region(&DESCRIPTION_REGION),
        &Region(&SUMMARY_REGION),
        &Region(&PARAGRAPH),
    ];
    first_hit(&chain, page)
        .map(|d| truncate(&d))
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
}
