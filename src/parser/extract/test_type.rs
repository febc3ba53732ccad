use super::contains_any;
use crate::parser::Page;
use crate::record::TestType;

/// Keyword groups in label priority order.
const GROUPS: &[(TestType, &[&str])] = &[
    (
        TestType::Cognitive,
        &["cognitive", "reasoning", "numerical", "verbal", "logical"],
    ),
    (
        TestType::Personality,
        &["personality", "behavioral", "motivation", "values"],
    ),
    (
        TestType::Ability,
        &["ability", "aptitude", "skill", "competency"],
    ),
    (TestType::Situational, &["situational", "judgment", "scenario"]),
    (TestType::Knowledge, &["knowledge", "technical", "expertise"]),
];

/// Every group with a keyword hit in page text or item name; `[General]` if none.
pub fn extract(page: &Page, name: &str) -> Vec<TestType> {
    classify_text(&format!("{} {}", page.text(), name.to_lowercase()))
}

pub fn classify_text(text: &str) -> Vec<TestType> {
    let labels: Vec<TestType> = GROUPS
        .iter()
        .filter(|(_, keywords)| contains_any(text, keywords))
        .map(|(label, _)| *label)
        .collect();

    if labels.is_empty() {
        vec![TestType::General]
    } else {
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_group_order_not_text_order() {
        assert_eq!(
            classify_text("personality traits and numerical data"),
            vec![TestType::Cognitive, TestType::Personality]
        );
    }

    #[test]
    fn name_contributes() {
        let page = Page::parse("<p>A short quiz.</p>");
        assert_eq!(
            extract(&page, "Situational Judgment Test"),
            vec![TestType::Situational]
        );
    }

    #[test]
    fn all_groups_can_co_occur() {
        let labels = classify_text("verbal motivation aptitude scenario technical");
        assert_eq!(labels.len(), 5);
        assert!(!labels.contains(&TestType::General));
    }

    #[test]
    fn no_hits_is_general() {
        assert_eq!(classify_text("a quiz about nothing"), vec![TestType::General]);
        assert_eq!(extract(&Page::parse(""), "OPQ32"), vec![TestType::General]);
    }
}
