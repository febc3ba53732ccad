use serde::{Deserialize, Serialize};

pub const DEFAULT_DESCRIPTION: &str = "Assessment for evaluating candidate capabilities.";
pub const DEFAULT_DURATION: u32 = 30;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Column order shared by both export formats.
pub const FIELDS: [&str; 7] = [
    "name",
    "url",
    "description",
    "duration",
    "test_type",
    "adaptive_support",
    "remote_support",
];

/// Category label. Order of declaration is the order labels are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    Cognitive,
    Personality,
    Ability,
    Situational,
    Knowledge,
    General,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Cognitive => "Cognitive",
            TestType::Personality => "Personality",
            TestType::Ability => "Ability",
            TestType::Situational => "Situational",
            TestType::Knowledge => "Knowledge",
            TestType::General => "General",
        }
    }

    pub fn parse(label: &str) -> Option<TestType> {
        match label.trim() {
            "Cognitive" => Some(TestType::Cognitive),
            "Personality" => Some(TestType::Personality),
            "Ability" => Some(TestType::Ability),
            "Situational" => Some(TestType::Situational),
            "Knowledge" => Some(TestType::Knowledge),
            "General" => Some(TestType::General),
            _ => None,
        }
    }
}

/// One catalogue product, either scraped from a detail page or synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub name: String,
    pub url: String,
    pub description: String,
    /// Minutes.
    pub duration: u32,
    pub test_type: Vec<TestType>,
    #[serde(with = "yes_no")]
    pub adaptive_support: bool,
    #[serde(with = "yes_no")]
    pub remote_support: bool,
}

impl AssessmentRecord {
    pub fn test_type_joined(&self) -> String {
        self.test_type
            .iter()
            .map(TestType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Booleans travel as "Yes"/"No" in every export. Native bools are accepted on read.
pub mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn label(value: bool) -> &'static str {
        if value {
            "Yes"
        } else {
            "No"
        }
    }

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(label(*value))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Flag(b) => Ok(b),
            Raw::Text(t) if t.eq_ignore_ascii_case("yes") => Ok(true),
            Raw::Text(t) if t.eq_ignore_ascii_case("no") => Ok(false),
            Raw::Text(t) => Err(serde::de::Error::custom(format!(
                "expected \"Yes\" or \"No\", got {t:?}"
            ))),
        }
    }
}
