use crate::record::{AssessmentRecord, TestType};

const SYNTHETIC_URL_BASE: &str = "https://www.shl.com/assessments";

struct Template {
    name: &'static str,
    description: &'static str,
    test_type: &'static [TestType],
    base_duration: u32,
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "Numerical Reasoning Test",
        description: "Evaluates numerical problem-solving and data interpretation skills",
        test_type: &[TestType::Cognitive, TestType::Ability],
        base_duration: 25,
    },
    Template {
        name: "Verbal Reasoning Assessment",
        description: "Measures verbal comprehension and critical thinking abilities",
        test_type: &[TestType::Cognitive, TestType::Ability],
        base_duration: 30,
    },
    Template {
        name: "Logical Reasoning Evaluation",
        description: "Assesses logical thinking and pattern recognition skills",
        test_type: &[TestType::Cognitive, TestType::Ability],
        base_duration: 35,
    },
    Template {
        name: "Personality Questionnaire",
        description: "Comprehensive personality assessment for workplace behavior",
        test_type: &[TestType::Personality],
        base_duration: 20,
    },
    Template {
        name: "Situational Judgment Test",
        description: "Evaluates decision-making in workplace scenarios",
        test_type: &[TestType::Situational, TestType::Personality],
        base_duration: 40,
    },
];

const VARIATIONS: &[&str] = &[
    "Advanced",
    "Professional",
    "Executive",
    "Graduate",
    "Senior",
    "Junior",
    "Intermediate",
];

const DOMAINS: &[&str] = &[
    "Sales",
    "Management",
    "Technical",
    "Customer Service",
    "Finance",
    "HR",
    "Marketing",
];

/// Pure, build-independent hash: the first 8 bytes of the BLAKE3 digest.
pub fn stable_hash(input: &str) -> u64 {
    let digest = blake3::hash(input.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

fn slug(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn synthesize(t: &Template, variation: &str, domain: &str) -> AssessmentRecord {
    let jitter = (stable_hash(&format!("{variation}{domain}")) % 20) as u32;
    AssessmentRecord {
        name: format!("{variation} {} - {domain}", t.name),
        url: format!(
            "{SYNTHETIC_URL_BASE}/{}-{}-{}",
            slug(variation),
            slug(t.name),
            slug(domain)
        ),
        description: format!(
            "{} tailored for {domain} roles at {} level",
            t.description,
            variation.to_lowercase()
        ),
        duration: t.base_duration + jitter,
        test_type: t.test_type.to_vec(),
        adaptive_support: stable_hash(variation) % 2 == 1,
        remote_support: true,
    }
}

/// Records needed to bring `existing` up to `target`, walking
/// template × variation × domain in order and wrapping around as needed.
pub fn augment(existing: &[AssessmentRecord], target: usize) -> Vec<AssessmentRecord> {
    let need = target.saturating_sub(existing.len());
    TEMPLATES
        .iter()
        .flat_map(|t| {
            VARIATIONS
                .iter()
                .flat_map(move |v| DOMAINS.iter().map(move |d| (t, *v, *d)))
        })
        .cycle()
        .take(need)
        .map(|(t, v, d)| synthesize(t, v, d))
        .collect()
}
