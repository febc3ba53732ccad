use std::sync::LazyLock;

use regex::Regex;

use super::{first_hit, Strategy};
use crate::parser::Page;
use crate::record::DEFAULT_DURATION;

static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)\s*minutes?").unwrap());
static MINS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)\s*mins?").unwrap());
static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)\s*hours?").unwrap());

/// `<N> <unit>` anywhere in the page text, scaled to minutes.
struct UnitPattern {
    re: &'static LazyLock<Regex>,
    minutes_per_unit: u32,
}

impl Strategy<u32> for UnitPattern {
    fn attempt(&self, page: &Page) -> Option<u32> {
        self.re.captures_iter(page.text()).find_map(|caps| {
            let n: u32 = caps[1].parse().ok()?;
            n.checked_mul(self.minutes_per_unit).filter(|m| *m > 0)
        })
    }
}

static MINUTES: UnitPattern = UnitPattern { re: &MINUTES_RE, minutes_per_unit: 1 };
static MINS: UnitPattern = UnitPattern { re: &MINS_RE, minutes_per_unit: 1 };
static HOURS: UnitPattern = UnitPattern { re: &HOURS_RE, minutes_per_unit: 60 };

/// Duration in minutes. Earlier patterns win even when a later one matches
/// earlier in the text.
pub fn extract(page: &Page) -> u32 {
    let chain: [&dyn Strategy<u32>; 3] = [&MINUTES, &MINS, &HOURS];
    first_hit(&chain, page).unwrap_or(DEFAULT_DURATION)
}
