//! Content-matching rules for the short stat spans under a batsman's
//! partnership block.
//!
//! The page renders fours, sixes and strike rate as loose `<span>`s with no
//! distinguishing class, so each stat is picked by a text predicate. Rules are
//! evaluated independently: for every rule the first span (in page order) it
//! accepts wins, and a rule that accepts nothing yields its default.
//!
//! The fours rule only checks for a leading `0`. That is what the upstream
//! markup needs today and it will misfire on any other stat that happens to
//! start with `0`; keep it as is until the markup is re-checked.

use super::defaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    Fours,
    Sixes,
    StrikeRate,
}

/// A single `(predicate, field)` pair.
#[derive(Clone, Copy)]
pub struct StatRule {
    pub field: StatField,
    pub matches: fn(&str) -> bool,
    pub default: &'static str,
}

pub fn is_fours(span: &str) -> bool {
    span.starts_with('0')
}

pub fn is_sixes(span: &str) -> bool {
    span.contains("6s")
}

pub fn is_strike_rate(span: &str) -> bool {
    span.contains("SR")
}

pub const STAT_RULES: &[StatRule] = &[
    StatRule {
        field: StatField::Fours,
        matches: is_fours,
        default: defaults::FOURS,
    },
    StatRule {
        field: StatField::Sixes,
        matches: is_sixes,
        default: defaults::SIXES,
    },
    StatRule {
        field: StatField::StrikeRate,
        matches: is_strike_rate,
        default: defaults::STRIKE_RATE,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattingStats {
    pub fours: String,
    pub sixes: String,
    pub sr: String,
}

/// Apply `rules` to the stat spans of one partnership block.
pub fn classify_stats<S: AsRef<str>>(rules: &[StatRule], spans: &[S]) -> BattingStats {
    let mut stats = BattingStats {
        fours: defaults::FOURS.to_string(),
        sixes: defaults::SIXES.to_string(),
        sr: defaults::STRIKE_RATE.to_string(),
    };

    for rule in rules {
        let value = spans
            .iter()
            .map(|s| s.as_ref())
            .find(|s| (rule.matches)(*s))
            .unwrap_or(rule.default)
            .to_string();

        match rule.field {
            StatField::Fours => stats.fours = value,
            StatField::Sixes => stats.sixes = value,
            StatField::StrikeRate => stats.sr = value,
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fours_rule_leading_zero() {
        assert!(is_fours("0 4s"));
        assert!(is_fours("04"));
        assert!(!is_fours("4s: 3"));
        assert!(!is_fours(""));
    }

    #[test]
    fn test_sixes_rule() {
        assert!(is_sixes("2 6s"));
        assert!(!is_sixes("4s"));
    }

    #[test]
    fn test_strike_rate_rule() {
        assert!(is_strike_rate("SR: 142.86"));
        assert!(!is_strike_rate("sr 100"));
    }

    #[test]
    fn test_classify_all_present() {
        let spans = ["0 4s", "1 6s", "SR: 133.33"];
        let stats = classify_stats(STAT_RULES, &spans);
        assert_eq!(stats.fours, "0 4s");
        assert_eq!(stats.sixes, "1 6s");
        assert_eq!(stats.sr, "SR: 133.33");
    }

    #[test]
    fn test_classify_defaults_when_nothing_matches() {
        let spans: [&str; 0] = [];
        let stats = classify_stats(STAT_RULES, &spans);
        assert_eq!(stats.fours, "0");
        assert_eq!(stats.sixes, "0");
        assert_eq!(stats.sr, "");
    }

    #[test]
    fn test_classify_first_match_wins() {
        let spans = ["2 6s", "3 6s"];
        let stats = classify_stats(STAT_RULES, &spans);
        assert_eq!(stats.sixes, "2 6s");
    }

    #[test]
    fn test_classify_non_zero_fours_falls_back() {
        // "3 4s" does not start with 0, so the fours rule does not pick it up
        let spans = ["3 4s", "0 6s"];
        let stats = classify_stats(STAT_RULES, &spans);
        assert_eq!(stats.fours, "0 6s");
        assert_eq!(stats.sixes, "0 6s");
    }

    #[test]
    fn test_custom_rule_table() {
        fn is_labelled_fours(s: &str) -> bool {
            s.ends_with("4s")
        }
        let rules = [StatRule {
            field: StatField::Fours,
            matches: is_labelled_fours,
            default: defaults::FOURS,
        }];
        let stats = classify_stats(&rules, &["3 4s", "SR: 90"]);
        assert_eq!(stats.fours, "3 4s");
        // fields without a rule keep their defaults
        assert_eq!(stats.sr, "");
    }
}
