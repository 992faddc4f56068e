use serde::{Deserialize, Serialize};

use super::defaults;

/// One poll cycle's view of the live match, as scraped from the scoreboard page.
///
/// Every field is always present; anything the page did not expose carries the
/// value from [`defaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub match_title: String,
    pub team1: TeamInfo,
    pub team2: TeamBadge,
    /// Labeled rate strings in page order, e.g. "Current Rate: 7.86"
    pub run_rates: Vec<String>,
    /// Result or commentary line
    pub result: String,
    /// Partnership entries in page order; the ticker shows the first two
    pub batsmen: Vec<BatsmanInfo>,
    pub bowler: Option<BowlerInfo>,
}

impl Default for MatchSnapshot {
    fn default() -> Self {
        MatchSnapshot {
            match_title: defaults::MATCH_TITLE.to_string(),
            team1: TeamInfo::default(),
            team2: TeamBadge::default(),
            run_rates: Vec::new(),
            result: defaults::RESULT.to_string(),
            batsmen: Vec::new(),
            bowler: None,
        }
    }
}

/// The batting side: name, flag image URL and current score line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: Option<String>,
    /// Flag image URL
    pub flag: Option<String>,
    pub score: String,
    pub overs: String,
}

impl Default for TeamInfo {
    fn default() -> Self {
        TeamInfo {
            name: None,
            flag: None,
            score: defaults::SCORE.to_string(),
            overs: defaults::OVERS.to_string(),
        }
    }
}

/// The second-innings side. Only name and flag are shown on the ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamBadge {
    pub name: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatsmanInfo {
    pub name: String,
    /// Runs scored; a trailing `*` marks the batsman as not out
    pub runs: String,
    pub balls: String,
    pub fours: String,
    pub sixes: String,
    /// Strike rate as shown on the page
    pub sr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerInfo {
    pub name: String,
    /// Wickets-runs figures, e.g. "2-31"
    pub figures: String,
    pub overs: String,
    pub econ: String,
}
