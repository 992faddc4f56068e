//! Turns a rendered scoreboard page into a [`MatchSnapshot`].
//!
//! Every field is read independently. A selector that matches nothing gives
//! the field its value from [`defaults`]; extraction as a whole never fails.

use scraper::{ElementRef, Html, Selector};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use super::defaults;
use super::models::{BatsmanInfo, BowlerInfo, MatchSnapshot, TeamBadge, TeamInfo};
use super::rules::{classify_stats, STAT_RULES};

// Header
const MATCH_TITLE: &str = ".live-score-header .name-wrapper span";

// Innings blocks
const TEAM1_NAME: &str = ".team-inning .team-name.team-1";
const TEAM1_FLAG: &str = ".team-inning .team-img img";
const TEAM1_SCORE_SPANS: &str = ".team-inning .team-score .runs.f-runs span";
const TEAM2_NAME: &str = ".team-inning.second-inning .team-name.team-2";
const TEAM2_FLAG: &str = ".team-inning.second-inning .team-img img";

const RUN_RATE_TITLES: &str = ".team-run-rate .title";

/// Tried in order; the first non-empty text wins.
const RESULT_LINES: &[&str] = &[".final-result.comment", ".final-result.des-none"];

// Partnership blocks (batsmen and the current bowler share the same layout)
const PARTNERSHIPS: &str = ".playing-batsmen-wrapper .batsmen-partnership";
const BOWLER_MARKER: &str = ".playing-batsmen-wrapper .batsmen-partnership .bowler";
const PLAYER_NAME: &str = ".batsmen-name p";
const FIRST_SCORE: &str = ".batsmen-score p:nth-child(1)";
const SECOND_SCORE: &str = ".batsmen-score p:nth-child(2)";
const STRIKE_SPANS: &str = ".player-strike-wrapper span";
const LAST_STRIKE_SPAN: &str = ".player-strike-wrapper span:last-child";

const ECON_PREFIX: &str = "Econ:";

/// Parse `markup` and extract a snapshot.
///
/// Any panic raised while parsing or walking the document is caught and
/// replaced with [`MatchSnapshot::default`].
pub fn extract_snapshot(markup: &str) -> MatchSnapshot {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let document = Html::parse_document(markup);
        extract(&document)
    }));

    match outcome {
        Ok(snapshot) => snapshot,
        Err(_) => {
            warn!("Snapshot extraction panicked; serving all-default snapshot");
            MatchSnapshot::default()
        }
    }
}

/// Extract a snapshot from an already parsed document.
pub fn extract(document: &Html) -> MatchSnapshot {
    let root = document.root_element();

    let team1_runs = all_trimmed(root, TEAM1_SCORE_SPANS);
    let team1 = TeamInfo {
        name: trimmed_text(root, TEAM1_NAME),
        flag: attr(root, TEAM1_FLAG, "src"),
        score: nth_or(&team1_runs, 0, defaults::SCORE),
        overs: nth_or(&team1_runs, 1, defaults::OVERS),
    };

    let team2 = TeamBadge {
        name: trimmed_text(root, TEAM2_NAME),
        flag: attr(root, TEAM2_FLAG, "src"),
    };

    let result = RESULT_LINES
        .iter()
        .filter_map(|css| trimmed_text(root, css))
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| defaults::RESULT.to_string());

    let batsmen: Vec<BatsmanInfo> = select_all(root, PARTNERSHIPS)
        .into_iter()
        .filter_map(extract_batsman)
        .collect();

    let snapshot = MatchSnapshot {
        match_title: first(root, MATCH_TITLE)
            .map(text_content)
            .unwrap_or_else(|| defaults::MATCH_TITLE.to_string()),
        team1,
        team2,
        run_rates: all_trimmed(root, RUN_RATE_TITLES),
        result,
        batsmen,
        bowler: extract_bowler(root),
    };

    debug!(
        "Extracted snapshot: title={:?} batsmen={} bowler={} rates={}",
        snapshot.match_title,
        snapshot.batsmen.len(),
        snapshot.bowler.is_some(),
        snapshot.run_rates.len()
    );

    snapshot
}

/// One batsman entry. Blocks without a readable name are dropped.
fn extract_batsman(block: ElementRef<'_>) -> Option<BatsmanInfo> {
    let name = trimmed_text(block, PLAYER_NAME).filter(|n| !n.is_empty())?;
    let spans = all_trimmed(block, STRIKE_SPANS);
    let stats = classify_stats(STAT_RULES, &spans);

    Some(BatsmanInfo {
        name,
        runs: trimmed_text(block, FIRST_SCORE).unwrap_or_else(|| defaults::RUNS.to_string()),
        balls: first(block, SECOND_SCORE)
            .map(|el| strip_parens(&text_content(el)))
            .unwrap_or_else(|| defaults::BALLS.to_string()),
        fours: stats.fours,
        sixes: stats.sixes,
        sr: stats.sr,
    })
}

/// The bowler block is the parent of the first `.bowler` marker.
fn extract_bowler(root: ElementRef<'_>) -> Option<BowlerInfo> {
    let marker = first(root, BOWLER_MARKER)?;
    let block = marker.parent().and_then(ElementRef::wrap)?;

    Some(BowlerInfo {
        name: trimmed_text(block, PLAYER_NAME)
            .unwrap_or_else(|| defaults::BOWLER_NAME.to_string()),
        figures: trimmed_text(block, FIRST_SCORE).unwrap_or_else(|| defaults::FIGURES.to_string()),
        overs: first(block, SECOND_SCORE)
            .map(|el| strip_parens(&text_content(el)))
            .unwrap_or_else(|| defaults::BOWLER_OVERS.to_string()),
        econ: first(block, LAST_STRIKE_SPAN)
            .map(|el| text_content(el).replacen(ECON_PREFIX, "", 1).trim().to_string())
            .unwrap_or_else(|| defaults::ECONOMY.to_string()),
    })
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    let found = scope.select(&sel).next();
    found
}

fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Some(sel) = selector(css) else {
        return Vec::new();
    };
    let found = scope.select(&sel).collect();
    found
}

fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

fn trimmed_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    first(scope, css).map(|el| text_content(el).trim().to_string())
}

fn all_trimmed(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    select_all(scope, css)
        .into_iter()
        .map(|el| text_content(el).trim().to_string())
        .collect()
}

fn attr(scope: ElementRef<'_>, css: &str, name: &str) -> Option<String> {
    first(scope, css).and_then(|el| el.value().attr(name).map(str::to_string))
}

fn nth_or(values: &[String], index: usize, default: &str) -> String {
    values
        .get(index)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// "(12)" → "12"
fn strip_parens(s: &str) -> String {
    s.replace(['(', ')'], "").trim().to_string()
}
