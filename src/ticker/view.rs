//! Pure presentation of the ticker: everything here is a function of the
//! current [`TickerState`] and nothing else.

use serde::Serialize;

use super::store::TickerState;
use crate::scoreboard::{defaults, BatsmanInfo, MatchSnapshot};

/// Labels that mark the current run rate entry, checked in this order.
const CURRENT_RATE_LABELS: &[&str] = &["Current Rate", "Current Run Rate"];

const NOT_OUT_MARKER: char = '*';

/// How many partnership entries the ticker shows as "at the crease".
pub const ACTIVE_BATSMEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerView {
    pub team1_code: String,
    pub team1_flag: Option<FlagView>,
    pub team2_flag: Option<FlagView>,
    pub score: String,
    pub overs: String,
    pub current_rate: String,
    pub batsmen: Vec<BatsmanLine>,
    pub bowler: Option<BowlerLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagView {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatsmanLine {
    pub name: String,
    pub runs: String,
    pub not_out: bool,
    pub balls: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerLine {
    pub name: String,
    pub figures: String,
}

/// The first two partnership entries, in page order.
pub fn active_batsmen(snapshot: &MatchSnapshot) -> &[BatsmanInfo] {
    let n = snapshot.batsmen.len().min(ACTIVE_BATSMEN);
    &snapshot.batsmen[..n]
}

/// Value part of the first "current rate" entry, e.g. "Current Rate: 8.42" → "8.42".
pub fn current_rate(run_rates: &[String]) -> String {
    run_rates
        .iter()
        .find(|rate| CURRENT_RATE_LABELS.iter().any(|label| rate.contains(label)))
        .and_then(|rate| rate.split(':').nth(1))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(defaults::CURRENT_RATE)
        .to_string()
}

/// Surname in capitals: "Babar Azam" → "AZAM".
pub fn display_name(name: &str) -> String {
    name.split_whitespace()
        .last()
        .unwrap_or(name)
        .to_uppercase()
}

/// Split the not-out marker off a runs value: "34*" → ("34", true).
pub fn split_not_out(runs: &str) -> (String, bool) {
    if runs.contains(NOT_OUT_MARKER) {
        (runs.replacen(NOT_OUT_MARKER, "", 1), true)
    } else {
        (runs.to_string(), false)
    }
}

/// Three-letter team code, "T1" when the name is unknown.
pub fn team_code(name: Option<&str>) -> String {
    let code: String = name.unwrap_or("").chars().take(3).collect::<String>().to_uppercase();
    if code.is_empty() {
        "T1".to_string()
    } else {
        code
    }
}

fn flag(src: Option<&str>, name: Option<&str>, fallback_alt: &str) -> Option<FlagView> {
    let src = src.filter(|s| !s.is_empty())?;
    Some(FlagView {
        src: src.to_string(),
        alt: name
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback_alt)
            .to_string(),
    })
}

pub fn derive_view(snapshot: &MatchSnapshot) -> TickerView {
    let batsmen = active_batsmen(snapshot)
        .iter()
        .map(|b| {
            let (runs, not_out) = split_not_out(&b.runs);
            BatsmanLine {
                name: display_name(&b.name),
                runs,
                not_out,
                balls: b.balls.clone(),
            }
        })
        .collect();

    TickerView {
        team1_code: team_code(snapshot.team1.name.as_deref()),
        team1_flag: flag(
            snapshot.team1.flag.as_deref(),
            snapshot.team1.name.as_deref(),
            "Team 1",
        ),
        team2_flag: flag(
            snapshot.team2.flag.as_deref(),
            snapshot.team2.name.as_deref(),
            "Team 2",
        ),
        score: snapshot.team1.score.clone(),
        overs: snapshot.team1.overs.clone(),
        current_rate: current_rate(&snapshot.run_rates),
        batsmen,
        bowler: snapshot.bowler.as_ref().map(|b| BowlerLine {
            name: display_name(&b.name),
            figures: b.figures.clone(),
        }),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flag_html(flag: &Option<FlagView>) -> String {
    match flag {
        Some(f) => format!(
            r#"<img class="flag" src="{}" alt="{}">"#,
            escape(&f.src),
            escape(&f.alt)
        ),
        None => String::new(),
    }
}

/// The ticker strip for one state. Loading and failure get their own banners.
pub fn render_ticker(state: &TickerState) -> String {
    let snapshot = match state {
        TickerState::Loading => {
            return r#"<div class="ticker banner loading">Loading Live Cricket...</div>"#
                .to_string()
        }
        TickerState::Failed => {
            return r#"<div class="ticker banner failed">Failed to Load Data</div>"#.to_string()
        }
        TickerState::Ready(snapshot) => snapshot,
    };
    let view = derive_view(snapshot);

    let batsmen: String = view
        .batsmen
        .iter()
        .map(|b| {
            let marker = if b.not_out {
                r#"<span class="not-out">*</span>"#
            } else {
                ""
            };
            format!(
                r#"<div class="batsman"><span class="name">{}</span><span class="runs">{}{}</span><span class="balls">({})</span></div>"#,
                escape(&b.name),
                escape(&b.runs),
                marker,
                escape(&b.balls)
            )
        })
        .collect();

    let bowler = match &view.bowler {
        Some(b) => format!(
            r#"<div class="bowler"><span class="name">⚾ {}</span><span class="figures">{}</span></div>"#,
            escape(&b.name),
            escape(&b.figures)
        ),
        None => String::new(),
    };

    format!(
        concat!(
            r#"<div class="ticker">"#,
            r#"<div class="team">{}</div>"#,
            r#"<div class="score"><span class="code">{}</span><span class="runs">{}</span><span class="overs">{}</span></div>"#,
            r#"<div class="rate"><div class="label">CURRENT RATE</div><div class="value">{}</div></div>"#,
            r#"<div class="batsmen">{}</div>"#,
            r#"{}"#,
            r#"<div class="team">{}</div>"#,
            r#"</div>"#
        ),
        flag_html(&view.team1_flag),
        escape(&view.team1_code),
        escape(&view.score),
        escape(&view.overs),
        escape(&view.current_rate),
        batsmen,
        bowler,
        flag_html(&view.team2_flag),
    )
}
