//! Turning box-score entries into stat lines.

use crate::mlb::types::{BoxscorePlayer, PitchingStats};
use crate::storage::{BattingLine, PitchingLine};
use serde_json::Value;

/// Convert innings in baseball notation to outs.
///
/// `"5.0"` is 15 outs, `"5.1"` 16 and `"5.2"` 17. Empty or malformed
/// input counts as zero.
pub fn innings_to_outs(innings: &str) -> u32 {
    let innings = innings.trim();
    if innings.is_empty() {
        return 0;
    }

    let (whole, frac) = innings.split_once('.').unwrap_or((innings, ""));
    let Ok(whole) = whole.parse::<u32>() else {
        return 0;
    };

    let extra = match frac {
        "1" => 1,
        "2" => 2,
        _ => 0,
    };
    whole.saturating_mul(3).saturating_add(extra)
}

/// Read a loosely typed counter. Numbers and numeric strings are accepted;
/// anything else, including negatives, is zero.
pub fn to_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX)),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Batting line for one box-score entry. Missing stats are zero.
pub fn extract_batting(player: &BoxscorePlayer) -> BattingLine {
    let Some(bat) = player.stats.batting.as_ref() else {
        return BattingLine::default();
    };

    BattingLine {
        at_bats: to_count(bat.at_bats.as_ref()),
        hits: to_count(bat.hits.as_ref()),
        runs: to_count(bat.runs.as_ref()),
        home_runs: to_count(bat.home_runs.as_ref()),
        rbi: to_count(bat.rbi.as_ref()),
        walks: to_count(bat.base_on_balls.as_ref()),
        strikeouts: to_count(bat.strike_outs.as_ref()),
    }
}

/// Pitching line for one box-score entry.
///
/// The decision comes from the entry's note, falling back to the pitching
/// note; empty notes are treated as absent.
pub fn extract_pitching(player: &BoxscorePlayer) -> PitchingLine {
    let empty = PitchingStats::default();
    let pitch = player.stats.pitching.as_ref().unwrap_or(&empty);

    let decision = non_empty(player.note.as_deref())
        .or_else(|| non_empty(pitch.note.as_deref()))
        .map(str::to_string);

    PitchingLine {
        outs_pitched: pitch.innings_pitched.as_deref().map_or(0, innings_to_outs),
        hits_allowed: to_count(pitch.hits.as_ref()),
        runs_allowed: to_count(pitch.runs.as_ref()),
        earned_runs: to_count(pitch.earned_runs.as_ref()),
        home_runs_allowed: to_count(pitch.home_runs.as_ref()),
        walks: to_count(pitch.base_on_balls.as_ref()),
        strikeouts: to_count(pitch.strike_outs.as_ref()),
        batters_faced: to_count(pitch.batters_faced.as_ref()),
        pitches: to_count(pitch.pitches_thrown.as_ref()),
        strikes: to_count(pitch.strikes.as_ref()),
        decision,
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
