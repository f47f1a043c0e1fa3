// Terminal and JSON rendering of optimizer results.

use std::fmt::Write as _;

use draftcap_core::{DraftStatus, MarginalValue, RosterEntry, RosterResult};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RosterRow {
    #[tabled(rename = "player")]
    pub name: String,
    #[tabled(rename = "pos")]
    pub position: String,
    #[tabled(rename = "pts")]
    pub points: String,
    pub bid: String,
}

impl From<&RosterEntry> for RosterRow {
    fn from(entry: &RosterEntry) -> Self {
        let name = if entry.status == DraftStatus::Drafted {
            format!("{} (d)", entry.name)
        } else {
            entry.name.clone()
        };
        RosterRow {
            name,
            position: entry.position.to_string(),
            points: format!("{:.2}", entry.points),
            bid: format!("{:.0}", entry.bid),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CurveRow {
    pub bid: String,
    #[tabled(rename = "pts")]
    pub points: String,
}

/// Value curve rows: the baseline first (bid `skip`), then one row per
/// evaluated bid, then the bid that ended the sweep, if any.
pub fn curve_rows(value: &MarginalValue) -> Vec<CurveRow> {
    let mut rows = Vec::with_capacity(value.curve.len() + 2);
    rows.push(CurveRow {
        bid: "skip".into(),
        points: format!("{:.2}", value.baseline),
    });
    for point in &value.curve {
        rows.push(CurveRow {
            bid: format!("{:.0}", point.bid),
            points: format!("{:.2}", point.objective_value),
        });
    }
    if let Some(bid) = value.stopped_at {
        rows.push(CurveRow {
            bid: format!("{bid:.0}"),
            points: "infeasible".into(),
        });
    }
    rows
}

fn table<T: Tabled>(rows: &[T]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Headline and roster table. Roster order is already bid-descending.
pub fn render_roster(result: &RosterResult) -> String {
    let rows: Vec<RosterRow> = result.roster.iter().map(RosterRow::from).collect();
    let mut out = String::new();
    let _ = writeln!(out, "OPTIMAL POINTS: {:.2}", result.objective_value);
    let _ = writeln!(out, "TOTAL BID: {:.0}", result.total_bid());
    let _ = writeln!(out);
    let _ = writeln!(out, "OPTIMAL DRAFT:");
    let _ = writeln!(out, "{}", table(&rows));
    out
}

pub fn render_marginal(value: &MarginalValue) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})",
        value.target.name.to_uppercase(),
        value.target.position
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "DRAFT VALUE: {:.0}", value.threshold);
    let _ = writeln!(out, "{}", table(&curve_rows(value)));
    out
}

// ---------------------------------------------------------------------------
// JSON rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub optimal: &'a RosterResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<&'a MarginalValue>,
}

pub fn render_json(report: &Report<'_>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
