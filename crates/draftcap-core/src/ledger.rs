// Roster ledger: player records, draft statuses, and position capacities.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football positions that carry a roster requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    K,
    Dst,
}

impl Position {
    /// Every position, in roster display order.
    pub const ALL: [Position; 6] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::K,
        Position::Dst,
    ];

    /// Parse a position abbreviation (case-insensitive).
    ///
    /// Accepts the FantasyPros spellings plus the common `DEF`/`D/ST` aliases
    /// for team defenses.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "qb" => Some(Position::Qb),
            "rb" => Some(Position::Rb),
            "wr" => Some(Position::Wr),
            "te" => Some(Position::Te),
            "k" | "pk" => Some(Position::K),
            "dst" | "def" | "d/st" => Some(Position::Dst),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Qb => "qb",
            Position::Rb => "rb",
            Position::Wr => "wr",
            Position::Te => "te",
            Position::K => "k",
            Position::Dst => "dst",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Draft status
// ---------------------------------------------------------------------------

/// Externally fixed draft state of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    /// Available; the optimizer is free to pick or skip.
    #[default]
    None,
    /// Already on our roster at a known price.
    Drafted,
    /// Drafted by a competitor; unavailable.
    Taken,
    /// The single player whose breakeven bid is being computed.
    Evaluate,
}

impl DraftStatus {
    /// Parse a status cell from the auction values sheet.
    ///
    /// Blank cells mean "no status". `x` is the spreadsheet shorthand for a
    /// player taken by another team. Anything else unrecognized returns `None`
    /// so callers can reject it instead of silently ignoring it.
    pub fn from_str_status(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Some(DraftStatus::None),
            "drafted" | "d" => Some(DraftStatus::Drafted),
            "x" | "taken" => Some(DraftStatus::Taken),
            "evaluate" | "eval" => Some(DraftStatus::Evaluate),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Player records
// ---------------------------------------------------------------------------

/// Join key shared by decision variables, constraints, and objective terms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerKey {
    pub name: String,
    pub position: Position,
}

impl PlayerKey {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        PlayerKey {
            name: name.into(),
            position,
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub position: Position,
    /// Per-game projected fantasy points.
    pub points: f64,
    /// Actual price if drafted, projected auction value otherwise.
    pub bid: f64,
    #[serde(default)]
    pub status: DraftStatus,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, position: Position, points: f64, bid: f64) -> Self {
        PlayerRecord {
            name: name.into(),
            position,
            points,
            bid,
            status: DraftStatus::None,
        }
    }

    pub fn with_status(mut self, status: DraftStatus) -> Self {
        self.status = status;
        self
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(self.name.clone(), self.position)
    }
}

// ---------------------------------------------------------------------------
// Position capacities
// ---------------------------------------------------------------------------

/// Required slot counts per position plus the flex slot definition.
///
/// A position missing from the map has zero base slots; its players can only
/// reach the roster through flex, and only if the position is flex-eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityMap {
    base: BTreeMap<Position, usize>,
    flex: usize,
    flex_eligible: Vec<Position>,
}

impl CapacityMap {
    pub fn new(
        base: impl IntoIterator<Item = (Position, usize)>,
        flex: usize,
        flex_eligible: impl IntoIterator<Item = Position>,
    ) -> Result<Self, OptimizerError> {
        let base: BTreeMap<Position, usize> = base.into_iter().collect();
        let mut flex_eligible: Vec<Position> = flex_eligible.into_iter().collect();
        flex_eligible.sort();
        flex_eligible.dedup();

        if flex > 0 && flex_eligible.is_empty() {
            return Err(OptimizerError::InvalidCapacity(format!(
                "{flex} flex slot(s) configured but no flex-eligible positions"
            )));
        }

        let capacities = CapacityMap {
            base,
            flex,
            flex_eligible,
        };
        if capacities.roster_size() == 0 {
            return Err(OptimizerError::InvalidCapacity(
                "roster has no slots".into(),
            ));
        }
        Ok(capacities)
    }

    /// The standard one-QB, two-RB, two-WR, one-TE, K, DST, one-flex lineup
    /// with RB/WR/TE flex eligibility.
    pub fn reference() -> Self {
        CapacityMap {
            base: BTreeMap::from([
                (Position::Qb, 1),
                (Position::Rb, 2),
                (Position::Wr, 2),
                (Position::Te, 1),
                (Position::K, 1),
                (Position::Dst, 1),
            ]),
            flex: 1,
            flex_eligible: vec![Position::Rb, Position::Wr, Position::Te],
        }
    }

    /// Base slot count for a position (0 if not configured).
    pub fn base(&self, position: Position) -> usize {
        self.base.get(&position).copied().unwrap_or(0)
    }

    pub fn flex_slots(&self) -> usize {
        self.flex
    }

    pub fn flex_eligible(&self) -> &[Position] {
        &self.flex_eligible
    }

    pub fn is_flex_eligible(&self, position: Position) -> bool {
        self.flex_eligible.contains(&position)
    }

    /// Total flex-eligible headcount: their base slots plus the flex slots.
    pub fn flex_total(&self) -> usize {
        self.flex_eligible.iter().map(|&p| self.base(p)).sum::<usize>() + self.flex
    }

    /// Number of players on a complete roster.
    pub fn roster_size(&self) -> usize {
        self.base.values().sum::<usize>() + self.flex
    }
}

impl Default for CapacityMap {
    fn default() -> Self {
        Self::reference()
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Validated, immutable snapshot of the player pool for one optimization run.
#[derive(Debug, Clone)]
pub struct RosterLedger {
    players: Vec<PlayerRecord>,
    capacities: CapacityMap,
    index: HashMap<PlayerKey, usize>,
}

impl RosterLedger {
    /// Build a ledger, rejecting duplicate (name, position) keys, negative or
    /// non-finite values, and more than one evaluation target.
    pub fn new(
        players: Vec<PlayerRecord>,
        capacities: CapacityMap,
    ) -> Result<Self, OptimizerError> {
        let mut index = HashMap::with_capacity(players.len());
        let mut evaluate_count = 0;

        for (i, player) in players.iter().enumerate() {
            validate_values(player)?;
            if index.insert(player.key(), i).is_some() {
                return Err(OptimizerError::DuplicatePlayer {
                    name: player.name.clone(),
                    position: player.position,
                });
            }
            if player.status == DraftStatus::Evaluate {
                evaluate_count += 1;
            }
        }

        if evaluate_count > 1 {
            return Err(OptimizerError::MultipleEvaluationTargets {
                count: evaluate_count,
            });
        }

        Ok(RosterLedger {
            players,
            capacities,
            index,
        })
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn capacities(&self) -> &CapacityMap {
        &self.capacities
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, key: &PlayerKey) -> Option<&PlayerRecord> {
        self.index.get(key).map(|&i| &self.players[i])
    }

    pub fn at_position(&self, position: Position) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter().filter(move |p| p.position == position)
    }

    pub fn with_status(&self, status: DraftStatus) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter().filter(move |p| p.status == status)
    }

    /// The player marked `evaluate`, if any.
    pub fn evaluation_target(&self) -> Option<&PlayerRecord> {
        self.with_status(DraftStatus::Evaluate).next()
    }

    /// Dollars already committed to drafted players.
    pub fn drafted_spend(&self) -> f64 {
        self.with_status(DraftStatus::Drafted).map(|p| p.bid).sum()
    }

    /// Budget left for players not yet on the roster.
    pub fn remaining_budget(&self, initial_budget: f64) -> f64 {
        initial_budget - self.drafted_spend()
    }

    /// A copy of this ledger with one player's bid replaced.
    pub fn with_bid(&self, key: &PlayerKey, bid: f64) -> Result<Self, OptimizerError> {
        let Some(&i) = self.index.get(key) else {
            return Err(OptimizerError::InvalidPlayer {
                name: key.name.clone(),
                position: key.position,
                reason: "not present in the ledger".into(),
            });
        };

        let mut ledger = self.clone();
        ledger.players[i].bid = bid;
        validate_values(&ledger.players[i])?;
        Ok(ledger)
    }
}

fn validate_values(player: &PlayerRecord) -> Result<(), OptimizerError> {
    let reason = if !player.points.is_finite() || player.points < 0.0 {
        format!("points must be finite and non-negative, got {}", player.points)
    } else if !player.bid.is_finite() || player.bid < 0.0 {
        format!("bid must be finite and non-negative, got {}", player.bid)
    } else {
        return Ok(());
    };

    Err(OptimizerError::InvalidPlayer {
        name: player.name.clone(),
        position: player.position,
        reason,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
