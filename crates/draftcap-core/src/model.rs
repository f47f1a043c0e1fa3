// Decision variable construction: one binary variable per (player, position).

use std::collections::HashMap;

use crate::ledger::{PlayerKey, PlayerRecord, Position, RosterLedger};
use crate::program::{LinearExpr, VarId};

/// The decision variables for a single optimization run.
///
/// Owns the (player, position) → variable index used as the join key by every
/// constraint and objective term. Built fresh per run and dropped afterwards.
#[derive(Debug, Clone)]
pub struct DecisionVariables {
    keys: Vec<PlayerKey>,
    index: HashMap<PlayerKey, VarId>,
}

impl DecisionVariables {
    /// Create one variable per ledger player, in ledger order.
    pub fn build(ledger: &RosterLedger) -> Self {
        let mut keys = Vec::with_capacity(ledger.len());
        let mut index = HashMap::with_capacity(ledger.len());

        for player in ledger.players() {
            let key = player.key();
            // The ledger has already rejected duplicate keys.
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key.clone(), VarId(keys.len()));
            keys.push(key);
        }

        DecisionVariables { keys, index }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: &PlayerKey) -> Option<VarId> {
        self.index.get(key).copied()
    }

    /// Variable for a ledger player. Every ledger player has one.
    pub fn of(&self, player: &PlayerRecord) -> Option<VarId> {
        self.get(&player.key())
    }

    pub fn key(&self, var: VarId) -> &PlayerKey {
        &self.keys[var.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &PlayerKey)> {
        self.keys.iter().enumerate().map(|(i, k)| (VarId(i), k))
    }

    /// Solver-facing variable names, `x[<name>,<pos>]`.
    pub fn names(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|k| format!("x[{},{}]", k.name, k.position))
            .collect()
    }

    /// Σ x over every player at `position`.
    pub fn position_sum(&self, ledger: &RosterLedger, position: Position) -> LinearExpr {
        ledger
            .at_position(position)
            .filter_map(|p| self.of(p))
            .map(|var| (var, 1.0))
            .collect()
    }
}

/// Objective: maximize Σ x × points over every player.
pub fn objective(ledger: &RosterLedger, vars: &DecisionVariables) -> LinearExpr {
    ledger
        .players()
        .iter()
        .filter_map(|p| vars.of(p).map(|var| (var, p.points)))
        .collect()
}
