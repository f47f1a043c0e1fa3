// Projection and auction value loading.
//
// Reads a FantasyPros-style auction values sheet (one row per player, with an
// "Overall" column like "Josh Allen (BUF - QB)" and currency-formatted
// prices) plus one season-projection CSV per position, and joins them into
// per-game player records for the optimizer.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use draftcap_core::{DraftStatus, PlayerKey, PlayerRecord, Position};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One row of the auction values sheet after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionValue {
    pub name: String,
    pub position: Position,
    /// Actual price if the player sold, projected price otherwise.
    pub price: Option<f64>,
    pub status: DraftStatus,
}

/// One row of a per-position projection CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonProjection {
    pub name: String,
    /// Season fantasy points.
    pub fpts: f64,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unrecognized status `{value}` for player `{player}`")]
    Status { player: String, value: String },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Auction values row. Unlisted columns are ignored by the CSV deserializer.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawAuctionValue {
    Overall: String,
    #[serde(default)]
    Projected: Option<String>,
    #[serde(default)]
    Actual: Option<String>,
    #[serde(default)]
    Status: Option<String>,
}

/// FantasyPros projection row; FPTS can carry thousands separators.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawProjection {
    Player: String,
    FPTS: String,
}

// ---------------------------------------------------------------------------
// Cell parsing helpers
// ---------------------------------------------------------------------------

/// Strip `$`, thousands separators, and whitespace, then parse.
///
/// Returns `None` for blank or non-numeric cells.
pub fn clean_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split `"Name (TEAM - POS)"` into the player name and position.
///
/// Team defenses read `"San Francisco 49ers (SF - DST)"`.
pub fn parse_overall(overall: &str) -> Option<(String, Position)> {
    let overall = overall.trim();
    let open = overall.find(" (")?;
    let name = overall[..open].trim();
    let inner = overall[open + 2..].strip_suffix(')')?;
    let (_, pos) = inner.rsplit_once(" - ")?;
    let position = Position::from_str_pos(pos)?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), position))
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_auction_values_from_reader<R: Read>(rdr: R) -> Result<Vec<AuctionValue>, ProjectionError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut values = Vec::new();
    for result in reader.deserialize::<RawAuctionValue>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed auction value row: {}", e);
                continue;
            }
        };

        let Some((name, position)) = parse_overall(&raw.Overall) else {
            warn!("skipping auction value row: cannot parse `{}`", raw.Overall.trim());
            continue;
        };

        let status_cell = raw.Status.as_deref().unwrap_or("");
        let status = DraftStatus::from_str_status(status_cell).ok_or_else(|| {
            ProjectionError::Status {
                player: name.clone(),
                value: status_cell.trim().to_string(),
            }
        })?;

        let price = raw
            .Actual
            .as_deref()
            .and_then(clean_currency)
            .or_else(|| raw.Projected.as_deref().and_then(clean_currency));

        values.push(AuctionValue {
            name,
            position,
            price,
            status,
        });
    }
    Ok(values)
}

fn load_projections_from_reader<R: Read>(rdr: R) -> Result<Vec<SeasonProjection>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut projections = Vec::new();
    for result in reader.deserialize::<RawProjection>() {
        match result {
            Ok(raw) => {
                let name = raw.Player.trim();
                if name.is_empty() {
                    continue;
                }
                let Some(fpts) = clean_currency(&raw.FPTS) else {
                    warn!("skipping projection for '{}': non-numeric FPTS '{}'", name, raw.FPTS);
                    continue;
                };
                projections.push(SeasonProjection {
                    name: name.to_string(),
                    fpts,
                });
            }
            Err(e) => {
                warn!("skipping malformed projection row: {}", e);
            }
        }
    }
    Ok(projections)
}

// ---------------------------------------------------------------------------
// Joining
// ---------------------------------------------------------------------------

/// Join projections with auction values into per-game player records.
///
/// Players without a price, or with a negative price or negative points, are
/// dropped. The first row wins when a (name, position) pair repeats.
pub fn merge_players(
    auction: &[AuctionValue],
    projections: &[(Position, Vec<SeasonProjection>)],
    games_per_season: f64,
) -> Vec<PlayerRecord> {
    let mut by_key: HashMap<PlayerKey, &AuctionValue> = HashMap::with_capacity(auction.len());
    for value in auction {
        let key = PlayerKey::new(value.name.clone(), value.position);
        if by_key.contains_key(&key) {
            warn!("duplicate auction value for {}, using first", key);
            continue;
        }
        by_key.insert(key, value);
    }

    let mut seen = HashSet::new();
    let mut players = Vec::new();

    for (position, rows) in projections {
        for row in rows {
            let key = PlayerKey::new(row.name.clone(), *position);
            if !seen.insert(key.clone()) {
                warn!("duplicate projection for {}, using first", key);
                continue;
            }

            let Some(value) = by_key.get(&key) else {
                debug!("no auction value for {}, skipping", key);
                continue;
            };
            let Some(price) = value.price else {
                debug!("no price for {}, skipping", key);
                continue;
            };
            if price < 0.0 {
                warn!("skipping {}: negative price {}", key, price);
                continue;
            }

            let points = row.fpts / games_per_season;
            if !points.is_finite() || points < 0.0 {
                warn!("skipping {}: invalid projected points {}", key, row.fpts);
                continue;
            }

            players.push(PlayerRecord {
                name: row.name.clone(),
                position: *position,
                points,
                bid: price,
                status: value.status,
            });
        }
    }

    for (key, value) in &by_key {
        if value.status != DraftStatus::None && !seen.contains(key) {
            warn!(
                "{} is marked {:?} but has no projection; status ignored",
                key, value.status
            );
        }
    }

    players
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load the auction values sheet.
pub fn load_auction_values(path: &Path) -> Result<Vec<AuctionValue>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_auction_values_from_reader(file)
}

/// Load one position's season projections.
pub fn load_projections(path: &Path) -> Result<Vec<SeasonProjection>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_projections_from_reader(file).map_err(|e| ProjectionError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load every input file named in the config and return the joined player
/// pool.
pub fn load_players(config: &Config) -> Result<Vec<PlayerRecord>, ProjectionError> {
    let auction = load_auction_values(Path::new(&config.data.auction_values))?;
    if auction.is_empty() {
        return Err(ProjectionError::Validation(
            "auction values CSV produced zero valid rows".into(),
        ));
    }

    let mut projections = Vec::with_capacity(Position::ALL.len());
    for position in Position::ALL {
        let path = config.data.projection_path(position);
        let rows = load_projections(&path)?;
        debug!("loaded {} {} projections from {}", rows.len(), position, path.display());
        projections.push((position, rows));
    }

    let players = merge_players(&auction, &projections, config.league.games_per_season);
    if players.is_empty() {
        return Err(ProjectionError::Validation(
            "no projected player matched an auction value".into(),
        ));
    }
    info!(
        "loaded {} players ({} auction values)",
        players.len(),
        auction.len()
    );
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
