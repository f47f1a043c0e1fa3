// Configuration loading and validation (draftcap.toml).

use std::path::{Path, PathBuf};

use draftcap_core::{BidSchedule, CapacityMap, Position};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// File name searched for in `./config/` and the platform config directory.
pub const CONFIG_FILE_NAME: &str = "draftcap.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub league: LeagueConfig,
    pub roster: RosterConfig,
    pub sweep: SweepConfig,
    pub data: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Auction budget before any player is bought.
    pub initial_budget: f64,
    /// Season projections are divided by this to get per-game points.
    pub games_per_season: f64,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            initial_budget: 200.0,
            games_per_season: 17.0,
        }
    }
}

/// Starting lineup slot counts. `flex` slots accept any of `flex_positions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub qb: usize,
    pub rb: usize,
    pub wr: usize,
    pub te: usize,
    pub k: usize,
    pub dst: usize,
    pub flex: usize,
    pub flex_positions: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        RosterConfig {
            qb: 1,
            rb: 2,
            wr: 2,
            te: 1,
            k: 1,
            dst: 1,
            flex: 1,
            flex_positions: vec!["rb".into(), "wr".into(), "te".into()],
        }
    }
}

impl RosterConfig {
    pub fn capacity_map(&self) -> Result<CapacityMap, ConfigError> {
        let flex_eligible = self
            .flex_positions
            .iter()
            .map(|s| {
                Position::from_str_pos(s).ok_or_else(|| ConfigError::ValidationError {
                    field: "roster.flex_positions".into(),
                    message: format!("unknown position `{s}`"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let base = [
            (Position::Qb, self.qb),
            (Position::Rb, self.rb),
            (Position::Wr, self.wr),
            (Position::Te, self.te),
            (Position::K, self.k),
            (Position::Dst, self.dst),
        ];

        CapacityMap::new(base, self.flex, flex_eligible).map_err(|e| {
            ConfigError::ValidationError {
                field: "roster".into(),
                message: e.to_string(),
            }
        })
    }
}

/// Candidate prices for the marginal value sweep.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub min_bid: f64,
    pub max_bid: f64,
    pub step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            min_bid: 0.0,
            max_bid: 100.0,
            step: 5.0,
        }
    }
}

impl SweepConfig {
    pub fn schedule(&self) -> Result<BidSchedule, ConfigError> {
        BidSchedule::range(self.min_bid, self.max_bid, self.step).map_err(|e| {
            ConfigError::ValidationError {
                field: "sweep".into(),
                message: e.to_string(),
            }
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Auction values sheet with Overall/Projected/Actual/Status columns.
    pub auction_values: String,
    /// Directory holding the per-position projection CSVs.
    pub projections_dir: String,
    pub qb: String,
    pub rb: String,
    pub wr: String,
    pub te: String,
    pub k: String,
    pub dst: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        let file = |pos: &str| format!("FantasyPros_Fantasy_Football_Projections_{pos}.csv");
        DataPaths {
            auction_values: "data/projected_bid.csv".into(),
            projections_dir: "data".into(),
            qb: file("QB"),
            rb: file("RB"),
            wr: file("WR"),
            te: file("TE"),
            k: file("K"),
            dst: file("DST"),
        }
    }
}

impl DataPaths {
    /// Path of the projection CSV for a position.
    pub fn projection_path(&self, position: Position) -> PathBuf {
        let file = match position {
            Position::Qb => &self.qb,
            Position::Rb => &self.rb,
            Position::Wr => &self.wr,
            Position::Te => &self.te,
            Position::K => &self.k,
            Position::Dst => &self.dst,
        };
        Path::new(&self.projections_dir).join(file)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate a single config file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Locate the config file to use.
///
/// An explicit path must exist. Otherwise `<base_dir>/config/draftcap.toml`
/// is tried, then the platform config directory. `None` means "use defaults".
pub fn resolve_config_path(
    explicit: Option<&Path>,
    base_dir: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = base_dir.join("config").join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    let platform = directories::ProjectDirs::from("", "", "draftcap")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file());
    Ok(platform)
}

/// Load config relative to the current working directory, falling back to
/// built-in defaults when no file is found.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;

    match resolve_config_path(explicit, &cwd)? {
        Some(path) => {
            info!("loading config from {}", path.display());
            load_config_from(&path)
        }
        None => {
            debug!("no {CONFIG_FILE_NAME} found; using built-in defaults");
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let budget = config.league.initial_budget;
    if !budget.is_finite() || budget <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "league.initial_budget".into(),
            message: format!("must be > 0, got {budget}"),
        });
    }

    let games = config.league.games_per_season;
    if !games.is_finite() || games <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "league.games_per_season".into(),
            message: format!("must be > 0, got {games}"),
        });
    }

    config.roster.capacity_map()?;
    config.sweep.schedule()?;

    if config.data.auction_values.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.auction_values".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

/// Apply a command-line budget override, re-validating it.
pub fn with_budget_override(mut config: Config, budget: Option<f64>) -> Result<Config, ConfigError> {
    if let Some(budget) = budget {
        config.league.initial_budget = budget;
        validate(&config)?;
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh, empty scratch directory under the system temp dir.
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("draftcap_config_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn defaults_file() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("defaults")
            .join(CONFIG_FILE_NAME)
    }

    #[test]
    fn shipped_defaults_match_builtin_defaults() {
        let config = load_config_from(&defaults_file()).expect("defaults should load");

        assert!((config.league.initial_budget - 200.0).abs() < f64::EPSILON);
        assert!((config.league.games_per_season - 17.0).abs() < f64::EPSILON);
        assert_eq!(config.roster.rb, 2);
        assert_eq!(config.roster.flex, 1);
        assert_eq!(config.roster.flex_positions, vec!["rb", "wr", "te"]);
        assert_eq!(config.roster.capacity_map().unwrap(), CapacityMap::reference());
        assert_eq!(config.sweep.schedule().unwrap(), BidSchedule::default());
        assert_eq!(config.data.auction_values, "data/projected_bid.csv");
        assert_eq!(
            config.data.projection_path(Position::Dst),
            Path::new("data").join("FantasyPros_Fantasy_Football_Projections_DST.csv")
        );
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = scratch("partial");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "[league]\ninitial_budget = 250\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert!((config.league.initial_budget - 250.0).abs() < f64::EPSILON);
        assert!((config.league.games_per_season - 17.0).abs() < f64::EPSILON);
        assert_eq!(config.roster.qb, 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn superflex_roster_parses() {
        let dir = scratch("superflex");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[roster]\nqb = 1\nflex = 2\nflex_positions = [\"QB\", \"RB\", \"WR\", \"TE\"]\n",
        )
        .unwrap();

        let caps = load_config_from(&path).unwrap().roster.capacity_map().unwrap();
        assert!(caps.is_flex_eligible(Position::Qb));
        assert_eq!(caps.roster_size(), 10);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_zero_budget() {
        let dir = scratch("zero_budget");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "[league]\ninitial_budget = 0\n").unwrap();

        match load_config_from(&path) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "league.initial_budget");
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_unknown_flex_position() {
        let dir = scratch("bad_flex");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "[roster]\nflex_positions = [\"rb\", \"lb\"]\n").unwrap();

        match load_config_from(&path) {
            Err(ConfigError::ValidationError { field, message }) => {
                assert_eq!(field, "roster.flex_positions");
                assert!(message.contains("lb"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_zero_sweep_step() {
        let dir = scratch("zero_step");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "[sweep]\nstep = 0\n").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ValidationError { field, .. }) if field == "sweep"
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = scratch("malformed");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "[league\ninitial_budget = ").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ParseError { .. })
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn explicit_missing_path_is_not_found() {
        let dir = scratch("explicit_missing");
        let missing = dir.join("nope.toml");
        assert!(matches!(
            resolve_config_path(Some(&missing), &dir),
            Err(ConfigError::FileNotFound { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn local_config_dir_is_found() {
        let dir = scratch("local_lookup");
        fs::create_dir_all(dir.join("config")).unwrap();
        fs::copy(defaults_file(), dir.join("config").join(CONFIG_FILE_NAME)).unwrap();

        let found = resolve_config_path(None, &dir).unwrap();
        assert_eq!(found, Some(dir.join("config").join(CONFIG_FILE_NAME)));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn budget_override_is_validated() {
        let config = with_budget_override(Config::default(), Some(150.0)).unwrap();
        assert!((config.league.initial_budget - 150.0).abs() < f64::EPSILON);

        assert!(with_budget_override(Config::default(), Some(-5.0)).is_err());
    }
}
