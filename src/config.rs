use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::db::keys::RESERVED_PREFIXES;
use crate::domain::LeagueId;
use crate::models::RoundWindow;

/// Environment variable consulted when `upstream.api_key` is not set.
pub const API_KEY_ENV: &str = "API_SPORTS_API_KEY";

/// Longest expiry accepted for any cache entry (one year).
pub const MAX_TTL_HOURS: u64 = 365 * 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub cache: CacheConfig,

    pub upstream: UpstreamConfig,

    /// League code to provider league, e.g. `ETH -> 363`.
    pub leagues: BTreeMap<String, LeagueConfig>,

    pub defaults: DefaultsConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// `"pretty"` or `"json"`
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub redis_url: String,

    /// Upper bound for a single store round trip.
    pub operation_timeout_ms: u64,

    /// Fixture sets and round entries.
    pub fixture_ttl_hours: u64,

    /// Team records, name mappings and catalogs.
    pub team_ttl_hours: u64,

    /// Lifetime of the "catalog already hydrated" marker.
    pub hydration_marker_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            operation_timeout_ms: 2_000,
            fixture_ttl_hours: 7 * 24,
            team_ttl_hours: 7 * 24,
            hydration_marker_seconds: 600,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    #[must_use]
    pub const fn fixture_ttl(&self) -> Duration {
        Duration::from_secs(self.fixture_ttl_hours.saturating_mul(3600))
    }

    #[must_use]
    pub const fn team_ttl(&self) -> Duration {
        Duration::from_secs(self.team_ttl_hours.saturating_mul(3600))
    }

    #[must_use]
    pub const fn hydration_marker_ttl(&self) -> Duration {
        Duration::from_secs(self.hydration_marker_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,

    /// Falls back to the `API_SPORTS_API_KEY` environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: 10)
    pub timeout_seconds: u64,

    /// Retries after the first attempt for idempotent GETs.
    pub max_retries: u32,

    pub retry_base_delay_ms: u64,

    pub retry_max_delay_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v3.football.api-sports.io".to_string(),
            api_key: None,
            timeout_seconds: 10,
            max_retries: 3,
            retry_base_delay_ms: 250,
            retry_max_delay_ms: 4_000,
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub season: i32,

    /// Round used when the classifier does not resolve one.
    pub round: String,

    pub window_from: NaiveDate,

    pub window_to: NaiveDate,

    /// Seasons scanned when a team id is missing from the cache.
    pub catalog_seasons: Vec<i32>,

    pub language: String,

    /// League the news generators report on.
    pub news_league: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            season: 2022,
            round: "1".to_string(),
            window_from: NaiveDate::from_ymd_opt(2022, 8, 1).unwrap_or_default(),
            window_to: NaiveDate::from_ymd_opt(2022, 10, 10).unwrap_or_default(),
            catalog_seasons: vec![2021, 2022, 2023],
            language: "en".to_string(),
            news_league: "ETH".to_string(),
        }
    }
}

impl DefaultsConfig {
    #[must_use]
    pub const fn window(&self) -> RoundWindow {
        RoundWindow {
            from: self.window_from,
            to: self.window_to,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        let mut leagues = BTreeMap::new();
        leagues.insert(
            "ETH".to_string(),
            LeagueConfig {
                id: 363,
                name: "Ethiopian Premier League".to_string(),
            },
        );
        leagues.insert(
            "EPL".to_string(),
            LeagueConfig {
                id: 39,
                name: "English Premier League".to_string(),
            },
        );

        Self {
            general: GeneralConfig::default(),
            cache: CacheConfig::default(),
            upstream: UpstreamConfig::default(),
            leagues,
            defaults: DefaultsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Lookup table built from `[leagues]`.
///
/// Unknown codes resolve to `None`; there is no zero sentinel.
#[derive(Debug, Clone, Default)]
pub struct LeagueTable {
    by_code: BTreeMap<String, LeagueConfig>,
}

impl LeagueTable {
    #[must_use]
    pub fn new(leagues: &BTreeMap<String, LeagueConfig>) -> Self {
        let by_code = leagues
            .iter()
            .map(|(code, league)| (code.trim().to_uppercase(), league.clone()))
            .collect();
        Self { by_code }
    }

    /// Resolves a configured league code such as `ETH`.
    #[must_use]
    pub fn resolve(&self, code: &str) -> Option<LeagueId> {
        self.by_code
            .get(&code.trim().to_uppercase())
            .filter(|league| league.id > 0)
            .map(|league| LeagueId::new(league.id))
    }

    /// Resolves a provider league parameter: a configured code or a raw
    /// positive numeric id.
    #[must_use]
    pub fn resolve_param(&self, raw: &str) -> Option<LeagueId> {
        self.resolve(raw).or_else(|| {
            raw.trim()
                .parse::<i32>()
                .ok()
                .filter(|id| *id > 0)
                .map(LeagueId::new)
        })
    }

    #[must_use]
    pub fn name_of(&self, id: LeagueId) -> Option<&str> {
        self.by_code
            .values()
            .find(|league| league.id == id.value())
            .map(|league| league.name.as_str())
    }

    #[must_use]
    pub fn ids(&self) -> Vec<LeagueId> {
        self.by_code
            .values()
            .filter(|league| league.id > 0)
            .map(|league| LeagueId::new(league.id))
            .collect()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ethiofb").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ethiofb").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.leagues.is_empty() {
            anyhow::bail!("At least one league must be configured");
        }

        for (code, league) in &self.leagues {
            if code.trim().is_empty() {
                anyhow::bail!("League codes cannot be empty");
            }
            if league.id <= 0 {
                anyhow::bail!("League '{code}' must have a positive id, got {}", league.id);
            }
            let lowered = code.trim().to_lowercase();
            if RESERVED_PREFIXES.contains(&lowered.as_str()) {
                anyhow::bail!("League code '{code}' collides with a reserved cache key prefix");
            }
        }

        if self.defaults.window_from > self.defaults.window_to {
            anyhow::bail!(
                "Default window starts after it ends ({} > {})",
                self.defaults.window_from,
                self.defaults.window_to
            );
        }

        if self.defaults.round.trim().is_empty() {
            anyhow::bail!("Default round cannot be empty");
        }

        if self.league_table().resolve(&self.defaults.news_league).is_none() {
            anyhow::bail!(
                "News league '{}' is not a configured league code",
                self.defaults.news_league
            );
        }

        if self.cache.operation_timeout_ms == 0 {
            anyhow::bail!("Cache operation timeout must be > 0");
        }

        for (name, hours) in [
            ("fixture_ttl_hours", self.cache.fixture_ttl_hours),
            ("team_ttl_hours", self.cache.team_ttl_hours),
        ] {
            if hours == 0 || hours > MAX_TTL_HOURS {
                anyhow::bail!("cache.{name} must be between 1 and {MAX_TTL_HOURS}, got {hours}");
            }
        }

        if self.cache.hydration_marker_seconds == 0
            || self.cache.hydration_marker_seconds > MAX_TTL_HOURS * 3600
        {
            anyhow::bail!(
                "cache.hydration_marker_seconds must be between 1 and {}, got {}",
                MAX_TTL_HOURS * 3600,
                self.cache.hydration_marker_seconds
            );
        }

        if self.upstream.timeout_seconds == 0 {
            anyhow::bail!("Upstream timeout must be > 0");
        }

        Ok(())
    }

    #[must_use]
    pub fn league_table(&self) -> LeagueTable {
        LeagueTable::new(&self.leagues)
    }
}
