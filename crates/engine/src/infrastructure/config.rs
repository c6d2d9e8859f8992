//! Runtime configuration from the environment.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use fartrek_domain::{Actor, UserId};

use crate::infrastructure::announcer::DEFAULT_HISTORY;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Deterministic dice when set.
    pub dice_seed: Option<u64>,
    /// Users with update rights on every actor.
    pub game_masters: Vec<UserId>,
    pub announcement_history: usize,
    /// JSON array of actors loaded into the store at startup.
    pub seed_actors: Option<PathBuf>,
    /// `*` or a comma-separated origin list; unset disables CORS headers.
    pub cors_allowed_origins: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            dice_seed: None,
            game_masters: Vec::new(),
            announcement_history: DEFAULT_HISTORY,
            seed_actors: None,
            cors_allowed_origins: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(port) => port
                .parse()
                .with_context(|| format!("SERVER_PORT must be a port number, got {port:?}"))?,
            None => defaults.server_port,
        };

        let dice_seed = get("FARTREK_DICE_SEED")
            .map(|seed| {
                seed.parse::<u64>()
                    .with_context(|| format!("FARTREK_DICE_SEED must be a u64, got {seed:?}"))
            })
            .transpose()?;

        let game_masters = get("FARTREK_GAME_MASTERS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        uuid::Uuid::parse_str(s)
                            .map(UserId::from_uuid)
                            .with_context(|| format!("invalid game master id {s:?}"))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        let announcement_history = match get("FARTREK_ANNOUNCEMENT_HISTORY") {
            Some(size) => size.parse().with_context(|| {
                format!("FARTREK_ANNOUNCEMENT_HISTORY must be a count, got {size:?}")
            })?,
            None => defaults.announcement_history,
        };

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            dice_seed,
            game_masters,
            announcement_history,
            seed_actors: get("FARTREK_SEED_ACTORS").map(PathBuf::from),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        })
    }

    /// Actors from the seed file, or none when no file is configured.
    pub fn load_seed_actors(&self) -> anyhow::Result<Vec<Actor>> {
        let Some(path) = &self.seed_actors else {
            return Ok(Vec::new());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed actors from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing seed actors in {}", path.display()))
    }
}
