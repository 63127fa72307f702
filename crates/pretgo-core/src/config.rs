use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PretgoError, Result};

/// Root application configuration, loaded from `~/.config/pretgo/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub lookup: LookupConfig,
    pub autocomplete: AutocompleteConfig,
    pub page: PageConfig,
    pub logging: LoggingConfig,
}

/// Where person candidates come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// `http` (the running application) or `sqlite` (its database file).
    pub source: String,
    pub base_url: String,
    pub search_path: String,
    pub query_param: String,
    pub timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    pub debounce_ms: u64,
    pub min_query_chars: usize,
    /// Target of the "no results" creation shortcut.
    pub create_href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub clock_interval_ms: u64,
    pub clock_format: String,
    pub notification_ttl_ms: u64,
    pub current_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file used while the terminal picker owns the screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source: "http".to_string(),
            base_url: "http://localhost:5000".to_string(),
            search_path: "/api/personnes".to_string(),
            query_param: "q".to_string(),
            timeout_ms: 5000,
            database_path: None,
        }
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            min_query_chars: 1,
            create_href: "/personnes/ajouter".to_string(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            clock_interval_ms: 1000,
            clock_format: "%d/%m/%Y %H:%M:%S".to_string(),
            notification_ttl_ms: 5000,
            current_path: "/nouveau-pret".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/pretgo/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PRETGO_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pretgo")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self.lookup.source.as_str() {
            "http" | "sqlite" => {}
            other => {
                return Err(PretgoError::ConfigError(format!(
                    "unknown lookup source '{other}' (expected 'http' or 'sqlite')"
                )));
            }
        }
        if self.autocomplete.min_query_chars == 0 {
            return Err(PretgoError::ConfigError(
                "autocomplete.min_query_chars must be at least 1".to_string(),
            ));
        }
        crate::page::clock::validate_format(&self.page.clock_format)?;
        Ok(())
    }

    // ─── Derived values ────────────────────────────────────

    /// Default location of the loan application's database file.
    pub fn database_path(&self) -> PathBuf {
        match &self.lookup.database_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("data").join("gestion_prets.db"),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.autocomplete.debounce_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup.timeout_ms)
    }
}
