use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::weeks::{MAX_WEEK, MIN_WEEK};
use crate::error::{CstError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, cst_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("CST_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(cst_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Path of the SQLite database, relative entries resolved against `cst_root`.
    #[must_use]
    pub fn database_path(&self, cst_root: &Path) -> PathBuf {
        let configured = Path::new(&self.storage.database);
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            cst_root.join(configured)
        }
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            tracing::debug!("no user config directory; skipping global config");
            return Ok(None);
        };
        Self::load_patch(&dir.join("cst/config.toml"))
    }

    fn load_project(cst_root: &Path) -> Result<Option<ConfigPatch>> {
        let path = cst_root.join("config.toml");
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| CstError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| CstError::Config(format!("parse config {}: {err}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded config layer");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.storage {
            self.storage.merge(patch);
        }
        if let Some(patch) = patch.catalog {
            self.catalog.merge(patch);
        }
        if let Some(patch) = patch.planner {
            self.planner.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if env_bool("CST_ROBOT").unwrap_or(false) {
            self.robot.format = "json".to_string();
            self.robot.include_metadata = true;
        }
        if let Some(value) = env_string("CST_ROBOT_FORMAT") {
            self.robot.format = value;
        }

        if let Some(value) = env_string("CST_DATABASE") {
            self.storage.database = value;
        }
        if let Some(value) = env_u32("CST_BUSY_TIMEOUT_MS")? {
            self.storage.busy_timeout_ms = value;
        }

        if let Some(values) = env_list("CST_DEFAULT_WEEKS")? {
            self.catalog.default_weeks = values
                .iter()
                .map(|entry| {
                    entry.parse::<u32>().map_err(|err| {
                        CstError::Config(format!("invalid CST_DEFAULT_WEEKS entry {entry}: {err}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(value) = env_bool("CST_SYMMETRIC_SIBLINGS") {
            self.catalog.symmetric_siblings = value;
        }

        if let Some(value) = env_u32("CST_DEFAULT_DURATION")? {
            self.planner.default_duration_minutes = value;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(week) = self
            .catalog
            .default_weeks
            .iter()
            .find(|week| !(MIN_WEEK..=MAX_WEEK).contains(*week))
        {
            return Err(CstError::Config(format!(
                "catalog.default_weeks entry {week} outside {MIN_WEEK}..={MAX_WEEK}"
            )));
        }
        if self.planner.default_duration_minutes == 0 {
            return Err(CstError::Config(
                "planner.default_duration_minutes must be positive".to_string(),
            ));
        }
        if self.storage.database.trim().is_empty() {
            return Err(CstError::MissingConfig("storage.database".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; relative paths live under the cst root.
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub busy_timeout_ms: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: "cst.db".to_string(),
            busy_timeout_ms: 5_000,
        }
    }
}

impl StorageConfig {
    fn merge(&mut self, patch: StoragePatch) {
        if let Some(value) = patch.database {
            self.database = value;
        }
        if let Some(value) = patch.busy_timeout_ms {
            self.busy_timeout_ms = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Weeks given to imported skills that declare none.
    #[serde(default)]
    pub default_weeks: Vec<u32>,
    /// Write the reverse edge whenever a sibling link is added.
    #[serde(default)]
    pub symmetric_siblings: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_weeks: (1..=8).collect(),
            symmetric_siblings: false,
        }
    }
}

impl CatalogConfig {
    fn merge(&mut self, patch: CatalogPatch) {
        if let Some(value) = patch.default_weeks {
            self.default_weeks = value;
        }
        if let Some(value) = patch.symmetric_siblings {
            self.symmetric_siblings = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub default_duration_minutes: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 60,
        }
    }
}

impl PlannerConfig {
    fn merge(&mut self, patch: PlannerPatch) {
        if let Some(value) = patch.default_duration_minutes {
            self.default_duration_minutes = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub include_metadata: bool,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            include_metadata: true,
        }
    }
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
        if let Some(value) = patch.include_metadata {
            self.include_metadata = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub storage: Option<StoragePatch>,
    pub catalog: Option<CatalogPatch>,
    pub planner: Option<PlannerPatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StoragePatch {
    pub database: Option<String>,
    pub busy_timeout_ms: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogPatch {
    pub default_weeks: Option<Vec<u32>>,
    pub symmetric_siblings: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PlannerPatch {
    pub default_duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RobotPatch {
    pub format: Option<String>,
    pub include_metadata: Option<bool>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| CstError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_list(key: &str) -> Result<Option<Vec<String>>> {
    match std::env::var(key) {
        Ok(value) => {
            let list = value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            Ok(Some(list))
        }
        Err(_) => Ok(None),
    }
}
