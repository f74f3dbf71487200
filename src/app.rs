//! Process-wide context handed to every command.
//!
//! The database is opened once here and borrowed by the services, so a
//! command never opens a second connection of its own.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::catalog::SkillCatalog;
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::{CstError, Result};
use crate::planner::ClassPlanComposer;
use crate::progress::ProgressLedger;
use crate::roster::Roster;
use crate::storage::Database;

pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub db: Database,
    pub robot_mode: bool,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = resolve_root(cli.root.as_deref())?;
        let config = Config::load(cli.config.as_deref(), &root)?;
        let db_path = config.database_path(&root);
        let timeout = Duration::from_millis(u64::from(config.storage.busy_timeout_ms));
        debug!(root = %root.display(), db = %db_path.display(), "opening store");
        let db = Database::open_with_timeout(&db_path, timeout)?;

        let output_format = cli.output_format();
        Ok(Self {
            root,
            config,
            config_path: cli.config.clone(),
            db,
            robot_mode: output_format.is_machine_readable(),
            output_format,
        })
    }

    /// Context over an already-open store; used by tests.
    #[must_use]
    pub fn with_database(root: PathBuf, config: Config, db: Database) -> Self {
        Self {
            root,
            config,
            config_path: None,
            db,
            robot_mode: false,
            output_format: OutputFormat::Human,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> SkillCatalog<'_> {
        SkillCatalog::with_config(&self.db, self.config.catalog.clone())
    }

    #[must_use]
    pub const fn planner(&self) -> ClassPlanComposer<'_> {
        ClassPlanComposer::new(&self.db)
    }

    #[must_use]
    pub const fn ledger(&self) -> ProgressLedger<'_> {
        ProgressLedger::new(&self.db)
    }

    #[must_use]
    pub const fn roster(&self) -> Roster<'_> {
        Roster::new(&self.db)
    }
}

/// `--root`, then `CST_ROOT` (clap reads it into `--root`), then the user data dir.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    dirs::data_dir()
        .map(|dir| dir.join("cst"))
        .ok_or_else(|| CstError::MissingConfig("data directory not found; set CST_ROOT".to_string()))
}
