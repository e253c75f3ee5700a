//! Entry point tying recipient profiles, duplicate tracking and the
//! background worker together.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::audit::ForwardLog;
use crate::config::paths::{self, DATABASE_FILE, FORWARD_LOG_FILE};
use crate::config::{FilterConfig, RunSettings};
use crate::db::{client_repo, settings_repo, Database};
use crate::error::{ConfigError, Result};
use crate::mail::{ForwardTracker, MailStore};
use crate::pipeline::{Pipeline, PipelineConfig, RunMode};
use crate::worker::ForwardWorker;

/// Settings remembered from the last started run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastUsed {
    pub recipient: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub struct ForwardService {
    db: Database,
    forward_log: Option<PathBuf>,
}

impl ForwardService {
    /// Opens the database and audit log inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let db = Database::open(&data_dir.join(DATABASE_FILE))?;
        Ok(Self {
            db,
            forward_log: Some(data_dir.join(FORWARD_LOG_FILE)),
        })
    }

    /// Opens the service in the default (or portable) data directory.
    pub fn open_default() -> Result<Self> {
        let dir = paths::default_data_dir().ok_or(ConfigError::NoDataDir)?;
        info!("Using data directory {}", dir.display());
        Self::open(&dir)
    }

    /// Service over an existing database, without an audit log.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            forward_log: None,
        }
    }

    pub fn with_forward_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.forward_log = Some(path.into());
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn tracker(&self) -> ForwardTracker {
        ForwardTracker::new(self.db.clone())
    }

    // ── Recipient profiles ──

    /// Validates and stores `settings` as the profile for its recipient.
    pub fn save_profile(&self, settings: &RunSettings) -> Result<()> {
        FilterConfig::from_settings(settings)?;
        client_repo::save(&self.db, settings, &Utc::now().to_rfc3339())?;
        debug!("Saved profile for '{}'", settings.recipient.trim());
        Ok(())
    }

    pub fn load_profile(&self, recipient: &str) -> Result<Option<RunSettings>> {
        Ok(client_repo::find(&self.db, recipient)?)
    }

    pub fn recipients(&self) -> Result<Vec<String>> {
        Ok(client_repo::list_recipients(&self.db)?)
    }

    /// Removes a profile and its forward history.
    pub fn delete_profile(&self, recipient: &str) -> Result<bool> {
        Ok(client_repo::delete(&self.db, recipient)?)
    }

    pub fn last_used(&self) -> Result<LastUsed> {
        Ok(LastUsed {
            recipient: settings_repo::get(&self.db, settings_repo::LAST_USED_EMAIL)?,
            start_date: settings_repo::get(&self.db, settings_repo::LAST_START_DATE)?,
            end_date: settings_repo::get(&self.db, settings_repo::LAST_END_DATE)?,
        })
    }

    // ── Runs ──

    /// Validates `settings` and builds a ready-to-run pipeline. The date
    /// window is clamped to `now`.
    pub fn prepare(&self, settings: &RunSettings, now: DateTime<Utc>) -> Result<Pipeline> {
        let filter = FilterConfig::from_settings(settings)?;
        let tz = filter.timezone;
        let config = PipelineConfig::prepare(filter, now)?;

        let mut pipeline = Pipeline::new(Arc::new(config), Arc::new(self.tracker()));
        if let Some(path) = &self.forward_log {
            pipeline = pipeline.with_forward_log(ForwardLog::new(path, tz));
        }
        Ok(pipeline)
    }

    /// Validates `settings`, remembers them, and starts a background run.
    pub fn start(
        &self,
        settings: &RunSettings,
        store: Arc<dyn MailStore>,
        mode: RunMode,
    ) -> Result<ForwardWorker> {
        let pipeline = self.prepare(settings, Utc::now())?;
        self.remember(settings)?;
        Ok(ForwardWorker::spawn(pipeline, store, mode)?)
    }

    fn remember(&self, settings: &RunSettings) -> Result<()> {
        client_repo::save(&self.db, settings, &Utc::now().to_rfc3339())?;
        settings_repo::set(&self.db, settings_repo::LAST_USED_EMAIL, settings.recipient.trim())?;
        settings_repo::set(&self.db, settings_repo::LAST_START_DATE, &settings.start_date)?;
        settings_repo::set(&self.db, settings_repo::LAST_END_DATE, &settings.end_date)?;
        Ok(())
    }
}
