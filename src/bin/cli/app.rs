use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use studybuddy_lib::config::AppConfig;
use studybuddy_lib::review::{PersistState, ReviewScheduler};
use studybuddy_lib::store::FileStore;

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub scheduler: ReviewScheduler,
}

impl App {
    /// Load config and the user's schedule.
    ///
    /// Command-line values take precedence over the config file.
    pub async fn new(
        config_path: Option<&Path>,
        user: Option<&str>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_path().context("Failed to locate config file")?,
        };
        let mut config = AppConfig::load(&config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;

        if data_dir.is_some() {
            config.data_dir = data_dir;
        }
        if let Some(user) = user {
            config.user_id = Some(user.to_string());
        }

        let data_dir = config
            .resolved_data_dir()
            .context("Failed to get data directory")?;
        let store = Arc::new(FileStore::new(&data_dir));

        let mut scheduler = ReviewScheduler::new(store);
        scheduler.initialize(config.user_id.as_deref()).await;

        let status = scheduler.persist_status();
        if status.state == PersistState::LoadFailed {
            bail!(
                "Failed to load schedule: {}",
                status.last_error.unwrap_or_default()
            );
        }
        if config.user_id.is_none() {
            log::warn!("No user configured; changes will not be saved");
        }

        Ok(Self { config, scheduler })
    }

    /// Fail if the last write to the store did not go through
    pub fn check_persisted(&self) -> Result<()> {
        let status = self.scheduler.persist_status();
        if status.state == PersistState::SaveFailed {
            bail!(
                "Schedule was not saved: {}",
                status.last_error.unwrap_or_default()
            );
        }
        Ok(())
    }
}
