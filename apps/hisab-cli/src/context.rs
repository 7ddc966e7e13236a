use hisab_api_memory::{MemoryDataService, Snapshot, SnapshotError};
use hisab_config::{ClientConfig, ConfigError};
use hisab_flow::Services;
use hisab_model::UserId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::terminal::{TerminalNavigator, TerminalNotifier};

/// Config plus the local data service, loaded once per invocation.
pub struct Context {
    pub config: ClientConfig,
    pub service: MemoryDataService,
    config_path: PathBuf,
    data_path: PathBuf,
}

impl Context {
    pub fn load(
        config_path: Option<&Path>,
        data_path: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => ClientConfig::default_path()?,
        };
        let config = ClientConfig::load_or_default(&config_path)?;
        let data_path = match data_path {
            Some(path) => path.to_path_buf(),
            None => config.data_path()?,
        };
        debug!(
            "Using config {} and data {}",
            config_path.display(),
            data_path.display()
        );

        let service = MemoryDataService::from_snapshot(Snapshot::load_from(&data_path)?);
        if let Some(user) = &config.current_user {
            if let Err(e) = service.sign_in(&UserId::from(user.as_str())) {
                warn!("Configured user is unavailable: {}", e);
            }
        }

        Ok(Self {
            config,
            service,
            config_path,
            data_path,
        })
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        self.config.save_to(&self.config_path)
    }

    pub fn save_data(&self) -> Result<(), SnapshotError> {
        self.service.snapshot().save_to(&self.data_path)
    }

    pub fn services(&self) -> Services {
        Services {
            queries: Arc::new(self.service.clone()),
            mutations: Arc::new(self.service.clone()),
            notifier: Arc::new(TerminalNotifier),
            navigator: Arc::new(TerminalNavigator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisab_api::QueryService;
    use hisab_model::Member;

    #[test]
    fn test_missing_files_start_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::load(
            Some(&dir.path().join("config.json")),
            Some(&dir.path().join("data.json")),
        )
        .unwrap();

        assert_eq!(ctx.config, ClientConfig::default());
        assert!(ctx.service.users().is_empty());
    }

    #[tokio::test]
    async fn test_signs_in_configured_user() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let data_path = dir.path().join("data.json");

        let ctx = Context::load(Some(&config_path), Some(&data_path)).unwrap();
        ctx.service.upsert_user(Member::new("me", "Gaurav"));
        ctx.save_data().unwrap();
        ClientConfig {
            current_user: Some("me".to_string()),
            ..ClientConfig::default()
        }
        .save_to(&config_path)
        .unwrap();

        let ctx = Context::load(Some(&config_path), Some(&data_path)).unwrap();
        let me = ctx.service.get_current_user().await.unwrap();
        assert_eq!(me.id, UserId::from("me"));
    }
}
