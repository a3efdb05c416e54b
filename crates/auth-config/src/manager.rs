//! Dynamic configuration management with hot-reload capabilities

use crate::config::AppConfig;
use crate::loader::ConfigLoader;
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub struct ConfigManager {
    current_config: Arc<RwLock<AppConfig>>,
    config_sender: watch::Sender<AppConfig>,
    config_receiver: watch::Receiver<AppConfig>,
    loader: ConfigLoader,
}

impl ConfigManager {
    pub fn new(loader: ConfigLoader) -> Result<Self> {
        let initial_config = loader
            .load()
            .map_err(|e| anyhow::anyhow!("Failed to load initial configuration: {}", e))?;

        let (config_sender, config_receiver) = watch::channel(initial_config.clone());

        Ok(Self {
            current_config: Arc::new(RwLock::new(initial_config)),
            config_sender,
            config_receiver,
            loader,
        })
    }

    #[cfg(test)]
    pub fn new_with_config(config: AppConfig) -> Result<Self> {
        let (config_sender, config_receiver) = watch::channel(config.clone());

        Ok(Self {
            current_config: Arc::new(RwLock::new(config)),
            config_sender,
            config_receiver,
            loader: ConfigLoader::new("config", "test"),
        })
    }

    pub fn get_config(&self) -> AppConfig {
        self.current_config.read().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppConfig> {
        self.config_receiver.clone()
    }

    pub async fn reload_config(&self) -> Result<()> {
        match self.loader.load() {
            Ok(new_config) => {
                if let Err(e) = validator::Validate::validate(&new_config) {
                    error!("Configuration validation failed: {}", e);
                    return Err(anyhow::anyhow!("Invalid configuration: {}", e));
                }

                {
                    let mut config = self.current_config.write();
                    *config = new_config.clone();
                }

                if let Err(e) = self.config_sender.send(new_config) {
                    warn!("Failed to notify configuration subscribers: {}", e);
                }

                info!("Configuration reloaded successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to reload configuration: {}", e);
                Err(anyhow::anyhow!("Configuration reload failed: {}", e))
            }
        }
    }

    pub async fn start_auto_reload(&self, interval_seconds: u64) {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_seconds));

            loop {
                interval.tick().await;
                if let Err(e) = manager.reload_config().await {
                    error!("Auto-reload failed: {}", e);
                }
            }
        });
    }
}

impl Clone for ConfigManager {
    fn clone(&self) -> Self {
        Self {
            current_config: Arc::clone(&self.current_config),
            config_sender: self.config_sender.clone(),
            config_receiver: self.config_receiver.clone(),
            loader: ConfigLoader::new("config", "development"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_config_returns_initial_values() {
        let config = AppConfig::default();
        let manager = ConfigManager::new_with_config(config.clone()).unwrap();

        let retrieved = manager.get_config();
        assert_eq!(retrieved.server.port, config.server.port);
        assert_eq!(
            retrieved.security.access_token_ttl_seconds,
            config.security.access_token_ttl_seconds
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_reload_notifications() {
        let config = AppConfig::default();
        let manager = ConfigManager::new_with_config(config).unwrap();
        let mut receiver = manager.subscribe();

        let mut updated = manager.get_config();
        updated.server.port = 9090;
        manager
            .config_sender
            .send(updated.clone())
            .expect("receiver still alive");

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().server.port, 9090);
    }

    #[tokio::test]
    async fn test_clone_shares_current_config() {
        let config = AppConfig::default();
        let manager = ConfigManager::new_with_config(config).unwrap();
        let clone = manager.clone();

        assert_eq!(
            clone.get_config().server.port,
            manager.get_config().server.port
        );
    }
}
