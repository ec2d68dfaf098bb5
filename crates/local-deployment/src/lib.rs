use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentError};
use services::services::{
    ai::AiService,
    analytics::AnalyticsService,
    config::{Config, load_config_from_file, save_config_to_file},
};
use tokio::sync::RwLock;
use utils::assets::config_path;

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<RwLock<Config>>,
    db: DBService,
    ai: AiService,
    analytics: AnalyticsService,
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let config = Self::load_runtime_config().await?;
        let db = DBService::new().await?;
        let ai = {
            let config = config.read().await;
            AiService::new(config.ai.clone())
        };

        Ok(Self {
            config,
            db,
            ai,
            analytics: AnalyticsService::new(),
        })
    }

    fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn ai(&self) -> &AiService {
        &self.ai
    }

    fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }
}

impl LocalDeployment {
    /// Read the config leniently and write the normalized form back, so a
    /// hand-edited file is cleaned up on boot.
    async fn load_runtime_config() -> Result<Arc<RwLock<Config>>, DeploymentError> {
        let raw_config = load_config_from_file(&config_path()).await;
        save_config_to_file(&raw_config, &config_path()).await?;
        Ok(Arc::new(RwLock::new(raw_config)))
    }
}
