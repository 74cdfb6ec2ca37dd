use std::sync::Arc;

use anyhow::Context;
use sv_config::SurveyorConfig;
use sv_db::service::LocalService;

/// Everything a command handler needs.
pub struct AppContext {
    pub config: SurveyorConfig,
    pub service: Arc<LocalService>,
}

impl AppContext {
    pub async fn init(config: SurveyorConfig) -> anyhow::Result<Self> {
        let service = LocalService::from_config(&config)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        Ok(Self {
            config,
            service: Arc::new(service),
        })
    }
}
