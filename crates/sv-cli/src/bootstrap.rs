use sv_config::{ConfigError, SurveyorConfig};

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SurveyorConfig> {
    let mut config = SurveyorConfig::load_with_dotenv()?;
    apply_overrides(&mut config, flags)?;
    Ok(config)
}

fn apply_overrides(config: &mut SurveyorConfig, flags: &GlobalFlags) -> Result<(), ConfigError> {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
    if let Some(workers) = flags.workers {
        config.queue.workers = workers;
    }
    config.validate()
}
