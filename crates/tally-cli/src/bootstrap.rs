use std::path::PathBuf;

use anyhow::Context;
use tally_config::TallyConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, the layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TallyConfig> {
    load_dotenv(flags)?;

    let mut config = TallyConfig::load().context("failed to load tally configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn load_dotenv(flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(path) = &flags.env_file {
        let env_path = PathBuf::from(path);
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}

fn apply_overrides(config: &mut TallyConfig, flags: &GlobalFlags) {
    if let Some(project_id) = flags.project_id {
        config.harvest.project_id = project_id;
    }
    if let Some(from) = &flags.from {
        config.harvest.from.clone_from(from);
    }
    if let Some(to) = &flags.to {
        config.harvest.to.clone_from(to);
    }
    if let Some(timezone) = &flags.timezone {
        config.general.timezone.clone_from(timezone);
    }
}
