use tally_config::TallyConfig;

/// Render the effective configuration as pretty JSON, secrets masked.
pub fn render(config: &TallyConfig) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&config.redacted())?)
}

/// Handle `tally config`.
pub fn handle(config: &TallyConfig) -> anyhow::Result<()> {
    println!("{}", render(config)?);
    Ok(())
}
