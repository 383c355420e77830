use anyhow::Context;
use tally_config::TallyConfig;
use tally_core::Report;
use tally_sources::{GitHubClient, HarvestClient};

/// Build the report from the configured Harvest project and GitHub repository.
///
/// The complete text is produced before anything is written, so a failure
/// leaves stdout empty.
pub async fn build(config: &TallyConfig) -> anyhow::Result<String> {
    config
        .require_configured()
        .context("tally is not fully configured")?;

    let user_agent = &config.general.user_agent;
    let time_zone = config.general.time_zone()?;
    let harvest = HarvestClient::from_config(&config.harvest, user_agent)
        .context("failed to set up the Harvest client")?;
    let github = GitHubClient::from_config(&config.github, user_agent)
        .context("failed to set up the GitHub client")?;

    tracing::debug!(
        project_id = config.harvest.project_id,
        owner = %config.github.owner,
        repository = %config.github.repository,
        "building report"
    );
    let report = Report::new(harvest.clone(), harvest, github).with_time_zone(time_zone);
    report.render().await.context("failed to generate report")
}

/// Handle `tally report`.
pub async fn handle(config: &TallyConfig) -> anyhow::Result<()> {
    let text = build(config).await?;
    println!("{text}");
    Ok(())
}
