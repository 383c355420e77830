/// Global flags available before or after subcommands.
#[derive(Clone, Debug, Default)]
pub struct GlobalFlags {
    pub quiet: bool,
    pub verbose: bool,
    pub project_id: Option<u64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub timezone: Option<String>,
    pub env_file: Option<String>,
}
