use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "investours-gateway",
    version,
    about = "Scam-detection and tutor gateway for Investours"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/gateway.toml")]
    pub(crate) config: PathBuf,
    #[arg(long)]
    pub(crate) listen_addr: Option<String>,
    #[arg(long, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    #[arg(long, default_value = gateway::logging::DEFAULT_LOG_PREFIX)]
    pub(crate) log_file_prefix: String,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
}
