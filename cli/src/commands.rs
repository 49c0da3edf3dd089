pub mod info;
pub mod scan;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lenscan")]
#[command(about = "Network device discovery for video recorder systems.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover cameras, NAS boxes and media centers on the local /24
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Show the interface and subnet a scan would sweep
    #[command(alias = "i")]
    Info,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Emit the result set as JSON instead of the host tree
    #[arg(long)]
    pub json: bool,

    /// Override the candidate port list (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub ports: Option<Vec<u16>>,

    /// Bound on concurrently probed hosts
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Multiply every probe timeout, for slow or lossy networks
    #[arg(long, default_value_t = 1)]
    pub timeout_scale: u32,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
