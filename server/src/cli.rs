use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use hostwatch_common::config::{Config, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "hostwatch")]
#[command(about = "Instance dashboard with safe connectivity checks.", version)]
pub struct CommandLine {
    /// TOML configuration file
    #[arg(short, long, env = "HOSTWATCH_CONFIG")]
    pub config: Option<PathBuf>,
    /// Address to listen on
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
    /// Log level or filter directive, e.g. `debug` or `hostwatch=debug,tower_http=info`
    #[arg(long)]
    pub log_level: Option<String>,
    /// `pretty` or `json`
    #[arg(long)]
    pub log_format: Option<LogFormat>,
    /// Services catalogue (JSON)
    #[arg(long)]
    pub services: Option<PathBuf>,
    /// Directory served under /static
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolves the final configuration: file, then environment, then flags.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        Ok(self.apply(base.merge_env()?))
    }

    /// Applies the flags that were given on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(path) = &self.services {
            config.services_path = path.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = dir.clone();
        }
        config
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
