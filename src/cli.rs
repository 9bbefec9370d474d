use std::{env, path::PathBuf};

use clap::Parser;

use crate::{error::UnknownFilter, model::Filter};

#[derive(Debug, Parser)]
#[command(name = "tasks", about = "A terminal task list with live progress.")]
pub struct CommandLineArgs {
    /// Status filter to start with: all, completed or pending.
    #[arg(short, long, default_value = "all", value_parser = parse_filter)]
    pub filter: Filter,

    /// Search term to start with.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Where log files go. Defaults to ~/.todo/logs.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_filter(value: &str) -> Result<Filter, UnknownFilter> {
    value.parse()
}

impl CommandLineArgs {
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir.clone().or_else(|| {
            env::var_os("HOME").map(|home| PathBuf::from(home).join(".todo/logs"))
        })
    }
}
