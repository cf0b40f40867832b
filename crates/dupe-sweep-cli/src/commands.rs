use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dupe-sweep")]
#[command(about = "Find files sharing a name and size, then sweep the extra copies", long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    /// Directory to scan (defaults to the configured root, normally the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List duplicate sets and save them to a timestamped report (non-destructive)
    #[command(short_flag = 'l', long_flag = "list", visible_alias = "list")]
    Scan,
    /// Remove all but the first file of each set in the most recent report
    #[command(short_flag = 'r', long_flag = "remove")]
    Remove,
}
