use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio", about = "Folio: versioned document history", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store directory
    #[arg(long, global = true, default_value = ".folio")]
    pub store: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a store with a default configuration file
    Init,
    /// Show version history
    Log(LogArgs),
    /// Show one version and its document
    Show(ShowArgs),
    /// Show changes between two versions
    Diff(DiffArgs),
    /// List branches
    Branches,
    /// Create a branch at a version (default: head) and switch to it
    Branch(BranchArgs),
    /// Switch to a branch head
    Switch(SwitchArgs),
    /// Tag a version
    Tag(TagArgs),
    /// Move head back to an earlier version
    Rollback(RollbackArgs),
    /// Merge a branch into the current branch
    Merge(MergeArgs),
    /// Remove old untagged versions
    Cleanup(CleanupArgs),
    /// Check a version's document structure and integrity
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(long)]
    pub branch: Option<String>,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub version: String,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum DiffFormat {
    Summary,
    Text,
    Html,
    Hunks,
}

#[derive(Args)]
pub struct DiffArgs {
    pub from: String,
    pub to: String,
    #[arg(long, default_value = "summary")]
    pub format: DiffFormat,
    /// Context lines for the text view
    #[arg(short = 'U', long, default_value = "3")]
    pub context: usize,
}

#[derive(Args)]
pub struct BranchArgs {
    pub name: String,
    #[arg(long)]
    pub from: Option<String>,
}

#[derive(Args)]
pub struct SwitchArgs {
    pub branch: String,
}

#[derive(Args)]
pub struct TagArgs {
    pub version: String,
    pub tag: String,
}

#[derive(Args)]
pub struct RollbackArgs {
    pub version: String,
}

#[derive(Args)]
pub struct MergeArgs {
    pub branch: String,
    #[arg(long)]
    pub into: Option<String>,
    #[arg(long, default_value = "auto")]
    pub strategy: String,
}

#[derive(Args)]
pub struct CleanupArgs {
    /// Retention in days (default: from folio.toml)
    #[arg(long)]
    pub days: Option<u32>,
}

#[derive(Args)]
pub struct ValidateArgs {
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_with_limit() {
        let cli = Cli::try_parse_from(["folio", "log", "-n", "5", "--branch", "draft"]).unwrap();
        if let Command::Log(args) = cli.command {
            assert_eq!(args.limit, Some(5));
            assert_eq!(args.branch.as_deref(), Some("draft"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_diff_view() {
        let cli = Cli::try_parse_from(["folio", "diff", "abc", "def", "--format", "html"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.from, "abc");
            assert!(matches!(args.format, DiffFormat::Html));
            assert_eq!(args.context, 3);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_global_store_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "branches", "--store", "/tmp/s"]).unwrap();
        assert_eq!(cli.store, PathBuf::from("/tmp/s"));
        assert!(matches!(cli.command, Command::Branches));
    }

    #[test]
    fn parse_cleanup_days() {
        let cli = Cli::try_parse_from(["folio", "cleanup", "--days", "0"]).unwrap();
        if let Command::Cleanup(args) = cli.command {
            assert_eq!(args.days, Some(0));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verbose_json() {
        let cli = Cli::try_parse_from(["folio", "-v", "--json", "log"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.json);
    }
}
