use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use tracing::debug;

use folio_diff::{generate_html_diff, generate_text_diff, summarize_changes};
use folio_ledger::{Version, VersionStore, CONFIG_FILE};
use folio_merge::MergeStrategy;
use folio_types::VersionId;

use crate::cli::*;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut store = VersionStore::open(&cli.store)
        .with_context(|| format!("opening store at {}", cli.store.display()))?;
    let json = cli.json;
    debug!(store = %cli.store.display(), versions = store.len(), "store opened");
    match cli.command {
        Command::Init => cmd_init(&store),
        Command::Log(args) => cmd_log(&store, args, json),
        Command::Show(args) => cmd_show(&mut store, args, json),
        Command::Diff(args) => cmd_diff(&mut store, args, json),
        Command::Branches => cmd_branches(&store, json),
        Command::Branch(args) => cmd_branch(&mut store, args),
        Command::Switch(args) => cmd_switch(&mut store, args),
        Command::Tag(args) => cmd_tag(&mut store, args),
        Command::Rollback(args) => cmd_rollback(&mut store, args),
        Command::Merge(args) => cmd_merge(&mut store, args, json),
        Command::Cleanup(args) => cmd_cleanup(&mut store, args, json),
        Command::Validate(args) => cmd_validate(&mut store, args, json),
    }
}

fn resolve(store: &VersionStore, prefix: &str) -> anyhow::Result<VersionId> {
    store
        .resolve(prefix)
        .map(|v| v.version_id.clone())
        .ok_or_else(|| anyhow!("unknown or ambiguous version '{prefix}'"))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_init(store: &VersionStore) -> anyhow::Result<()> {
    let root = store.root().ok_or_else(|| anyhow!("store has no directory"))?;
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        std::fs::write(&config_path, store.config().to_toml()?)?;
    }
    println!(
        "{} Initialized Folio store in {}",
        "✓".green().bold(),
        root.display().to_string().bold()
    );
    println!("  Branch: {}", store.get_current_branch().yellow());
    Ok(())
}

fn print_version(v: &Version, head: Option<&VersionId>) {
    let marker = if head == Some(&v.version_id) { " (HEAD)" } else { "" };
    println!(
        "{}{}  {}",
        v.version_id.as_str().yellow().bold(),
        marker.cyan(),
        v.branch.green()
    );
    println!("  Author: {}", v.author);
    println!("  Date:   {}", v.timestamp.to_rfc3339().dimmed());
    if !v.tags.is_empty() {
        let tags: Vec<&str> = v.tags.iter().map(String::as_str).collect();
        println!("  Tags:   {}", tags.join(", ").magenta());
    }
    println!("\n    {}\n", v.message);
}

fn cmd_log(store: &VersionStore, args: LogArgs, json: bool) -> anyhow::Result<()> {
    let history = store.get_history(args.branch.as_deref(), args.limit);
    if json {
        return print_json(&history);
    }
    if history.is_empty() {
        println!("No versions.");
        return Ok(());
    }
    let head = store.get_head_version();
    for v in history {
        if args.oneline {
            println!("{} {}", v.version_id.as_str().yellow(), v.message);
        } else {
            print_version(v, head);
        }
    }
    Ok(())
}

fn cmd_show(store: &mut VersionStore, args: ShowArgs, json: bool) -> anyhow::Result<()> {
    let id = resolve(store, &args.version)?;
    let snapshot = store
        .snapshot_at(&id)?
        .ok_or_else(|| anyhow!("version {id} not found"))?;
    let version = store
        .get_version(&id)
        .ok_or_else(|| anyhow!("version {id} not found"))?;
    if json {
        return print_json(&serde_json::json!({
            "version": version,
            "stats": snapshot.stats(),
            "blocks": snapshot.block_texts(),
        }));
    }
    print_version(version, store.get_head_version());
    for change in &version.changes {
        println!("  {} {} {}", change.kind.to_string().cyan(), change.target, change.description.dimmed());
    }
    let stats = snapshot.stats();
    println!(
        "{} blocks, {} paragraphs, {} headings, {} words",
        stats.block_count, stats.paragraph_count, stats.heading_count, stats.word_count
    );
    if let Some(title) = &snapshot.metadata.title {
        println!("Title: {}", title.bold());
    }
    for (i, text) in snapshot.block_texts().iter().enumerate() {
        println!("{:>4}  {}", (i + 1).to_string().dimmed(), text);
    }
    Ok(())
}

fn cmd_diff(store: &mut VersionStore, args: DiffArgs, json: bool) -> anyhow::Result<()> {
    let from = resolve(store, &args.from)?;
    let to = resolve(store, &args.to)?;
    let diff = store
        .get_diff(&from, &to)?
        .ok_or_else(|| anyhow!("cannot diff {from} and {to}"))?;
    match args.format {
        DiffFormat::Summary => {
            let summary = summarize_changes(&diff);
            if json {
                return print_json(&summary);
            }
            println!("{}", summary.overview.bold());
            for line in summary
                .content_changes
                .iter()
                .chain(&summary.metadata_changes)
                .chain(&summary.style_changes)
            {
                println!("  {line}");
            }
        }
        DiffFormat::Hunks => {
            if json {
                return print_json(&diff);
            }
            if diff.is_empty() {
                println!("No changes.");
            }
            for hunk in diff.hunks() {
                println!(
                    "{:<16} {:<20} {:.2}  {}",
                    hunk.kind.to_string().cyan(),
                    hunk.location.to_string(),
                    hunk.confidence,
                    hunk.description
                );
            }
        }
        DiffFormat::Text | DiffFormat::Html => {
            let (Some(old), Some(new)) = (store.snapshot_at(&from)?, store.snapshot_at(&to)?) else {
                bail!("cannot load {from} or {to}");
            };
            let rendered = match args.format {
                DiffFormat::Html => generate_html_diff(&old, &new),
                _ => generate_text_diff(&old, &new, args.context),
            };
            print!("{rendered}");
        }
    }
    Ok(())
}

fn cmd_branches(store: &VersionStore, json: bool) -> anyhow::Result<()> {
    let branches = store.get_branches();
    if json {
        return print_json(&branches);
    }
    let current = store.get_current_branch();
    for name in branches {
        let head = store
            .branch_head(&name)
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        if name == current {
            println!("* {} {}", name.green().bold(), head.dimmed());
        } else {
            println!("  {} {}", name, head.dimmed());
        }
    }
    Ok(())
}

fn cmd_branch(store: &mut VersionStore, args: BranchArgs) -> anyhow::Result<()> {
    let from = args.from.as_deref().map(|p| resolve(store, p)).transpose()?;
    if !store.create_branch(&args.name, from.as_ref())? {
        bail!("base version not found");
    }
    println!("Created and switched to {}", args.name.yellow().bold());
    Ok(())
}

fn cmd_switch(store: &mut VersionStore, args: SwitchArgs) -> anyhow::Result<()> {
    if store.switch_branch(&args.branch)?.is_none() {
        bail!("branch '{}' has no versions", args.branch);
    }
    println!("Switched to {}", args.branch.yellow().bold());
    Ok(())
}

fn cmd_tag(store: &mut VersionStore, args: TagArgs) -> anyhow::Result<()> {
    let id = resolve(store, &args.version)?;
    store.tag_version(&id, &args.tag)?;
    println!("Tagged {} as {}", id.as_str().yellow(), args.tag.magenta());
    Ok(())
}

fn cmd_rollback(store: &mut VersionStore, args: RollbackArgs) -> anyhow::Result<()> {
    let id = resolve(store, &args.version)?;
    if store.rollback(&id)?.is_none() {
        bail!("version {id} not found");
    }
    println!(
        "{} Head is now {} on {}",
        "✓".green().bold(),
        id.as_str().yellow(),
        store.get_current_branch().green()
    );
    Ok(())
}

fn cmd_merge(store: &mut VersionStore, args: MergeArgs, json: bool) -> anyhow::Result<()> {
    let strategy: MergeStrategy = args
        .strategy
        .parse()
        .map_err(|_| anyhow!("unknown strategy '{}' (auto, ours, theirs)", args.strategy))?;
    let outcome = store.merge(&args.branch, args.into.as_deref(), strategy)?;
    if json {
        return print_json(&outcome);
    }
    if outcome.success {
        println!("{} {}", "✓".green().bold(), outcome.message);
        return Ok(());
    }
    println!("{} {}", "✗".red().bold(), outcome.message);
    for conflict in &outcome.conflicts {
        println!("  {conflict}");
    }
    if !outcome.conflicts.is_empty() {
        println!("Retry with {} or {}.", "--strategy ours".bold(), "--strategy theirs".bold());
    }
    bail!("merge failed")
}

fn cmd_cleanup(store: &mut VersionStore, args: CleanupArgs, json: bool) -> anyhow::Result<()> {
    let report = match args.days {
        Some(days) => store.cleanup_old_versions(Duration::from_secs(u64::from(days) * SECS_PER_DAY))?,
        None => store.cleanup_expired()?,
    };
    if json {
        return print_json(&report);
    }
    println!(
        "{} Cleanup: {} versions, {} blobs removed",
        "✓".green(),
        report.removed(),
        report.blobs_removed
    );
    for branch in &report.branches_repointed {
        println!("  branch {} moved to an older version", branch.yellow());
    }
    for branch in &report.branches_dropped {
        println!("  branch {} has no remaining versions", branch.yellow());
    }
    Ok(())
}

fn cmd_validate(store: &mut VersionStore, args: ValidateArgs, json: bool) -> anyhow::Result<()> {
    let id = match &args.version {
        Some(prefix) => resolve(store, prefix)?,
        None => store
            .get_head_version()
            .cloned()
            .ok_or_else(|| anyhow!("store has no head version"))?,
    };
    let snapshot = store
        .snapshot_at(&id)?
        .ok_or_else(|| anyhow!("version {id} not found"))?;
    let issues: Vec<String> = folio_nav::validate_structure(&snapshot)
        .iter()
        .map(ToString::to_string)
        .chain(snapshot.check_integrity().iter().map(ToString::to_string))
        .collect();
    if json {
        return print_json(&issues);
    }
    if issues.is_empty() {
        println!("{} {} is valid", "✓".green().bold(), id.as_str().yellow());
        return Ok(());
    }
    for issue in &issues {
        println!("  {} {issue}", "✗".red());
    }
    bail!("{} issue(s) found", issues.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use folio_sdk::EditSession;

    fn seeded() -> (tempfile::TempDir, Vec<VersionId>) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditSession::open(VersionStore::open(dir.path()).unwrap()).unwrap();
        session.insert_paragraph(0, "Hello").unwrap();
        let v1 = session.commit("init").unwrap();
        session.edit_paragraph(0, "Hello world").unwrap();
        let v2 = session.commit("edit").unwrap();
        (dir, vec![v1.version_id, v2.version_id])
    }

    fn run(dir: &tempfile::TempDir, args: &[&str]) -> anyhow::Result<()> {
        let store = dir.path().to_str().unwrap();
        let mut argv = vec!["folio", "--store", store];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn inspection_commands_succeed() {
        let (dir, ids) = seeded();
        run(&dir, &["log"]).unwrap();
        run(&dir, &["log", "--oneline", "-n", "1"]).unwrap();
        run(&dir, &["show", ids[0].as_str()]).unwrap();
        run(&dir, &["diff", ids[0].as_str(), ids[1].as_str()]).unwrap();
        run(&dir, &["diff", ids[0].as_str(), ids[1].as_str(), "--format", "text"]).unwrap();
        run(&dir, &["--json", "diff", ids[0].as_str(), ids[1].as_str(), "--format", "hunks"]).unwrap();
        run(&dir, &["branches"]).unwrap();
        run(&dir, &["validate"]).unwrap();
    }

    #[test]
    fn rollback_and_tag_persist() {
        let (dir, ids) = seeded();
        run(&dir, &["tag", &ids[0].as_str()[..8], "release"]).unwrap();
        run(&dir, &["rollback", ids[0].as_str()]).unwrap();

        let store = VersionStore::open(dir.path()).unwrap();
        assert_eq!(store.get_head_version(), Some(&ids[0]));
        assert!(store.get_version(&ids[0]).unwrap().is_tagged());
    }

    #[test]
    fn cleanup_zero_days_keeps_tagged() {
        let (dir, ids) = seeded();
        run(&dir, &["tag", ids[0].as_str(), "keep"]).unwrap();
        run(&dir, &["cleanup", "--days", "0"]).unwrap();
        let store = VersionStore::open(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_version(&ids[0]).is_some());
    }

    #[test]
    fn unknown_version_is_an_error() {
        let (dir, _) = seeded();
        assert!(run(&dir, &["show", "ffffffffffff"]).is_err());
        assert!(run(&dir, &["switch", "ghost"]).is_err());
    }

    #[test]
    fn init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        run(&dir, &["init"]).unwrap();
        assert!(dir.path().join(CONFIG_FILE).exists());
    }
}
