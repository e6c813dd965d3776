//! changes - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use changes::config::Config;
use changes::fragment::{NewEntryOptions, create_entry};
use changes::output::{OutputLevel, Reporter};
use changes::release::{
    PrepareOptions, ReleaseNumber, ValidateOptions, prepare_release, validate_fragments,
};
use changes::ReleaseError;

/// Collect changelog fragments and render them into release sections.
#[derive(Parser, Debug)]
#[command(name = "changes")]
#[command(about = "Collect changelog fragments and render them into release sections")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Config file (defaults to .changelogrc.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding changelog fragments
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    /// Changelog file to write releases into
    #[arg(long, global = true)]
    changelog_file: Option<PathBuf>,

    /// Known change types, in priority order
    #[arg(long, global = true, value_delimiter = ',')]
    change_types: Option<Vec<String>>,

    /// Line template for fragments, e.g. "{{ changeType }}: {{ message }}"
    #[arg(long, global = true)]
    format: Option<String>,

    /// Grouping strategy: changeType or plain
    #[arg(long, global = true)]
    strategy: Option<String>,

    /// Regex every fragment line must match
    #[arg(long, global = true)]
    validation_pattern: Option<String>,

    /// Print only values (such as created file paths) for scripting
    #[arg(long, global = true, conflicts_with = "verbose")]
    plumbing: bool,

    /// Print debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new changelog fragment
    New(NewArgs),

    /// Gather fragments and compile them into the changelog file
    PrepareRelease(PrepareReleaseArgs),

    /// Check that every fragment can be parsed
    Validate,
}

#[derive(Args, Debug)]
struct NewArgs {
    /// Change type of the entry (one of the configured change types)
    change_type: String,

    /// Description of the change
    #[arg(short, long)]
    message: Option<String>,

    /// Issue id to reference; must not contain whitespace
    #[arg(long)]
    issue_id: Option<String>,

    /// Regex whose first capture group extracts the issue id from the current branch
    #[arg(long)]
    git_branch_format: Option<String>,

    /// File name for the entry (defaults to the current timestamp)
    #[arg(long = "file-name")]
    entry_file_name: Option<String>,

    /// Open the entry in $EDITOR
    #[arg(short, long)]
    edit: bool,
}

#[derive(Args, Debug)]
struct PrepareReleaseArgs {
    /// Label for the release
    #[arg(long)]
    release_number: String,

    /// Release template, either a file path or a template string
    #[arg(long)]
    changelog_template: Option<String>,

    /// Template for a branch to check out first, e.g. "release/{{ releaseNumber }}"
    #[arg(long)]
    release_branch_pattern: Option<String>,

    /// Print the release section without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Leave fragment files in place after writing the changelog
    #[arg(long)]
    keep_fragments: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    let reporter = Reporter::new(if cli.global.plumbing {
        OutputLevel::Values
    } else if cli.global.verbose {
        OutputLevel::Verbose
    } else {
        OutputLevel::Normal
    });

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = load_config(&cli.global, &cwd)?;

    match cli.command {
        Commands::New(args) => run_new(args, config, &cwd, &reporter),
        Commands::PrepareRelease(args) => run_prepare_release(args, config, &cwd, &reporter),
        Commands::Validate => run_validate(config, &reporter),
    }
}

/// Install a stderr subscriber honouring RUST_LOG, or debug when verbose.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("changes=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the config file and apply CLI overrides on top.
fn load_config(global: &GlobalArgs, cwd: &Path) -> Result<Config> {
    let mut config =
        Config::discover(global.config.as_deref(), cwd).context("Failed to load config")?;

    if let Some(dir) = &global.logs_dir {
        config.logs_dir = Some(dir.clone());
    }
    if let Some(file) = &global.changelog_file {
        config.changelog_file = Some(file.clone());
    }
    if let Some(types) = &global.change_types {
        config.change_types = Some(types.clone());
    }
    if let Some(format) = &global.format {
        config.format = Some(format.clone());
    }
    if let Some(strategy) = &global.strategy {
        config.strategy = Some(strategy.clone());
    }
    if let Some(pattern) = &global.validation_pattern {
        config.validation_pattern = Some(pattern.clone());
    }

    Ok(config)
}

fn run_new(args: NewArgs, config: Config, cwd: &Path, reporter: &Reporter) -> Result<()> {
    let options = NewEntryOptions {
        logs_dir: config.logs_dir(),
        line_format: config.format_for(&args.change_type).to_string(),
        change_type: args.change_type,
        change_types: config.change_types(),
        issue_id: args.issue_id,
        git_branch_format: args.git_branch_format.or(config.git_branch_format.clone()),
        message: args.message,
        entry_file_name: args.entry_file_name,
        repo_dir: cwd.to_path_buf(),
    };

    let path = create_entry(&options).context("Failed to create changelog entry")?;

    reporter.value(path.display());
    reporter.success(format!(
        "Changelog entry placeholder generated at {}!",
        path.display()
    ));

    if args.edit {
        open_in_editor(&path, reporter)?;
    }

    Ok(())
}

fn run_prepare_release(
    args: PrepareReleaseArgs,
    mut config: Config,
    cwd: &Path,
    reporter: &Reporter,
) -> Result<()> {
    if let Some(template) = args.changelog_template {
        config.changelog_template = Some(template);
    }

    let options = PrepareOptions {
        logs_dir: config.logs_dir(),
        changelog_file: config.changelog_file(),
        release_number: ReleaseNumber::Literal(args.release_number),
        strategy: config
            .strategy_config()
            .context("Invalid release configuration")?,
        validation_pattern: config.validation_pattern.clone(),
        release_branch_pattern: args
            .release_branch_pattern
            .or(config.release_branch_pattern.clone()),
        repo_dir: cwd.to_path_buf(),
        dry_run: args.dry_run,
        keep_fragments: args.keep_fragments,
    };

    let outcome = prepare_release(&options).context("Failed to prepare release")?;

    if options.dry_run {
        println!("\n--- Dry Run Output ---\n");
        print!("{}", outcome.text);
        return Ok(());
    }

    if outcome.fragments.is_empty() {
        reporter.warn(format!(
            "No fragments found in {}",
            options.logs_dir.display()
        ));
    }
    if let Some(branch) = &outcome.branch {
        reporter.info(format!("Checked out {}", branch));
    }

    let entry_word = if outcome.entry_count == 1 { "entry" } else { "entries" };
    reporter.value(options.changelog_file.display());
    reporter.success(format!(
        "Added release {} with {} {} to {}",
        outcome.release_number,
        outcome.entry_count,
        entry_word,
        options.changelog_file.display()
    ));

    Ok(())
}

fn run_validate(config: Config, reporter: &Reporter) -> Result<()> {
    let options = ValidateOptions {
        logs_dir: config.logs_dir(),
        strategy: config
            .strategy_config()
            .context("Invalid release configuration")?,
        validation_pattern: config.validation_pattern.clone(),
    };

    match validate_fragments(&options) {
        Ok(report) => {
            reporter.success(format!(
                "{} lines in {} fragments are valid",
                report.lines, report.files
            ));
            Ok(())
        }
        Err(ReleaseError::ValidationFailed(failures)) => {
            for failure in &failures {
                reporter.error(failure);
            }
            bail!("{} fragment line(s) failed validation", failures.len())
        }
        Err(e) => Err(e).context("Failed to validate fragments"),
    }
}

/// Open `path` in $EDITOR and wait for it to exit.
fn open_in_editor(path: &Path, reporter: &Reporter) -> Result<()> {
    let Ok(editor) = std::env::var("EDITOR") else {
        reporter.warn("EDITOR is not set, skipping --edit");
        return Ok(());
    };

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        reporter.warn(format!("Editor '{}' exited with {}", editor, status));
    }
    Ok(())
}
