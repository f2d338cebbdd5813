use assetsweep::analysis::Analyzer;
use assetsweep::config::Config;
use assetsweep::report::{TerminalSummary, DEFAULT_TOP};
use assetsweep::util::resolve_report_path;
use assetsweep::watch::FileWatcher;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// assetsweep - Find unreferenced assets and analyze asset sizes in Cocos Creator projects
#[derive(Parser, Debug)]
#[command(name = "assetsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path patterns to skip while walking (can be specified multiple times)
    #[arg(short = 'x', long, global = true)]
    exclude: Vec<String>,

    /// Name of the dynamic-load directory (default: resources)
    #[arg(long, global = true, value_name = "NAME")]
    resources_dir: Option<String>,

    /// Process files in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// Number of entries listed per section in the console summary
    #[arg(long, global = true, default_value_t = DEFAULT_TOP)]
    top: usize,

    /// Watch mode - re-run the analysis whenever files change
    #[arg(long, global = true)]
    watch: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Find unused assets
    Clean {
        /// The assets directory of the Cocos Creator project
        source_dir: PathBuf,

        /// The output file for the report
        dest_file: PathBuf,

        /// Delete unused assets (not supported yet; only reported)
        #[arg(short, long)]
        delete: bool,

        /// Regex for asset paths that must never be reported as unused
        #[arg(short, long, value_name = "REGEX")]
        excludes: Option<String>,
    },

    /// Analyze asset sizes by file extension
    Size {
        /// The directory to analyze
        source_dir: PathBuf,

        /// The output file for the report
        dest_file: PathBuf,
    },
}

impl Command {
    fn source_dir(&self) -> &Path {
        match self {
            Command::Clean { source_dir, .. } | Command::Size { source_dir, .. } => source_dir,
        }
    }

    fn dest_file(&self) -> &Path {
        match self {
            Command::Clean { dest_file, .. } | Command::Size { dest_file, .. } => dest_file,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("assetsweep v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    if cli.watch {
        run_watch_mode(&config, &cli)
    } else {
        run_command(&config, &cli.command, cli.top, cli.quiet)
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(cli.command.source_dir())?
    };

    // Override with CLI arguments
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if let Some(dir) = &cli.resources_dir {
        config.resources_dir = dir.clone();
    }
    if cli.parallel {
        config.parallel = true;
    }

    Ok(config)
}

fn run_watch_mode(config: &Config, cli: &Cli) -> Result<()> {
    let dest = resolve_report_path(cli.command.dest_file()).into_diagnostic()?;
    let root = std::fs::canonicalize(cli.command.source_dir()).into_diagnostic()?;
    let watcher = FileWatcher::new(&root, config).ignoring(dest);

    let command = cli.command.clone();
    let quiet = cli.quiet;
    let top = cli.top;

    watcher
        .watch(&root, move || {
            match run_command(config, &command, top, quiet) {
                Ok(()) => {
                    println!();
                    println!("{}", "✓ Analysis complete. Waiting for changes...".green());
                }
                Err(e) => {
                    eprintln!("{}: {}", "Analysis error".red(), e);
                }
            }
            true
        })
        .map_err(|e| miette::miette!("Watch error: {}", e))
}

fn run_command(config: &Config, command: &Command, top: usize, quiet: bool) -> Result<()> {
    let start_time = Instant::now();
    let analyzer = Analyzer::new(config);
    let summary = TerminalSummary::new().with_top(top);
    let spinner = spinner(quiet, command);

    let outcome = match command {
        Command::Clean {
            source_dir,
            dest_file,
            delete,
            excludes,
        } => analyzer
            .analyze_unused(source_dir, dest_file, *delete, excludes.as_deref())
            .map(|report| {
                spinner.finish_and_clear();
                if !quiet {
                    summary.print_unused(&report, dest_file);
                }
            }),
        Command::Size {
            source_dir,
            dest_file,
        } => analyzer.analyze_size(source_dir, dest_file).map(|report| {
            spinner.finish_and_clear();
            if !quiet {
                summary.print_size(&report, dest_file);
            }
        }),
    };
    spinner.finish_and_clear();
    outcome.into_diagnostic()?;

    let elapsed = start_time.elapsed();
    if !quiet {
        println!(
            "{}",
            format!("⏱  Finished in {:.2}s", elapsed.as_secs_f64()).dimmed()
        );
    }
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

fn spinner(quiet: bool, command: &Command) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Scanning {}...", command.source_dir().display()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
