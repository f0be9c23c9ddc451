use clap::Parser;
use std::path::PathBuf;

use journalfs::shell::{LineOutcome, Shell};
use journalfs::{Dispatcher, StoreOptions};

#[derive(Parser)]
#[command(name = "journalfs")]
#[command(about = "An in-memory filesystem with snapshot + write-ahead-log persistence")]
#[command(version)]
struct Cli {
    /// Directory holding the snapshot and journal files
    #[arg(long = "data-dir", default_value = ".")]
    data_dir: PathBuf,

    /// Snapshot file path (overrides the data-dir default)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Journal file path (overrides the data-dir default)
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Execute a single command and exit
    #[arg(short = 'c')]
    command: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(&cli);

    let mut options = StoreOptions::in_dir(&cli.data_dir);
    if let Some(snapshot) = cli.snapshot {
        options.snapshot_path = snapshot;
    }
    if let Some(journal) = cli.journal {
        options.journal_path = journal;
    }

    let dispatcher = match Dispatcher::open(&options) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: cannot open store: {e}");
            std::process::exit(1);
        }
    };
    let mut shell = Shell::new(dispatcher);

    if let Some(command) = cli.command {
        match shell.exec_line(&command) {
            LineOutcome::Output(out) => {
                if !out.is_empty() {
                    println!("{out}");
                }
                if out.starts_with("error:") || out.starts_with("unknown command") {
                    std::process::exit(1);
                }
            }
            LineOutcome::Quit => {}
        }
        return;
    }

    if let Err(e) = shell.run_interactive() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn setup_tracing(cli: &Cli) {
    let level = match cli.log_level.as_str() {
        "off" => None,
        "error" => Some(tracing::Level::ERROR),
        "warn" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    };
    if let Some(level) = level {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .without_time()
            .compact()
            .init();
    }
}
