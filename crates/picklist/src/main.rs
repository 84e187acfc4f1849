use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::info;

use picklist::app::engine::PickListEngine;
use picklist::app::session::SessionStore;
use picklist::infra::config::Config;
use picklist::ui::console::Console;

#[derive(Parser)]
#[command(
    name = "picklist",
    version,
    about = "Load a scanned pick-list and check off its lines in order",
    long_about = None
)]
struct Cli {
    /// Directory holding `.picklist/` config and session state.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log engine decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed scans to the engine; reads one scan per stdin line when none are given
    Scan { texts: Vec<String> },
    /// Load a pick-list regardless of its length
    Load { text: String },
    /// Show the current instruction and progress
    Status,
    /// Step back over the most recent pick
    Undo,
    /// Forget the active pick-list
    Reset,
    /// Print shell completions
    Completions { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    picklist::init(cli.verbose);

    let store = SessionStore::new(&cli.root);
    match cli.command {
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "picklist", &mut io::stdout());
            Ok(())
        }
        Commands::Reset => {
            if store.clear()? {
                info!(path = %store.path().display(), "cleared session");
            }
            let config = Config::load(&cli.root)?;
            print_view(&PickListEngine::new(&config))
        }
        command => run(command, &cli.root, &store),
    }
}

fn run(command: Commands, root: &std::path::Path, store: &SessionStore) -> Result<()> {
    let config = Config::load(root)?;
    let mut engine = PickListEngine::new(&config);
    if let Some(snapshot) = store.load()? {
        engine.restore(&snapshot).with_context(|| {
            format!(
                "session in {} does not fit its pick-list; run `picklist reset`",
                store.path().display()
            )
        })?;
    }

    match command {
        Commands::Scan { texts } if texts.is_empty() => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read scan from stdin")?;
                let scan = line.trim_end_matches('\r');
                if scan.is_empty() {
                    continue;
                }
                engine.handle_scan(scan);
                print_view(&engine)?;
            }
        }
        Commands::Scan { texts } => {
            for text in &texts {
                engine.handle_scan(text);
                print_view(&engine)?;
            }
        }
        Commands::Load { text } => {
            engine.load(&text);
            print_view(&engine)?;
        }
        Commands::Undo => {
            engine.undo().context("nothing to undo")?;
            print_view(&engine)?;
        }
        Commands::Status | Commands::Reset | Commands::Completions { .. } => {
            print_view(&engine)?;
        }
    }

    store.save(&engine.snapshot())
}

fn print_view(engine: &PickListEngine) -> Result<()> {
    let rendered = Console::new().render(&engine.view());
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}\n").context("failed to write to stdout")?;
    Ok(())
}
