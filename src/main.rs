use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use blockpad::app::App;
use blockpad::config::{self, Config, ProviderType};
use blockpad::error::BlockpadError;
use blockpad::storage::DocumentStore;
use blockpad::suggest::{self, SuggestionProvider};

const LOG_ENV: &str = "BLOCKPAD_LOG";
const LOG_FILE: &str = "blockpad.log";

/// Block-based terminal editor with inline ghost-text suggestions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Document file (default: ~/.config/blockpad/document.json)
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Suggestion provider, overriding the config file
    #[arg(long, value_enum)]
    provider: Option<ProviderType>,

    /// Disable ghost-text suggestions
    #[arg(long)]
    no_suggest: bool,

    /// Print the saved document JSON and exit
    #[arg(long, conflicts_with = "clear")]
    dump: bool,

    /// Delete the saved document and exit
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    let args = Args::parse();
    init_logging();

    let config_result = config::load_config();
    let mut config = config_result.config;
    if let Some(provider) = args.provider {
        config.suggest.provider = provider;
    }
    if args.no_suggest {
        config.suggest.enabled = false;
    }

    let store = DocumentStore::new(document_path(&args, &config)?);

    if args.dump {
        dump(&store, &mut std::io::stdout().lock())?;
        return Ok(());
    }
    if args.clear {
        clear(&store, &mut std::io::stdout().lock())?;
        return Ok(());
    }

    let document = store.load();
    let mut app = App::new(document, &config, Some(store));
    if let Some(warning) = config_result.warning {
        app.notification.show_warning(warning, Instant::now());
    }

    let worker = if config.suggest.enabled {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();
        let provider = SuggestionProvider::from_config(&config.suggest);
        let handle = suggest::spawn_worker(provider, request_rx, response_tx);
        app.connect_suggestions(request_tx, response_rx);
        Some(handle)
    } else {
        None
    };

    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture, EnableBracketedPaste)?;

    let result = run(terminal, &mut app);

    // Dropping the overlay's channels lets the worker exit
    app.shutdown();
    let _ = execute!(std::io::stdout(), DisableMouseCapture, DisableBracketedPaste);
    ratatui::restore();

    if let Some(handle) = worker
        && handle.join().is_err()
    {
        log::error!("Suggestion worker panicked");
    }

    result
}

fn run(mut terminal: DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame, Instant::now()))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            let event = event::read()?;
            app.handle_event(event, Instant::now());
        }
        app.tick(Instant::now());

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

fn document_path(args: &Args, config: &Config) -> Result<PathBuf, BlockpadError> {
    args.file
        .clone()
        .or_else(|| config.editor.document_path.clone())
        .or_else(DocumentStore::default_location)
        .ok_or(BlockpadError::NoDocumentPath)
}

fn dump(store: &DocumentStore, out: &mut impl Write) -> Result<(), BlockpadError> {
    let raw = store
        .load_raw()?
        .ok_or_else(|| BlockpadError::NothingSaved(store.path().to_path_buf()))?;
    writeln!(out, "{}", raw.trim_end())?;
    Ok(())
}

fn clear(store: &DocumentStore, out: &mut impl Write) -> Result<(), BlockpadError> {
    if store.clear()? {
        writeln!(out, "Removed {}", store.path().display())?;
    } else {
        writeln!(out, "Nothing saved at {}", store.path().display())?;
    }
    Ok(())
}

/// Log to `~/.config/blockpad/blockpad.log`; stderr belongs to the TUI
fn init_logging() {
    let Some(dir) = config::config_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::io;

    use tempfile::TempDir;

    use super::*;
    use blockpad::document::Document;

    /// Writer whose reader went away, like stdout piped into `head`
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn saved_store(dir: &TempDir) -> DocumentStore {
        let store = DocumentStore::new(dir.path().join("document.json"));
        store.save(&Document::welcome()).unwrap();
        store
    }

    #[test]
    fn test_dump_writes_saved_json() {
        let dir = TempDir::new().unwrap();
        let store = saved_store(&dir);
        let mut out = Vec::new();
        dump(&store, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\"blocks\""));
        assert!(printed.ends_with('\n'));
    }

    #[test]
    fn test_dump_reports_closed_output() {
        let dir = TempDir::new().unwrap();
        let store = saved_store(&dir);
        let err = dump(&store, &mut ClosedPipe).unwrap_err();
        assert!(matches!(err, BlockpadError::Io(_)));
    }

    #[test]
    fn test_clear_reports_closed_output() {
        let dir = TempDir::new().unwrap();
        let store = saved_store(&dir);
        let err = clear(&store, &mut ClosedPipe).unwrap_err();
        assert!(matches!(err, BlockpadError::Io(_)));
        assert!(!store.path().exists());
    }
}
