//! Binary entry point that glues the read-only verse store to the TUI and to
//! the plain-text print commands.
//!
//! ```bash
//! koine-reader --db bible.db --book JHN --chapter 1
//! koine-reader --db bible.db verse JHN 1 1
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use koine_reader::config::{resolve_db_path, Settings};
use koine_reader::models::VERSE_NOT_FOUND;
use koine_reader::ui::{insight_lines, word_study_lines, ChapterView};
use koine_reader::{
    fetch_chapter, fetch_verse_details, run_app, App, EventHandler, OsisCode, Store, VerseKey,
};

/// Terminal reader for the Greek New Testament with interlinear lexicon data
#[derive(Parser, Debug)]
#[command(name = "koine-reader", version, about, long_about = None)]
struct Cli {
    /// Path to the bundled verse database
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    /// Log file for the interactive reader
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Book to open first (OSIS code, e.g. JHN)
    #[arg(long)]
    book: Option<OsisCode>,

    /// Chapter to open first
    #[arg(long)]
    chapter: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every verse of a chapter
    Chapter { book: OsisCode, chapter: u32 },
    /// Print the Greek line, text, word study and insights of one verse
    Verse {
        book: OsisCode,
        chapter: u32,
        verse: u32,
    },
    /// List the supported books
    Books,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let settings = Settings::resolve(cli.db, cli.log, cli.book, cli.chapter)?;
            init_file_logging(&settings)?;
            let store = Store::open_read_only(&settings.db_path)?;
            let mut events = EventHandler::new();
            let view = ChapterView::new(settings.start_book, settings.start_chapter);
            let mut app = App::new(store, view, events.sender());
            run_app(&mut app, &mut events).await
        }
        Some(Command::Books) => {
            for book in OsisCode::all() {
                println!("{:<4} {}", book.as_str(), book.display_name());
            }
            Ok(())
        }
        Some(Command::Chapter { book, chapter }) => {
            init_stderr_logging();
            let store = Store::open_read_only(&resolve_db_path(cli.db)?)?;
            print_chapter(&store, book, chapter)
        }
        Some(Command::Verse {
            book,
            chapter,
            verse,
        }) => {
            init_stderr_logging();
            let store = Store::open_read_only(&resolve_db_path(cli.db)?)?;
            print_verse(&store, VerseKey::new(book, chapter, verse))
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// The reader owns the terminal, so its logs go to a file instead.
fn init_file_logging(settings: &Settings) -> Result<()> {
    if let Some(parent) = settings.log_path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_path)
        .with_context(|| format!("failed to open log file {}", settings.log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn print_chapter(store: &Store, book: OsisCode, chapter: u32) -> Result<()> {
    let verses = store
        .read_blocking(|conn| fetch_chapter(conn, book, chapter))
        .context("failed to load chapter")?;

    println!("{} {}", book.display_name(), chapter);
    if verses.is_empty() {
        println!("No verses stored for this chapter.");
    }
    for verse in verses {
        println!("{:>3} {}", verse.verse, verse.text);
    }
    Ok(())
}

fn print_verse(store: &Store, key: VerseKey) -> Result<()> {
    let details = store
        .read_blocking(|conn| fetch_verse_details(conn, key))
        .context("failed to load verse")?;

    println!("{}", key.title());
    let Some(details) = details else {
        println!("{VERSE_NOT_FOUND}");
        return Ok(());
    };

    println!("{}", details.greek_line());
    println!("{}", details.verse.text);
    let sections = [
        ("Word study", word_study_lines(&details)),
        ("Insights", insight_lines(&details)),
    ];
    for (heading, lines) in sections {
        println!();
        println!("{heading}");
        for line in lines {
            println!("  {line}");
        }
    }
    Ok(())
}
