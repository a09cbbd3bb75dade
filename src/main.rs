use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use libris::api::CatalogClient;
use libris::cache::CacheDb;
use libris::config::{self, Config};
use libris::logic::{formatting, sorting};
use libris::model::{Mirrors, ResultState, SortSpec};
use libris::services::{ConnectivityMonitor, Navigator, PagingController};

/// Latest books from a remote catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to the temp-dir log file
    #[arg(short, long)]
    debug: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    /// Initial sort, e.g. "default", "year desc", "size asc"
    #[arg(short, long, value_parser = parse_sort_arg)]
    sort: Option<SortSpec>,
}

fn parse_sort_arg(value: &str) -> Result<SortSpec, String> {
    sorting::parse_sort_spec(value)
        .ok_or_else(|| format!("unknown sort '{}' (try: default, year desc, size asc)", value))
}

/// Prints where a book would be opened
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn open_book(&self, id: u64, mirrors: Mirrors) {
        println!("Opening book {}", id);
        if mirrors.is_empty() {
            println!("  (no mirrors)");
        }
        for url in mirrors.urls() {
            println!("  mirror: {}", url);
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Next,
    Refresh,
    Sort(SortSpec),
    Open(u64),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match word.to_lowercase().as_str() {
        "" | "n" | "next" => Ok(Command::Next),
        "r" | "refresh" => Ok(Command::Refresh),
        "s" | "sort" => sorting::parse_sort_spec(rest)
            .map(Command::Sort)
            .ok_or_else(|| format!("unknown sort '{}'", rest.trim())),
        "o" | "open" => rest
            .trim()
            .parse()
            .map(Command::Open)
            .map_err(|_| format!("invalid book id '{}'", rest.trim())),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  next | <enter>     load the next page");
    println!("  refresh            reload from the first page");
    println!("  sort <spec>        default, year asc|desc, size asc|desc");
    println!("  open <id>          open a loaded book");
    println!("  quit");
}

fn print_state(state: &ResultState, controller: &PagingController) {
    if let ResultState::Success(books) = state {
        let more = if controller.can_load_more() {
            "more available"
        } else {
            "end of list"
        };
        println!(
            "--- {} books, sort: {}, {} ---",
            books.len(),
            controller.current_sort(),
            more
        );
    }
    for line in formatting::format_result_state(state) {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    libris::logging::init(args.debug)?;

    let config_path = config::get_config_path(args.config)?;
    info!(path = %config_path.display(), "loading config");
    let config = Config::load(&config_path)?;

    let client = Arc::new(CatalogClient::from_config(&config)?);
    let cache = CacheDb::new()?;

    let mut controller =
        PagingController::new(client.clone(), Box::new(cache), Arc::new(PrintNavigator));
    if let Some(spec) = args.sort {
        controller.set_sort(spec);
    }

    let monitor = ConnectivityMonitor::spawn(client, config.connectivity_check_interval());
    let mut connectivity = monitor.subscribe();
    let mut states = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_state(&states.borrow_and_update().clone(), &controller);

    loop {
        tokio::select! {
            Some(outcome) = controller.next_outcome() => {
                controller.apply_outcome(outcome);
            }

            Ok(()) = states.changed() => {
                let state = states.borrow_and_update().clone();
                if matches!(state, ResultState::ConnectionError) {
                    monitor.report_unreachable();
                }
                print_state(&state, &controller);
            }

            Ok(()) = connectivity.changed() => {
                if *connectivity.borrow_and_update() {
                    controller.on_connectivity_restored();
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Next) => controller.load_next_page(),
                    Ok(Command::Refresh) => controller.refresh(),
                    Ok(Command::Sort(spec)) => controller.set_sort(spec),
                    Ok(Command::Open(id)) => {
                        if !controller.open_book(id) {
                            println!("Book {} is not loaded", id);
                        }
                    }
                    Ok(Command::Help) => print_help(),
                    Ok(Command::Quit) => break,
                    Err(msg) => println!("{} (type 'help')", msg),
                }
            }
        }
    }

    Ok(())
}
