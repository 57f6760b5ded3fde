use clap::Parser;
use std::process;
use tracing::debug;
use watch_search::{
    ConfigError, Environment, HistoryConfig, ProgressEvent, TraktProvider, WatchSearchError,
    WatchedTitleSet, fetch_watched_titles, init_tracing,
};

/// Check your Trakt watch history
#[derive(Debug, Parser)]
#[command(name = "watched", version, about)]
struct Cli {
    /// Show all watched movies and series (the default)
    #[arg(short, long)]
    all: bool,

    /// Check whether a specific title has been watched
    #[arg(short, long)]
    query: Option<String>,

    /// Print diagnostics to stderr
    #[arg(short, long)]
    debug: bool,
}

fn handle_progress_event(event: ProgressEvent) {
    if let ProgressEvent::HistoryPageProcessed { page, entries } = event {
        debug!("Processed page {} with {} entries", page, entries);
    }
}

/// Lines printed in list mode
fn list_lines(watched: &WatchedTitleSet) -> Vec<String> {
    let mut lines = vec!["\n🎬 Watched (Movies & Series):".to_string()];
    lines.extend(
        watched
            .sorted_titles()
            .into_iter()
            .map(|title| format!("• {}", title)),
    );
    lines
}

/// Lines printed in query mode
///
/// Matches are only listed when the query hits more than one title.
fn check_lines(watched: &WatchedTitleSet, query: &str) -> Vec<String> {
    let matches = watched.check_title(query);
    debug!("Query: '{}', matches: {:?}", query, matches);

    if matches.is_empty() {
        return vec![format!("❌ '{}' not watched yet.", query)];
    }

    let mut lines = vec![format!("✅ '{}' watched!", query)];
    if matches.len() > 1 {
        lines.push("Matches found:".to_string());
        lines.extend(matches.into_iter().map(|title| format!("• {}", title)));
    }
    lines
}

/// Loads the history and renders the requested mode
fn run(cli: &Cli) -> Result<Vec<String>, WatchSearchError> {
    let env = Environment::load()?;
    let config = HistoryConfig::assemble(cli.query.clone(), &env)?;

    let provider = TraktProvider::new(&config.trakt);
    let watched = fetch_watched_titles(&provider, handle_progress_event)?;

    if cli.all && config.query.is_some() {
        debug!("--all ignored, a query was given");
    }
    Ok(match &config.query {
        Some(query) => check_lines(&watched, query),
        None => list_lines(&watched),
    })
}

/// Message printed for a failed run
fn error_lines(error: &WatchSearchError) -> Vec<String> {
    match error {
        WatchSearchError::Config(ConfigError::MissingVariables(names)) => vec![
            format!("❌ Error: Missing Trakt API credentials ({})", names.join(", ")),
            "Please set the TRAKT_ACCESS_TOKEN and TRAKT_CLIENT_ID environment variables"
                .to_string(),
        ],
        _ => vec![format!("❌ Error: {}", error)],
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    debug!("Debug mode enabled");

    match run(&cli) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            for line in error_lines(&e) {
                eprintln!("{}", line);
            }
            process::exit(1);
        }
    }
}
