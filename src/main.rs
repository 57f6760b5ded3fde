use clap::Parser;
use std::process;
use tracing::{debug, warn};
use watch_search::{
    ConfigError, Environment, MediaSelection, MediaType, ProgressEvent, SearchConfig,
    SearchOptions, TmdbProvider, TraktProvider, WatchedTitleSet, closing_lines, colors,
    fetch_watched_titles, filtered_note, format_result, init_tracing, load_genres,
    search_catalog, section_header, unwatched_note,
};

/// Search movies and TV series by title or synopsis
#[derive(Debug, Parser)]
#[command(name = "watch-search", version, about)]
struct Cli {
    /// Search query; multiple words are joined by a space
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Search only movies
    #[arg(short, long, conflicts_with = "series_only")]
    movies_only: bool,

    /// Search only TV series
    #[arg(short, long)]
    series_only: bool,

    /// Only show titles released (or first aired) in this year
    #[arg(short, long)]
    year: Option<i32>,

    /// Maximum number of results per media type
    #[arg(short, long, default_value_t = watch_search::DEFAULT_LIMIT)]
    limit: usize,

    /// Hide titles already in your Trakt watch history
    #[arg(short, long)]
    not_watched: bool,

    /// Synopsis characters to show (0 shows the full text)
    #[arg(short = 'd', long, default_value_t = watch_search::DEFAULT_SYNOPSIS_LENGTH)]
    desc_length: usize,

    /// Print diagnostics to stderr
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            query: self.query.join(" "),
            media: MediaSelection {
                movies: !self.series_only,
                series: !self.movies_only,
            },
            year: self.year,
            limit: self.limit,
            not_watched: self.not_watched,
            synopsis_length: self.desc_length,
        }
    }
}

/// Turns progress events into debug diagnostics
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::FetchingCandidates { media_type, query } => {
            debug!("Fetching {} candidates for '{}'", media_type, query);
        }
        ProgressEvent::SourceFetched {
            media_type,
            source,
            count,
        } => {
            debug!("{} {}: {} item(s)", media_type, source, count);
        }
        ProgressEvent::SourceFailed {
            media_type,
            source,
            error,
        } => {
            debug!("{} {} failed: {}", media_type, source, error);
        }
        ProgressEvent::CandidatesMerged { media_type, count } => {
            debug!("{} unique {} candidate(s)", count, media_type);
        }
        ProgressEvent::CandidatesRanked {
            media_type,
            matches,
        } => {
            debug!("{} {} candidate(s) match the query", matches, media_type);
        }
        ProgressEvent::DescriptionMatched {
            media_type,
            title,
            overlap,
            words,
            context,
        } => match context {
            Some(context) => {
                debug!("Found {} match in description: {} (direct match)", media_type, title);
                debug!("Match context: ...{}...", context);
            }
            None => debug!(
                "Found {} match in description: {} (word match {}/{} words)",
                media_type, title, overlap, words
            ),
        },
        ProgressEvent::WatchedTitleFiltered { media_type, title } => {
            debug!("Filtered watched {}: {}", media_type, title);
        }
        ProgressEvent::GenresUnavailable { media_type, error } => {
            debug!("Could not load {} genres: {}", media_type, error);
        }
        ProgressEvent::HistoryPageProcessed { page, entries } => {
            debug!("History page {}: {} entries", page, entries);
        }
    }
}

/// Prints a configuration error with setup hints and exits
fn exit_with_config_error(error: ConfigError) -> ! {
    match &error {
        ConfigError::MissingVariables(names) => {
            for name in names {
                eprintln!(
                    "{}Error: {} environment variable not set.{}",
                    colors::RED,
                    name,
                    colors::END
                );
            }
            for name in names {
                eprintln!("Please set it with: export {}=your_value", name);
            }
        }
        _ => eprintln!("{}Error: {}{}", colors::RED, error, colors::END),
    }
    process::exit(1);
}

/// Loads the watch history, or None when it cannot be retrieved
fn load_watched(config: &SearchConfig) -> Option<WatchedTitleSet> {
    let credentials = config.trakt.as_ref()?;
    let provider = TraktProvider::new(credentials);

    match fetch_watched_titles(&provider, handle_progress_event) {
        Ok(watched) => {
            debug!("Loaded {} watched title(s)", watched.len());
            Some(watched)
        }
        Err(e) => {
            warn!("History retrieval failed: {}", e);
            eprintln!("{}Error loading watched titles: {}{}", colors::RED, e, colors::END);
            eprintln!("Continuing without watched filtering");
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    debug!("Debug mode enabled");

    let config = Environment::load()
        .and_then(|env| SearchConfig::assemble(cli.search_options(), &env))
        .unwrap_or_else(|e| exit_with_config_error(e));
    let options = &config.options;

    let provider = TmdbProvider::new(config.tmdb.api_key.as_str());
    let watched = load_watched(&config);

    let media_types = MediaType::ALL.into_iter().filter(|media_type| match media_type {
        MediaType::Movie => options.media.movies,
        MediaType::Series => options.media.series,
    });

    let mut all_results = Vec::new();

    for media_type in media_types {
        println!("{}", section_header(media_type, &options.query));
        if watched.is_some() {
            println!("{}", unwatched_note());
        }

        let genres = load_genres(&provider, media_type, handle_progress_event);
        let media_results = search_catalog(
            &provider,
            options,
            media_type,
            watched.as_ref(),
            handle_progress_event,
        );

        for result in &media_results.results.shown {
            println!("{}", format_result(result, &genres));
        }

        let filtered_count = media_results.results.filtered_count();
        if filtered_count > 0 {
            println!("{}", filtered_note(media_type, filtered_count));
        }

        all_results.push(media_results);
    }

    for line in closing_lines(options, &all_results, watched.is_some()) {
        println!("{}", line);
    }
}
