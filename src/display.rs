//! Console formatting for search results
//!
//! Everything here returns strings; printing is left to the binaries.

use crate::MediaResults;
use crate::aggregator::SearchResult;
use crate::config::SearchOptions;
use crate::metadata_retrieval::{GenreTable, MediaType};
use crate::relevance::MatchKind;

/// ANSI color and style codes
pub mod colors {
    pub const PURPLE: &str = "\x1b[95m";
    pub const CYAN: &str = "\x1b[96m";
    pub const GREEN: &str = "\x1b[92m";
    pub const YELLOW: &str = "\x1b[93m";
    pub const RED: &str = "\x1b[91m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const UNDERLINE: &str = "\x1b[4m";
    pub const END: &str = "\x1b[0m";
}

use colors::*;

/// Placeholder shown for items without a release date
const UNKNOWN_DATE: &str = "Unknown date";

/// Header line printed above the results of one media type
pub fn section_header(media_type: MediaType, query: &str) -> String {
    let (icon, label) = match media_type {
        MediaType::Movie => ("🎬", "Movie Results for:"),
        MediaType::Series => ("📺", "TV Series Results for:"),
    };
    format!("\n{icon} {BOLD}{GRAY}{label}{END} {UNDERLINE}{query}{END}")
}

/// Note printed under the header when watched titles are hidden
pub fn unwatched_note() -> String {
    format!("{CYAN}(showing only unwatched titles){END}")
}

/// Formats one result line
///
/// Description-only matches get a magnifier icon instead of the media icon.
pub fn format_result(result: &SearchResult, genres: &GenreTable) -> String {
    let media_type = result.item.media_type;
    let icon = match (result.kind, media_type) {
        (MatchKind::DescriptionOnly, _) => "🔍",
        (_, MediaType::Movie) => "📽️",
        (_, MediaType::Series) => "📺",
    };
    let title_color = match media_type {
        MediaType::Movie => YELLOW,
        MediaType::Series => GREEN,
    };
    let date = result.item.release_date.as_deref().unwrap_or(UNKNOWN_DATE);

    let genre_names = genres.names(&result.item.genre_ids);
    let genre_display = if genre_names.is_empty() {
        String::new()
    } else {
        format!(" {BOLD}[{PURPLE}{}{END}{BOLD}]{END}", genre_names.join(", "))
    };

    format!(
        "{icon} {BOLD}{title_color}{}{END} ({CYAN}{date}{END}){genre_display}: {}",
        result.title(),
        result.synopsis
    )
}

/// Summary printed after a media type's results when titles were hidden
pub fn filtered_note(media_type: MediaType, count: usize) -> String {
    format!(
        "\n{CYAN}Note: {count} already watched {} were filtered out.{END}",
        media_type.plural()
    )
}

/// Hint printed at the end of a run that hid watched titles
pub fn rerun_hint() -> String {
    format!("{CYAN}Use the search without -n/--not-watched flag to see all results.{END}")
}

/// Lines printed when no media type produced any result
///
/// Suggestions are tailored to the flags that narrowed the search.
pub fn no_results(options: &SearchOptions, filtering_watched: bool) -> Vec<String> {
    let mut lines = vec![
        format!(
            "\n{RED}No results found for query: '{}'{END}",
            options.query
        ),
        format!("\n{YELLOW}Suggestions:{END}"),
        "- Try using fewer or different keywords".to_string(),
        "- Check for typos in your search query".to_string(),
    ];

    if let Some(year) = options.year {
        lines.push(format!("- Try searching without the year filter (-y {})", year));
    }
    if !options.media.series {
        lines.push("- Try searching for TV series instead (remove -m flag)".to_string());
    }
    if !options.media.movies {
        lines.push("- Try searching for movies instead (remove -s flag)".to_string());
    }
    if filtering_watched {
        lines.push("- Try searching without the not-watched filter (remove -n flag)".to_string());
    }

    lines.push("\nFor more information, use: watch-search --help".to_string());
    lines
}

/// Lines printed once after all media types
///
/// When no enabled media type had any candidate, the no-results suggestions
/// are printed. Otherwise, if the watched filter hid anything, a hint to
/// rerun without it follows.
pub fn closing_lines(
    options: &SearchOptions,
    results: &[MediaResults],
    filtering_watched: bool,
) -> Vec<String> {
    if results.iter().all(|media| media.candidate_count == 0) {
        return no_results(options, filtering_watched);
    }

    let filtered: usize = results
        .iter()
        .map(|media| media.results.filtered_count())
        .sum();
    if filtered > 0 {
        vec![rerun_hint()]
    } else {
        Vec::new()
    }
}
