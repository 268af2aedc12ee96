//! Entity decoders
//!
//! Per-movie extraction routines:
//! - Synopsis, main poster and image URLs, read from the cached detail popup
//! - Actor list, decoded from the JSON endpoint
//! - Movie code listings from the search endpoint
//!
//! Each decoder pairs a pure parse function (testable on fixture markup)
//! with an async wrapper that performs the request.

mod actors;
mod detail;
mod search;

pub use actors::{actor_list, parse_actor_list, ActorEntry, RoleType};
pub use detail::{
    image_urls, main_poster, parse_image_sources, parse_main_poster, parse_synopsis,
    rewrite_image_path, synopsis, ImageKind, SYNOPSIS_LABEL,
};
pub use search::{parse_search_results, search_movies, MovieCode};
