//! Search listing decoder

use crate::extract::{attr_of, parse_int, select_all, select_within};
use crate::policy::Operation;
use crate::transport::{Endpoint, FormFields, Transport};
use crate::Result;
use scraper::Html;
use serde::Serialize;
use std::hash::{Hash, Hasher};

const RESULT_ROWS: &str = ".tbl3 > tbody > tr";

/// Cells in a well-formed result row
const RESULT_COLUMNS: usize = 8;

/// A movie title with its KOBIS code
///
/// Identity is the title alone: two values with the same title and different
/// codes are equal and hash the same.
#[derive(Debug, Clone, Serialize)]
pub struct MovieCode {
    pub title: String,
    pub code: u32,
}

impl MovieCode {
    pub fn new(title: impl Into<String>, code: u32) -> Self {
        Self {
            title: title.into(),
            code,
        }
    }
}

impl PartialEq for MovieCode {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for MovieCode {}

impl Hash for MovieCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
    }
}

/// Movie codes listed on a search result page
///
/// Only rows with exactly eight cells are results; header, footer and
/// "no results" rows have a different shape and are skipped.
pub fn parse_search_results(html: &str) -> Result<Vec<MovieCode>> {
    let document = Html::parse_document(html);
    let mut movies = Vec::new();

    for row in select_all(&document, RESULT_ROWS)? {
        let cells = select_within(row, "td")?;
        if cells.len() != RESULT_COLUMNS {
            continue;
        }

        let title = attr_of(cells[0], "title");
        let code = parse_int(cells[RESULT_COLUMNS - 1], "movie code")?;
        movies.push(MovieCode { title, code });
    }

    Ok(movies)
}

/// Searches movies by opening year range, one result page at a time
///
/// Best-effort: when the site cannot be reached the result is empty.
pub async fn search_movies(
    transport: &Transport,
    open_start_year: i32,
    open_end_year: i32,
    page: u32,
) -> Result<Vec<MovieCode>> {
    let result = fetch_search_page(transport, open_start_year, open_end_year, page).await;
    Operation::SearchMovies.settle(result)
}

async fn fetch_search_page(
    transport: &Transport,
    open_start_year: i32,
    open_end_year: i32,
    page: u32,
) -> Result<Vec<MovieCode>> {
    tracing::debug!(
        "Searching movies opened {}~{}, page {}",
        open_start_year,
        open_end_year,
        page
    );
    let body = transport
        .post(
            Endpoint::Search,
            &FormFields::search(open_start_year, open_end_year, page),
        )
        .await?;
    parse_search_results(&body)
}
