//! Daily box-office index
//!
//! A [`BoxOffice`] is built from one request covering a date range and then
//! answers per-date queries from memory. There is no refresh; build a new
//! index to re-scrape.

mod parser;

pub use parser::{align_blocks, parse_daily_box_office, parse_heading_date, parse_ranking_table};

use crate::transport::{Endpoint, FormFields, Transport};
use crate::{KobisError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One ranked movie on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxOfficeEntry {
    /// Box-office rank, starting at 1
    pub rank: u32,

    /// Movie title
    pub title: String,

    /// KOBIS movie code
    pub code: u32,

    /// Day the ranking applies to
    pub date: NaiveDate,
}

/// Box-office rankings keyed by date
///
/// Keys are exactly the dates the site returned ranking blocks for.
#[derive(Debug, Clone)]
pub struct BoxOffice {
    start: NaiveDate,
    end: NaiveDate,
    index: BTreeMap<NaiveDate, Vec<BoxOfficeEntry>>,
}

impl BoxOffice {
    /// Scrapes the daily box office between `start` and `end`, inclusive
    ///
    /// Issues a single request and parses the whole response up front.
    pub async fn fetch(transport: &Transport, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        tracing::debug!("Fetching daily box office {} ~ {}", start, end);
        let body = transport
            .post(
                Endpoint::DailyBoxOffice,
                &FormFields::daily_box_office(start, end),
            )
            .await?;

        let box_office = Self::from_html(&body, start, end)?;
        tracing::info!(
            "Scraped box office for {} day(s) between {} and {}",
            box_office.len(),
            start,
            end
        );
        Ok(box_office)
    }

    /// Builds the index from an already fetched ranking page
    pub fn from_html(html: &str, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let index = parse_daily_box_office(html)?;
        Ok(Self { start, end, index })
    }

    /// Rankings for `date`, in rank order
    ///
    /// # Errors
    ///
    /// `KobisError::DateNotScraped` if the response had no block for `date`.
    pub fn get_by_date(&self, date: NaiveDate) -> Result<&[BoxOfficeEntry]> {
        self.index
            .get(&date)
            .map(Vec::as_slice)
            .ok_or(KobisError::DateNotScraped(date))
    }

    /// Scraped dates, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.index.keys().copied()
    }

    /// The requested `(start, end)` range
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Number of scraped dates
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
