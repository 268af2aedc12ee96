//! Daily box-office page parser
//!
//! The ranking page holds one `<h4>` heading and one `<table>` per day under
//! `.rst_sch > div`. Headings and tables are paired by position only: the
//! Nth heading dates the Nth table. That pairing lives in [`align_blocks`].

use crate::boxoffice::BoxOfficeEntry;
use crate::extract::{
    attr_of, code_from_onclick, nth, parse_int, require_first_within, select_all, select_within,
    text_of,
};
use crate::{KobisError, Result};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

const TABLES: &str = ".rst_sch > div > table";
const HEADINGS: &str = ".rst_sch > div > h4";

/// Heading format once the weekday suffix is removed
const HEADING_DATE_FORMAT: &str = "%Y년 %m월 %d일";

/// Length in characters of the weekday suffix, e.g. `(수)`
const WEEKDAY_SUFFIX_CHARS: usize = 3;

/// Parses a full ranking page into a date-keyed index
pub fn parse_daily_box_office(html: &str) -> Result<BTreeMap<NaiveDate, Vec<BoxOfficeEntry>>> {
    let document = Html::parse_document(html);

    let dates = select_all(&document, HEADINGS)?
        .into_iter()
        .map(|heading| parse_heading_date(&text_of(heading)))
        .collect::<Result<Vec<_>>>()?;
    let tables = select_all(&document, TABLES)?;

    let mut index = BTreeMap::new();
    for (date, table) in align_blocks(dates, tables)? {
        let entries = parse_ranking_table(table, date)?;
        tracing::debug!("{}: {} ranked movies", date, entries.len());
        index.insert(date, entries);
    }
    Ok(index)
}

/// Pairs the Nth heading date with the Nth table
///
/// A table without a heading means the layout changed and is an error.
/// Headings beyond the last table are ignored.
pub fn align_blocks<T>(dates: Vec<NaiveDate>, tables: Vec<T>) -> Result<Vec<(NaiveDate, T)>> {
    if dates.len() < tables.len() {
        return Err(KobisError::malformed(
            HEADINGS,
            format!(
                "{} ranking tables but only {} date headings",
                tables.len(),
                dates.len()
            ),
        ));
    }
    if dates.len() > tables.len() {
        tracing::warn!(
            "{} date headings but {} ranking tables; ignoring the extra headings",
            dates.len(),
            tables.len()
        );
    }

    Ok(dates.into_iter().zip(tables).collect())
}

/// Parses a heading such as `2022년 11월 16일(수)` into its date
pub fn parse_heading_date(heading: &str) -> Result<NaiveDate> {
    let heading = heading.trim();
    let chars = heading.chars().count();
    if chars <= WEEKDAY_SUFFIX_CHARS {
        return Err(KobisError::malformed(
            HEADINGS,
            format!("heading '{}' is too short to hold a date", heading),
        ));
    }

    let date_part: String = heading.chars().take(chars - WEEKDAY_SUFFIX_CHARS).collect();
    NaiveDate::parse_from_str(date_part.trim(), HEADING_DATE_FORMAT).map_err(|e| {
        KobisError::malformed(HEADINGS, format!("cannot parse date from '{}': {}", heading, e))
    })
}

/// Parses every row of one day's ranking table
///
/// Row layout: rank in the first cell, then an anchor whose `title` is the
/// movie title and whose click handler embeds the movie code.
pub fn parse_ranking_table(table: ElementRef<'_>, date: NaiveDate) -> Result<Vec<BoxOfficeEntry>> {
    let tbody = require_first_within(table, "tbody")?;

    select_within(tbody, "tr")?
        .into_iter()
        .map(|row| -> Result<BoxOfficeEntry> {
            let cols = select_within(row, "td")?;
            let rank = parse_int(nth(&cols, 0, "td")?, "rank")?;
            let anchor = require_first_within(nth(&cols, 1, "td")?, "a")?;
            let code = code_from_onclick(&attr_of(anchor, "onclick"))?;

            Ok(BoxOfficeEntry {
                rank,
                title: attr_of(anchor, "title"),
                code,
                date,
            })
        })
        .collect()
}
