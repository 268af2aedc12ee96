//! Ordered form bodies
//!
//! The site rejects requests that omit fields, so every layout lists all of
//! its fields and unused ones are sent as empty strings.

use chrono::NaiveDate;

/// Ordered `application/x-www-form-urlencoded` fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(&'static str, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field with a value
    pub fn with(mut self, name: &'static str, value: impl ToString) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    /// Appends a field that is present but unused
    pub fn blank(self, name: &'static str) -> Self {
        self.with(name, "")
    }

    /// Value of a field, if it was added
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order
    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Search listing filtered by opening year range
    pub fn search(open_start_year: i32, open_end_year: i32, page: u32) -> Self {
        Self::new()
            .with("curPage", page)
            .blank("searchType")
            .blank("point")
            .blank("orderBy")
            .blank("auth")
            .with("ordering", "updDttmOrder")
            .blank("searchOpen")
            .blank("movieNm")
            .blank("movieCd")
            .blank("directorNm")
            .blank("prdtStartYear")
            .blank("prdtEndYear")
            .with("openStartDt", open_start_year)
            .with("openEndDt", open_end_year)
            .blank("repNationCd")
            .blank("showTypeStr")
    }

    /// Daily box office between two dates, inclusive
    pub fn daily_box_office(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new()
            .with("loadEnd", 0)
            .blank("sMultiMovieYn")
            .blank("sRepNationCd")
            .with("sSearchFrom", start.format("%Y-%m-%d"))
            .with("sSearchTo", end.format("%Y-%m-%d"))
            .blank("sWideAreaCd")
            .with("searchType", "search")
    }

    /// Detail popup for one movie
    pub fn movie_detail(code: u32) -> Self {
        Self::new()
            .with("code", code)
            .blank("sType")
            .with("titleYN", "Y")
            .blank("etcParam")
            .with("isOuterReq", "false")
    }

    /// Actor list for one movie
    pub fn actor_list(code: u32) -> Self {
        Self::new().with("movieCd", code)
    }
}
