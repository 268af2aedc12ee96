//! Markup extraction helpers
//!
//! Thin layer over `scraper` that every decoder composes. Selection helpers
//! that return a single element fail with `KobisError::MalformedPage` when
//! the element is structurally absent, so a changed page layout is reported
//! instead of silently producing empty data.

use crate::{KobisError, Result};
use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| KobisError::malformed(css, format!("invalid selector: {:?}", e)))
}

/// All elements under `document` matching `css`, in document order
pub fn select_all<'a>(document: &'a Html, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(document.select(&selector).collect())
}

/// All descendants of `element` matching `css`, in document order
pub fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(element.select(&selector).collect())
}

/// First element under `document` matching `css`, if any
pub fn select_first<'a>(document: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(document.select(&selector).next())
}

/// First descendant of `element` matching `css`, if any
pub fn select_first_within<'a>(element: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(element.select(&selector).next())
}

/// First element under `document` matching `css`, or `MalformedPage`
pub fn require_first<'a>(document: &'a Html, css: &str) -> Result<ElementRef<'a>> {
    select_first(document, css)?
        .ok_or_else(|| KobisError::malformed(css, "required element is missing"))
}

/// First descendant of `element` matching `css`, or `MalformedPage`
pub fn require_first_within<'a>(element: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    select_first_within(element, css)?
        .ok_or_else(|| KobisError::malformed(css, "required element is missing"))
}

/// The `index`th element of a selection, or `MalformedPage`
pub fn nth<'a>(elements: &[ElementRef<'a>], index: usize, css: &str) -> Result<ElementRef<'a>> {
    elements.get(index).copied().ok_or_else(|| {
        KobisError::malformed(
            css,
            format!("expected at least {} elements, found {}", index + 1, elements.len()),
        )
    })
}

/// Rendered text of an element
///
/// Whitespace runs collapse to one space and the result is trimmed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Value of a named attribute; an absent attribute reads as empty
pub fn attr_of(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

/// Parses the text of an element as an integer
pub fn parse_int<T: std::str::FromStr>(element: ElementRef<'_>, context: &str) -> Result<T> {
    let text = text_of(element);
    text.parse::<T>()
        .map_err(|_| KobisError::malformed(context, format!("'{}' is not an integer", text)))
}

/// Extracts the movie code embedded in a click handler
///
/// Handlers look like `mstView('movie','20226254');return false;`; the code
/// is the text between the first `','` and the following `');`.
pub fn code_from_onclick(onclick: &str) -> Result<u32> {
    let raw = onclick
        .split_once("','")
        .and_then(|(_, rest)| rest.split_once("');"))
        .map(|(code, _)| code)
        .ok_or_else(|| {
            KobisError::malformed("onclick", format!("no embedded code in '{}'", onclick))
        })?;

    raw.trim()
        .parse()
        .map_err(|_| KobisError::malformed("onclick", format!("'{}' is not a movie code", raw)))
}
