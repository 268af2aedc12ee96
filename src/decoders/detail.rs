//! Decoders reading the detail popup
//!
//! The popup is a sequence of `div.info2` info panels, each headed by a
//! `<strong>` label. Panel 0 holds the posters, panel 1 the still cuts, and
//! the panel labelled `시놉시스` holds the synopsis.

use crate::cache::{DetailCache, DetailDocument};
use crate::extract::{
    attr_of, nth, require_first, require_first_within, select_all, select_first_within,
    select_within, text_of,
};
use crate::{KobisError, Result};
use regex::Regex;
use scraper::Html;
use serde::Serialize;
use std::sync::OnceLock;

/// Label of the synopsis info panel
pub const SYNOPSIS_LABEL: &str = "시놉시스";

const INFO_PANELS: &str = "div.info2";
const MAIN_POSTER: &str = "a.fl.thumb";

/// Size token thumbnails are normalized to
const THUMBNAIL_SIZE: &str = "thumb_x640";

/// Which image grouping of the detail popup to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageKind {
    Poster,
    StillCut,
}

impl ImageKind {
    /// Position of the grouping among the info panels
    pub fn panel_index(&self) -> usize {
        match self {
            Self::Poster => 0,
            Self::StillCut => 1,
        }
    }
}

/// Synopsis text of a parsed popup
///
/// # Errors
///
/// `FieldNotFound` when no panel carries the synopsis label.
pub fn parse_synopsis(document: &Html, code: u32) -> Result<String> {
    for panel in select_all(document, INFO_PANELS)? {
        let Some(label) = select_first_within(panel, "strong")? else {
            continue;
        };
        if text_of(label) == SYNOPSIS_LABEL {
            let body = require_first_within(panel, ".desc_info")?;
            return Ok(text_of(body));
        }
    }

    Err(KobisError::FieldNotFound {
        code,
        field: "synopsis".to_string(),
    })
}

/// Site-relative link of the main poster
pub fn parse_main_poster(document: &Html) -> Result<String> {
    let anchor = require_first(document, MAIN_POSTER)?;
    Ok(attr_of(anchor, "href"))
}

/// Raw `src` of every image in the grouping for `kind`
pub fn parse_image_sources(document: &Html, kind: ImageKind) -> Result<Vec<String>> {
    let panels = select_all(document, INFO_PANELS)?;
    let panel = nth(&panels, kind.panel_index(), INFO_PANELS)?;

    Ok(select_within(panel, "img")?
        .into_iter()
        .map(|img| attr_of(img, "src"))
        .collect())
}

/// Points an image path at the thumbnail or full-size asset
///
/// Thumbnail paths look like `.../thumb_x192/thn_<name>.jpg`. With
/// `thumbnail` the size token becomes `thumb_x640`; without it the
/// `thumb_xNNN/thn_` part is removed, leaving `.../<name>.jpg`.
pub fn rewrite_image_path(src: &str, thumbnail: bool) -> String {
    static SIZE: OnceLock<Regex> = OnceLock::new();
    static THUMB_DIR: OnceLock<Regex> = OnceLock::new();

    if thumbnail {
        let size = SIZE.get_or_init(|| Regex::new(r"thumb_x\d{3}").expect("valid regex"));
        size.replace(src, THUMBNAIL_SIZE).into_owned()
    } else {
        let dir = THUMB_DIR.get_or_init(|| Regex::new(r"thumb_x\d{3}/thn_").expect("valid regex"));
        dir.replace(src, "").into_owned()
    }
}

fn synopsis_of(document: &DetailDocument) -> Result<String> {
    parse_synopsis(&document.html(), document.code())
}

fn main_poster_of(document: &DetailDocument) -> Result<String> {
    parse_main_poster(&document.html())
}

fn image_sources_of(document: &DetailDocument, kind: ImageKind) -> Result<Vec<String>> {
    parse_image_sources(&document.html(), kind)
}

/// Synopsis of a movie
pub async fn synopsis(cache: &DetailCache, code: u32) -> Result<String> {
    let document = cache.get(code).await?;
    synopsis_of(&document)
}

/// Absolute URL of a movie's main poster
pub async fn main_poster(cache: &DetailCache, code: u32) -> Result<String> {
    let document = cache.get(code).await?;
    let href = main_poster_of(&document)?;
    Ok(cache.transport().absolute(&href))
}

/// Absolute URLs of a movie's posters or still cuts
pub async fn image_urls(
    cache: &DetailCache,
    code: u32,
    kind: ImageKind,
    thumbnail: bool,
) -> Result<Vec<String>> {
    let document = cache.get(code).await?;
    let transport = cache.transport();

    Ok(image_sources_of(&document, kind)?
        .iter()
        .map(|src| transport.absolute(&rewrite_image_path(src, thumbnail)))
        .collect())
}
