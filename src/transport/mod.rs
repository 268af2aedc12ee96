//! Transport layer for talking to the KOBIS site
//!
//! This module contains:
//! - The fixed endpoint table and per-endpoint form layouts
//! - Ordered form-field bodies
//! - The HTTP client with its optional fixed retry policy

mod client;
mod form;

pub use client::{build_http_client, Transport};
pub use form::FormFields;

/// Endpoints served by the KOBIS site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Movie search listing (HTML)
    Search,
    /// Daily box-office ranking tables (HTML)
    DailyBoxOffice,
    /// Per-movie detail popup (HTML)
    MovieDetail,
    /// Per-movie actor list (JSON)
    ActorList,
}

impl Endpoint {
    /// Path of the endpoint relative to the site origin
    pub fn path(&self) -> &'static str {
        match self {
            Self::Search => "/kobis/business/mast/mvie/searchUserMovCdList.do",
            Self::DailyBoxOffice => "/kobis/business/stat/boxs/findDailyBoxOfficeList.do",
            Self::MovieDetail => "/kobis/business/mast/mvie/searchMovieDtl.do",
            Self::ActorList => "/kobis/business/mast/mvie/searchMovActorLists.do",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
