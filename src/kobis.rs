//! Scraper facade
//!
//! [`Kobis`] owns one transport and one detail cache and exposes every
//! public operation with concrete arguments.

use crate::boxoffice::BoxOffice;
use crate::cache::{DetailCache, DetailDocument};
use crate::config::{validate, Config};
use crate::decoders::{self, ActorEntry, ImageKind, MovieCode};
use crate::transport::Transport;
use crate::Result;
use chrono::NaiveDate;

/// Entry point for scraping the KOBIS site
#[derive(Debug)]
pub struct Kobis {
    transport: Transport,
    cache: DetailCache,
}

impl Kobis {
    /// Creates a scraper from configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kobis_scraper::{Config, Kobis};
    ///
    /// # async fn run() -> kobis_scraper::Result<()> {
    /// let kobis = Kobis::new(&Config::default())?;
    /// println!("{}", kobis.synopsis(20226254).await?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &Config) -> Result<Self> {
        validate(config)?;
        let transport = Transport::new(config)?;
        let cache = DetailCache::bounded(transport.clone(), config.cache.max_entries);
        Ok(Self { transport, cache })
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn detail_cache(&self) -> &DetailCache {
        &self.cache
    }

    /// Scrapes the daily box office for `start..=end`
    pub async fn box_office(&self, start: NaiveDate, end: NaiveDate) -> Result<BoxOffice> {
        BoxOffice::fetch(&self.transport, start, end).await
    }

    /// One page of movies opened between the given years; empty if unreachable
    pub async fn search_movies(
        &self,
        open_start_year: i32,
        open_end_year: i32,
        page: u32,
    ) -> Result<Vec<MovieCode>> {
        decoders::search_movies(&self.transport, open_start_year, open_end_year, page).await
    }

    /// The cached detail popup of a movie
    pub async fn detail(&self, code: u32) -> Result<DetailDocument> {
        self.cache.get(code).await
    }

    pub async fn synopsis(&self, code: u32) -> Result<String> {
        decoders::synopsis(&self.cache, code).await
    }

    pub async fn main_poster(&self, code: u32) -> Result<String> {
        decoders::main_poster(&self.cache, code).await
    }

    pub async fn image_urls(
        &self,
        code: u32,
        kind: ImageKind,
        thumbnail: bool,
    ) -> Result<Vec<String>> {
        decoders::image_urls(&self.cache, code, kind, thumbnail).await
    }

    pub async fn actor_list(&self, code: u32) -> Result<Vec<ActorEntry>> {
        decoders::actor_list(&self.transport, code).await
    }

    /// Forgets every cached detail popup
    pub async fn clear_detail_cache(&self) {
        self.cache.clear().await;
    }
}
