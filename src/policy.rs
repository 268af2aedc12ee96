//! Per-operation failure policy
//!
//! Most operations propagate every error. Search is best-effort: when the
//! site cannot be reached it yields an empty result instead.

use crate::{ErrorKind, Result};

/// What an operation does with a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Return the error to the caller
    Propagate,
    /// Swallow transport errors and return an empty result
    DegradeToEmpty,
}

impl FailurePolicy {
    /// Applies the policy to the outcome of `operation`
    ///
    /// Only transport errors are degraded; a malformed page is always returned.
    pub fn apply<T: Default>(self, operation: Operation, result: Result<T>) -> Result<T> {
        match (self, result) {
            (Self::DegradeToEmpty, Err(e)) if e.kind() == ErrorKind::Transport => {
                tracing::warn!("{:?} failed, returning empty result: {}", operation, e);
                Ok(T::default())
            }
            (_, result) => result,
        }
    }
}

/// Public operations of the scraper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BoxOffice,
    SearchMovies,
    DetailPopup,
    Synopsis,
    MainPoster,
    ImageUrls,
    ActorList,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Self::BoxOffice,
        Self::SearchMovies,
        Self::DetailPopup,
        Self::Synopsis,
        Self::MainPoster,
        Self::ImageUrls,
        Self::ActorList,
    ];

    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            Self::SearchMovies => FailurePolicy::DegradeToEmpty,
            _ => FailurePolicy::Propagate,
        }
    }

    /// Applies this operation's failure policy to its outcome
    pub fn settle<T: Default>(self, result: Result<T>) -> Result<T> {
        self.failure_policy().apply(self, result)
    }
}
