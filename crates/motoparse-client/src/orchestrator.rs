//! Submission state machine: normalize, validate, serve from cache, or ask
//! the remote parser and remember the answer.
//!
//! ```text
//! Idle | Success | Error --submit--> Loading --> Success(result) | Error(message)
//! ```
//!
//! Every submission gets a request number. Only the most recently issued
//! request may commit its outcome; an older one that resolves later is
//! dropped, so overlapping submissions cannot overwrite newer state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use motoparse_core::{normalize_url, ParseResult, SupportedSites};
use motoparse_store::KeyValueCache;

use crate::error::SubmitError;
use crate::service::ParseService;

/// What the caller should currently display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParseState {
    #[default]
    Idle,
    Loading,
    Success(ParseResult),
    Error(String),
}

#[derive(Debug, Default)]
struct Inner {
    state: ParseState,
    current_url: String,
    latest_request: u64,
}

pub struct ParsingOrchestrator<S> {
    service: S,
    cache: KeyValueCache,
    sites: SupportedSites,
    inner: Mutex<Inner>,
}

impl<S: ParseService> ParsingOrchestrator<S> {
    #[must_use]
    pub fn new(service: S, cache: KeyValueCache, sites: SupportedSites) -> Self {
        Self {
            service,
            cache,
            sites,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Parses `url`, from cache when possible.
    ///
    /// The URL is normalized before validation and before it is used as the
    /// cache key or sent to the parser. An unsupported URL fails without
    /// touching either. A cache hit resolves before the first suspension
    /// point; a miss resolves once the parser answers, and a successful
    /// answer is cached under the normalized URL.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::InvalidUrl`], [`SubmitError::Remote`] and
    ///   [`SubmitError::Transport`] mirror the `Error` state that was committed.
    /// - [`SubmitError::Superseded`] if another `submit` was issued before this
    ///   one resolved; the state was left to the newer request.
    pub async fn submit(&self, url: &str) -> Result<ParseResult, SubmitError> {
        let request = self.begin(url);
        let normalized = normalize_url(url);

        if !self.sites.is_supported(&normalized) {
            tracing::warn!(url = %normalized, request, "rejected unsupported URL");
            let message = self.sites.rejection_message();
            return self.finish(request, Err(SubmitError::InvalidUrl { message }));
        }

        if let Some(cached) = self.cache.get::<ParseResult>(&normalized) {
            tracing::info!(url = %normalized, request, "parse result found in cache");
            return self.finish(request, Ok(cached));
        }

        tracing::info!(url = %normalized, request, "sending URL to parser");
        let outcome = match self.service.parse_url(&normalized).await {
            Ok(result) => {
                self.cache.set(&normalized, &result);
                Ok(result)
            }
            Err(e) => {
                tracing::error!(url = %normalized, request, error = %e, "parse request failed");
                Err(SubmitError::from(e))
            }
        };
        self.finish(request, outcome)
    }

    /// Wipes the cache. The current state is left as it is.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("cache cleared");
    }

    /// Replaces what is displayed: `Some` becomes `Success`, `None` resets to
    /// `Idle`. Does not touch the cache.
    pub fn set_data(&self, data: Option<ParseResult>) {
        self.lock().state = data.map_or(ParseState::Idle, ParseState::Success);
    }

    #[must_use]
    pub fn state(&self) -> ParseState {
        self.lock().state.clone()
    }

    /// The URL of the latest submission, exactly as it was passed in.
    #[must_use]
    pub fn current_url(&self) -> String {
        self.lock().current_url.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, ParseState::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        match &self.lock().state {
            ParseState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<ParseResult> {
        match &self.lock().state {
            ParseState::Success(result) => Some(result.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn sites(&self) -> &SupportedSites {
        &self.sites
    }

    fn begin(&self, url: &str) -> u64 {
        let mut inner = self.lock();
        inner.latest_request += 1;
        inner.state = ParseState::Loading;
        url.clone_into(&mut inner.current_url);
        inner.latest_request
    }

    fn finish(
        &self,
        request: u64,
        outcome: Result<ParseResult, SubmitError>,
    ) -> Result<ParseResult, SubmitError> {
        let mut inner = self.lock();
        if inner.latest_request != request {
            tracing::debug!(
                request,
                latest = inner.latest_request,
                "discarding stale parse outcome"
            );
            return Err(SubmitError::Superseded { request });
        }
        inner.state = match &outcome {
            Ok(result) => ParseState::Success(result.clone()),
            Err(e) => ParseState::Error(e.to_string()),
        };
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
