//! # Tracker environment state
//!
//! This module defines [`TrackerEnv`], the **shared environment object** handed to the external
//! collaborators of the tracker (feed source, place resolver). It owns a persistent blocking
//! HTTP client configured once from [`TrackerConfig`] (timeout, user agent).
//!
//! ## Structure
//!
//! ```text
//! TrackerEnv
//! └── http_client  (reqwest::blocking::Client)
//! ```
//!
//! The client keeps its connection pool internally and is cheap to clone, so every collaborator
//! built from the same environment shares one pool.
use std::{fmt::Debug, time::Duration};

use reqwest::blocking::Client;
use tracing::debug;

use crate::{config::TrackerConfig, tracker_errors::TrackerError};

#[derive(Debug, Clone)]
pub struct TrackerEnv {
    pub http_client: Client,
}

impl TrackerEnv {
    /// Create a new environment.
    ///
    /// Arguments
    /// ---------
    /// * `config`: provides the HTTP timeout and user agent
    ///
    /// Return
    /// ------
    /// * the environment, or [`TrackerError::ReqwestError`] if the TLS backend cannot be set up
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(TrackerEnv { http_client })
    }

    /// GET `url` with the given query parameters and return the body as text.
    ///
    /// Non-success HTTP statuses are turned into errors.
    pub(crate) fn get_from_url<Q: serde::Serialize + Debug + ?Sized>(
        &self,
        url: &str,
        query: &Q,
    ) -> Result<String, TrackerError> {
        debug!(url, ?query, "HTTP GET");
        let body = self
            .http_client
            .get(url)
            .query(query)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(body)
    }
}
