//! # Feed sources
//!
//! The raw OEM text reaches the tracker through a [`FeedSource`]. It is fetched exactly once, at
//! startup, and parsed into an [`OemDataset`] by [`load_dataset`].
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::{
    config::TrackerConfig, env_state::TrackerEnv, oem::OemDataset, tracker_errors::TrackerError,
};

pub trait FeedSource {
    /// Return the full feed text.
    fn fetch(&self) -> Result<String, TrackerError>;

    /// Human readable origin of the feed, used in logs.
    fn origin(&self) -> String;
}

/// Feed downloaded over HTTP, by default the public NASA ISS trajectory file.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    env: TrackerEnv,
    url: String,
}

impl HttpFeedSource {
    pub fn new(env: TrackerEnv, url: impl Into<String>) -> Self {
        HttpFeedSource {
            env,
            url: url.into(),
        }
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self) -> Result<String, TrackerError> {
        self.env.get_from_url(&self.url, &[] as &[(&str, &str)])
    }

    fn origin(&self) -> String {
        self.url.clone()
    }
}

/// Feed read from a local file, e.g. a previously downloaded copy.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: Utf8PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        FileFeedSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FeedSource for FileFeedSource {
    fn fetch(&self) -> Result<String, TrackerError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn origin(&self) -> String {
        self.path.to_string()
    }
}

/// Pick the feed source described by a configuration: the local file when `feed_path` is set,
/// the HTTP URL otherwise.
pub fn feed_source_from_config(
    config: &TrackerConfig,
    env: &TrackerEnv,
) -> Box<dyn FeedSource> {
    match &config.feed_path {
        Some(path) => Box::new(FileFeedSource::new(path)),
        None => Box::new(HttpFeedSource::new(env.clone(), config.feed_url.clone())),
    }
}

/// Fetch and parse the feed.
///
/// Return
/// ------
/// * the dataset; any fetch or parse failure is returned as is and no dataset is built
pub fn load_dataset(source: &dyn FeedSource) -> Result<OemDataset, TrackerError> {
    info!(origin = %source.origin(), "fetching ephemeris feed");
    let xml = source.fetch()?;
    let dataset = OemDataset::from_xml(&xml)?;
    info!(
        state_vectors = dataset.index().len(),
        "ephemeris feed loaded"
    );
    Ok(dataset)
}
