//! # Orbit Ephemeris Message dataset
//!
//! [`OemDataset`] is the in-memory, immutable form of one ISS trajectory feed: the state vectors,
//! indexed by epoch, plus the header, metadata and comment blocks of the message, kept verbatim
//! for retrieval but never interpreted.
//!
//! ## Usage
//!
//! ```rust
//! use iss_tracker::oem::OemDataset;
//!
//! let xml = r#"<ndm><oem>
//!   <header><ORIGINATOR>JSC</ORIGINATOR></header>
//!   <body><segment>
//!     <metadata><OBJECT_NAME>ISS</OBJECT_NAME></metadata>
//!     <data>
//!       <stateVector>
//!         <EPOCH>2024-069T02:26:00.000Z</EPOCH>
//!         <X units="km">-2018.0</X><Y units="km">6018.0</Y><Z units="km">2410.0</Z>
//!         <X_DOT units="km/s">-4.16</X_DOT><Y_DOT units="km/s">-3.55</Y_DOT><Z_DOT units="km/s">5.37</Z_DOT>
//!       </stateVector>
//!     </data>
//!   </segment></body>
//! </oem></ndm>"#;
//!
//! let dataset = OemDataset::from_xml(xml).unwrap();
//! assert_eq!(dataset.index().len(), 1);
//! assert_eq!(dataset.metadata()["OBJECT_NAME"], "ISS");
//! ```
//!
//! ## Invariants
//!
//! - State vectors are strictly ascending by epoch; a feed breaking this is rejected.
//! - A dataset is never partially built: any parse failure aborts [`OemDataset::from_xml`].
use std::collections::BTreeMap;

use tracing::debug;

use crate::{epoch_index::EpochIndex, tracker_errors::TrackerError};

mod oem_reader;
pub mod state_vector;

pub use state_vector::StateVector;

#[derive(Debug, Clone)]
pub struct OemDataset {
    header: BTreeMap<String, String>,
    metadata: BTreeMap<String, String>,
    comments: Vec<String>,
    index: EpochIndex,
}

impl OemDataset {
    /// Build a dataset from the raw OEM XML text.
    ///
    /// Arguments
    /// ---------
    /// * `xml`: the feed text as returned by a [`FeedSource`](crate::feed::FeedSource)
    ///
    /// Return
    /// ------
    /// * the dataset, or a [`TrackerError::MalformedFeed`] / [`TrackerError::MalformedFeedStructure`]
    pub fn from_xml(xml: &str) -> Result<Self, TrackerError> {
        let content = oem_reader::parse_oem(xml)?;
        let index = EpochIndex::new(content.state_vectors)?;

        debug!(
            state_vectors = index.len(),
            comments = content.comments.len(),
            "OEM feed parsed"
        );

        Ok(OemDataset {
            header: content.header,
            metadata: content.metadata,
            comments: content.comments,
            index,
        })
    }

    pub fn header(&self) -> &BTreeMap<String, String> {
        &self.header
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn index(&self) -> &EpochIndex {
        &self.index
    }
}
