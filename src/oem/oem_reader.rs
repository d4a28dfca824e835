//! Deserialization of the CCSDS Orbit Ephemeris Message, XML encoding.
//!
//! Only the parts of the message the tracker needs are modelled:
//!
//! ```text
//! ndm
//! └── oem
//!     ├── header                 (pass-through key/value block)
//!     └── body
//!         └── segment
//!             ├── metadata       (pass-through key/value block)
//!             └── data
//!                 ├── COMMENT*   (pass-through)
//!                 └── stateVector*
//!                     ├── EPOCH
//!                     └── X, Y, Z, X_DOT, Y_DOT, Z_DOT   (text + `units` attribute)
//! ```
//!
//! Every field is optional at the serde level so that a missing element is reported with the
//! index of the offending state vector rather than as an anonymous deserialization failure.
use std::collections::BTreeMap;

use nalgebra::Vector3;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::{
    constants::{UNIT_KM, UNIT_KM_PER_S},
    time::parse_oem_epoch,
    tracker_errors::TrackerError,
};

use super::state_vector::StateVector;

#[derive(Debug, Deserialize)]
struct Ndm {
    oem: Option<Oem>,
}

#[derive(Debug, Deserialize)]
struct Oem {
    header: Option<BTreeMap<String, String>>,
    body: Option<OemBody>,
}

#[derive(Debug, Deserialize)]
struct OemBody {
    segment: Option<OemSegment>,
}

#[derive(Debug, Deserialize)]
struct OemSegment {
    metadata: Option<BTreeMap<String, String>>,
    data: Option<OemData>,
}

#[derive(Debug, Deserialize)]
struct OemData {
    #[serde(rename = "COMMENT", default)]
    comments: Vec<String>,

    #[serde(rename = "stateVector", default)]
    state_vectors: Vec<RawStateVector>,
}

#[derive(Debug, Deserialize)]
struct RawStateVector {
    #[serde(rename = "EPOCH")]
    epoch: Option<String>,
    #[serde(rename = "X")]
    x: Option<RawQuantity>,
    #[serde(rename = "Y")]
    y: Option<RawQuantity>,
    #[serde(rename = "Z")]
    z: Option<RawQuantity>,
    #[serde(rename = "X_DOT")]
    x_dot: Option<RawQuantity>,
    #[serde(rename = "Y_DOT")]
    y_dot: Option<RawQuantity>,
    #[serde(rename = "Z_DOT")]
    z_dot: Option<RawQuantity>,
}

#[derive(Debug, Deserialize)]
struct RawQuantity {
    #[serde(rename = "@units")]
    units: Option<String>,
    #[serde(rename = "$text", default)]
    value: String,
}

/// Blocks extracted from one OEM document, in feed order.
#[derive(Debug)]
pub(crate) struct OemContent {
    pub(crate) header: BTreeMap<String, String>,
    pub(crate) metadata: BTreeMap<String, String>,
    pub(crate) comments: Vec<String>,
    pub(crate) state_vectors: Vec<StateVector>,
}

impl RawStateVector {
    /// Convert the raw strings into a [`StateVector`].
    ///
    /// Arguments
    /// ---------
    /// * `record`: position of the state vector in the feed, reported in errors
    ///
    /// Return
    /// ------
    /// * the typed state vector, or [`TrackerError::MalformedFeed`] naming the first missing or
    ///   unparsable field
    fn to_state_vector(&self, record: usize) -> Result<StateVector, TrackerError> {
        let epoch_text = self.epoch.as_deref().map(str::trim).unwrap_or("<missing>");
        let malformed = |field: &'static str, reason: String| TrackerError::MalformedFeed {
            record,
            epoch: epoch_text.to_string(),
            field,
            reason,
        };

        let epoch = match &self.epoch {
            Some(text) => parse_oem_epoch(text).map_err(|e| malformed("EPOCH", e.to_string()))?,
            None => return Err(malformed("EPOCH", "missing field".into())),
        };

        let field = |raw: &Option<RawQuantity>,
                     name: &'static str,
                     units: &str|
         -> Result<f64, TrackerError> {
            let quantity = raw
                .as_ref()
                .ok_or_else(|| malformed(name, "missing field".into()))?;
            if let Some(found) = quantity.units.as_deref() {
                if found != units {
                    return Err(malformed(
                        name,
                        format!("expected units '{units}', found '{found}'"),
                    ));
                }
            }
            quantity
                .value
                .trim()
                .parse::<f64>()
                .map_err(|e| malformed(name, format!("'{}': {e}", quantity.value)))
        };

        let position = Vector3::new(
            field(&self.x, "X", UNIT_KM)?,
            field(&self.y, "Y", UNIT_KM)?,
            field(&self.z, "Z", UNIT_KM)?,
        );
        let velocity = Vector3::new(
            field(&self.x_dot, "X_DOT", UNIT_KM_PER_S)?,
            field(&self.y_dot, "Y_DOT", UNIT_KM_PER_S)?,
            field(&self.z_dot, "Z_DOT", UNIT_KM_PER_S)?,
        );

        Ok(StateVector::new(epoch, position, velocity))
    }
}

/// Parse an OEM XML document.
///
/// Arguments
/// ---------
/// * `xml`: the raw feed text
///
/// Return
/// ------
/// * the header, metadata, comments and state vectors in feed order
/// * [`TrackerError::MalformedFeedStructure`] if the text is empty, is not XML, or lacks the
///   header, metadata or data block
/// * [`TrackerError::MalformedFeed`] if a state vector misses a field or holds an unparsable value
pub(crate) fn parse_oem(xml: &str) -> Result<OemContent, TrackerError> {
    if xml.trim().is_empty() {
        return Err(TrackerError::MalformedFeedStructure("empty feed".into()));
    }

    let ndm: Ndm = from_str(xml)?;

    let missing = |block: &str| TrackerError::MalformedFeedStructure(format!("missing {block} block"));

    let oem = ndm.oem.ok_or_else(|| missing("oem"))?;
    let header = oem.header.ok_or_else(|| missing("header"))?;
    let segment = oem
        .body
        .and_then(|body| body.segment)
        .ok_or_else(|| missing("body/segment"))?;
    let metadata = segment.metadata.ok_or_else(|| missing("metadata"))?;
    let data = segment.data.ok_or_else(|| missing("data"))?;

    let state_vectors = data
        .state_vectors
        .iter()
        .enumerate()
        .map(|(record, raw)| raw.to_state_vector(record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OemContent {
        header,
        metadata,
        comments: data.comments,
        state_vectors,
    })
}
