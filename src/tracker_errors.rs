use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Malformed feed: {0}")]
    MalformedFeedStructure(String),

    #[error("Malformed feed: state vector #{record} ({epoch}) field {field}: {reason}")]
    MalformedFeed {
        record: usize,
        epoch: String,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid epoch text: {0}")]
    InvalidEpoch(String),

    #[error("No state vector at epoch: {0}")]
    EpochNotFound(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("The dataset contains no state vector")]
    EmptyDataset,

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unexpected geocoder response: {0}")]
    GeocoderResponse(String),
}

impl From<quick_xml::DeError> for TrackerError {
    fn from(err: quick_xml::DeError) -> Self {
        TrackerError::MalformedFeedStructure(err.to_string())
    }
}

impl From<toml::de::Error> for TrackerError {
    fn from(err: toml::de::Error) -> Self {
        TrackerError::InvalidConfig(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::GeocoderResponse(err.to_string())
    }
}

impl PartialEq for TrackerError {
    fn eq(&self, other: &Self) -> bool {
        use TrackerError::*;
        match (self, other) {
            (MalformedFeedStructure(a), MalformedFeedStructure(b)) => a == b,
            (
                MalformedFeed {
                    record: r1,
                    field: f1,
                    ..
                },
                MalformedFeed {
                    record: r2,
                    field: f2,
                    ..
                },
            ) => r1 == r2 && f1 == f2,
            (InvalidEpoch(a), InvalidEpoch(b)) => a == b,
            (EpochNotFound(a), EpochNotFound(b)) => a == b,
            (InvalidRange(a), InvalidRange(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (GeocoderResponse(a), GeocoderResponse(b)) => a == b,
            (EmptyDataset, EmptyDataset) => true,

            // Not comparable: equal when the variant matches
            (ReqwestError(_), ReqwestError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
