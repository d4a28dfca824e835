use crate::{constants::KmPerSec, oem::StateVector, tracker_errors::TrackerError};

/// Instantaneous speed of a state vector, the norm of its velocity.
///
/// Arguments
/// ---------
/// * `state_vector`: the sample, velocity in km/s
///
/// Return
/// ------
/// * `sqrt(X_DOT² + Y_DOT² + Z_DOT²)` in km/s
pub fn speed(state_vector: &StateVector) -> KmPerSec {
    state_vector.velocity.norm()
}

/// Mean of [`speed`] over a slice of state vectors.
///
/// Return
/// ------
/// * the average speed in km/s, or [`TrackerError::EmptyDataset`] for an empty slice
pub fn average_speed(state_vectors: &[StateVector]) -> Result<KmPerSec, TrackerError> {
    if state_vectors.is_empty() {
        return Err(TrackerError::EmptyDataset);
    }
    let total: f64 = state_vectors.iter().map(speed).sum();
    Ok(total / state_vectors.len() as f64)
}
