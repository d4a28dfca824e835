use hifitime::Epoch;
use nalgebra::Vector3;

use crate::time::format_oem_epoch;

/// One sample of the spacecraft trajectory.
///
/// # Fields
///
/// * `epoch` - instant of the sample (UTC)
/// * `position` - X, Y, Z in kilometers, Earth-centered inertial frame (EME2000)
/// * `velocity` - X_DOT, Y_DOT, Z_DOT in kilometers per second, same frame
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub epoch: Epoch,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(epoch: Epoch, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector {
            epoch,
            position,
            velocity,
        }
    }

    /// The epoch rendered in the feed format, e.g. `2024-069T02:26:00.000Z`
    pub fn epoch_text(&self) -> String {
        format_oem_epoch(&self.epoch)
    }
}
