pub mod config;
pub mod constants;
pub mod env_state;
pub mod epoch_index;
pub mod feed;
pub mod geodesy;
pub mod kinematics;
pub mod oem;
pub mod place;
pub mod response;
pub mod time;
pub mod tracker;
pub mod tracker_errors;
