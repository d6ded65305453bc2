//! Drive Controller (§4.5).

pub mod drive_controller;

pub use drive_controller::{DriveController, DriveStatus};
