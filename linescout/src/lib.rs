pub mod config;
pub mod controller;
pub mod counter;
pub mod errors;
pub mod metrics;
pub mod sample;
pub mod scan;

pub use crate::config::ScanConfig;
pub use controller::{Controller, ControllerState, FinalReport};
pub use counter::{CounterSnapshot, SharedCounter};
pub use errors::{ScanError, ScanResult};
pub use scan::{ScanHandle, ScanReport, ScanTask, ScanWorker};
