//! Course material upload widget: file validation, an ordered intake queue
//! and timer-driven upload progress, with an egui front end.

pub mod app;
pub mod config;
pub mod logging;
pub mod upload;
pub mod utils;
