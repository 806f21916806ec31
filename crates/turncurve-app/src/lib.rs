pub mod chart;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod server;
