pub mod cli;
pub mod config;
pub mod ctx;
pub mod io;
pub mod math;
pub mod metrics;
pub mod pipeline;
pub mod schema;
pub mod toolkit;
