pub mod html;
pub mod json_writer;
pub mod run_log;
pub mod staging;
pub mod summary;
