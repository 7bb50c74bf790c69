pub mod app;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod scan;
pub mod ui;
