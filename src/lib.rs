pub mod cleaner;
pub mod config;
pub mod crawler;
pub mod cv;
pub mod dataset;
pub mod matcher;
pub mod text;
