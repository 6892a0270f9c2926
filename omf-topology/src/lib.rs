pub mod app;
pub mod collection;
pub mod config;
pub mod graph;
pub mod util;
