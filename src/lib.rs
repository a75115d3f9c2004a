pub mod aggregator;
pub mod config;
pub mod document;
pub mod enricher;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod preview;
pub mod reader;
pub mod renderer;
pub mod schema;
