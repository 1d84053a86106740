pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod store;
pub mod suggest;
