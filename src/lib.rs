pub mod core;
pub mod dataset;
pub mod history;
pub mod llm;
pub mod qa;
pub mod rag;
pub mod server;
pub mod state;
