pub mod beacon;
pub mod chat;
pub mod config;
pub mod content;
pub mod error;
pub mod llm;
pub mod model;
pub mod persona;
pub mod ratings;
pub mod resolver;
pub mod session;
