pub mod app;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod message;
pub mod models;
pub mod paths;
pub mod persistence;
pub mod setup;
