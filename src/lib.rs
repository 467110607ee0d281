pub mod app;
pub mod archive;
pub mod builtin;
pub mod cleanup;
pub mod cluster;
pub mod command;
pub mod config;
pub mod engine;
pub mod registry;
pub mod shared;
pub mod templates;
