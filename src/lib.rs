pub mod command;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod host;
pub mod insert;
pub mod marker;
pub mod model;
pub mod paste;
pub mod session;
pub mod sim;
pub mod trace;
pub mod workspace;
