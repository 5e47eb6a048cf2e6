//! Core region archive reader module

pub mod codec;
pub mod command;
pub mod format;
pub mod iter;
pub mod reader;
pub mod types;
pub mod utils;
pub mod world;
