pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod state;
