//! Transport layer for one-shot CLI commands and the interactive session

pub mod cli;
pub mod interactive;
