// Application layer: command dispatch and text/CSV output.

#[cfg(feature = "cli")]
pub mod commands;
pub mod export;
pub mod report;
