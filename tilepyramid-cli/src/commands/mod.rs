//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`build`] - Build or update the configured pyramids
//! - [`init`] - Write an example configuration file
//! - [`inspect`] - Summarize an existing pyramid

pub mod build;
pub mod init;
pub mod inspect;
