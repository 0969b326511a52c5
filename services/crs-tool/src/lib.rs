//! CRS command line tool.
//!
//! Thin layer over the `crs` facade: argument classification, CF file
//! loading and the subcommands themselves live here so they can be tested
//! without spawning the binary.

pub mod commands;
pub mod input;

pub use commands::{run, Command, Settings};
pub use input::{exit_code, parse_input, read_cf_file};
