//! CLI command implementations
//!
//! This module contains implementations of the commands supported by
//! the CLI application using the Command pattern.

pub mod command_traits;
pub mod common;
pub mod pdf_command;
pub mod wms_command;

pub use command_traits::{Command, CommandFactory};
pub use pdf_command::PdfFetchCommand;
pub use wms_command::WmsFetchCommand;

use clap::ArgMatches;

use crate::errors::MapResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct MapgrabCommandFactory;

impl MapgrabCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        MapgrabCommandFactory
    }
}

impl Default for MapgrabCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for MapgrabCommandFactory {
    fn create_command(
        &self,
        args: &ArgMatches,
        logger: &'a Logger,
    ) -> MapResult<Box<dyn Command + 'a>> {
        // The PDF tile service is an explicit opt-in; WMS is the default
        if args.get_flag("pdf") {
            Ok(Box::new(PdfFetchCommand::new(args, logger)?))
        } else {
            Ok(Box::new(WmsFetchCommand::new(args, logger)?))
        }
    }
}
