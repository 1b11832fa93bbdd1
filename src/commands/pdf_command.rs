//! PDF tile-service fetch command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::common;
use crate::errors::{MapError, MapResult};
use crate::fetch::PdfTileClient;
use crate::pipeline::{Capabilities, InputMode, Pipeline};
use crate::utils::geometry::Size;
use crate::utils::logger::Logger;

/// Command for fetching a tile from the fixed PDF service
pub struct PdfFetchCommand<'a> {
    /// Capabilities probed at startup
    capabilities: Capabilities,
    /// How the location was supplied
    mode: InputMode,
    /// Output size in pixels
    size_output: Size,
    /// Scale denominator (1:scale)
    scale: u32,
    /// Destination path, stdout when absent
    output: Option<String>,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> PdfFetchCommand<'a> {
    /// Create a new PDF fetch command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> MapResult<Self> {
        let scale = args
            .get_one::<String>("scale")
            .ok_or_else(|| MapError::ArgumentError("missing --scale".to_string()))?;
        let scale = scale.parse::<u32>().map_err(|_| {
            MapError::ArgumentError(format!("scale must be a positive integer, got '{}'", scale))
        })?;
        if scale == 0 {
            return Err(MapError::ArgumentError(
                "scale must be a positive integer".to_string(),
            ));
        }

        let capabilities = Capabilities::probe();
        capabilities.report_missing();

        Ok(PdfFetchCommand {
            capabilities,
            mode: common::parse_input_mode(args, &capabilities)?,
            size_output: common::parse_size_arg(args, "size-output", "output size")?,
            scale,
            output: args.get_one::<String>("output").cloned(),
            logger,
        })
    }
}

impl<'a> Command for PdfFetchCommand<'a> {
    fn execute(&self) -> MapResult<()> {
        let pipeline = Pipeline::new(self.capabilities)?;
        let coordinates = pipeline.resolve(&self.mode)?;

        let client = PdfTileClient::new()?;
        let bytes = client.fetch_pdf(&coordinates, &self.size_output, self.scale)?;

        common::write_output(&bytes, self.output.as_deref())?;

        info!(
            "Wrote {} bytes to {}",
            bytes.len(),
            self.output.as_deref().unwrap_or("stdout")
        );
        self.logger.log("PDF tile fetch successful")?;

        Ok(())
    }
}
