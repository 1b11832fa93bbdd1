//! WMS map fetch command
//!
//! Resolves the input location to canonical coordinates and requests
//! one GetMap image from the configured WMS endpoint.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::common;
use crate::errors::{MapError, MapResult};
use crate::fetch::WmsClient;
use crate::pipeline::{Capabilities, InputMode, Pipeline};
use crate::utils::geometry::Size;
use crate::utils::logger::Logger;

/// Command for fetching a map image over WMS
pub struct WmsFetchCommand<'a> {
    /// Capabilities probed at startup
    capabilities: Capabilities,
    /// How the location was supplied
    mode: InputMode,
    /// Map-area extent in canonical projection units
    size_input: Size,
    /// Output image size in pixels
    size_output: Size,
    /// WMS endpoint URL
    url: String,
    /// Layer to request
    layer: String,
    /// Spatial reference identifier sent to the server
    srs: String,
    /// Requested image format
    format: String,
    /// Optional session cookie value
    cookie: Option<String>,
    /// Destination path, stdout when absent
    output: Option<String>,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> WmsFetchCommand<'a> {
    /// Create a new WMS fetch command from CLI arguments
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> MapResult<Self> {
        let url = args
            .get_one::<String>("url")
            .ok_or_else(|| MapError::ArgumentError("missing WMS endpoint (--url)".to_string()))?
            .clone();
        let layer = args
            .get_one::<String>("layer")
            .ok_or_else(|| MapError::ArgumentError("missing WMS layer (--layer)".to_string()))?
            .clone();

        let capabilities = Capabilities::probe();
        capabilities.report_missing();

        Ok(WmsFetchCommand {
            capabilities,
            mode: common::parse_input_mode(args, &capabilities)?,
            size_input: common::parse_size_arg(args, "size-input", "input size")?,
            size_output: common::parse_size_arg(args, "size-output", "output size")?,
            url,
            layer,
            srs: args
                .get_one::<String>("wms-srs")
                .cloned()
                .unwrap_or_else(|| "EPSG:3067".to_string()),
            format: args
                .get_one::<String>("format")
                .cloned()
                .unwrap_or_else(|| "image/png".to_string()),
            cookie: args.get_one::<String>("cookie").cloned(),
            output: args.get_one::<String>("output").cloned(),
            logger,
        })
    }
}

impl<'a> Command for WmsFetchCommand<'a> {
    fn execute(&self) -> MapResult<()> {
        let pipeline = Pipeline::new(self.capabilities)?;
        let coordinates = pipeline.resolve(&self.mode)?;

        let client = WmsClient::new(
            &self.url,
            &self.layer,
            &self.srs,
            &self.format,
            self.cookie.as_deref(),
        )?;
        let bytes = client.fetch_map(&coordinates, &self.size_input, &self.size_output)?;

        common::write_output(&bytes, self.output.as_deref())?;

        info!(
            "Wrote {} bytes to {}",
            bytes.len(),
            self.output.as_deref().unwrap_or("stdout")
        );
        self.logger.log("WMS map fetch successful")?;

        Ok(())
    }
}
