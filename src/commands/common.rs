//! Shared argument handling for the fetch commands

use std::fs;
use std::io::{self, Write};

use clap::ArgMatches;

use crate::coordinate::Point;
use crate::errors::{MapError, MapResult};
use crate::pipeline::{Capabilities, InputMode};
use crate::utils::geometry::{parse_size, Size};

/// Parse the optional `-x`/`-y` pair; both must be present and numeric
pub fn parse_coordinates(args: &ArgMatches) -> MapResult<Option<Point>> {
    let x = args.get_one::<String>("x");
    let y = args.get_one::<String>("y");

    match (x, y) {
        (Some(x), Some(y)) => {
            let x = x.parse::<f64>().map_err(|_| {
                MapError::ArgumentError(format!("both x and y must be floats, got x='{}'", x))
            })?;
            let y = y.parse::<f64>().map_err(|_| {
                MapError::ArgumentError(format!("both x and y must be floats, got y='{}'", y))
            })?;
            Ok(Some(Point::new(x, y)))
        }
        (None, None) => Ok(None),
        _ => Err(MapError::ArgumentError(
            "-x and -y must be given together".to_string(),
        )),
    }
}

/// Build the active input mode from the coordinate-system flag group
pub fn parse_input_mode(
    args: &ArgMatches,
    capabilities: &Capabilities,
) -> MapResult<InputMode> {
    InputMode::from_flags(
        args.get_one::<String>("address").map(String::as_str),
        args.get_flag("wgs84"),
        args.get_flag("kkj"),
        args.get_one::<String>("srs").map(String::as_str),
        args.get_flag("tm35fin"),
        parse_coordinates(args)?,
        capabilities,
    )
}

/// Parse a required size option (has a clap default, so always present)
pub fn parse_size_arg(args: &ArgMatches, id: &str, reason: &str) -> MapResult<Size> {
    let value = args
        .get_one::<String>(id)
        .ok_or_else(|| MapError::ArgumentError(format!("missing --{}", id)))?;
    parse_size(value, reason)
}

/// Write the fetched image bytes to the chosen destination
///
/// The bytes are fully in memory before this is called, so a failed
/// fetch never touches the destination. Stdout is used when no output
/// path was given.
pub fn write_output(bytes: &[u8], destination: Option<&str>) -> MapResult<()> {
    match destination {
        Some(path) => fs::write(path, bytes)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(bytes)?;
            handle.flush()?;
        }
    }
    Ok(())
}
