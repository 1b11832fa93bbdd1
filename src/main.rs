use clap::{Arg, ArgAction, Command as ClapCommand};
use log::error;
use std::process;

// Import from your library
use mapgrab::commands::{CommandFactory, MapgrabCommandFactory};
use mapgrab::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("mapgrab")
        .version("0.1")
        .about("Fetch a map image for an address or coordinate pair")
        .arg(
            Arg::new("address")
                .long("address")
                .help("Geocode this address (requires geocoding capability)")
                .value_name("TEXT")
                .required(false),
        )
        .arg(
            Arg::new("wgs84")
                .long("wgs84")
                .help("Interpret -x/-y as WGS84 longitude/latitude")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("kkj")
                .long("kkj")
                .help("Interpret -x/-y as legacy KKJ grid coordinates")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("srs")
                .long("srs")
                .help("Interpret -x/-y in this reference system (name, EPSG code or proj definition)")
                .value_name("NAME-OR-DEF")
                .required(false),
        )
        .arg(
            Arg::new("tm35fin")
                .long("tm35fin")
                .help("Interpret -x/-y as ETRS-TM35FIN (no conversion)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("x")
                .short('x')
                .help("X coordinate (easting or longitude)")
                .value_name("FLOAT")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("y")
                .short('y')
                .help("Y coordinate (northing or latitude)")
                .value_name("FLOAT")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("size-input")
                .long("size-input")
                .help("Map-area extent in projection units, as WxH")
                .value_name("WxH")
                .default_value("2000x2000"),
        )
        .arg(
            Arg::new("size-output")
                .long("size-output")
                .help("Output image size in pixels, as WxH")
                .value_name("WxH")
                .default_value("800x800"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .help("WMS endpoint URL")
                .value_name("URL")
                .required(false),
        )
        .arg(
            Arg::new("layer")
                .long("layer")
                .help("WMS layer name")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("wms-srs")
                .long("wms-srs")
                .help("Spatial reference identifier sent to the WMS server")
                .value_name("CODE")
                .default_value("EPSG:3067"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Requested image format")
                .value_name("MIME")
                .default_value("image/png"),
        )
        .arg(
            Arg::new("cookie")
                .long("cookie")
                .help("Session cookie value sent with WMS requests")
                .value_name("VALUE")
                .required(false),
        )
        .arg(
            Arg::new("pdf")
                .long("pdf")
                .help("Fetch from the fixed PDF tile service instead of WMS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .help("Scale denominator for the PDF tile service (1:N)")
                .value_name("N")
                .default_value("16000"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the image to this file instead of stdout")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .help("Increase verbosity (repeatable: -v info, -vv debug)")
                .action(ArgAction::Count),
        )
        .get_matches();

    let verbose = matches.get_count("verbose");

    let log_file = "mapgrab.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("mapgrab-global.log", verbose) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = MapgrabCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
