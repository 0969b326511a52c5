//! crs-tool
//!
//! Normalize CRS definitions and convert them to and from CF grid-mapping
//! attributes.

use clap::Parser;
use crs::WktVersion;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use crs_tool::{exit_code, run, Command, Settings};

/// CRS normalization and CF conversion tool
#[derive(Parser, Debug)]
#[command(name = "crs-tool")]
#[command(about = "Normalize CRS definitions and convert to and from CF grid mappings")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// WKT dialect for WKT output (WKT2_2015, WKT2_2019, WKT1_GDAL)
    #[arg(long, default_value = "WKT2_2019", env = "CRS_TOOL_WKT_VERSION")]
    wkt_version: WktVersion,

    /// Fail instead of warning when parameters have no CF counterpart
    #[arg(long, env = "CRS_TOOL_STRICT")]
    strict: bool,

    /// Log level
    #[arg(long, default_value = "warn", env = "CRS_TOOL_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "CRS_TOOL_LOG_JSON")]
    log_json: bool,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so stdout stays machine readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let settings = Settings {
        wkt_version: args.wkt_version,
        strict: args.strict,
    };

    match run(&args.command, &settings) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_code(&e));
        }
    }
}
