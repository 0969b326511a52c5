//! Subcommands of `crs-tool`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use crs::{CfOptions, Crs, CrsWarning, UnmappedPolicy, WktVersion};
use tracing::{info, warn};

use crate::input::{parse_input, read_cf_file};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the canonical definition handed to the geodesy engine
    Normalize {
        /// CRS as text, EPSG code, JSON object or ["AUTH", "CODE"] pair
        input: String,
    },

    /// Print a multi-line description of the CRS
    Info { input: String },

    /// Print the PROJ parameters of the CRS as JSON
    ToDict { input: String },

    /// Print CF grid-mapping attributes as JSON
    ToCf {
        input: String,

        /// Also list PROJ parameters that have no CF name
        #[arg(long)]
        show_skipped: bool,
    },

    /// Create a CRS from a JSON or YAML file of CF attributes and print its WKT
    FromCf { path: PathBuf },

    /// Print the CRS as WKT
    Wkt { input: String },
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub wkt_version: WktVersion,
    /// Fail when parameters cannot be carried across a CF conversion.
    pub strict: bool,
}

impl Settings {
    pub fn cf_options(&self) -> CfOptions {
        let unmapped = if self.strict {
            UnmappedPolicy::Deny
        } else {
            UnmappedPolicy::Warn
        };
        CfOptions::default()
            .with_wkt_version(self.wkt_version)
            .with_unmapped(unmapped)
    }
}

/// Run one subcommand and return what it prints on stdout.
pub fn run(command: &Command, settings: &Settings) -> Result<String> {
    let output = match command {
        Command::Normalize { input } => {
            let normalized = parse_input(input)?.prepare()?;
            report_warnings(&normalized.warnings);
            normalized.definition
        }
        Command::Info { input } => create(input)?.describe(),
        Command::ToDict { input } => serde_json::to_string_pretty(&create(input)?.to_dict())?,
        Command::ToCf {
            input,
            show_skipped,
        } => {
            let mapping = create(input)?.to_cf_with(&settings.cf_options())?;
            if *show_skipped {
                serde_json::to_string_pretty(&mapping)?
            } else {
                serde_json::to_string_pretty(&mapping.attributes)?
            }
        }
        Command::FromCf { path } => {
            let attributes = read_cf_file(path)?;
            let crs = Crs::from_cf_with(&attributes, &settings.cf_options())?;
            info!(srs = %crs.srs(), kind = crs.type_name(), "Created CRS from CF attributes");
            crs.to_wkt(settings.wkt_version)
        }
        Command::Wkt { input } => create(input)?.to_wkt(settings.wkt_version),
    };
    Ok(output)
}

fn create(raw: &str) -> Result<Crs> {
    let crs = Crs::from_user_input(parse_input(raw)?)?;
    report_warnings(crs.warnings());
    Ok(crs)
}

fn report_warnings(warnings: &[CrsWarning]) {
    for warning in warnings {
        warn!(warning = %warning, "CRS input warning");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::exit_code;
    use serde_json::Value;
    use test_utils::fixtures::proj;

    #[test]
    fn test_normalize_reorders_keywords() {
        let command = Command::Normalize {
            input: proj::UTM_ZONE_FIRST.to_string(),
        };
        let output = run(&command, &Settings::default()).unwrap();
        assert_eq!(output, "+proj=utm +zone=10 +type=crs");
    }

    #[test]
    fn test_normalize_epsg_code() {
        let command = Command::Normalize {
            input: "4326".to_string(),
        };
        assert_eq!(run(&command, &Settings::default()).unwrap(), "epsg:4326");
    }

    #[test]
    fn test_to_dict_output_is_json() {
        let command = Command::ToDict {
            input: proj::UTM_10N.to_string(),
        };
        let output = run(&command, &Settings::default()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["proj"], "utm");
        assert_eq!(value["zone"], 10);
        assert_eq!(value["no_defs"], true);
    }

    #[test]
    fn test_to_cf_strict_fails_on_skipped() {
        let command = Command::ToCf {
            input: proj::UTM_10N.to_string(),
            show_skipped: true,
        };
        let output = run(&command, &Settings::default()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value["attributes"]["grid_mapping_name"],
            "transverse_mercator"
        );
        assert!(value["skipped"]
            .as_array()
            .unwrap()
            .contains(&Value::from("zone")));

        let strict = Settings {
            strict: true,
            ..Settings::default()
        };
        let err = run(&command, &strict).unwrap_err();
        assert_eq!(exit_code(&err), 5);
    }

    #[test]
    fn test_wkt_version_setting() {
        let command = Command::Wkt {
            input: "EPSG:4326".to_string(),
        };
        let settings = Settings {
            wkt_version: WktVersion::Wkt1Gdal,
            ..Settings::default()
        };
        assert!(run(&command, &settings).unwrap().starts_with("GEOGCS["));
        assert!(run(&command, &Settings::default())
            .unwrap()
            .starts_with("GEOGCRS["));
    }

    #[test]
    fn test_engine_error_exit_code() {
        let command = Command::Info {
            input: "epsg:999999".to_string(),
        };
        let err = run(&command, &Settings::default()).unwrap_err();
        assert_eq!(exit_code(&err), 6);
    }
}
