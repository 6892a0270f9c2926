use std::path::Path;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::{
    app::rebuild,
    collection::OvertureMapsCollectionError,
    config::TopologyConfiguration,
    graph::TopologyReport,
};

/// Command line tool for building routable topologies from OMF (Overture Maps Foundation) transportation segments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct OmfApp {
    #[command(subcommand)]
    pub op: OmfOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum OmfOperation {
    /// rebuild the connector and edge tables from a local file of segment records,
    /// replacing any previous output
    Rebuild {
        #[arg(long, help = "path to a .json, .jsonl, .ndjson or .geojsonl segment file, optionally .gz")]
        segments_file: String,
        #[arg(long, help = "path to a .toml or .json file with topology parameters")]
        configuration_file: Option<String>,
        #[arg(long, help = "output path for the connector and edge tables")]
        output_directory: String,
        #[arg(long, help = "replace existing output files")]
        overwrite: bool,
    },
}

impl OmfOperation {
    pub fn run(&self) -> Result<TopologyReport, OvertureMapsCollectionError> {
        match self {
            OmfOperation::Rebuild {
                segments_file,
                configuration_file,
                output_directory,
                overwrite,
            } => {
                let conf = match configuration_file {
                    None => Ok(TopologyConfiguration::default()),
                    Some(f) => {
                        log::info!("reading topology configuration from {f}");
                        TopologyConfiguration::try_from(f)
                    }
                }?;
                rebuild::run(
                    Path::new(segments_file),
                    &conf,
                    Path::new(output_directory),
                    *overwrite,
                )
            }
        }
    }
}
