use std::{
    fs::File,
    path::{Path, PathBuf},
};

use csv::QuoteStyle;
use flate2::{write::GzEncoder, Compression};
use kdam::tqdm;
use serde::Serialize;

use super::serialize_ops as ops;
use crate::{
    collection::{OvertureMapsCollectionError, TransportationCollection},
    config::TopologyConfiguration,
    graph::{ConnectorVertex, TopologyEdge, TopologyReport},
    util::fs::create_dirs,
};

pub const CONNECTORS_FILENAME: &str = "connectors.csv.gz";
pub const EDGES_FILENAME: &str = "edges.csv.gz";
pub const REPORT_FILENAME: &str = "topology-report.json";

/// the connector (vertex) and edge tables of a routing graph built from a
/// collection of transportation segments.
#[derive(Debug)]
pub struct OmfTopology {
    pub connectors: Vec<ConnectorVertex>,
    pub edges: Vec<TopologyEdge>,
    pub report: TopologyReport,
}

impl OmfTopology {
    /// build the routing topology from a [TransportationCollection]. only segments
    /// admitted by the configured filters contribute edges or connectors.
    pub fn build(
        collection: &TransportationCollection,
        config: &TopologyConfiguration,
    ) -> Result<Self, OvertureMapsCollectionError> {
        config.validate()?;

        let routable = collection
            .segments
            .iter()
            .filter(|s| config.is_routable(s))
            .collect::<Vec<_>>();
        log::info!(
            "{} of {} segments are routable",
            routable.len(),
            collection.segments.len()
        );

        let segment_edges = ops::decompose_segments(&routable, config)?;
        let segment_edge_count = segment_edges.len();
        log::info!("decomposed routable segments into {segment_edge_count} edges");

        let (connectors, connector_counts) = ops::materialize_connectors(&routable)?;
        log::info!("materialized {} connectors", connectors.len());

        let (edges, edge_counts) = ops::resolve_edges(segment_edges, &connectors, config)?;
        if edge_counts.unresolved > 0 {
            log::info!(
                "dropped {} edges referencing connectors outside the routable network",
                edge_counts.unresolved
            );
        }
        if edge_counts.invalid_cost > 0 {
            log::warn!("dropped {} edges with invalid cost", edge_counts.invalid_cost);
        }

        let report = TopologyReport {
            segments: collection.segments.len(),
            routable_segments: routable.len(),
            segment_edges: segment_edge_count,
            connectors: connectors.len(),
            repeated_connector_references: connector_counts.repeated,
            divergent_connector_references: connector_counts.divergent,
            unresolved_edges: edge_counts.unresolved,
            invalid_cost_edges: edge_counts.invalid_cost,
            edges: edges.len(),
        };
        Ok(Self {
            connectors,
            edges,
            report,
        })
    }

    /// write the connector table, edge table and build report to a directory.
    ///
    /// the files are staged under temporary names and moved into place once all
    /// of them are complete, so an existing output is either fully replaced or
    /// left as it was. without `overwrite`, any existing output is an error.
    pub fn write(
        &self,
        output_directory: &Path,
        overwrite: bool,
    ) -> Result<(), OvertureMapsCollectionError> {
        create_dirs(output_directory)?;
        let outputs = [CONNECTORS_FILENAME, EDGES_FILENAME, REPORT_FILENAME]
            .map(|filename| StagedFile::new(output_directory, filename));

        if !overwrite {
            if let Some(existing) = outputs.iter().find(|o| o.target.exists()) {
                return Err(OvertureMapsCollectionError::InvalidUserInput(format!(
                    "output file {} already exists, use overwrite to replace it",
                    existing.target.display()
                )));
            }
        }

        let [connectors_file, edges_file, report_file] = &outputs;
        let staged = write_table(
            &connectors_file.staging,
            CONNECTORS_FILENAME,
            &self.connectors,
            "write connector dataset",
        )
        .and_then(|_| {
            write_table(
                &edges_file.staging,
                EDGES_FILENAME,
                &self.edges,
                "write edge dataset",
            )
        })
        .and_then(|_| write_report(&report_file.staging, &self.report));

        if let Err(e) = staged {
            for output in outputs.iter() {
                output.discard();
            }
            return Err(e);
        }
        for output in outputs.iter() {
            output.commit()?;
        }
        log::info!(
            "wrote {} connectors and {} edges to {}",
            self.connectors.len(),
            self.edges.len(),
            output_directory.display()
        );
        Ok(())
    }
}

/// an output file written at `staging` and later renamed to `target`.
struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    fn new(directory: &Path, filename: &str) -> Self {
        Self {
            staging: directory.join(format!(".{filename}.tmp")),
            target: directory.join(filename),
        }
    }

    fn commit(&self) -> Result<(), OvertureMapsCollectionError> {
        std::fs::rename(&self.staging, &self.target)?;
        Ok(())
    }

    fn discard(&self) {
        if self.staging.exists() {
            if let Err(e) = std::fs::remove_file(&self.staging) {
                log::warn!("failure removing {}: {e}", self.staging.display());
            }
        }
    }
}

fn write_table<T: Serialize>(
    filepath: &Path,
    filename: &str,
    rows: &[T],
    desc: &str,
) -> Result<(), OvertureMapsCollectionError> {
    let mut writer = create_writer(filepath, true, QuoteStyle::Necessary)?;
    let iter = tqdm!(rows.iter(), total = rows.len(), desc = desc.to_string());
    for row in iter {
        writer
            .serialize(row)
            .map_err(|e| OvertureMapsCollectionError::CsvWriteError(filename.to_string(), e))?;
    }
    eprintln!();

    // the gzip trailer is only written once the encoder is finished
    writer.flush()?;
    let encoder = writer.into_inner().map_err(|e| {
        OvertureMapsCollectionError::InternalError(format!("failure flushing {filename}: {e}"))
    })?;
    encoder.finish()?;
    Ok(())
}

fn write_report(filepath: &Path, report: &TopologyReport) -> Result<(), OvertureMapsCollectionError> {
    let file = File::create(filepath)?;
    serde_json::to_writer_pretty(file, report).map_err(|e| {
        OvertureMapsCollectionError::InternalError(format!("failure writing {REPORT_FILENAME}: {e}"))
    })
}

/// helper function to build a filewriter for writing .csv.gz files
/// with WKT geometry columns.
fn create_writer(
    filepath: &Path,
    has_headers: bool,
    quote_style: QuoteStyle,
) -> Result<csv::Writer<GzEncoder<File>>, OvertureMapsCollectionError> {
    let file = File::create(filepath)?;
    let buffer = GzEncoder::new(file, Compression::default());
    let writer = csv::WriterBuilder::new()
        .has_headers(has_headers)
        .quote_style(quote_style)
        .from_writer(buffer);
    Ok(writer)
}
