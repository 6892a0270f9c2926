use std::path::Path;

use crate::{
    collection::{OvertureMapsCollectionError, TransportationCollection},
    config::TopologyConfiguration,
    graph::{OmfTopology, TopologyReport},
};

/// runs a full rebuild: reads the segment file, builds the topology and replaces
/// the output tables in `output_directory`.
pub fn run(
    segments_file: &Path,
    configuration: &TopologyConfiguration,
    output_directory: &Path,
    overwrite: bool,
) -> Result<TopologyReport, OvertureMapsCollectionError> {
    let collection = TransportationCollection::try_from_path(segments_file)?;
    let topology = OmfTopology::build(&collection, configuration)?;
    log::info!("{}", topology.report);
    topology.write(output_directory, overwrite)?;
    Ok(topology.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CONNECTORS_FILENAME, EDGES_FILENAME, REPORT_FILENAME};
    use std::path::PathBuf;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("src")
            .join("test")
            .join("segments.jsonl")
    }

    #[test]
    fn test_rebuild_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("network");
        let report = run(&fixture(), &TopologyConfiguration::default(), &out, false).unwrap();
        assert_eq!(report.edges, 3);
        for filename in [CONNECTORS_FILENAME, EDGES_FILENAME, REPORT_FILENAME] {
            assert!(out.join(filename).is_file(), "{filename}");
        }
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = TopologyConfiguration::default();
        run(&fixture(), &config, dir.path(), false).unwrap();
        let before = std::fs::read(dir.path().join(EDGES_FILENAME)).unwrap();

        let missing = dir.path().join("missing.jsonl");
        assert!(run(&missing, &config, dir.path(), true).is_err());
        let after = std::fs::read(dir.path().join(EDGES_FILENAME)).unwrap();
        assert_eq!(before, after);
    }
}
