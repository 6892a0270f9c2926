use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use flate2::read::GzDecoder;
use kdam::tqdm;

use crate::collection::{OvertureMapsCollectionError, TransportationSegmentRecord};

/// an already-materialized collection of transportation segments.
#[derive(Debug, Default)]
pub struct TransportationCollection {
    pub segments: Vec<TransportationSegmentRecord>,
}

/// supported on-disk encodings of a segment collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectionFormat {
    /// a single JSON array of segment records
    JsonArray,
    /// one JSON segment record per line
    JsonLines,
}

impl TransportationCollection {
    pub fn new(segments: Vec<TransportationSegmentRecord>) -> Self {
        Self { segments }
    }

    /// reads a segment collection from a local file. the format is chosen by file
    /// extension: `.json` for a JSON array, `.jsonl`, `.ndjson` or `.geojsonl` for
    /// one record per line. any of these may be gzip-compressed with a trailing `.gz`.
    pub fn try_from_path(path: &Path) -> Result<Self, OvertureMapsCollectionError> {
        use OvertureMapsCollectionError as E;
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_lowercase())
            .ok_or_else(|| E::InvalidUserInput(format!("not a file: {}", path.display())))?;
        let (stem, gzipped) = match filename.strip_suffix(".gz") {
            Some(stem) => (stem.to_string(), true),
            None => (filename.clone(), false),
        };
        let format = if stem.ends_with(".json") {
            CollectionFormat::JsonArray
        } else if stem.ends_with(".jsonl") || stem.ends_with(".ndjson") || stem.ends_with(".geojsonl")
        {
            CollectionFormat::JsonLines
        } else {
            return Err(E::InvalidUserInput(format!(
                "unsupported segment file type: {filename}"
            )));
        };

        let file = File::open(path)
            .map_err(|e| E::ReadError(format!("failure opening {}: {e}", path.display())))?;
        let reader: Box<dyn Read> = if gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let reader = BufReader::new(reader);

        let segments: Vec<TransportationSegmentRecord> = match format {
            CollectionFormat::JsonArray => serde_json::from_reader(reader)
                .map_err(|e| E::DeserializeError(format!("{}: {e}", path.display())))?,
            CollectionFormat::JsonLines => read_json_lines(reader)?,
        };
        log::info!(
            "read {} segment records from {}",
            segments.len(),
            path.display()
        );
        Ok(Self::new(segments))
    }
}

fn read_json_lines<R: BufRead>(
    reader: R,
) -> Result<Vec<TransportationSegmentRecord>, OvertureMapsCollectionError> {
    let lines = tqdm!(reader.lines().enumerate(), desc = "read segment records");
    let mut segments = vec![];
    for (idx, line) in lines {
        let line = line.map_err(|e| {
            OvertureMapsCollectionError::ReadError(format!("failure reading line {}: {e}", idx + 1))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let segment = serde_json::from_str(&line).map_err(|e| {
            OvertureMapsCollectionError::DeserializeError(format!("line {}: {e}", idx + 1))
        })?;
        segments.push(segment);
    }
    eprintln!();
    Ok(segments)
}
