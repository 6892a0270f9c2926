#[derive(thiserror::Error, Debug)]
pub enum OvertureMapsCollectionError {
    #[error("failure reading segment collection: {0}")]
    ReadError(String),
    #[error("Failed to deserialize segment record: {0}")]
    DeserializeError(String),
    #[error("invalid topology configuration: {0}")]
    ConfigurationError(String),
    #[error("invalid segment connectors: {0}")]
    InvalidSegmentConnectors(String),
    #[error("invalid segment geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid speed: {0}")]
    InvalidSpeed(String),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("failure writing output: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
    #[error("{0}")]
    InvalidUserInput(String),
    #[error("{0}")]
    InternalError(String),
}
