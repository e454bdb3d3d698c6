//! Sources of raw readings: the boundary between upstream data and the index engine.

use std::path::PathBuf;

use aqi::ReadingBatch;
use thiserror::Error;

pub mod openweather;

/// A failure to obtain a batch. The cycle that hit it publishes nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error for file '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A type that can get the current pollutant and weather readings.
pub trait ReadingSource {
    /// Get the latest batch of readings.
    ///
    /// A batch may be partial: unreported pollutants are absent readings.
    fn fetch(&mut self) -> Result<ReadingBatch, SourceError>;
}

impl<S: ReadingSource + ?Sized> ReadingSource for Box<S> {
    fn fetch(&mut self) -> Result<ReadingBatch, SourceError> {
        (**self).fetch()
    }
}

/// The nullary ReadingSource: provides no data.
pub struct NullSource {}

impl ReadingSource for NullSource {
    fn fetch(&mut self) -> Result<ReadingBatch, SourceError> {
        Ok(Default::default())
    }
}

/// Fake source: repeatedly provides the indicated batch.
pub struct FakeSource {
    pub batch: ReadingBatch,
}

impl ReadingSource for FakeSource {
    fn fetch(&mut self) -> Result<ReadingBatch, SourceError> {
        Ok(self.batch.clone())
    }
}

/// Reads an OpenWeather-shaped payload document from a file on every fetch.
///
/// Whatever retrieves data from upstream can drop its responses in this file;
/// see [`openweather`] for the layout.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl ReadingSource for FileSource {
    fn fetch(&mut self) -> Result<ReadingBatch, SourceError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| SourceError::Io(self.path.clone(), e))?;
        tracing::debug!("read {} bytes from {}", content.len(), self.path.display());
        openweather::parse(&content)
    }
}
