//! Capture stream reading
//!
//! Capture files hold span records as concatenated JSON objects with no
//! delimiter between them, the way a looping encoder writes one value per
//! iteration. The reader walks the byte stream value by value and stops at
//! the first record that does not parse: everything before a corruption is
//! yielded, nothing after it.

pub mod record;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};
use thiserror::Error;

use record::RawSpanRecord;

/// Errors reading a capture stream
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Cannot open capture file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Malformed span record {index} (byte offset {offset}): {source}")]
    Decode {
        /// 1-based position of the record in the stream
        index: usize,
        /// Byte offset of the first byte past the last complete record
        offset: usize,
        source: serde_json::Error,
    },
}

/// Iterator over the span records of a capture stream
pub struct SpanRecordReader<R: io::Read> {
    inner: StreamDeserializer<'static, IoRead<BufReader<R>>, RawSpanRecord>,
    index: usize,
}

impl<R: io::Read> std::fmt::Debug for SpanRecordReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanRecordReader")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl SpanRecordReader<File> {
    /// Open a capture file for reading
    pub fn open(path: &Path) -> Result<Self, StreamError> {
        let file = File::open(path).map_err(|source| StreamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<R: io::Read> SpanRecordReader<R> {
    /// Read records from any byte stream
    pub fn from_reader(reader: R) -> Self {
        Self {
            inner: Deserializer::from_reader(BufReader::new(reader)).into_iter(),
            index: 0,
        }
    }
}

impl<R: io::Read> Iterator for SpanRecordReader<R> {
    type Item = Result<RawSpanRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.inner.byte_offset();
        match self.inner.next()? {
            Ok(record) => {
                self.index += 1;
                Some(Ok(record))
            }
            Err(source) => Some(Err(StreamError::Decode {
                index: self.index + 1,
                offset,
                source,
            })),
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
