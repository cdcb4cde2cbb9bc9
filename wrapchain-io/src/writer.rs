//! Output writer for serialized chains

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use wrapchain_format::Result;

/// Destination of a serialized chain
pub enum OutputSink {
    /// Create or truncate a file
    Path(PathBuf),
    /// Any writer (stdout, buffers in tests)
    Writer(Box<dyn Write + Send>),
}

impl OutputSink {
    /// Path of the destination, when it is a file
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            OutputSink::Path(path) => Some(path),
            OutputSink::Writer(_) => None,
        }
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputSink::Path(path) => f.debug_tuple("Path").field(path).finish(),
            OutputSink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Write `text` to `sink`, returning the number of bytes written.
pub fn write_chain(sink: OutputSink, text: &str) -> Result<usize> {
    match sink {
        OutputSink::Path(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }
        OutputSink::Writer(mut writer) => {
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }
    }
    Ok(text.len())
}
