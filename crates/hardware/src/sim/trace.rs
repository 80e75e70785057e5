//! Memory trace reading.
//!
//! Traces are plain text, one access per line:
//!
//! ```text
//! R 7f588cd8eb58
//! W 7f588cd8eb58
//! ```
//!
//! The operation is `R` or `W` in either case, followed by whitespace and a
//! hexadecimal address without a `0x` prefix. Blank lines are ignored.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::common::{AccessType, parse_hex_address};

/// One trace operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraceRecord {
    /// Read or write.
    pub op: AccessType,
    /// Raw address.
    pub address: u64,
}

impl TraceRecord {
    /// A read of `address`.
    pub const fn read(address: u64) -> Self {
        Self {
            op: AccessType::Read,
            address,
        }
    }

    /// A write of `address`.
    pub const fn write(address: u64) -> Self {
        Self {
            op: AccessType::Write,
            address,
        }
    }
}

/// Errors raised while locating or reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A line is not `<R|W> <hex address>`.
    #[error("malformed trace line {line}: {content:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// The trace file was not found in the start directory or any parent.
    #[error("could not find trace file {0:?}")]
    NotFound(String),
}

/// Parses one trace line.
///
/// # Returns
///
/// `Ok(None)` for a blank line, `Ok(Some(record))` for a valid one.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] if the operation or address column is
/// invalid or if extra columns follow the address.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceRecord>, TraceError> {
    let mut fields = line.split_whitespace();
    let Some(op_field) = fields.next() else {
        return Ok(None);
    };

    let malformed = || TraceError::Malformed {
        line: line_no,
        content: line.to_owned(),
    };

    let op = op_field.parse::<AccessType>().map_err(|_| malformed())?;
    let address = fields
        .next()
        .ok_or_else(malformed)
        .and_then(|text| parse_hex_address(text).map_err(|_| malformed()))?;
    if fields.next().is_some() {
        return Err(malformed());
    }

    Ok(Some(TraceRecord { op, address }))
}

/// Reads a whole trace from `reader`.
///
/// # Errors
///
/// Returns the first I/O or parse error; no line is skipped silently.
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(record) = parse_line(&line?, i + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Loads a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened, or any error from
/// [`read_trace`].
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, TraceError> {
    let path = path.as_ref();
    let records = read_trace(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), records = records.len(), "loaded trace");
    Ok(records)
}

/// Locates a trace file by name.
///
/// Looks for `name` in `start_dir` first and then in each parent directory in
/// turn. Absolute names are returned as-is when they exist.
///
/// # Errors
///
/// Returns [`TraceError::NotFound`] once the filesystem root has been searched.
pub fn resolve_trace_path(
    name: impl AsRef<Path>,
    start_dir: impl AsRef<Path>,
) -> Result<PathBuf, TraceError> {
    let name = name.as_ref();
    let not_found = || TraceError::NotFound(name.display().to_string());

    if name.is_absolute() {
        return if name.is_file() {
            Ok(name.to_path_buf())
        } else {
            Err(not_found())
        };
    }

    for dir in start_dir.as_ref().ancestors() {
        let candidate = dir.join(name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "resolved trace");
            return Ok(candidate);
        }
    }
    Err(not_found())
}

/// The name a trace is reported under: its file name, or the full path if it
/// has none.
pub fn trace_identifier(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
