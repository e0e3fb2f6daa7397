//! One read → copy → allocate pass.

use std::io::BufRead;

use crate::alloc::{allocate, release};
use crate::buffer::BoundedBuf;
use crate::config::GuardConfig;
use crate::copy::copy_bounded;
use crate::errors::GuardError;
use crate::reader::{read_line_bounded, ReadLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// `N`: the line keeps at most `N - 1` bytes.
    pub input_capacity: usize,
    /// `M`: destination size for the copy step.
    pub source_capacity: usize,
    pub alloc_size: usize,
    /// Text to copy; the line just read when `None`.
    pub source: Option<Vec<u8>>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&GuardConfig::default())
    }
}

impl From<&GuardConfig> for SessionOptions {
    fn from(cfg: &GuardConfig) -> Self {
        Self {
            input_capacity: cfg.input_capacity,
            source_capacity: cfg.source_capacity,
            alloc_size: cfg.alloc_size,
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub line: BoundedBuf,
    pub copied: BoundedBuf,
    /// Byte read back from offset 0 of the allocation before release.
    pub value: u8,
}

/// Runs the three steps once, stopping at the first bounded operation that
/// does not succeed.
pub fn run_session<R: BufRead + ?Sized>(
    input: &mut R,
    opts: &SessionOptions,
) -> Result<SessionReport, GuardError> {
    let line = match read_line_bounded(input, opts.input_capacity)? {
        ReadLine::Complete(buf) => buf,
        ReadLine::Truncated(kept) => {
            return Err(GuardError::Truncated {
                kept,
                capacity: opts.input_capacity,
            })
        }
        ReadLine::EndOfStream => return Err(GuardError::EndOfStream),
    };

    let source = opts.source.as_deref().unwrap_or(line.as_bytes());
    let copied = copy_bounded(source, opts.source_capacity)?;

    let mut handle = allocate(opts.alloc_size);
    if let Some(&first) = copied.as_bytes().first() {
        handle.write(0, first)?;
    }
    let value = handle.read(0)?;
    release(&mut handle)?;

    tracing::info!(
        line_len = line.len(),
        copied_len = copied.len(),
        "session complete"
    );
    Ok(SessionReport {
        line,
        copied,
        value,
    })
}
