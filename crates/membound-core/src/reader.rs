//! Bounded line reader.
//!
//! Reads one `\n`-terminated line from a [`BufRead`] into a [`BoundedBuf`]
//! of capacity `N`. At most `N - 1` bytes are stored; the last slot stays
//! reserved for a terminator. The reader works directly on the stream's
//! internal buffer (`fill_buf`/`consume`) so an arbitrarily long line is
//! never materialised in memory.
//!
//! Outcomes:
//!
//! | input                          | result                       |
//! |--------------------------------|------------------------------|
//! | stream already exhausted       | `EndOfStream`                |
//! | line of `L <= N - 1` bytes     | `Complete` with `L` bytes    |
//! | line of `L >= N` bytes         | `Truncated` with `N - 1`     |
//!
//! The excess of a truncated line is consumed and dropped up to and including
//! its `\n`, so the next call starts on the following line.

use std::io::{self, BufRead};

use crate::buffer::BoundedBuf;

const TERMINATOR: u8 = b'\n';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    Complete(BoundedBuf),
    /// More input was available than fit; the excess was discarded.
    Truncated(BoundedBuf),
    EndOfStream,
}

impl ReadLine {
    pub fn content(&self) -> Option<&BoundedBuf> {
        match self {
            ReadLine::Complete(buf) | ReadLine::Truncated(buf) => Some(buf),
            ReadLine::EndOfStream => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ReadLine::Complete(_))
    }
}

/// Reads one line into a buffer of `capacity` bytes, keeping at most
/// `capacity - 1` of them.
pub fn read_line_bounded<R: BufRead + ?Sized>(
    reader: &mut R,
    capacity: usize,
) -> io::Result<ReadLine> {
    let mut buf = BoundedBuf::with_capacity(capacity.saturating_sub(1));
    let mut saw_any = false;
    let mut overflowed = false;

    loop {
        let chunk = match reader.fill_buf() {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if chunk.is_empty() {
            break;
        }
        saw_any = true;

        let (line_part, found_terminator) = match chunk.iter().position(|&b| b == TERMINATOR) {
            Some(idx) => (&chunk[..idx], true),
            None => (chunk, false),
        };

        if !overflowed {
            let taken = buf.extend_bounded(line_part);
            if taken < line_part.len() {
                overflowed = true;
            }
        }

        let used = line_part.len() + usize::from(found_terminator);
        reader.consume(used);
        if found_terminator {
            break;
        }
    }

    if !saw_any {
        tracing::debug!("input stream exhausted before any byte was read");
        return Ok(ReadLine::EndOfStream);
    }

    if overflowed {
        tracing::warn!(
            kept = buf.len(),
            capacity,
            "input line exceeded capacity; excess discarded"
        );
        Ok(ReadLine::Truncated(buf))
    } else {
        tracing::debug!(len = buf.len(), capacity, "bounded line read");
        Ok(ReadLine::Complete(buf))
    }
}
