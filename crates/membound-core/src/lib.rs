//! Bounded input, capacity-checked copies and allocation handles that cannot
//! be used after release, plus a lexical scanner for the C calls they
//! replace (`gets`, `strcpy`, use after `free`).

pub mod alloc;
pub mod buffer;
pub mod config;
pub mod copy;
pub mod errors;
pub mod reader;
pub mod scan;
pub mod session;

pub use alloc::{allocate, release, AllocError, Allocation, Handle, HandleState};
pub use buffer::BoundedBuf;
pub use config::{load_config, ConfigError, GuardConfig};
pub use copy::{copy_bounded, CopyError};
pub use errors::{GuardError, GuardErrorKind};
pub use reader::{read_line_bounded, ReadLine};
pub use scan::{scan_file, scan_source, Finding, ScanError, ScanReport};
pub use session::{run_session, SessionOptions, SessionReport};
