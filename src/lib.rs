//! Zero-allocation, pull-model scanners and writers for RFC 5424 syslog
//! messages carried over RFC 6587 octet-counted framing.
//!
//! Every scanner in this crate follows the same shape: it takes a byte
//! slice and a `&mut usize` cursor, advances the cursor past whatever it
//! recognized, and returns a borrowed slice into the input (or a decoded
//! scalar) on success. None of them allocate, copy, or backtrack — each is
//! a hand-written DFA that walks its input exactly once.
//!
//! - [`frame`] pulls `MSG-LEN SP MSG` frames out of a reader ([`frame::FrameScanner`])
//!   and writes them back out ([`frame::FrameWriter`]).
//! - [`priority`], [`version`], [`timestamp`], [`ident`] scan the HEADER
//!   fields in front of STRUCTURED-DATA: `PRI`, `VERSION`, `TIMESTAMP`,
//!   `HOSTNAME`/`APP-NAME`/`PROCID`/`MSGID`.
//! - [`structured_data`] scans STRUCTURED-DATA itself, dispatching each
//!   `SD-ID`/`PARAM-NAME`/`PARAM-VALUE` triple to a caller-supplied
//!   [`structured_data::StructuredDataVisitor`].
//! - [`value`] classifies a PARAM-VALUE's content and [`escape`] applies or
//!   reverses its backslash-escaping.
//! - [`error`] holds the error taxonomy shared across all of the above.

pub mod error;
pub mod escape;
pub mod frame;
pub mod ident;
pub mod priority;
pub mod structured_data;
pub mod timestamp;
pub mod value;
pub mod version;

pub use error::Error;
pub use frame::{FrameFault, FrameScanner, FrameWriter};
pub use ident::is_ident;
pub use priority::{facility, facility_string, parse_priority, priority_string, scan_priority, severity, severity_string};
pub use structured_data::{parse_structured_data_map, scan_structured_data, StructuredDataMap, StructuredDataVisitor};
pub use timestamp::{parse_timestamp, scan_timestamp, Timestamp};
pub use value::{parse_value, ParsedValue, ValueType};
pub use version::{parse_version, scan_version};
