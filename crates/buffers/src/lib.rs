//! Binary buffer utilities for fastpack.
//!
//! This crate provides the byte-level plumbing shared by the codec:
//!
//! - [`Reader`] - Reads big-endian binary data from a byte slice with a
//!   bounds-checked cursor
//! - [`Writer`] - Writes big-endian binary data to an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use fastpack_buffers::{Reader, Writer};
//!
//! // Write some data
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.utf8("hello");
//! let data = writer.flush();
//!
//! // Read it back
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u16(), Ok(0x0203));
//! assert_eq!(reader.utf8(5), Ok("hello"));
//! assert!(reader.is_eof());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Cursor position at which the read was attempted.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the buffer.
        remaining: usize,
    },
    /// Invalid UTF-8 sequence in a string starting at `offset`.
    InvalidUtf8 { offset: usize },
}

impl BufferError {
    /// Byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            BufferError::EndOfBuffer { offset, .. } | BufferError::InvalidUtf8 { offset } => {
                *offset
            }
        }
    }
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "end of buffer at offset {offset}: needed {needed} bytes, {remaining} remaining"
            ),
            BufferError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 sequence at offset {offset}")
            }
        }
    }
}

impl std::error::Error for BufferError {}
