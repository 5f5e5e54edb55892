//! Timeline export and import.
//!
//! A materialized timeline can be written to disk and replayed later without
//! re-running the algorithm.
//!
//! # File Format
//!
//! The `.stpv` format stores one serialized [`Frame`](crate::schema::Frame)
//! per record with optional compression:
//!
//! ```text
//! Header (36 bytes):
//!   Magic: "STPV" (4 bytes)
//!   Version: u16
//!   Flags: u16 (compression in the low 4 bits)
//!   Array length: u32
//!   Frame count: u64
//!   Reserved: 16 bytes
//!
//! Frame data (variable):
//!   Each frame is JSON, optionally LZ4 compressed
//!
//! Frame index table (frame_count * 16 bytes, at the end of the file):
//!   Offset: u64
//!   Size: u64
//! ```

mod format;
mod player;
mod recorder;

pub use format::{
    CompressionType, FrameIndex, TIMELINE_MAGIC, TIMELINE_VERSION, TimelineFlags, TimelineHeader,
};
pub use player::{FrameIterator, TimelineReader};
pub use recorder::{RecorderConfig, RecordingStats, TimelineRecorder};
