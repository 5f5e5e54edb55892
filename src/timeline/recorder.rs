//! Timeline recorder: writes frames to a `.stpv` file.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use super::format::{
    CompressionType, FrameIndex, TimelineFlags, TimelineHeader, compress_lz4, encode_frame,
};
use crate::algorithm::Timeline;
use crate::schema::Frame;

/// Configuration for timeline recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub compression: CompressionType,
    /// Record every Nth frame (1 = every frame).
    pub frame_skip: u32,
    /// Maximum frames to record (0 = unlimited).
    pub max_frames: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::None,
            frame_skip: 1,
            max_frames: 0,
        }
    }
}

/// Streams frames to a file.
///
/// Usage:
/// ```ignore
/// let mut recorder = TimelineRecorder::new("bubble.stpv", 16, Default::default())?;
/// for frame in &timeline {
///     recorder.record_frame(frame)?;
/// }
/// recorder.finalize()?;
/// ```
pub struct TimelineRecorder {
    writer: BufWriter<File>,
    header: TimelineHeader,
    frame_indices: Vec<FrameIndex>,
    config: RecorderConfig,
    step_counter: u32,
}

impl TimelineRecorder {
    /// Create a recorder for frames whose arrays have `array_len` elements.
    ///
    /// LZ4 falls back to no compression, with a warning, when the `lz4`
    /// feature is off.
    pub fn new<P: AsRef<Path>>(
        path: P,
        array_len: usize,
        mut config: RecorderConfig,
    ) -> io::Result<Self> {
        let array_len = u32::try_from(array_len).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Array length {array_len} does not fit the header"),
            )
        })?;
        if !config.compression.is_supported() {
            log::warn!(
                "{:?} compression unavailable in this build, writing uncompressed",
                config.compression
            );
            config.compression = CompressionType::None;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let header = TimelineHeader {
            array_len,
            frame_count: 0, // rewritten by finalize
            flags: TimelineFlags {
                compression: config.compression,
            },
        };
        header.write_to(&mut writer)?;

        Ok(Self {
            writer,
            header,
            frame_indices: Vec::new(),
            config,
            step_counter: 0,
        })
    }

    /// Write a whole timeline to `path` in one call.
    pub fn record_timeline<P: AsRef<Path>>(
        path: P,
        timeline: &Timeline,
        config: RecorderConfig,
    ) -> io::Result<RecordingStats> {
        let array_len = timeline.first().map_or(0, |f| f.array.len());
        let mut recorder = Self::new(path, array_len, config)?;
        for frame in timeline {
            recorder.record_frame(frame)?;
        }
        recorder.finalize()
    }

    /// Record one frame.
    ///
    /// Returns true if the frame was written (frames may be skipped per config).
    pub fn record_frame(&mut self, frame: &Frame) -> io::Result<bool> {
        if frame.array.len() != self.header.array_len as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Frame has {} elements, timeline expects {}",
                    frame.array.len(),
                    self.header.array_len
                ),
            ));
        }

        self.step_counter += 1;
        if self.step_counter < self.config.frame_skip {
            return Ok(false);
        }
        self.step_counter = 0;

        if self.config.max_frames > 0 && self.frames_written() >= self.config.max_frames {
            return Ok(false);
        }

        let offset = self.writer.stream_position()?;
        let encoded = encode_frame(frame)?;
        let data = match self.header.flags.compression {
            CompressionType::None => encoded,
            CompressionType::Lz4 => compress_lz4(&encoded)?,
        };

        self.writer.write_all(&data)?;
        self.frame_indices.push(FrameIndex {
            offset,
            size: data.len() as u64,
        });
        Ok(true)
    }

    /// Write the index table and the final header.
    pub fn finalize(mut self) -> io::Result<RecordingStats> {
        let index_offset = self.writer.stream_position()?;
        for index in &self.frame_indices {
            index.write_to(&mut self.writer)?;
        }

        self.header.frame_count = self.frames_written();
        self.writer.seek(SeekFrom::Start(0))?;
        self.header.write_to(&mut self.writer)?;
        self.writer.flush()?;

        let frame_count = self.header.frame_count;
        let frame_bytes = index_offset.saturating_sub(TimelineHeader::SIZE as u64);
        let stats = RecordingStats {
            frame_count,
            total_bytes: index_offset + frame_count * FrameIndex::SIZE as u64,
            average_frame_size: if frame_count > 0 {
                frame_bytes / frame_count
            } else {
                0
            },
            compression: self.header.flags.compression,
        };
        log::debug!("Finalized timeline file: {}", stats);
        Ok(stats)
    }

    pub fn frames_written(&self) -> u64 {
        self.frame_indices.len() as u64
    }
}

/// Statistics from one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingStats {
    pub frame_count: u64,
    /// Total file size in bytes.
    pub total_bytes: u64,
    /// Average stored frame size.
    pub average_frame_size: u64,
    pub compression: CompressionType,
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, {} bytes total, {} bytes/frame avg ({:?} compression)",
            self.frame_count, self.total_bytes, self.average_frame_size, self.compression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{BubbleSort, materialize};
    use std::fs;
    use tempfile::tempdir;

    fn timeline() -> Timeline {
        materialize(&BubbleSort, &[5.0, 3.0, 8.0, 1.0]).unwrap()
    }

    #[test]
    fn test_recorder_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bubble.stpv");

        let timeline = timeline();
        let stats =
            TimelineRecorder::record_timeline(&path, &timeline, RecorderConfig::default()).unwrap();

        assert_eq!(stats.frame_count, timeline.len() as u64);
        assert_eq!(stats.compression, CompressionType::None);
        assert_eq!(fs::metadata(&path).unwrap().len(), stats.total_bytes);
    }

    #[test]
    fn test_recorder_frame_skip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skip.stpv");

        let config = RecorderConfig {
            frame_skip: 5,
            ..Default::default()
        };
        let mut recorder = TimelineRecorder::new(&path, 2, config).unwrap();
        let frame = Frame::snapshot(&[1.0, 2.0]);

        // Frames 5, 10, 15 and 20 are kept.
        let kept = (0..20)
            .filter(|_| recorder.record_frame(&frame).unwrap())
            .count();
        assert_eq!(kept, 4);
        assert_eq!(recorder.finalize().unwrap().frame_count, 4);
    }

    #[test]
    fn test_recorder_max_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("max.stpv");

        let config = RecorderConfig {
            max_frames: 5,
            ..Default::default()
        };
        let mut recorder = TimelineRecorder::new(&path, 1, config).unwrap();
        for i in 0..100 {
            recorder.record_frame(&Frame::snapshot(&[i as f64])).unwrap();
        }
        assert_eq!(recorder.finalize().unwrap().frame_count, 5);
    }

    #[test]
    fn test_recorder_rejects_length_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mismatch.stpv");

        let mut recorder = TimelineRecorder::new(&path, 3, RecorderConfig::default()).unwrap();
        let err = recorder
            .record_frame(&Frame::snapshot(&[1.0, 2.0]))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(recorder.frames_written(), 0);
    }

    #[test]
    fn test_recorder_empty_timeline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.stpv");

        let stats =
            TimelineRecorder::record_timeline(&path, &Timeline::empty(), RecorderConfig::default())
                .unwrap();
        assert_eq!(stats.frame_count, 0);
        assert_eq!(stats.average_frame_size, 0);
        assert_eq!(stats.total_bytes, TimelineHeader::SIZE as u64);
    }
}
