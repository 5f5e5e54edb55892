//! Timeline reader for replaying recorded `.stpv` files.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::format::{
    CompressionType, FrameIndex, TimelineHeader, decode_frame, decompress_lz4,
};
use crate::algorithm::Timeline;
use crate::schema::Frame;

/// Random-access reader over a recorded timeline.
///
/// Usage:
/// ```ignore
/// let mut reader = TimelineReader::open("bubble.stpv")?;
/// let last = reader.read_frame(reader.frame_count() - 1)?;
/// let timeline = reader.read_all()?;
/// ```
pub struct TimelineReader {
    reader: BufReader<File>,
    header: TimelineHeader,
    frame_indices: Vec<FrameIndex>,
}

impl TimelineReader {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let header = TimelineHeader::read_from(&mut reader)?;
        if !header.flags.compression.is_supported() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!(
                    "{:?} compressed timelines are not supported by this build",
                    header.flags.compression
                ),
            ));
        }

        // The index table sits at the very end of the file.
        let table_size = header
            .frame_count
            .checked_mul(FrameIndex::SIZE as u64)
            .ok_or_else(|| truncated("frame count overflows the index table"))?;
        let file_len = reader.seek(SeekFrom::End(0))?;
        let index_start = file_len
            .checked_sub(table_size)
            .filter(|&start| start >= TimelineHeader::SIZE as u64)
            .ok_or_else(|| truncated("file is shorter than its index table"))?;
        reader.seek(SeekFrom::Start(index_start))?;

        let mut frame_indices = Vec::with_capacity(header.frame_count as usize);
        for _ in 0..header.frame_count {
            let index = FrameIndex::read_from(&mut reader)?;
            if index.offset.saturating_add(index.size) > index_start {
                return Err(truncated("frame record overlaps the index table"));
            }
            frame_indices.push(index);
        }

        log::debug!(
            "Opened timeline with {} frames of length {}",
            header.frame_count,
            header.array_len
        );

        Ok(Self {
            reader,
            header,
            frame_indices,
        })
    }

    pub fn header(&self) -> &TimelineHeader {
        &self.header
    }

    pub fn frame_count(&self) -> u64 {
        self.header.frame_count
    }

    pub fn array_len(&self) -> usize {
        self.header.array_len as usize
    }

    /// Read a specific frame by index.
    pub fn read_frame(&mut self, frame_index: u64) -> io::Result<Frame> {
        let index = usize::try_from(frame_index)
            .ok()
            .and_then(|i| self.frame_indices.get(i))
            .copied()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "Frame index {} out of range ({} frames)",
                        frame_index, self.header.frame_count
                    ),
                )
            })?;

        self.reader.seek(SeekFrom::Start(index.offset))?;
        let mut data = vec![0u8; index.size as usize];
        self.reader.read_exact(&mut data)?;

        let raw = match self.header.flags.compression {
            CompressionType::None => data,
            CompressionType::Lz4 => decompress_lz4(&data)?,
        };
        decode_frame(&raw)
    }

    pub fn frames(&mut self) -> FrameIterator<'_> {
        FrameIterator {
            reader: self,
            current: 0,
        }
    }

    /// Load every frame into memory.
    pub fn read_all(&mut self) -> io::Result<Timeline> {
        self.frames().collect()
    }
}

fn truncated(reason: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Corrupt timeline file: {reason}"),
    )
}

/// Iterator over recorded frames.
pub struct FrameIterator<'a> {
    reader: &'a mut TimelineReader,
    current: u64,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = io::Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.reader.frame_count() {
            return None;
        }

        let result = self.reader.read_frame(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.reader.frame_count() - self.current) as usize;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FrameIterator<'a> {}
