//! Binary layout of `.stpv` timeline files.

use std::io::{self, Read, Write};

use crate::schema::Frame;

/// Magic bytes identifying a timeline file.
pub const TIMELINE_MAGIC: &[u8; 4] = b"STPV";

/// Current format version.
pub const TIMELINE_VERSION: u16 = 1;

/// Compression applied to each frame record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionType {
    #[default]
    None = 0,
    /// LZ4 block compression (requires the `lz4` feature).
    Lz4 = 1,
}

impl CompressionType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Lz4),
            _ => None,
        }
    }

    /// Whether this build can read and write the compression type.
    pub fn is_supported(self) -> bool {
        match self {
            CompressionType::None => true,
            CompressionType::Lz4 => cfg!(feature = "lz4"),
        }
    }
}

/// Header flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineFlags {
    /// Compression type (lower 4 bits).
    pub compression: CompressionType,
}

impl TimelineFlags {
    pub fn to_u16(self) -> u16 {
        self.compression as u16
    }

    pub fn from_u16(v: u16) -> io::Result<Self> {
        let compression = CompressionType::from_u8((v & 0x0F) as u8).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown compression type in flags {v:#06x}"),
            )
        })?;
        Ok(Self { compression })
    }
}

/// File header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineHeader {
    /// Length of each frame's array.
    pub array_len: u32,
    pub frame_count: u64,
    pub flags: TimelineFlags,
}

impl TimelineHeader {
    /// Magic(4) + Version(2) + Flags(2) + ArrayLen(4) + FrameCount(8) + Reserved(16) = 36
    pub const SIZE: usize = 36;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(TIMELINE_MAGIC)?;
        w.write_all(&TIMELINE_VERSION.to_le_bytes())?;
        w.write_all(&self.flags.to_u16().to_le_bytes())?;
        w.write_all(&self.array_len.to_le_bytes())?;
        w.write_all(&self.frame_count.to_le_bytes())?;
        w.write_all(&[0u8; 16])?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != TIMELINE_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Invalid STPV magic bytes",
            ));
        }

        let mut buf2 = [0u8; 2];
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != TIMELINE_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported STPV version: {}", version),
            ));
        }

        r.read_exact(&mut buf2)?;
        let flags = TimelineFlags::from_u16(u16::from_le_bytes(buf2))?;

        r.read_exact(&mut buf4)?;
        let array_len = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf8)?;
        let frame_count = u64::from_le_bytes(buf8);

        let mut reserved = [0u8; 16];
        r.read_exact(&mut reserved)?;

        Ok(Self {
            array_len,
            frame_count,
            flags,
        })
    }
}

/// Location of one frame record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameIndex {
    /// Byte offset from start of file.
    pub offset: u64,
    /// Stored (possibly compressed) size in bytes.
    pub size: u64,
}

impl FrameIndex {
    pub const SIZE: usize = 16;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.offset.to_le_bytes())?;
        w.write_all(&self.size.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf8)?;
        let offset = u64::from_le_bytes(buf8);

        r.read_exact(&mut buf8)?;
        let size = u64::from_le_bytes(buf8);

        Ok(Self { offset, size })
    }
}

pub fn encode_frame(frame: &Frame) -> io::Result<Vec<u8>> {
    serde_json::to_vec(frame).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn decode_frame(bytes: &[u8]) -> io::Result<Frame> {
    serde_json::from_slice(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(feature = "lz4")]
pub fn compress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    Ok(lz4_flex::compress_prepend_size(data))
}

#[cfg(feature = "lz4")]
pub fn decompress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    lz4_flex::decompress_size_prepended(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(not(feature = "lz4"))]
pub fn compress_lz4(_data: &[u8]) -> io::Result<Vec<u8>> {
    Err(lz4_unavailable())
}

#[cfg(not(feature = "lz4"))]
pub fn decompress_lz4(_data: &[u8]) -> io::Result<Vec<u8>> {
    Err(lz4_unavailable())
}

#[cfg(not(feature = "lz4"))]
fn lz4_unavailable() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "LZ4 timelines require the lz4 feature",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Counters, Highlights};
    use std::io::Cursor;

    #[test]
    fn test_header_layout() {
        let header = TimelineHeader {
            array_len: 16,
            frame_count: 1000,
            flags: TimelineFlags {
                compression: CompressionType::Lz4,
            },
        };

        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), TimelineHeader::SIZE);
        assert_eq!(&buf[..4], b"STPV");

        let decoded = TimelineHeader::read_from(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_header_rejects_bad_magic_and_version() {
        let mut buf = Vec::new();
        TimelineHeader {
            array_len: 1,
            frame_count: 1,
            flags: TimelineFlags::default(),
        }
        .write_to(&mut buf)
        .unwrap();

        let mut bad_magic = buf.clone();
        bad_magic[0] = b'X';
        let err = TimelineHeader::read_from(&mut Cursor::new(&bad_magic)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut bad_version = buf.clone();
        bad_version[4] = 99;
        let err = TimelineHeader::read_from(&mut Cursor::new(&bad_version)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut bad_flags = buf;
        bad_flags[6] = 0x0F;
        assert!(TimelineHeader::read_from(&mut Cursor::new(&bad_flags)).is_err());
    }

    #[test]
    fn test_frame_record_keeps_annotations() {
        let mut counters = Counters::with_keys(&["comparisons"]);
        counters.bump("comparisons");
        let frame = Frame::snapshot(&[3.0, 1.0])
            .line(2)
            .counters(&counters)
            .highlights(Highlights::compared(0, 1))
            .explain("Compare a[0] (3) vs a[1] (1).");

        let decoded = decode_frame(&encode_frame(&frame).unwrap()).unwrap();
        assert_eq!(decoded, frame);
        assert!(decode_frame(b"{not json").is_err());
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn test_lz4_shrinks_repetitive_data() {
        let data = vec![7u8; 4096];
        let packed = compress_lz4(&data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(decompress_lz4(&packed).unwrap(), data);
    }
}
