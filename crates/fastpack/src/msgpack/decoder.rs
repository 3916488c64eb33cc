//! `MsgPackReader`: reads one MessagePack header (plus any scalar payload)
//! at a time from a borrowed byte slice.

use fastpack_buffers::Reader;

use super::constants::*;
use crate::DecodeError;

/// One decoded item header.
///
/// Scalars carry their payload; containers carry their element or pair
/// count, with the items following in the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Header<'a> {
    Nil,
    Bool(bool),
    /// Any integer that fits `i64`, signed or unsigned on the wire.
    Int(i64),
    /// A uint64 above `i64::MAX`.
    UInt(u64),
    Float(f64),
    Str(&'a str),
    Bin(&'a [u8]),
    Array(usize),
    Map(usize),
    Ext(i8, &'a [u8]),
}

/// Bounds-checked MessagePack reader.
///
/// Every declared length is checked against the remaining input before
/// anything is read or allocated. Container counts are checked against one
/// byte per element (two per map pair), the smallest possible encoding, so a
/// forged count can never drive an allocation larger than the input.
pub struct MsgPackReader<'a> {
    reader: Reader<'a>,
}

impl<'a> MsgPackReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
        }
    }

    pub fn offset(&self) -> usize {
        self.reader.x
    }

    pub fn remaining(&self) -> usize {
        self.reader.size()
    }

    pub fn is_eof(&self) -> bool {
        self.reader.is_eof()
    }

    /// Input bytes from `start` up to the cursor.
    pub fn bytes_since(&self, start: usize) -> &'a [u8] {
        let data = self.reader.uint8;
        &data[start.min(self.reader.x)..self.reader.x]
    }

    pub fn read_header(&mut self) -> Result<Header<'a>, DecodeError> {
        let offset = self.reader.x;
        let byte = self.reader.u8()?;
        let header = match byte {
            0x00..=0x7f => Header::Int(i64::from(byte)),
            0x80..=0x8f => Header::Map(self.map_count(usize::from(byte & 0x0f))?),
            0x90..=0x9f => Header::Array(self.array_count(usize::from(byte & 0x0f))?),
            0xa0..=0xbf => Header::Str(self.reader.utf8(usize::from(byte & 0x1f))?),
            NIL => Header::Nil,
            FALSE => Header::Bool(false),
            TRUE => Header::Bool(true),
            BIN8 => {
                let n = usize::from(self.reader.u8()?);
                Header::Bin(self.reader.buf(n)?)
            }
            BIN16 => {
                let n = usize::from(self.reader.u16()?);
                Header::Bin(self.reader.buf(n)?)
            }
            BIN32 => {
                let n = self.len32()?;
                Header::Bin(self.reader.buf(n)?)
            }
            EXT8 => {
                let n = usize::from(self.reader.u8()?);
                self.ext(n)?
            }
            EXT16 => {
                let n = usize::from(self.reader.u16()?);
                self.ext(n)?
            }
            EXT32 => {
                let n = self.len32()?;
                self.ext(n)?
            }
            FLOAT32 => Header::Float(f64::from(self.reader.f32()?)),
            FLOAT64 => Header::Float(self.reader.f64()?),
            UINT8 => Header::Int(i64::from(self.reader.u8()?)),
            UINT16 => Header::Int(i64::from(self.reader.u16()?)),
            UINT32 => Header::Int(i64::from(self.reader.u32()?)),
            UINT64 => {
                let uint = self.reader.u64()?;
                match i64::try_from(uint) {
                    Ok(int) => Header::Int(int),
                    Err(_) => Header::UInt(uint),
                }
            }
            INT8 => Header::Int(i64::from(self.reader.i8()?)),
            INT16 => Header::Int(i64::from(self.reader.i16()?)),
            INT32 => Header::Int(i64::from(self.reader.i32()?)),
            INT64 => Header::Int(self.reader.i64()?),
            FIXEXT1 => self.ext(1)?,
            FIXEXT2 => self.ext(2)?,
            FIXEXT4 => self.ext(4)?,
            FIXEXT8 => self.ext(8)?,
            FIXEXT16 => self.ext(16)?,
            STR8 => {
                let n = usize::from(self.reader.u8()?);
                Header::Str(self.reader.utf8(n)?)
            }
            STR16 => {
                let n = usize::from(self.reader.u16()?);
                Header::Str(self.reader.utf8(n)?)
            }
            STR32 => {
                let n = self.len32()?;
                Header::Str(self.reader.utf8(n)?)
            }
            ARRAY16 => {
                let n = usize::from(self.reader.u16()?);
                Header::Array(self.array_count(n)?)
            }
            ARRAY32 => {
                let n = self.len32()?;
                Header::Array(self.array_count(n)?)
            }
            MAP16 => {
                let n = usize::from(self.reader.u16()?);
                Header::Map(self.map_count(n)?)
            }
            MAP32 => {
                let n = self.len32()?;
                Header::Map(self.map_count(n)?)
            }
            NEG_FIXINT..=0xff => Header::Int(i64::from(byte as i8)),
            NEVER_USED => return Err(DecodeError::InvalidHeader { offset, byte }),
        };
        Ok(header)
    }

    fn len32(&mut self) -> Result<usize, DecodeError> {
        let n = self.reader.u32()?;
        // Anything beyond the address space cannot be in the buffer either.
        usize::try_from(n).map_err(|_| DecodeError::Truncated {
            offset: self.reader.x,
            needed: usize::MAX,
            remaining: self.reader.size(),
        })
    }

    fn ext(&mut self, length: usize) -> Result<Header<'a>, DecodeError> {
        self.reader.ensure(length.saturating_add(1))?;
        let tag = self.reader.i8()?;
        Ok(Header::Ext(tag, self.reader.buf(length)?))
    }

    fn array_count(&self, count: usize) -> Result<usize, DecodeError> {
        self.reader.ensure(count)?;
        Ok(count)
    }

    fn map_count(&self, count: usize) -> Result<usize, DecodeError> {
        self.reader.ensure(count.saturating_mul(2))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(data: &[u8]) -> Result<Header<'_>, DecodeError> {
        MsgPackReader::new(data).read_header()
    }

    #[test]
    fn reads_both_negative_forms() {
        assert_eq!(header(&[0xe0]), Ok(Header::Int(-32)));
        assert_eq!(header(&[0xff]), Ok(Header::Int(-1)));
        assert_eq!(header(&[0xd0, 0xe0]), Ok(Header::Int(-32)));
        assert_eq!(header(&[0xd1, 0xff, 0xff]), Ok(Header::Int(-1)));
    }

    #[test]
    fn unsigned_headers_normalize_to_int() {
        assert_eq!(header(&[0xcc, 0x05]), Ok(Header::Int(5)));
        assert_eq!(
            header(&[0xcf, 0, 0, 0, 0, 0, 0, 0, 1]),
            Ok(Header::Int(1))
        );
        assert_eq!(
            header(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Ok(Header::UInt(u64::MAX))
        );
    }

    #[test]
    fn float32_is_widened() {
        assert_eq!(
            header(&[0xca, 0x3f, 0xc0, 0x00, 0x00]),
            Ok(Header::Float(1.5))
        );
    }

    #[test]
    fn never_used_byte_is_rejected() {
        assert_eq!(
            header(&[0xc1]),
            Err(DecodeError::InvalidHeader {
                offset: 0,
                byte: 0xc1
            })
        );
    }

    #[test]
    fn declared_length_beyond_input_is_truncation() {
        assert!(matches!(
            header(&[0xd9, 0x05, b'a', b'b']),
            Err(DecodeError::Truncated { offset: 2, needed: 5, remaining: 2 })
        ));
        assert!(matches!(
            header(&[0xc6, 0xff, 0xff, 0xff, 0xff]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn forged_container_counts_are_rejected() {
        assert!(matches!(
            header(&[0xdd, 0xff, 0xff, 0xff, 0xff, 0xc0]),
            Err(DecodeError::Truncated { .. })
        ));
        // Two pairs need at least four bytes.
        assert!(matches!(
            header(&[0x82, 0xc0, 0xc0, 0xc0]),
            Err(DecodeError::Truncated { .. })
        ));
        assert_eq!(header(&[0x81, 0xc0, 0xc0]), Ok(Header::Map(1)));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(
            header(&[0xa2, 0xc3, 0x28]),
            Err(DecodeError::InvalidUtf8 { offset: 1 })
        );
    }

    #[test]
    fn ext_family() {
        assert_eq!(header(&[0xd4, 0x07, 0xaa]), Ok(Header::Ext(7, &[0xaa])));
        assert_eq!(
            header(&[0xc7, 0x02, 0xff, 1, 2]),
            Ok(Header::Ext(-1, &[1, 2]))
        );
        assert!(matches!(
            header(&[0xd8, 0x01, 0x00]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn bytes_since_tracks_consumed_span() {
        let data = [0xa1, b'k', 0x01];
        let mut reader = MsgPackReader::new(&data);
        let start = reader.offset();
        reader.read_header().unwrap();
        assert_eq!(reader.bytes_since(start), &[0xa1, b'k']);
        assert_eq!(reader.remaining(), 1);
    }
}
