//! `MsgPackEncoder`: appends single MessagePack items to a buffer.

use fastpack_buffers::Writer;

use super::constants::*;
use crate::{EncodeError, MsgPackExtension};

/// Writes one scalar or one container header at a time, always choosing
/// the smallest lossless format.
///
/// Integers in `-32..=-1` use the negative fixint form; all other negative
/// values use the narrowest signed format, non-negative values the
/// narrowest unsigned one. Floats are always written as binary64.
pub struct MsgPackEncoder {
    pub writer: Writer,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn with_writer(writer: Writer) -> Self {
        Self { writer }
    }

    pub fn reset(&mut self) {
        self.writer.reset();
    }

    pub fn flush(&mut self) -> Vec<u8> {
        self.writer.flush()
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(NIL);
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_u_integer(int as u64);
            return;
        }
        let w = &mut self.writer;
        if int >= -32 {
            w.u8(int as u8);
        } else if int >= i64::from(i8::MIN) {
            w.u8(INT8);
            w.i8(int as i8);
        } else if int >= i64::from(i16::MIN) {
            w.u8(INT16);
            w.i16(int as i16);
        } else if int >= i64::from(i32::MIN) {
            w.u8(INT32);
            w.i32(int as i32);
        } else {
            w.u8(INT64);
            w.i64(int);
        }
    }

    pub fn write_u_integer(&mut self, uint: u64) {
        let w = &mut self.writer;
        if uint <= 0x7f {
            w.u8(uint as u8);
        } else if uint <= 0xff {
            w.u8u8(UINT8, uint as u8);
        } else if uint <= 0xffff {
            w.u8u16(UINT16, uint as u16);
        } else if uint <= 0xffff_ffff {
            w.u8u32(UINT32, uint as u32);
        } else {
            w.u8u64(UINT64, uint);
        }
    }

    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(FLOAT64, float);
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        self.write_str_hdr(s.len())?;
        self.writer.utf8(s);
        Ok(())
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let w = &mut self.writer;
        if length <= MAX_FIX_STR {
            w.u8(FIXSTR | length as u8);
        } else if length <= 0xff {
            w.u8u8(STR8, length as u8);
        } else if length <= 0xffff {
            w.u8u16(STR16, length as u16);
        } else {
            w.u8u32(STR32, u32_len(length)?);
        }
        Ok(())
    }

    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), EncodeError> {
        let length = buf.len();
        let w = &mut self.writer;
        if length <= 0xff {
            w.u8u8(BIN8, length as u8);
        } else if length <= 0xffff {
            w.u8u16(BIN16, length as u16);
        } else {
            w.u8u32(BIN32, u32_len(length)?);
        }
        w.buf(buf);
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let w = &mut self.writer;
        if length <= MAX_FIX_CONTAINER {
            w.u8(FIXARRAY | length as u8);
        } else if length <= 0xffff {
            w.u8u16(ARRAY16, length as u16);
        } else {
            w.u8u32(ARRAY32, u32_len(length)?);
        }
        Ok(())
    }

    pub fn write_map_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let w = &mut self.writer;
        if length <= MAX_FIX_CONTAINER {
            w.u8(FIXMAP | length as u8);
        } else if length <= 0xffff {
            w.u8u16(MAP16, length as u16);
        } else {
            w.u8u32(MAP32, u32_len(length)?);
        }
        Ok(())
    }

    pub fn write_ext(&mut self, ext: &MsgPackExtension) -> Result<(), EncodeError> {
        let length = ext.data.len();
        let w = &mut self.writer;
        match length {
            1 => w.u8(FIXEXT1),
            2 => w.u8(FIXEXT2),
            4 => w.u8(FIXEXT4),
            8 => w.u8(FIXEXT8),
            16 => w.u8(FIXEXT16),
            _ if length <= 0xff => w.u8u8(EXT8, length as u8),
            _ if length <= 0xffff => w.u8u16(EXT16, length as u16),
            _ => w.u8u32(EXT32, u32_len(length)?),
        }
        w.i8(ext.tag);
        w.buf(&ext.data);
        Ok(())
    }
}

fn u32_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_int(i: i64) -> Vec<u8> {
        let mut enc = MsgPackEncoder::new();
        enc.write_integer(i);
        enc.flush()
    }

    #[test]
    fn integer_boundaries_pick_smallest_format() {
        assert_eq!(encode_int(0), [0x00]);
        assert_eq!(encode_int(127), [0x7f]);
        assert_eq!(encode_int(128), [0xcc, 0x80]);
        assert_eq!(encode_int(255), [0xcc, 0xff]);
        assert_eq!(encode_int(256), [0xcd, 0x01, 0x00]);
        assert_eq!(encode_int(65535), [0xcd, 0xff, 0xff]);
        assert_eq!(encode_int(65536), [0xce, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(encode_int(1 << 32)[0], 0xcf);
        assert_eq!(encode_int(-1), [0xff]);
        assert_eq!(encode_int(-32), [0xe0]);
        assert_eq!(encode_int(-33), [0xd0, 0xdf]);
        assert_eq!(encode_int(-128), [0xd0, 0x80]);
        assert_eq!(encode_int(-129), [0xd1, 0xff, 0x7f]);
        assert_eq!(encode_int(-32769)[0], 0xd2);
        assert_eq!(encode_int(i64::MIN).len(), 9);
    }

    #[test]
    fn unsigned_upper_half_uses_uint64() {
        let mut enc = MsgPackEncoder::new();
        enc.write_u_integer(u64::MAX);
        assert_eq!(enc.flush(), [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn string_headers_escalate() {
        let mut enc = MsgPackEncoder::new();
        enc.write_str(&"a".repeat(31)).unwrap();
        assert_eq!(enc.flush()[0], 0xbf);
        enc.write_str(&"a".repeat(32)).unwrap();
        assert_eq!(&enc.flush()[..2], &[0xd9, 32]);
        enc.write_str(&"a".repeat(256)).unwrap();
        assert_eq!(&enc.flush()[..3], &[0xda, 0x01, 0x00]);
        enc.write_str(&"a".repeat(65536)).unwrap();
        assert_eq!(&enc.flush()[..5], &[0xdb, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn string_length_counts_utf8_bytes() {
        let mut enc = MsgPackEncoder::new();
        enc.write_str("Olá").unwrap();
        let out = enc.flush();
        assert_eq!(out[0], 0xa4);
        assert_eq!(&out[1..], "Olá".as_bytes());
    }

    #[test]
    fn binary_headers_escalate() {
        let mut enc = MsgPackEncoder::new();
        enc.write_bin(&[]).unwrap();
        assert_eq!(enc.flush(), [0xc4, 0x00]);
        enc.write_bin(&[7; 300]).unwrap();
        assert_eq!(&enc.flush()[..3], &[0xc5, 0x01, 0x2c]);
    }

    #[test]
    fn container_headers() {
        let mut enc = MsgPackEncoder::new();
        enc.write_arr_hdr(15).unwrap();
        enc.write_arr_hdr(16).unwrap();
        enc.write_map_hdr(0).unwrap();
        enc.write_map_hdr(70_000).unwrap();
        assert_eq!(
            enc.flush(),
            [0x9f, 0xdc, 0x00, 0x10, 0x80, 0xdf, 0x00, 0x01, 0x11, 0x70]
        );
    }

    #[test]
    fn ext_headers() {
        let mut enc = MsgPackEncoder::new();
        enc.write_ext(&MsgPackExtension::new(5, vec![1, 2, 3, 4])).unwrap();
        assert_eq!(enc.flush(), [0xd6, 0x05, 1, 2, 3, 4]);
        enc.write_ext(&MsgPackExtension::new(-1, vec![0; 3])).unwrap();
        assert_eq!(enc.flush(), [0xc7, 0x03, 0xff, 0, 0, 0]);
    }

    #[test]
    fn float_and_constants() {
        let mut enc = MsgPackEncoder::new();
        enc.write_nil();
        enc.write_boolean(false);
        enc.write_boolean(true);
        enc.write_float(0.5);
        assert_eq!(
            enc.flush(),
            [0xc0, 0xc2, 0xc3, 0xcb, 0x3f, 0xe0, 0, 0, 0, 0, 0, 0]
        );
    }
}
