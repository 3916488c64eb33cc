//! Writer/Reader roundtrip matrix and truncation behavior for the buffers crate.

use fastpack_buffers::{BufferError, Reader, Writer};

// ---------------------------------------------------------------------------
// Writer/Reader roundtrip matrix
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_signed_widths() {
    let mut w = Writer::new();
    w.i8(i8::MIN);
    w.i16(-1000);
    w.i32(i32::MIN);
    w.i64(i64::MIN);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.i8(), Ok(i8::MIN));
    assert_eq!(r.i16(), Ok(-1000));
    assert_eq!(r.i32(), Ok(i32::MIN));
    assert_eq!(r.i64(), Ok(i64::MIN));
    assert!(r.is_eof());
}

#[test]
fn roundtrip_unsigned_widths() {
    let mut w = Writer::new();
    w.u8(0xff);
    w.u16(u16::MAX);
    w.u32(0x0102_0304);
    w.u64(u64::MAX);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0xff));
    assert_eq!(r.u16(), Ok(u16::MAX));
    assert_eq!(r.u32(), Ok(0x0102_0304));
    assert_eq!(r.u64(), Ok(u64::MAX));
    assert_eq!(r.size(), 0);
}

#[test]
fn roundtrip_floats() {
    let mut w = Writer::new();
    w.f64(-2.5);
    w.buf(&1.5f32.to_be_bytes());
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.f64(), Ok(-2.5));
    assert_eq!(r.f32(), Ok(1.5));
}

#[test]
fn roundtrip_strings() {
    let mut w = Writer::new();
    let n = w.utf8("Olá 👋");
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.utf8(n), Ok("Olá 👋"));
}

// ---------------------------------------------------------------------------
// Truncation
// ---------------------------------------------------------------------------

#[test]
fn every_prefix_of_a_u64_is_rejected() {
    let data = 0x0102_0304_0506_0708u64.to_be_bytes();
    for len in 0..data.len() {
        let mut r = Reader::new(&data[..len]);
        assert_eq!(
            r.u64(),
            Err(BufferError::EndOfBuffer {
                offset: 0,
                needed: 8,
                remaining: len
            })
        );
    }
}

#[test]
fn peek_does_not_advance() {
    let data = [0xc0];
    let mut r = Reader::new(&data);
    assert_eq!(r.peek(), Some(0xc0));
    assert_eq!(r.x, 0);
    r.skip(1).unwrap();
    assert_eq!(r.peek(), None);
}

#[test]
fn errors_report_the_offset_of_the_failed_read() {
    let data = [0x01, 0xff, 0xfe];
    let mut r = Reader::new(&data);
    r.skip(1).unwrap();
    let err = r.utf8(2).unwrap_err();
    assert_eq!(err, BufferError::InvalidUtf8 { offset: 1 });
    assert_eq!(err.offset(), 1);

    r.skip(2).unwrap();
    assert_eq!(r.u16().unwrap_err().offset(), 3);
}
