//! Auto-growing binary buffer writer.

/// Writes big-endian binary data into a growable buffer.
///
/// The combined `u8*` methods write a one-byte header followed by a
/// fixed-width payload, which is the shape of almost every MessagePack
/// item.
///
/// # Example
///
/// ```
/// use fastpack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8u16(0xcd, 0x0100);
/// assert_eq!(writer.flush(), vec![0xcd, 0x01, 0x00]);
/// assert!(writer.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    /// Bytes written so far.
    pub uint8: Vec<u8>,
}

impl Writer {
    /// Default capacity reserved by [`Writer::new`].
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Discards everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Makes room for at least `n` more bytes.
    pub fn ensure_capacity(&mut self, n: usize) {
        self.uint8.reserve(n);
    }

    /// Returns the written bytes and leaves the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Header byte followed by a `u8` payload.
    #[inline]
    pub fn u8u8(&mut self, head: u8, val: u8) {
        self.uint8.push(head);
        self.uint8.push(val);
    }

    /// Header byte followed by a big-endian `u16` payload.
    #[inline]
    pub fn u8u16(&mut self, head: u8, val: u16) {
        self.uint8.push(head);
        self.u16(val);
    }

    /// Header byte followed by a big-endian `u32` payload.
    #[inline]
    pub fn u8u32(&mut self, head: u8, val: u32) {
        self.uint8.push(head);
        self.u32(val);
    }

    /// Header byte followed by a big-endian `u64` payload.
    #[inline]
    pub fn u8u64(&mut self, head: u8, val: u64) {
        self.uint8.push(head);
        self.u64(val);
    }

    /// Header byte followed by a big-endian IEEE-754 binary64 payload.
    #[inline]
    pub fn u8f64(&mut self, head: u8, val: f64) {
        self.uint8.push(head);
        self.f64(val);
    }

    /// Appends raw bytes.
    #[inline]
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Appends the UTF-8 bytes of `s` and returns how many were written.
    #[inline]
    pub fn utf8(&mut self, s: &str) -> usize {
        self.uint8.extend_from_slice(s.as_bytes());
        s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_payload_pairs() {
        let mut w = Writer::new();
        w.u8u8(0xcc, 0xff);
        w.u8u32(0xce, 0x0102_0304);
        w.u8u64(0xcf, 1);
        assert_eq!(
            w.flush(),
            vec![0xcc, 0xff, 0xce, 1, 2, 3, 4, 0xcf, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_f64_is_big_endian() {
        let mut w = Writer::new();
        w.u8f64(0xcb, 1.0);
        assert_eq!(w.flush(), vec![0xcb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_reset_and_flush() {
        let mut w = Writer::new();
        w.utf8("abc");
        assert_eq!(w.len(), 3);
        w.reset();
        assert!(w.is_empty());
        w.i8(-1);
        assert_eq!(w.flush(), vec![0xff]);
        assert!(w.is_empty());
    }
}
