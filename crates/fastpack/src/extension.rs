//! [`MsgPackExtension`]: raw MessagePack extension payload.

/// A MessagePack `ext` item that no registered type claims.
///
/// The decoder produces it for the fixext/ext families (0xD4–0xD8,
/// 0xC7–0xC9) written by other encoders, and the encoder writes it back with
/// the smallest ext header, so foreign payloads survive a round-trip
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgPackExtension {
    /// Application-defined type code. Negative codes are reserved by the
    /// MessagePack specification (e.g. `-1` for timestamps).
    pub tag: i8,
    pub data: Vec<u8>,
}

impl MsgPackExtension {
    pub fn new(tag: i8, data: Vec<u8>) -> Self {
        Self { tag, data }
    }
}
