//! [`Unpacker`]: recursive decoder from MessagePack bytes to [`Value`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::trace;

use crate::envelope::{Kind, ESCAPE_KEY, MODULE_KEY};
use crate::msgpack::{Header, MsgPackReader};
use crate::{DecodeError, Fields, MsgPackExtension, Options, Packer, Registry, Value};

/// Decodes values against one registry snapshot.
///
/// The whole input must be exactly one value. Maps keep wire order; a key
/// repeated on the wire keeps its first position and takes the last value.
/// Keys are compared by their minimal encoding, so `1` written as fixint and
/// as uint8 is the same key.
pub struct Unpacker<'r> {
    registry: &'r Registry,
    options: Options,
}

impl<'r> Unpacker<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, Options::default())
    }

    pub fn with_options(registry: &'r Registry, options: Options) -> Self {
        Self { registry, options }
    }

    pub fn unpack(&self, data: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = MsgPackReader::new(data);
        let value = self.read_any(&mut reader, 0)?;
        if !reader.is_eof() {
            return Err(DecodeError::TrailingData {
                offset: reader.offset(),
                count: reader.remaining(),
            });
        }
        Ok(value)
    }

    fn enter(&self, offset: usize, depth: usize) -> Result<usize, DecodeError> {
        if depth >= self.options.max_depth {
            return Err(DecodeError::DepthLimit {
                offset,
                limit: self.options.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn read_any(&self, reader: &mut MsgPackReader<'_>, depth: usize) -> Result<Value, DecodeError> {
        let offset = reader.offset();
        let value = match reader.read_header()? {
            Header::Nil => Value::Nil,
            Header::Bool(b) => Value::Bool(b),
            Header::Int(int) => Value::Integer(int),
            Header::UInt(uint) => Value::UInteger(uint),
            Header::Float(float) => Value::Float(float),
            Header::Str(s) => Value::Str(s.to_owned()),
            Header::Bin(buf) => Value::Bytes(buf.to_vec()),
            Header::Ext(tag, data) => {
                Value::Extension(Box::new(MsgPackExtension::new(tag, data.to_vec())))
            }
            Header::Array(count) => {
                let depth = self.enter(offset, depth)?;
                let mut items = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    items.push(self.read_any(reader, depth)?);
                }
                Value::Array(items)
            }
            Header::Map(count) => {
                let depth = self.enter(offset, depth)?;
                self.read_map(reader, offset, count, depth)?
            }
        };
        Ok(value)
    }

    fn read_map(
        &self,
        reader: &mut MsgPackReader<'_>,
        offset: usize,
        count: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(count.min(reader.remaining()));
        let mut positions: HashMap<Vec<u8>, usize> = HashMap::new();
        let mut canonical = Packer::with_options(self.registry, self.options);
        let mut escaped = false;
        for i in 0..count {
            let key_start = reader.offset();
            let key = self.read_any(reader, depth)?;
            let key_bytes = match canonical.pack(&key) {
                Ok(bytes) => bytes,
                Err(_) => reader.bytes_since(key_start).to_vec(),
            };
            let value = self.read_any(reader, depth)?;
            if i == 0 && value.is_nil() && key.as_str() == Some(ESCAPE_KEY) {
                escaped = true;
                continue;
            }
            match positions.entry(key_bytes) {
                Entry::Occupied(slot) => {
                    if let Some(pair) = pairs.get_mut(*slot.get()) {
                        pair.1 = value;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(pairs.len());
                    pairs.push((key, value));
                }
            }
        }
        if escaped || !self.options.resolve_extensions {
            return Ok(Value::Map(pairs));
        }
        self.resolve_envelope(offset, pairs)
    }

    /// Rebuilds a registered instance from `{marker: tag, ...}`, or hands the
    /// map back untouched when it is not a resolvable envelope.
    fn resolve_envelope(
        &self,
        offset: usize,
        pairs: Vec<(Value, Value)>,
    ) -> Result<Value, DecodeError> {
        let header = match pairs.first() {
            Some((Value::Str(marker), Value::Str(tag))) => {
                Kind::from_marker(marker).map(|kind| (kind, tag.clone()))
            }
            _ => None,
        };
        let Some((kind, tag)) = header else {
            return Ok(Value::Map(pairs));
        };
        let entry = match self.registry.resolve_by_tag(&tag) {
            Some(entry) if entry.kind() == kind => entry,
            _ => {
                trace!(marker = kind.marker(), %tag, "unknown tag, keeping plain map");
                return Ok(Value::Map(pairs));
            }
        };
        if !pairs.iter().all(|(key, _)| matches!(key, Value::Str(_))) {
            trace!(%tag, "envelope with non-string field names, keeping plain map");
            return Ok(Value::Map(pairs));
        }

        let mut rest = pairs.into_iter().skip(1).peekable();
        if rest
            .peek()
            .is_some_and(|(key, _)| key.as_str() == Some(MODULE_KEY))
        {
            rest.next();
        }
        let fields: Fields = rest
            .filter_map(|(key, value)| match key {
                Value::Str(name) => Some((name, value)),
                _ => None,
            })
            .collect();
        entry
            .decode(fields)
            .map(Value::Object)
            .map_err(|source| DecodeError::Extension {
                offset,
                tag,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldError;

    fn unpack(data: &[u8]) -> Result<Value, DecodeError> {
        Unpacker::new(&Registry::with_builtins()).unpack(data)
    }

    #[test]
    fn duplicate_keys_last_value_wins_in_first_slot() {
        // {"a": 1, "b": 2, "a": 3}
        let data = [0x83, 0xa1, b'a', 0x01, 0xa1, b'b', 0x02, 0xa1, b'a', 0x03];
        assert_eq!(unpack(&data), Ok(Value::map([("a", 3), ("b", 2)])));
    }

    #[test]
    fn duplicate_keys_match_across_integer_widths() {
        // {1: "a", uint8 1: "b"}
        let data = [0x82, 0x01, 0xa1, b'a', 0xcc, 0x01, 0xa1, b'b'];
        assert_eq!(
            unpack(&data),
            Ok(Value::Map(vec![(Value::from(1), Value::from("b"))]))
        );
        // {-1: "a", int16 -1: "b"}
        let data = [0x82, 0xff, 0xa1, b'a', 0xd1, 0xff, 0xff, 0xa1, b'b'];
        assert_eq!(
            unpack(&data),
            Ok(Value::Map(vec![(Value::from(-1), Value::from("b"))]))
        );
    }

    #[test]
    fn duplicate_keys_match_across_float_widths() {
        // {float32 1.5: 1, float64 1.5: 2}
        let mut data = vec![0x82, 0xca, 0x3f, 0xc0, 0x00, 0x00, 0x01, 0xcb];
        data.extend_from_slice(&1.5f64.to_be_bytes());
        data.push(0x02);
        assert_eq!(
            unpack(&data),
            Ok(Value::Map(vec![(Value::Float(1.5), Value::from(2))]))
        );
    }

    #[test]
    fn duplicate_keys_match_across_str_headers() {
        // {fixstr "k": 1, str8 "k": 2}
        let data = [0x82, 0xa1, b'k', 0x01, 0xd9, 0x01, b'k', 0x02];
        assert_eq!(unpack(&data), Ok(Value::map([("k", 2)])));
    }

    #[test]
    fn escape_pair_is_stripped() {
        // {"__map__": nil, "__map__": 1}
        let mut data = vec![0x82];
        for value in [0xc0, 0x01] {
            data.push(0xa7);
            data.extend_from_slice(b"__map__");
            data.push(value);
        }
        assert_eq!(unpack(&data), Ok(Value::map([("__map__", 1)])));
    }

    #[test]
    fn depth_limit_reports_offset() {
        let registry = Registry::new();
        let unpacker = Unpacker::with_options(&registry, Options::new().with_max_depth(1));
        assert_eq!(unpacker.unpack(&[0x91, 0x01]), Ok(Value::Array(vec![1.into()])));
        assert_eq!(
            unpacker.unpack(&[0x91, 0x91, 0x01]),
            Err(DecodeError::DepthLimit {
                offset: 1,
                limit: 1
            })
        );
    }

    #[test]
    fn wrong_kind_marker_stays_plain() {
        // {"__class__": "date", "iso": "2024-01-01"}: "date" is an __ext__ tag.
        let value = Value::map([("__class__", "date"), ("iso", "2024-01-01")]);
        let registry = Registry::with_builtins();
        let mut bytes = vec![0x82];
        for s in ["__class__", "date", "iso", "2024-01-01"] {
            bytes.push(0xa0 | s.len() as u8);
            bytes.extend_from_slice(s.as_bytes());
        }
        assert_eq!(Unpacker::new(&registry).unpack(&bytes), Ok(value));
    }

    #[test]
    fn failing_field_decode_names_tag() {
        let mut bytes = vec![0x82];
        for s in ["__ext__", "date", "iso", "nope"] {
            bytes.push(0xa0 | s.len() as u8);
            bytes.extend_from_slice(s.as_bytes());
        }
        match unpack(&bytes) {
            Err(DecodeError::Extension { offset, tag, source }) => {
                assert_eq!(offset, 0);
                assert_eq!(tag, "date");
                assert!(matches!(source, FieldError::Invalid { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn raw_ext_items_survive() {
        assert_eq!(
            unpack(&[0xd4, 0x01, 0x09]),
            Ok(Value::from(MsgPackExtension::new(1, vec![9])))
        );
    }
}
