//! [`Packer`]: recursive encoder from [`Value`] to MessagePack bytes.

use crate::envelope::{needs_escape, ESCAPE_KEY, MODULE_KEY};
use crate::msgpack::MsgPackEncoder;
use crate::{EncodeError, Object, Options, Registry, Value};

/// Encodes values against one registry snapshot.
///
/// Output is deterministic: the same value and registry always produce the
/// same bytes. A `Packer` can be reused; each [`pack`](Packer::pack) call
/// starts from an empty buffer.
pub struct Packer<'r> {
    registry: &'r Registry,
    encoder: MsgPackEncoder,
    options: Options,
    depth: usize,
}

impl<'r> Packer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, Options::default())
    }

    pub fn with_options(registry: &'r Registry, options: Options) -> Self {
        Self {
            registry,
            encoder: MsgPackEncoder::new(),
            options,
            depth: 0,
        }
    }

    pub fn pack(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.encoder.reset();
        self.depth = 0;
        match self.write_any(value) {
            Ok(()) => Ok(self.encoder.flush()),
            Err(err) => {
                self.encoder.reset();
                Err(err)
            }
        }
    }

    fn enter(&mut self) -> Result<(), EncodeError> {
        if self.depth >= self.options.max_depth {
            return Err(EncodeError::RecursionLimit {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.encoder.write_nil(),
            Value::Bool(b) => self.encoder.write_boolean(*b),
            Value::Integer(int) => self.encoder.write_integer(*int),
            Value::UInteger(uint) => self.encoder.write_u_integer(*uint),
            Value::Float(float) => self.encoder.write_float(*float),
            Value::Str(s) => self.encoder.write_str(s)?,
            Value::Bytes(buf) => self.encoder.write_bin(buf)?,
            Value::Array(items) => self.write_arr(items)?,
            Value::Map(pairs) => self.write_map(pairs)?,
            Value::Extension(ext) => self.encoder.write_ext(ext)?,
            Value::Object(obj) => self.write_object(obj)?,
        }
        Ok(())
    }

    fn write_arr(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        self.enter()?;
        self.encoder.write_arr_hdr(items.len())?;
        for item in items {
            self.write_any(item)?;
        }
        self.leave();
        Ok(())
    }

    fn write_map(&mut self, pairs: &[(Value, Value)]) -> Result<(), EncodeError> {
        self.enter()?;
        let escape = pairs
            .first()
            .and_then(|(key, _)| key.as_str())
            .is_some_and(needs_escape);
        self.encoder.write_map_hdr(pairs.len() + usize::from(escape))?;
        if escape {
            self.encoder.write_str(ESCAPE_KEY)?;
            self.encoder.write_nil();
        }
        for (key, value) in pairs {
            self.write_any(key)?;
            self.write_any(value)?;
        }
        self.leave();
        Ok(())
    }

    /// Writes `{marker: tag, [__module__: path,] field: value, ...}`.
    fn write_object(&mut self, obj: &Object) -> Result<(), EncodeError> {
        let unsupported = || EncodeError::UnsupportedType {
            type_name: obj.type_name(),
        };
        let entry = self
            .registry
            .resolve_by_type(obj.type_id())
            .ok_or_else(unsupported)?;
        let fields = entry.encode(obj.as_any()).ok_or_else(unsupported)?;

        self.enter()?;
        let module = entry.module();
        let count = 1 + usize::from(module.is_some()) + fields.len();
        self.encoder.write_map_hdr(count)?;
        self.encoder.write_str(entry.kind().marker())?;
        self.encoder.write_str(entry.tag())?;
        if let Some(module) = module {
            self.encoder.write_str(MODULE_KEY)?;
            self.encoder.write_str(module)?;
        }
        for (name, value) in fields.iter() {
            self.encoder.write_str(name)?;
            self.write_any(value)?;
        }
        self.leave();
        Ok(())
    }
}
