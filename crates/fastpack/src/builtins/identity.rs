//! `uuid::Uuid`, packed as its 16 raw bytes.

use uuid::Uuid;

use crate::registry::Builtin;
use crate::{FieldError, Fields, Registrable};

impl Registrable for Uuid {
    fn encode(&self) -> Fields {
        Fields::new().with("bytes", self.as_bytes().as_slice())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        let bytes = fields.take_bytes("bytes")?;
        Uuid::from_slice(&bytes).map_err(|err| FieldError::invalid("bytes", err))
    }
}

impl Builtin for Uuid {
    const TAG: &'static str = "uuid";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_travels_as_raw_bytes() {
        let id = Uuid::from_u128(0x6fa4_59ea_ee8a_3ca4_894e_db77_e160_355e);
        let fields = id.encode();
        assert_eq!(fields.get("bytes").and_then(|v| v.as_bytes()).map(<[u8]>::len), Some(16));
        assert_eq!(Uuid::decode(fields), Ok(id));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let fields = Fields::new().with("bytes", vec![0u8; 15]);
        assert!(matches!(Uuid::decode(fields), Err(FieldError::Invalid { .. })));
    }
}
