//! Round-trip identity over generated value trees.

use fastpack::{pack, unpack, DecodeError, MsgPackExtension, Value};
use proptest::collection::vec;
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (i64::MAX as u64 + 1..=u64::MAX).prop_map(Value::UInteger),
        // NaN never equals itself.
        any::<f64>()
            .prop_filter("finite or infinite", |f| !f.is_nan())
            .prop_map(Value::Float),
        ".{0,40}".prop_map(Value::Str),
        vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
        (any::<i8>(), vec(any::<u8>(), 0..20))
            .prop_map(|(tag, data)| Value::from(MsgPackExtension::new(tag, data))),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(8, 256, 12, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..12).prop_map(Value::Array),
            vec((inner.clone(), inner), 0..8).prop_map(dedup_keys),
        ]
    })
}

fn dedup_keys(pairs: Vec<(Value, Value)>) -> Value {
    let mut unique: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        if !unique.iter().any(|(k, _)| *k == key) {
            unique.push((key, value));
        }
    }
    Value::Map(unique)
}

fn nest(mut value: Value, depth: usize) -> Value {
    for i in 0..depth {
        value = if i % 2 == 0 {
            Value::Array(vec![value, Value::Nil])
        } else {
            Value::map([(Value::from(i as i64), value)])
        };
    }
    value
}

proptest! {
    #[test]
    fn pack_unpack_is_identity(v in value()) {
        let bytes = pack(&v).unwrap();
        prop_assert_eq!(unpack(&bytes).unwrap(), v);
    }

    #[test]
    fn deep_nesting_roundtrips(v in value(), depth in 5usize..40) {
        let nested = nest(v, depth);
        let bytes = pack(&nested).unwrap();
        prop_assert_eq!(unpack(&bytes).unwrap(), nested);
    }

    #[test]
    fn packing_is_deterministic(v in value()) {
        prop_assert_eq!(pack(&v).unwrap(), pack(&v).unwrap());
    }

    #[test]
    fn truncation_never_succeeds(v in value()) {
        let bytes = pack(&v).unwrap();
        let cut = &bytes[..bytes.len() - 1];
        let is_truncated = matches!(unpack(cut), Err(DecodeError::Truncated { .. }));
        prop_assert!(is_truncated);
    }

    #[test]
    fn arbitrary_input_never_panics(data in vec(any::<u8>(), 0..256)) {
        let _ = unpack(&data);
    }
}
