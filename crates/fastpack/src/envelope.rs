//! Reserved marker keys of the extension envelope.
//!
//! An extension instance travels as an ordinary map whose first key is a
//! marker naming the kind of type and whose value is the tag:
//!
//! ```text
//! {"__class__": "Money", "__module__": "shop::billing", "amount": 1000, "currency": "USD"}
//! {"__ext__": "date", "iso": "2024-05-01"}
//! ```
//!
//! The marker must be the first key and carry a string; `__module__` is only
//! recognized in second position. A plain map whose first key happens to be
//! a marker (or [`ESCAPE_KEY`]) is written with a leading
//! `"__map__": nil` pair, which the decoder strips again.

pub const CLASS_MARKER: &str = "__class__";
pub const DATACLASS_MARKER: &str = "__dataclass__";
pub const NAMEDTUPLE_MARKER: &str = "__namedtuple__";
pub const ENUM_MARKER: &str = "__enum__";
pub const EXT_MARKER: &str = "__ext__";

/// Originating namespace hint following the marker.
pub const MODULE_KEY: &str = "__module__";

/// Leading key of an escaped plain map.
pub const ESCAPE_KEY: &str = "__map__";

/// Family a registered type belongs to; selects the marker key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// User class with its own field mapping.
    Class,
    /// Record-like type packed by field list.
    Dataclass,
    /// Record-like type packed by field list, tuple flavored.
    NamedTuple,
    /// Enumeration packed by its value.
    Enum,
    /// Type shipped with the codec (temporal, decimal, uuid, set, tuple).
    Builtin,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::Class,
        Kind::Dataclass,
        Kind::NamedTuple,
        Kind::Enum,
        Kind::Builtin,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Kind::Class => CLASS_MARKER,
            Kind::Dataclass => DATACLASS_MARKER,
            Kind::NamedTuple => NAMEDTUPLE_MARKER,
            Kind::Enum => ENUM_MARKER,
            Kind::Builtin => EXT_MARKER,
        }
    }

    pub fn from_marker(key: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.marker() == key)
    }
}

/// Whether a plain map starting with `key` has to be escaped on the wire.
pub fn needs_escape(key: &str) -> bool {
    key == ESCAPE_KEY || Kind::from_marker(key).is_some()
}
