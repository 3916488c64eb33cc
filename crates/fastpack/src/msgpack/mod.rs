//! MessagePack wire layer: header constants, the single-item writer and the
//! single-item reader. Recursion and the type registry live above this in
//! [`Packer`](crate::Packer) and [`Unpacker`](crate::Unpacker).

pub mod constants;
mod decoder;
mod encoder;

pub use decoder::{Header, MsgPackReader};
pub use encoder::MsgPackEncoder;
