//! Properties text format and the flat map it parses into.

mod map;
mod parser;

pub use map::{Iter, PropertyMap};
pub use parser::{Encoding, parse_bytes, parse_str};
