//! Access module
//!
//! Remote access allow-list: network masks and the best-effort list parser.

pub mod netmask;
pub mod resolver;

pub use netmask::{NetMask, NetMaskError};
pub use resolver::{matches, parse, ParsedAccessList};
