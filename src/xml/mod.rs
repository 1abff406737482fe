//! Minimal XML DOM used by the interchange parser

pub mod serialize;
pub mod tree;

pub use serialize::serialize_children;
pub use tree::{XmlChild, XmlDocument, XmlNode};
