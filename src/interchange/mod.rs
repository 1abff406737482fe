//! Reading the XFDF interchange format into the typed object model

pub mod attributes;
pub mod parser;

pub use attributes::AttributeTable;
pub use parser::{InterchangeParser, ParserStatistics};
