// Type definitions for the interchange object model

pub mod document;
pub mod flags;
pub mod geometry;
pub mod kind;

pub use document::*;
pub use flags::AnnotationFlags;
pub use geometry::*;
pub use kind::*;
