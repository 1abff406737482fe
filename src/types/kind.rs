//! Annotation subtypes known to the interchange format

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    Text,
    Highlight,
    Underline,
    StrikeOut,
    Squiggly,
    Caret,
    Line,
    Circle,
    Square,
    Polygon,
    Polyline,
    Stamp,
    Ink,
    FreeText,
    FileAttachment,
    Sound,
    Link,
    Redact,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 18] = [
        AnnotationKind::Text,
        AnnotationKind::Highlight,
        AnnotationKind::Underline,
        AnnotationKind::StrikeOut,
        AnnotationKind::Squiggly,
        AnnotationKind::Caret,
        AnnotationKind::Line,
        AnnotationKind::Circle,
        AnnotationKind::Square,
        AnnotationKind::Polygon,
        AnnotationKind::Polyline,
        AnnotationKind::Stamp,
        AnnotationKind::Ink,
        AnnotationKind::FreeText,
        AnnotationKind::FileAttachment,
        AnnotationKind::Sound,
        AnnotationKind::Link,
        AnnotationKind::Redact,
    ];

    /// Element name used in the interchange format
    pub fn element_name(&self) -> &'static str {
        match self {
            AnnotationKind::Text => "text",
            AnnotationKind::Highlight => "highlight",
            AnnotationKind::Underline => "underline",
            AnnotationKind::StrikeOut => "strikeout",
            AnnotationKind::Squiggly => "squiggly",
            AnnotationKind::Caret => "caret",
            AnnotationKind::Line => "line",
            AnnotationKind::Circle => "circle",
            AnnotationKind::Square => "square",
            AnnotationKind::Polygon => "polygon",
            AnnotationKind::Polyline => "polyline",
            AnnotationKind::Stamp => "stamp",
            AnnotationKind::Ink => "ink",
            AnnotationKind::FreeText => "freetext",
            AnnotationKind::FileAttachment => "fileattachment",
            AnnotationKind::Sound => "sound",
            AnnotationKind::Link => "link",
            AnnotationKind::Redact => "redact",
        }
    }

    /// PDF `/Subtype` name
    pub fn pdf_subtype(&self) -> &'static str {
        match self {
            AnnotationKind::Text => "Text",
            AnnotationKind::Highlight => "Highlight",
            AnnotationKind::Underline => "Underline",
            AnnotationKind::StrikeOut => "StrikeOut",
            AnnotationKind::Squiggly => "Squiggly",
            AnnotationKind::Caret => "Caret",
            AnnotationKind::Line => "Line",
            AnnotationKind::Circle => "Circle",
            AnnotationKind::Square => "Square",
            AnnotationKind::Polygon => "Polygon",
            AnnotationKind::Polyline => "PolyLine",
            AnnotationKind::Stamp => "Stamp",
            AnnotationKind::Ink => "Ink",
            AnnotationKind::FreeText => "FreeText",
            AnnotationKind::FileAttachment => "FileAttachment",
            AnnotationKind::Sound => "Sound",
            AnnotationKind::Link => "Link",
            AnnotationKind::Redact => "Redact",
        }
    }

    /// Case-insensitive lookup by element name
    pub fn from_element_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.element_name().eq_ignore_ascii_case(name))
    }

    pub fn is_text_markup(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Highlight
                | AnnotationKind::Underline
                | AnnotationKind::StrikeOut
                | AnnotationKind::Squiggly
        )
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element_name())
    }
}
