//! Attribute whitelists and the two annotation-kind whitelists.
//!
//! "Known subtype" and "body is parsed" are kept separate on purpose: some
//! kinds are nameable but their bodies are not read yet.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::types::AnnotationKind;

pub const PAGE: &str = "page";
pub const COLOR: &str = "color";
pub const DATE: &str = "date";
pub const FLAGS: &str = "flags";
pub const NAME: &str = "name";
pub const RECT: &str = "rect";
pub const TITLE: &str = "title";
pub const CREATION_DATE: &str = "creationdate";
pub const OPACITY: &str = "opacity";
pub const SUBJECT: &str = "subject";
pub const INTENT: &str = "IT";
pub const ICON: &str = "icon";
pub const STATE: &str = "state";
pub const STATE_MODEL: &str = "statemodel";
pub const IN_REPLY_TO: &str = "inreplyto";
pub const REPLY_TYPE: &str = "replyType";
pub const OPEN: &str = "open";
pub const COORDS: &str = "coords";
pub const FRINGE: &str = "fringe";

/// Attributes accepted on every markup annotation and on pop-ups
const MARKUP_ATTRIBUTES: [&str; 18] = [
    COLOR,
    DATE,
    FLAGS,
    NAME,
    RECT,
    TITLE,
    CREATION_DATE,
    OPACITY,
    SUBJECT,
    INTENT,
    ICON,
    STATE,
    STATE_MODEL,
    IN_REPLY_TO,
    REPLY_TYPE,
    OPEN,
    COORDS,
    FRINGE,
];

/// Kinds whose element bodies the parser reads
const PARSE_SUPPORTED: [AnnotationKind; 7] = [
    AnnotationKind::Text,
    AnnotationKind::Highlight,
    AnnotationKind::Underline,
    AnnotationKind::StrikeOut,
    AnnotationKind::Squiggly,
    AnnotationKind::Caret,
    AnnotationKind::Line,
];

/// Kinds the merge engine turns into target annotations
const MERGE_SUPPORTED: [AnnotationKind; 8] = [
    AnnotationKind::Text,
    AnnotationKind::Highlight,
    AnnotationKind::Underline,
    AnnotationKind::StrikeOut,
    AnnotationKind::Squiggly,
    AnnotationKind::Caret,
    AnnotationKind::Stamp,
    AnnotationKind::FreeText,
];

lazy_static! {
    static ref POPUP_ATTRIBUTES: HashSet<&'static str> = MARKUP_ATTRIBUTES.iter().copied().collect();
    static ref KIND_ATTRIBUTES: HashMap<AnnotationKind, HashSet<&'static str>> = AnnotationKind::ALL
        .iter()
        .map(|kind| (*kind, MARKUP_ATTRIBUTES.iter().copied().collect()))
        .collect();
}

/// Static lookup tables; no state
pub struct AttributeTable;

impl AttributeTable {
    /// Whether `element` names any annotation subtype at all
    pub fn annotation_kind(element: &str) -> Option<AnnotationKind> {
        AnnotationKind::from_element_name(element)
    }

    /// Whether the parser builds an annotation from elements of this kind
    pub fn is_parse_supported(kind: AnnotationKind) -> bool {
        PARSE_SUPPORTED.contains(&kind)
    }

    pub fn is_merge_supported(kind: AnnotationKind) -> bool {
        MERGE_SUPPORTED.contains(&kind)
    }

    /// Attribute names kept for `kind`; `None` selects the pop-up set
    pub fn accepted_attributes(kind: Option<AnnotationKind>) -> &'static HashSet<&'static str> {
        match kind.and_then(|k| KIND_ATTRIBUTES.get(&k)) {
            Some(set) => set,
            None => &POPUP_ATTRIBUTES,
        }
    }

    /// Attribute names are matched case-sensitively
    pub fn accepts(kind: Option<AnnotationKind>, attribute: &str) -> bool {
        Self::accepted_attributes(kind).contains(attribute)
    }
}
