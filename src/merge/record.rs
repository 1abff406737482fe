//! Annotation records produced by the merge engine and handed to the target

use std::sync::Arc;

use serde::Serialize;

use super::appearance::Appearance;
use crate::types::{AnnotationFlags, AnnotationKind, Color, Rectangle};

/// Position of a record within one merge session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    Annotation(AnnotationKind),
    Popup,
}

impl RecordKind {
    pub fn pdf_subtype(&self) -> &'static str {
        match self {
            RecordKind::Annotation(kind) => kind.pdf_subtype(),
            RecordKind::Popup => "Popup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplyType {
    Reply,
    Group,
}

impl ReplyType {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ReplyType::Reply => "R",
            ReplyType::Group => "Group",
        }
    }
}

/// Fields only markup annotations carry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupFields {
    pub creation_date: Option<String>,
    pub subject: Option<String>,
    pub intent: Option<String>,
    pub rich_text: Option<String>,
    pub contents: Option<String>,
    pub opacity: Option<f64>,
    pub in_reply_to: Option<RecordId>,
    pub reply_type: Option<ReplyType>,
    pub popup: Option<RecordId>,
}

/// Text-note specifics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFields {
    pub icon: Option<String>,
    pub state: Option<String>,
    pub state_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    /// One-based page in the target document
    pub page: u32,
    pub rect: Rectangle,
    pub flags: AnnotationFlags,
    pub color: Option<Color>,
    pub date: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub quad_points: Vec<f64>,
    pub appearance: Option<Arc<Appearance>>,
    pub markup: Option<MarkupFields>,
    pub note: Option<NoteFields>,
    /// Pop-ups only
    pub open: Option<bool>,
    pub parent: Option<RecordId>,
}

impl AnnotationRecord {
    pub fn new(id: RecordId, kind: RecordKind, page: u32, rect: Rectangle) -> Self {
        Self {
            id,
            kind,
            page,
            rect,
            flags: AnnotationFlags::empty(),
            color: None,
            date: None,
            name: None,
            title: None,
            quad_points: Vec::new(),
            appearance: None,
            markup: None,
            note: None,
            open: None,
            parent: None,
        }
    }

    pub fn is_popup(&self) -> bool {
        self.kind == RecordKind::Popup
    }

    pub fn in_reply_to(&self) -> Option<RecordId> {
        self.markup.as_ref().and_then(|m| m.in_reply_to)
    }

    pub fn contents(&self) -> Option<&str> {
        self.markup.as_ref().and_then(|m| m.contents.as_deref())
    }
}
