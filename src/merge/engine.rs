//! Merge engine: turns a parsed interchange document into annotation records
//! and appends them to a target document.
//!
//! A session runs one linear pass over the annotation set. Records live in an
//! arena addressed by [`RecordId`] so that reply links discovered late can
//! still be written into earlier records. Nothing touches the target until
//! the pass has finished; the records are then committed page by page in
//! creation order.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::appearance::{AppearanceCache, AppearanceKind};
use super::record::{AnnotationRecord, MarkupFields, NoteFields, RecordId, RecordKind, ReplyType};
use super::replies::{ReplyResolver, ReplyState};
use crate::config::MergeConfig;
use crate::error::{ConversionError, Result, TargetError};
use crate::interchange::attributes::{self as attr, AttributeTable};
use crate::target::{DocumentAdapter, PageHandle};
use crate::types::{
    AffineTransform, Annotation, AnnotationKind, AttributeBag, Color, InterchangeDocument, Rectangle,
};
use crate::utils::conversion::{
    convert_color, convert_flags, convert_open_state, convert_quad_points, convert_rect,
    resolve_target_page,
};
use crate::utils::logging::{DiagnosticKind, DiagnosticLog};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStatistics {
    pub annotations_seen: usize,
    pub records_created: usize,
    pub popups_created: usize,
    pub replies_linked: usize,
    pub replies_unresolved: usize,
    pub unsupported_skipped: usize,
}

/// Result of one merge call. The target mutation is the main effect; this
/// carries what was written and what was reported along the way.
#[derive(Debug)]
pub struct MergeSummary {
    pub records: Vec<AnnotationRecord>,
    pub diagnostics: DiagnosticLog,
    pub statistics: MergeStatistics,
}

impl MergeSummary {
    pub fn records_on_page(&self, page: u32) -> impl Iterator<Item = &AnnotationRecord> {
        self.records.iter().filter(move |r| r.page == page)
    }
}

/// Session-scoped merge state. Consumed by [`MergeSession::merge`], so the
/// reply tables and the appearance cache never outlive one merge call.
#[derive(Debug)]
pub struct MergeSession {
    transform: AffineTransform,
    page_shift: i32,
    report_unresolved: bool,
    records: Vec<AnnotationRecord>,
    replies: ReplyResolver,
    appearances: AppearanceCache,
    diagnostics: DiagnosticLog,
    stats: MergeStatistics,
}

impl MergeSession {
    pub fn new(config: &MergeConfig) -> Self {
        Self {
            transform: config.transform(),
            page_shift: config.page_shift,
            report_unresolved: config.report_unresolved_replies,
            records: Vec::new(),
            replies: ReplyResolver::new(),
            appearances: AppearanceCache::new(config.appearance_cache),
            diagnostics: DiagnosticLog::new(),
            stats: MergeStatistics::default(),
        }
    }

    /// Session with an explicit transform and page shift and default
    /// settings for everything else.
    pub fn with_transform(transform: AffineTransform, page_shift: i32) -> Self {
        let mut session = Self::new(&MergeConfig::default());
        session.transform = transform;
        session.page_shift = page_shift;
        session
    }

    #[instrument(skip_all, fields(annotations = document.annotations.len()))]
    pub fn merge<T: DocumentAdapter>(
        mut self,
        document: &InterchangeDocument,
        target: &mut T,
    ) -> Result<MergeSummary> {
        let page_count = target.page_count();
        for annotation in &document.annotations {
            self.stats.annotations_seen += 1;
            self.materialize(annotation, page_count)?;
        }

        let replies = std::mem::take(&mut self.replies);
        self.stats.replies_linked = replies.linked();
        for orphan in replies.finish() {
            self.stats.replies_unresolved += 1;
            if let Some(markup) = self.records[orphan.reply.0].markup.as_mut() {
                markup.reply_type = None;
            }
            if self.report_unresolved {
                self.diagnostics.record(
                    DiagnosticKind::UnresolvedReply,
                    orphan.target.as_str(),
                    format!("reply target {:?} never appeared; link left unset", orphan.target),
                );
            }
        }

        target.begin_merge();
        for record in &self.records {
            let mut page = target.page(record.page)?;
            page.add_annotation(record)?;
        }

        self.stats.records_created = self.records.len();
        info!(
            records = self.stats.records_created,
            popups = self.stats.popups_created,
            replies = self.stats.replies_linked,
            "Merge complete"
        );

        Ok(MergeSummary {
            records: self.records,
            diagnostics: self.diagnostics,
            statistics: self.stats,
        })
    }

    fn materialize(&mut self, annotation: &Annotation, page_count: u32) -> Result<()> {
        let kind = annotation.kind;
        if !AttributeTable::is_merge_supported(kind) {
            self.stats.unsupported_skipped += 1;
            self.diagnostics.record(
                DiagnosticKind::UnsupportedAnnotation,
                kind.element_name(),
                format!("{} annotations are not merged", kind),
            );
            return Ok(());
        }

        let page = self.resolve_page(annotation.page, page_count)?;
        let rect = self.required_rect(&annotation.attributes)?;
        let id = self.next_id();
        let mut record = AnnotationRecord::new(id, RecordKind::Annotation(kind), page, rect);
        self.apply_common(&mut record, &annotation.attributes, kind);

        match kind {
            AnnotationKind::Text => {
                let note = NoteFields {
                    icon: annotation.attributes.get_non_blank(attr::ICON).map(str::to_string),
                    state: annotation.attributes.get_non_blank(attr::STATE).map(str::to_string),
                    state_model: annotation
                        .attributes
                        .get_non_blank(attr::STATE_MODEL)
                        .map(str::to_string),
                };
                if note.icon.as_deref() == Some("Comment") {
                    let color = record.color.unwrap_or(Color::BLACK);
                    record.appearance = Some(self.appearances.get(AppearanceKind::Comment, color));
                }
                record.note = Some(note);
            }
            AnnotationKind::Caret => {
                let color = record.color.unwrap_or(Color::BLUE);
                record.appearance = Some(self.appearances.get(AppearanceKind::Caret, color));
            }
            k if k.is_text_markup() => {
                if let Some(coords) = annotation.attribute(attr::COORDS) {
                    record.quad_points = convert_quad_points(coords, &self.transform)?;
                }
            }
            _ => {}
        }

        record.markup = Some(self.markup_fields(annotation));
        debug!(id = id.0, %kind, page, "Materialized annotation");
        self.records.push(record);

        if let Some(name) = annotation.attributes.get(attr::NAME) {
            if let ReplyState::Registered(previous) = self.replies.state(name) {
                debug!(annotation = name, previous = previous.0, current = id.0, "Annotation name registered again");
            }
            for (reply, target) in self.replies.register(name, id) {
                self.link_reply(reply, target);
            }
        }

        if let Some(target_name) = annotation.attributes.get_non_blank(attr::IN_REPLY_TO) {
            let reply_type = match annotation.attribute(attr::REPLY_TYPE) {
                Some(value) if value.eq_ignore_ascii_case("group") => ReplyType::Group,
                _ => ReplyType::Reply,
            };
            if let Some(markup) = self.records[id.0].markup.as_mut() {
                markup.reply_type = Some(reply_type);
            }
            match self.replies.request(id, target_name) {
                Some(target) => self.link_reply(id, target),
                None => debug!(
                    reply = id.0,
                    target = target_name,
                    state = ?self.replies.state(target_name),
                    "Reply target not yet seen"
                ),
            }
        }

        if let Some(popup) = &annotation.popup {
            let popup_rect = self.required_rect(&popup.attributes)?;
            let popup_id = self.next_id();
            let mut popup_record = AnnotationRecord::new(popup_id, RecordKind::Popup, page, popup_rect);
            popup_record.flags = popup
                .attributes
                .get(attr::FLAGS)
                .map(convert_flags)
                .unwrap_or_default();
            popup_record.open = Some(
                popup
                    .attributes
                    .get(attr::OPEN)
                    .map(convert_open_state)
                    .unwrap_or(false),
            );
            popup_record.parent = Some(id);
            if let Some(markup) = self.records[id.0].markup.as_mut() {
                markup.popup = Some(popup_id);
            }
            self.records.push(popup_record);
            self.stats.popups_created += 1;
        }

        Ok(())
    }

    fn next_id(&self) -> RecordId {
        RecordId(self.records.len())
    }

    fn resolve_page(&self, source_page: i32, page_count: u32) -> Result<u32> {
        let target = resolve_target_page(self.page_shift, source_page);
        if target < 1 || target > i64::from(page_count) {
            warn!(source_page, target, page_count, "Annotation page out of range");
            return Err(TargetError::PageOutOfRange {
                page: target,
                count: page_count,
            }
            .into());
        }
        Ok(target as u32)
    }

    fn required_rect(&self, attributes: &AttributeBag) -> Result<Rectangle> {
        let raw = attributes
            .get(attr::RECT)
            .ok_or(ConversionError::MissingAttribute(attr::RECT))?;
        Ok(convert_rect(raw, &self.transform)?)
    }

    fn apply_common(&self, record: &mut AnnotationRecord, attributes: &AttributeBag, kind: AnnotationKind) {
        record.flags = attributes.get(attr::FLAGS).map(convert_flags).unwrap_or_default();
        record.color = Some(
            attributes
                .get(attr::COLOR)
                .map(convert_color)
                .unwrap_or_else(|| default_color(kind)),
        );
        record.date = attributes.get(attr::DATE).map(str::to_string);
        record.name = attributes.get(attr::NAME).map(str::to_string);
        record.title = attributes.get(attr::TITLE).map(str::to_string);
    }

    fn markup_fields(&mut self, annotation: &Annotation) -> MarkupFields {
        let attributes = &annotation.attributes;
        let opacity = attributes.get(attr::OPACITY).and_then(|raw| {
            match raw.trim().parse::<f64>() {
                Ok(value) if (0.0..=1.0).contains(&value) => Some(value),
                _ => {
                    self.diagnostics.record(
                        DiagnosticKind::InvalidOpacity,
                        attr::OPACITY,
                        format!("opacity {:?} is not a number between 0 and 1", raw),
                    );
                    None
                }
            }
        });

        MarkupFields {
            creation_date: attributes.get(attr::CREATION_DATE).map(str::to_string),
            subject: attributes.get(attr::SUBJECT).map(str::to_string),
            intent: attributes.get_non_blank(attr::INTENT).map(str::to_string),
            rich_text: non_blank_trimmed(annotation.rich_text.as_deref()),
            contents: non_blank_trimmed(annotation.contents.as_deref()),
            opacity,
            in_reply_to: None,
            reply_type: None,
            popup: None,
        }
    }

    fn link_reply(&mut self, reply: RecordId, target: RecordId) {
        if let Some(markup) = self.records[reply.0].markup.as_mut() {
            markup.in_reply_to = Some(target);
            debug!(reply = reply.0, target = target.0, "Linked reply");
        }
    }
}

/// Merges `document` into `target` with a fresh session.
pub fn merge<T: DocumentAdapter>(
    document: &InterchangeDocument,
    target: &mut T,
    transform: AffineTransform,
    page_shift: i32,
) -> Result<MergeSummary> {
    MergeSession::with_transform(transform, page_shift).merge(document, target)
}

/// Color used when an annotation carries no `color` attribute
pub fn default_color(kind: AnnotationKind) -> Color {
    match kind {
        AnnotationKind::Text | AnnotationKind::Highlight => Color::HIGHLIGHT,
        AnnotationKind::Underline | AnnotationKind::StrikeOut | AnnotationKind::Squiggly => Color::RED,
        AnnotationKind::Caret => Color::BLUE,
        _ => Color::BLACK,
    }
}

fn non_blank_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
