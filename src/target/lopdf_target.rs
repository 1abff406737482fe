//! `lopdf`-backed target: writes each record as an `/Annot` dictionary and
//! appends a reference to the page's `/Annots` array.

use std::collections::{BTreeMap, HashMap};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, instrument};

use crate::error::{Result, TargetError};
use crate::merge::{Appearance, AnnotationRecord, AppearanceId, RecordId};

use super::{DocumentAdapter, PageHandle};

pub struct LopdfTarget {
    document: Document,
    pages: BTreeMap<u32, ObjectId>,
    records: HashMap<RecordId, ObjectId>,
    appearances: HashMap<AppearanceId, ObjectId>,
}

impl LopdfTarget {
    pub fn new(document: Document) -> Self {
        let pages = document.get_pages();
        Self {
            document,
            pages,
            records: HashMap::new(),
            appearances: HashMap::new(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(Document::load_mem(bytes)?))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Object written for `record` in the current merge, if any
    pub fn object_id(&self, record: RecordId) -> Option<ObjectId> {
        self.records.get(&record).copied()
    }

    /// Serializes the whole document
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// References currently listed in the page's `/Annots`
    pub fn annotation_refs(&self, number: u32) -> Result<Vec<ObjectId>> {
        let page_id = self.page_id(number)?;
        let page = self.document.get_object(page_id)?.as_dict()?;
        let annots = match page.get(b"Annots") {
            Ok(Object::Reference(id)) => self.document.get_object(*id)?.as_array()?,
            Ok(Object::Array(items)) => items,
            _ => return Ok(Vec::new()),
        };
        Ok(annots
            .iter()
            .filter_map(|item| item.as_reference().ok())
            .collect())
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        self.pages
            .get(&number)
            .copied()
            .ok_or_else(|| TargetError::MissingPage(number).into())
    }

    fn record_object(&mut self, record: RecordId) -> ObjectId {
        if let Some(id) = self.records.get(&record) {
            return *id;
        }
        let id = self.document.new_object_id();
        self.records.insert(record, id);
        id
    }

    fn appearance_object(&mut self, appearance: &Appearance) -> Result<ObjectId> {
        if let Some(id) = self.appearances.get(&appearance.id) {
            return Ok(*id);
        }
        let operations: Vec<Operation> = appearance
            .operations()
            .into_iter()
            .map(|(operator, operands)| {
                Operation::new(operator, operands.into_iter().map(real).collect())
            })
            .collect();
        let content = Content { operations }.encode()?;
        let bbox = appearance.bbox.to_pdf_array().iter().copied().map(real).collect::<Vec<_>>();
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => bbox,
                "Resources" => Dictionary::new(),
            },
            content,
        );
        let id = self.document.add_object(stream);
        self.appearances.insert(appearance.id, id);
        debug!(appearance = appearance.id.0, object = ?id, "Wrote appearance stream");
        Ok(id)
    }

    fn annotation_dictionary(&mut self, record: &AnnotationRecord, page_id: ObjectId) -> Result<Dictionary> {
        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => record.kind.pdf_subtype(),
            "Rect" => record.rect.to_pdf_array().iter().copied().map(real).collect::<Vec<_>>(),
            "P" => page_id,
            "F" => i64::from(record.flags.bits()),
        };

        if let Some(color) = record.color {
            dict.set("C", color.components().iter().copied().map(real).collect::<Vec<_>>());
        }
        set_text(&mut dict, "M", record.date.as_deref());
        set_text(&mut dict, "NM", record.name.as_deref());
        set_text(&mut dict, "T", record.title.as_deref());
        if !record.quad_points.is_empty() {
            dict.set("QuadPoints", record.quad_points.iter().copied().map(real).collect::<Vec<_>>());
        }
        if let Some(appearance) = &record.appearance {
            let stream_id = self.appearance_object(appearance)?;
            dict.set("AP", dictionary! { "N" => stream_id });
        }

        if let Some(note) = &record.note {
            if let Some(icon) = &note.icon {
                dict.set("Name", Object::Name(icon.as_bytes().to_vec()));
            }
            set_text(&mut dict, "State", note.state.as_deref());
            set_text(&mut dict, "StateModel", note.state_model.as_deref());
        }

        if let Some(markup) = &record.markup {
            set_text(&mut dict, "CreationDate", markup.creation_date.as_deref());
            set_text(&mut dict, "Subj", markup.subject.as_deref());
            if let Some(intent) = &markup.intent {
                dict.set("IT", Object::Name(intent.as_bytes().to_vec()));
            }
            set_text(&mut dict, "RC", markup.rich_text.as_deref());
            set_text(&mut dict, "Contents", markup.contents.as_deref());
            if let Some(opacity) = markup.opacity {
                dict.set("CA", real(opacity));
            }
            if let Some(target) = markup.in_reply_to {
                dict.set("IRT", self.record_object(target));
                if let Some(reply_type) = markup.reply_type {
                    dict.set("RT", reply_type.pdf_name());
                }
            }
            if let Some(popup) = markup.popup {
                dict.set("Popup", self.record_object(popup));
            }
        }

        if let Some(open) = record.open {
            dict.set("Open", open);
        }
        if let Some(parent) = record.parent {
            dict.set("Parent", self.record_object(parent));
        }
        Ok(dict)
    }

    /// Appends `annotation` to the page's `/Annots`, following an indirect
    /// array when the page has one.
    fn append_annotation(&mut self, page_id: ObjectId, annotation: ObjectId) -> Result<()> {
        let existing = self
            .document
            .get_object(page_id)?
            .as_dict()?
            .get(b"Annots")
            .ok()
            .cloned();

        match existing {
            Some(Object::Reference(array_id)) => {
                self.document
                    .get_object_mut(array_id)?
                    .as_array_mut()?
                    .push(Object::Reference(annotation));
            }
            Some(Object::Array(mut items)) => {
                items.push(Object::Reference(annotation));
                self.page_dict_mut(page_id)?.set("Annots", items);
            }
            _ => {
                self.page_dict_mut(page_id)?
                    .set("Annots", vec![Object::Reference(annotation)]);
            }
        }
        Ok(())
    }

    fn page_dict_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary> {
        Ok(self.document.get_object_mut(page_id)?.as_dict_mut()?)
    }
}

pub struct LopdfPage<'a> {
    target: &'a mut LopdfTarget,
    page_id: ObjectId,
}

impl PageHandle for LopdfPage<'_> {
    #[instrument(skip_all, fields(record = record.id.0, page = record.page))]
    fn add_annotation(&mut self, record: &AnnotationRecord) -> Result<()> {
        let dict = self.target.annotation_dictionary(record, self.page_id)?;
        let object_id = self.target.record_object(record.id);
        self.target.document.objects.insert(object_id, Object::Dictionary(dict));
        self.target.append_annotation(self.page_id, object_id)?;
        debug!(object = ?object_id, subtype = record.kind.pdf_subtype(), "Added annotation");
        Ok(())
    }
}

impl DocumentAdapter for LopdfTarget {
    type Page<'a> = LopdfPage<'a>;

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&mut self, number: u32) -> Result<LopdfPage<'_>> {
        let page_id = self.page_id(number)?;
        Ok(LopdfPage {
            target: self,
            page_id,
        })
    }

    fn begin_merge(&mut self) {
        self.records.clear();
        self.appearances.clear();
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

/// Text strings are written as literals; anything outside ASCII goes out as
/// UTF-16BE with a byte-order mark.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Literal)
}

fn set_text(dict: &mut Dictionary, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        dict.set(key, text_string(value));
    }
}
