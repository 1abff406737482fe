//! Interchange (XFDF) parser: XML tree in, `InterchangeDocument` out.

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::attributes::{AttributeTable, PAGE};
use crate::error::{ParseError, Result};
use crate::types::{
    Annotation, AnnotationKind, AttributeBag, Field, FieldId, FileRef, IdPair, InterchangeDocument,
    Popup, RootAttribute,
};
use crate::utils::{DiagnosticKind, DiagnosticLog};
use crate::xml::{serialize_children, XmlDocument, XmlNode};

const FIELDS: &str = "fields";
const FIELD: &str = "field";
const VALUE: &str = "value";
const F: &str = "f";
const HREF: &str = "href";
const IDS: &str = "ids";
const ORIGINAL: &str = "original";
const MODIFIED: &str = "modified";
const ANNOTS: &str = "annots";
const CONTENTS: &str = "contents";
const CONTENTS_RICHTEXT: &str = "contents-richtext";
const POPUP: &str = "popup";
const VERTICES: &str = "vertices";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParserStatistics {
    pub fields_parsed: usize,
    pub annotations_parsed: usize,
    pub annotations_skipped: usize,
    pub attributes_dropped: usize,
}

/// Walks the XML tree once and builds the object model. The parser keeps
/// only diagnostics and counters; the document is handed to the caller.
#[derive(Debug, Default)]
pub struct InterchangeParser {
    diagnostics: DiagnosticLog,
    stats: ParserStatistics,
}

impl InterchangeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses raw interchange bytes
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<InterchangeDocument> {
        let xml = XmlDocument::parse(bytes)?;
        self.parse(xml.root())
    }

    /// Builds the object model from an already parsed root element
    #[instrument(skip(self, root), fields(root = %root.name))]
    pub fn parse(&mut self, root: &XmlNode) -> Result<InterchangeDocument> {
        let mut document = InterchangeDocument::new();
        document.root_attributes = root
            .attributes
            .iter()
            .map(|(name, value)| RootAttribute {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();

        for node in root.elements() {
            if node.is_named(FIELDS) {
                self.read_field_list(node, &mut document.fields);
            } else if node.is_named(F) {
                document.file = self.visit_file_ref(node);
            } else if node.is_named(IDS) {
                document.ids = Some(visit_ids(node));
            } else if node.is_named(ANNOTS) {
                self.read_annotation_list(node, &mut document.annotations)?;
            }
        }

        info!(
            fields = document.fields.len(),
            annotations = document.annotations.len(),
            "Interchange document parsed"
        );
        Ok(document)
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> DiagnosticLog {
        self.diagnostics
    }

    pub fn statistics(&self) -> &ParserStatistics {
        &self.stats
    }

    fn visit_file_ref(&mut self, node: &XmlNode) -> Option<FileRef> {
        match node.attribute(HREF) {
            Some(href) => Some(FileRef { href: href.to_string() }),
            None => {
                self.diagnostics.record(
                    DiagnosticKind::MissingFileReference,
                    F,
                    "<f> element has no href attribute",
                );
                None
            }
        }
    }

    // ---------------------------------------------------------------- fields

    fn read_field_list(&mut self, node: &XmlNode, fields: &mut Vec<Field>) {
        for child in node.elements().filter(|n| n.is_named(FIELD)) {
            let name = child.first_attribute().map(|(_, value)| value.to_string());
            self.visit_field(child, name, fields);
        }
    }

    /// Visits a field and its descendants. Descendants land in `fields`
    /// before the field itself.
    fn visit_field(&mut self, node: &XmlNode, name: Option<String>, fields: &mut Vec<Field>) -> FieldId {
        if node.attributes.is_empty() {
            self.diagnostics.record(
                DiagnosticKind::UnnamedField,
                FIELD,
                "<field> element has no attributes, name left unset",
            );
        }

        let mut field = Field {
            name,
            value: None,
            parent: None,
        };
        let mut children = Vec::new();

        for child in node.elements() {
            if child.is_named(VALUE) {
                match child.children.first() {
                    Some(first) => field.value = Some(first.text_content()),
                    None => self.diagnostics.record(
                        DiagnosticKind::EmptyFieldValue,
                        field.name.clone().unwrap_or_else(|| VALUE.to_string()),
                        "<value> element has no content",
                    ),
                }
            } else if child.is_named(FIELD) {
                let local = child.first_attribute().map(|(_, value)| value);
                let child_name = match (field.name.as_deref(), local) {
                    (Some(parent), Some(local)) => Some(format!("{}.{}", parent, local)),
                    (None, Some(local)) => Some(local.to_string()),
                    (_, None) => None,
                };
                children.push(self.visit_field(child, child_name, fields));
            }
        }

        let id = FieldId(fields.len());
        fields.push(field);
        for child in children {
            fields[child.0].parent = Some(id);
        }
        self.stats.fields_parsed += 1;
        id
    }

    // ----------------------------------------------------------- annotations

    fn read_annotation_list(&mut self, node: &XmlNode, annotations: &mut Vec<Annotation>) -> Result<()> {
        for child in node.elements() {
            let Some(kind) = AttributeTable::annotation_kind(&child.name) else {
                continue;
            };
            if !AttributeTable::is_parse_supported(kind) {
                debug!(kind = %kind, "Skipping annotation kind without body support");
                self.stats.annotations_skipped += 1;
                continue;
            }
            annotations.push(self.visit_annotation(kind, child)?);
            self.stats.annotations_parsed += 1;
        }
        Ok(())
    }

    fn visit_annotation(&mut self, kind: AnnotationKind, node: &XmlNode) -> Result<Annotation> {
        let mut page = None;
        let mut attributes = AttributeBag::new();

        for (name, value) in &node.attributes {
            if name == PAGE {
                let parsed = value.parse::<i32>().map_err(|_| ParseError::InvalidPage {
                    element: node.name.clone(),
                    value: value.clone(),
                })?;
                page = Some(parsed);
            } else {
                self.keep_attribute(Some(kind), &mut attributes, name, value);
            }
        }

        let page = page.ok_or_else(|| ParseError::MissingPage {
            element: node.name.clone(),
        })?;

        let mut annotation = Annotation::new(kind, page);
        annotation.attributes = attributes;

        for child in node.elements() {
            if child.is_named(CONTENTS) {
                if let Some(text) = child.first_text() {
                    annotation.contents = Some(text.to_string());
                }
            } else if child.is_named(CONTENTS_RICHTEXT) {
                let blank = annotation
                    .contents
                    .as_deref()
                    .map_or(true, |c| c.trim().is_empty());
                if blank {
                    annotation.contents = Some(child.text_content());
                }
                annotation.rich_text = Some(serialize_children(child));
            } else if child.is_named(POPUP) {
                annotation.popup = Some(self.visit_popup(child));
            } else if child.is_named(VERTICES) {
                if let Some(text) = child.first_text() {
                    annotation.vertices = Some(text.to_string());
                }
            }
        }

        debug!(kind = %kind, page, "Annotation parsed");
        Ok(annotation)
    }

    fn visit_popup(&mut self, node: &XmlNode) -> Popup {
        let mut attributes = AttributeBag::new();
        for (name, value) in &node.attributes {
            // pop-ups always land on their parent's page
            if name == PAGE {
                continue;
            }
            self.keep_attribute(None, &mut attributes, name, value);
        }
        Popup { attributes }
    }

    fn keep_attribute(&mut self, kind: Option<AnnotationKind>, bag: &mut AttributeBag, name: &str, value: &str) {
        if AttributeTable::accepts(kind, name) {
            bag.insert(name, value);
        } else {
            self.stats.attributes_dropped += 1;
            self.diagnostics.record(
                DiagnosticKind::UnsupportedAttribute,
                name,
                format!("Unsupported annotation attribute \"{}\"", name),
            );
        }
    }
}

fn visit_ids(node: &XmlNode) -> IdPair {
    IdPair {
        original: node.attribute(ORIGINAL).map(str::to_string),
        modified: node.attribute(MODIFIED).map(str::to_string),
    }
}
