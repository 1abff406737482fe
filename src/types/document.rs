//! In-memory object model of an interchange (XFDF) document.
//!
//! Built once by `interchange::InterchangeParser` and read-only afterwards.

use serde::Serialize;

use super::kind::AnnotationKind;

/// One attribute copied from the document root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootAttribute {
    pub name: String,
    pub value: String,
}

/// Reference to the PDF the interchange data belongs to (`<f href="..."/>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRef {
    pub href: String,
}

/// Original and modified document identifiers (`<ids .../>`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdPair {
    pub original: Option<String>,
    pub modified: Option<String>,
}

/// Index of a field in `InterchangeDocument::fields`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldId(pub usize);

/// A form field. `name` is the fully qualified dotted name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: Option<String>,
    pub value: Option<String>,
    pub parent: Option<FieldId>,
}

/// Attributes in document order, already filtered through the attribute table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeBag {
    entries: Vec<(String, String)>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an attribute, keeping the first position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `name` unless it is missing or only whitespace
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = AttributeBag::new();
        for (name, value) in iter {
            bag.insert(name, value);
        }
        bag
    }
}

/// Pop-up note attached to a markup annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub attributes: AttributeBag,
}

/// A single annotation read from `<annots>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub attributes: AttributeBag,
    /// Zero-based page index as authored
    pub page: i32,
    pub contents: Option<String>,
    /// Serialized children of `<contents-richtext>`
    pub rich_text: Option<String>,
    /// Raw `<vertices>` text, parsed by consumers that need it
    pub vertices: Option<String>,
    pub popup: Option<Popup>,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, page: i32) -> Self {
        Self {
            kind,
            attributes: AttributeBag::new(),
            page,
            contents: None,
            rich_text: None,
            vertices: None,
            popup: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }
}

/// Root aggregate produced by the parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterchangeDocument {
    pub root_attributes: Vec<RootAttribute>,
    pub file: Option<FileRef>,
    pub ids: Option<IdPair>,
    /// Every field, children before their parents
    pub fields: Vec<Field>,
    /// Annotations in document order
    pub annotations: Vec<Annotation>,
}

impl InterchangeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.as_deref() == Some(name))
    }

    pub fn parent_of(&self, field: &Field) -> Option<&Field> {
        field.parent.and_then(|id| self.field(id))
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}
