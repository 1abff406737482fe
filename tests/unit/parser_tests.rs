use xfdf_merge::types::AnnotationKind;
use xfdf_merge::{DiagnosticKind, InterchangeParser};

use crate::fixtures::TestFixtures;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_document_header() {
        let mut parser = InterchangeParser::new();
        let doc = parser.parse_bytes(&TestFixtures::review_xfdf()).unwrap();

        assert_eq!(doc.root_attribute("xml:space"), Some("preserve"));
        assert_eq!(doc.file.as_ref().unwrap().href, "review.pdf");
        let ids = doc.ids.as_ref().unwrap();
        assert_eq!(ids.original.as_deref(), Some("7A0631678ED475F0898815F0A818CFA1"));
        assert_eq!(ids.modified.as_deref(), Some("BEF7724317B311718E8675B677EF9B4E"));
    }

    #[test]
    fn test_field_names_follow_hierarchy() {
        let mut parser = InterchangeParser::new();
        let doc = parser.parse_bytes(&TestFixtures::review_xfdf()).unwrap();

        let names: Vec<_> = doc.fields.iter().map(|f| f.name.as_deref().unwrap()).collect();
        assert_eq!(
            names,
            vec!["customer.name", "customer.address.city", "customer.address", "customer"]
        );

        for field in &doc.fields {
            let name = field.name.as_deref().unwrap();
            match doc.parent_of(field) {
                Some(parent) => {
                    let local = name.rsplit('.').next().unwrap();
                    assert_eq!(name, format!("{}.{}", parent.name.as_deref().unwrap(), local));
                }
                None => assert!(!name.contains('.')),
            }
        }
        assert_eq!(
            doc.field_by_name("customer.address.city").unwrap().value.as_deref(),
            Some("London")
        );
        assert_eq!(doc.field_by_name("customer").unwrap().value, None);
    }

    #[test]
    fn test_annotations_in_document_order() {
        let mut parser = InterchangeParser::new();
        let doc = parser.parse_bytes(&TestFixtures::review_xfdf()).unwrap();

        let kinds: Vec<_> = doc.annotations.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnnotationKind::Text,
                AnnotationKind::Text,
                AnnotationKind::Caret,
                AnnotationKind::Highlight,
                AnnotationKind::Line,
            ]
        );
        assert_eq!(doc.annotations[2].page, 1);
        assert_eq!(doc.annotations[1].contents.as_deref(), Some("Please review this paragraph"));
        let popup = doc.annotations[1].popup.as_ref().unwrap();
        assert_eq!(popup.attributes.get("rect"), Some("150,100,300,200"));
        assert!(!popup.attributes.contains("page"));
        assert!(parser.diagnostics().is_empty());
    }

    #[test]
    fn test_unknown_attributes_dropped_and_reported() {
        let xfdf = TestFixtures::xfdf_with_annots(
            r#"<square page="0" rect="0,0,1,1"/><text page="0" rect="0,0,1,1" width="3" style="x"/>"#,
        );
        let mut parser = InterchangeParser::new();
        let doc = parser.parse_bytes(xfdf.as_bytes()).unwrap();

        assert_eq!(doc.annotations.len(), 1);
        assert!(!doc.annotations[0].attributes.contains("width"));
        assert_eq!(parser.diagnostics().count(DiagnosticKind::UnsupportedAttribute), 2);
    }

    #[test]
    fn test_missing_page_is_fatal() {
        let xfdf = TestFixtures::xfdf_with_annots(r#"<text rect="0,0,1,1"/>"#);
        assert!(InterchangeParser::new().parse_bytes(xfdf.as_bytes()).is_err());

        let xfdf = TestFixtures::xfdf_with_annots(r#"<text page="first" rect="0,0,1,1"/>"#);
        assert!(InterchangeParser::new().parse_bytes(xfdf.as_bytes()).is_err());
    }
}
