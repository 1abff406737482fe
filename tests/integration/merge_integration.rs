use lopdf::{Dictionary, Object};
use xfdf_merge::merge::{RecordId, ReplyType};
use xfdf_merge::types::AffineTransform;
use xfdf_merge::{
    merge, AppearanceCachePolicy, DiagnosticKind, InterchangeDocument, InterchangeParser, LopdfTarget,
    MemoryTarget, MergeConfig, MergeSession,
};

use crate::fixtures::TestFixtures;

fn parse(bytes: &[u8]) -> InterchangeDocument {
    InterchangeParser::new().parse_bytes(bytes).unwrap()
}

fn annotation_dict(target: &LopdfTarget, record: RecordId) -> &Dictionary {
    let id = target.object_id(record).unwrap();
    target.document().get_object(id).unwrap().as_dict().unwrap()
}

fn name_of<'a>(dict: &'a Dictionary, key: &[u8]) -> &'a [u8] {
    dict.get(key).unwrap().as_name().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_link_independent_of_order() {
        for reply_first in [false, true] {
            let doc = parse(TestFixtures::reply_pair_xfdf(reply_first).as_bytes());
            let mut target = MemoryTarget::new(1);
            let summary = merge(&doc, &mut target, AffineTransform::IDENTITY, 0).unwrap();

            let original = summary.records.iter().find(|r| r.name.as_deref() == Some("a1")).unwrap();
            let reply = summary.records.iter().find(|r| r.name.as_deref() == Some("b1")).unwrap();
            assert_eq!(reply.in_reply_to(), Some(original.id), "reply_first = {}", reply_first);
            assert_eq!(original.in_reply_to(), None);
            assert_eq!(summary.statistics.replies_linked, 1);
            assert!(summary.diagnostics.is_empty());
        }
    }

    #[test]
    fn test_review_merge_into_memory() {
        let doc = parse(&TestFixtures::review_xfdf());
        let mut target = MemoryTarget::new(2);
        let summary = merge(&doc, &mut target, AffineTransform::IDENTITY, 0).unwrap();

        // reply, note, popup, highlight on page 1; caret on page 2
        assert_eq!(target.annotations(1).len(), 4);
        assert_eq!(target.annotations(2).len(), 1);

        let records = &summary.records;
        assert_eq!(records[0].in_reply_to(), Some(RecordId(1)));
        assert_eq!(records[4].in_reply_to(), Some(RecordId(1)));
        assert_eq!(records[4].markup.as_ref().unwrap().reply_type, Some(ReplyType::Group));
        assert_eq!(records[4].quad_points.len(), 8);

        assert_eq!(summary.statistics.annotations_seen, 5);
        assert_eq!(summary.statistics.unsupported_skipped, 1);
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics.count(DiagnosticKind::UnsupportedAnnotation), 1);
    }

    #[test]
    fn test_merge_is_idempotent_across_sessions() {
        let doc = parse(&TestFixtures::review_xfdf());
        let mut first = MemoryTarget::new(2);
        let mut second = MemoryTarget::new(2);
        merge(&doc, &mut first, AffineTransform::IDENTITY, 0).unwrap();
        merge(&doc, &mut second, AffineTransform::IDENTITY, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsupported_kind_does_not_touch_target() {
        let xfdf = TestFixtures::xfdf_with_annots(r##"<line page="0" rect="0,0,10,10" color="#00FF00"/>"##);
        let doc = parse(xfdf.as_bytes());
        let mut target = LopdfTarget::new(TestFixtures::blank_document(1));
        let summary = merge(&doc, &mut target, AffineTransform::IDENTITY, 0).unwrap();

        assert!(target.annotation_refs(1).unwrap().is_empty());
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics.entries()[0].subject, "line");
    }

    #[test]
    fn test_popup_rect_not_inherited() {
        let xfdf = TestFixtures::xfdf_with_annots(
            r#"<text page="0" rect="0,0,10,10"><popup rect="20,30,60,90"/></text>"#,
        );
        let doc = parse(xfdf.as_bytes());
        let mut target = MemoryTarget::new(1);
        let summary = merge(&doc, &mut target, AffineTransform::scale_translate(2.0, 0.0, 0.0), 0).unwrap();

        let popup = &summary.records[1];
        assert_eq!(popup.rect.to_pdf_array(), [40.0, 60.0, 120.0, 180.0]);
        assert_eq!(summary.records[0].rect.to_pdf_array(), [0.0, 0.0, 20.0, 20.0]);
        assert_eq!(popup.open, Some(false));
    }

    #[test]
    fn test_page_shift_out_of_range_aborts_before_writing() {
        let doc = parse(&TestFixtures::review_xfdf());
        let mut target = MemoryTarget::new(2);
        assert!(merge(&doc, &mut target, AffineTransform::IDENTITY, 1).is_err());
        assert_eq!(target.total_annotations(), 0);
    }

    #[test]
    fn test_lopdf_annotation_dictionaries() {
        let doc = parse(&TestFixtures::review_xfdf());
        let mut target = LopdfTarget::new(TestFixtures::blank_document(2));
        merge(&doc, &mut target, AffineTransform::IDENTITY, 0).unwrap();

        assert_eq!(target.annotation_refs(1).unwrap().len(), 4);
        assert_eq!(target.annotation_refs(2).unwrap().len(), 1);

        let note_id = target.object_id(RecordId(1)).unwrap();
        let popup_id = target.object_id(RecordId(2)).unwrap();

        let reply = annotation_dict(&target, RecordId(0));
        assert_eq!(name_of(reply, b"Subtype"), b"Text");
        assert_eq!(reply.get(b"IRT").unwrap().as_reference().unwrap(), note_id);
        assert_eq!(name_of(reply, b"RT"), b"R");

        let note = annotation_dict(&target, RecordId(1));
        assert_eq!(name_of(note, b"Name"), b"Comment");
        assert_eq!(note.get(b"Popup").unwrap().as_reference().unwrap(), popup_id);
        assert!(note.get(b"AP").is_ok());
        match note.get(b"Contents").unwrap() {
            Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"Please review this paragraph"),
            other => panic!("unexpected contents {:?}", other),
        }

        let popup = annotation_dict(&target, RecordId(2));
        assert_eq!(name_of(popup, b"Subtype"), b"Popup");
        assert_eq!(popup.get(b"Parent").unwrap().as_reference().unwrap(), note_id);
        assert!(popup.get(b"Open").unwrap().as_bool().unwrap());
        assert_eq!(popup.get(b"F").unwrap().as_i64().unwrap(), 4);

        let highlight = annotation_dict(&target, RecordId(4));
        assert_eq!(name_of(highlight, b"RT"), b"Group");
        assert_eq!(highlight.get(b"QuadPoints").unwrap().as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_appearances_shared_per_kind() {
        let xfdf = TestFixtures::xfdf_with_annots(
            r##"<caret page="0" rect="0,0,5,5" color="#FF0000"/><caret page="0" rect="5,5,9,9" color="#00FF00"/>"##,
        );
        let doc = parse(xfdf.as_bytes());

        let shared = |policy: AppearanceCachePolicy| {
            let config = MergeConfig {
                appearance_cache: policy,
                ..MergeConfig::default()
            };
            let mut target = LopdfTarget::new(TestFixtures::blank_document(1));
            MergeSession::new(&config).merge(&doc, &mut target).unwrap();
            let first = annotation_dict(&target, RecordId(0)).get(b"AP").unwrap().as_dict().unwrap()
                .get(b"N").unwrap().as_reference().unwrap();
            let second = annotation_dict(&target, RecordId(1)).get(b"AP").unwrap().as_dict().unwrap()
                .get(b"N").unwrap().as_reference().unwrap();
            first == second
        };

        assert!(shared(AppearanceCachePolicy::PerKind));
        assert!(!shared(AppearanceCachePolicy::PerKindAndColor));
    }

    #[test]
    fn test_repeated_merges_into_one_target_append() {
        let doc = parse(TestFixtures::reply_pair_xfdf(true).as_bytes());
        let mut target = LopdfTarget::new(TestFixtures::blank_document(1));
        merge(&doc, &mut target, AffineTransform::IDENTITY, 0).unwrap();
        let first_round = target.annotation_refs(1).unwrap();
        merge(&doc, &mut target, AffineTransform::IDENTITY, 0).unwrap();
        let refs = target.annotation_refs(1).unwrap();

        assert_eq!(refs.len(), 4);
        assert_eq!(&refs[..2], first_round.as_slice());
        assert!(!first_round.contains(&refs[2]));
    }

    #[test]
    fn test_saved_document_reloads() {
        let doc = parse(&TestFixtures::review_xfdf());
        let mut target = LopdfTarget::from_bytes(&TestFixtures::blank_pdf(2)).unwrap();
        merge(&doc, &mut target, AffineTransform::IDENTITY, 0).unwrap();
        let bytes = target.to_bytes().unwrap();

        let reloaded = LopdfTarget::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.annotation_refs(1).unwrap().len(), 4);
        assert_eq!(reloaded.annotation_refs(2).unwrap().len(), 1);
    }
}
