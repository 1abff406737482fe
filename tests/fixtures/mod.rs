use lopdf::{dictionary, Document, Object};

pub struct TestFixtures;

impl TestFixtures {
    /// The review fixture from `tests/data`: fields, a reply chain whose
    /// reply comes first, a popup, a caret on page 2 and one unmerged line.
    pub fn review_xfdf() -> Vec<u8> {
        std::fs::read(crate::get_test_xfdf_path("review.xfdf")).unwrap()
    }

    /// Reply `b` to `a`, with the two annotations in the given order
    pub fn reply_pair_xfdf(reply_first: bool) -> String {
        let target = r#"<text page="0" rect="0,0,20,20" name="a1"><contents>Original</contents></text>"#;
        let reply = r#"<text page="0" rect="0,0,20,20" name="b1" inreplyto="a1"><contents>Reply</contents></text>"#;
        let (first, second) = if reply_first { (reply, target) } else { (target, reply) };
        format!("<xfdf><annots>{}{}</annots></xfdf>", first, second)
    }

    pub fn xfdf_with_annots(annots: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><xfdf xmlns="http://ns.adobe.com/xfdf/"><annots>{}</annots></xfdf>"#,
            annots
        )
    }

    /// A document with `page_count` empty letter-size pages
    pub fn blank_document(page_count: u32) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..page_count)
            .map(|_| {
                let page = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ],
                });
                Object::Reference(page)
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => i64::from(page_count),
            }),
        );
        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog);
        doc
    }

    pub fn blank_pdf(page_count: u32) -> Vec<u8> {
        let mut doc = Self::blank_document(page_count);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
