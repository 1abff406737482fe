//! Writes tree nodes back out as markup, without an XML declaration

use quick_xml::escape::{escape, partial_escape};

use super::tree::{XmlChild, XmlNode};

/// Serializes every child of `node`, concatenated in order.
pub fn serialize_children(node: &XmlNode) -> String {
    let mut out = String::new();
    for child in &node.children {
        write_child(child, &mut out);
    }
    out
}

fn write_child(child: &XmlChild, out: &mut String) {
    match child {
        XmlChild::Element(node) => write_element(node, out),
        XmlChild::Text(text) => out.push_str(&partial_escape(text.as_str())),
        XmlChild::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        XmlChild::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn write_element(node: &XmlNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.name);
    for (key, value) in &node.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    if node.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &node.children {
        write_child(child, out);
    }
    out.push_str("</");
    out.push_str(&node.name);
    out.push('>');
}
