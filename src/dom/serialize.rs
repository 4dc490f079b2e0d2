//! HTML serialization for ArenaDom subtrees.
//!
//! Output rules:
//! - tag names as stored (the parser lowercases HTML names)
//! - attributes in source order, values double-quoted
//! - void elements self-closed (`<br/>`)
//! - text escaped for `&`, `<`, `>`; attribute values for `&`, `"`, `<`, `>`
//! - raw text of HTML `script`/`style` (and the other raw text elements) emitted verbatim

use html5ever::{Namespace, QualName, ns};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute};
use crate::util::{escape_attr, escape_text};

/// Elements that never have children or an end tag.
pub(crate) fn is_void_element(local: &str) -> bool {
    matches!(
        local,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text children the parser keeps unescaped.
fn is_raw_text_element(ns: &Namespace, local: &str) -> bool {
    *ns == ns!(html)
        && matches!(
            local,
            "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
        )
}

/// Write `<name attr="value"...>`, self-closed for void elements.
pub(crate) fn write_start_tag(out: &mut String, name: &QualName, attrs: &[Attribute]) {
    out.push('<');
    out.push_str(&name.local);
    for attr in attrs {
        out.push(' ');
        out.push_str(&attr.qualified_name());
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }
    if is_void_element(&name.local) {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

enum Step {
    Open(ArenaNodeId),
    Close(ArenaNodeId),
}

/// Serialize a node, including the node itself.
pub fn serialize_node(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    write_steps(dom, vec![Step::Open(id)], &mut out);
    out
}

/// Serialize the children of a node, excluding the node itself.
pub fn serialize_children(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    let mut steps: Vec<_> = dom.children(id).map(Step::Open).collect();
    steps.reverse();
    write_steps(dom, steps, &mut out);
    out
}

/// Iterative walk so deeply nested input cannot exhaust the call stack.
fn write_steps(dom: &ArenaDom, mut stack: Vec<Step>, out: &mut String) {
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) => {
                let Some(node) = dom.get(id) else {
                    continue;
                };
                match &node.data {
                    ArenaNodeData::Document => {}
                    ArenaNodeData::Doctype { name } => {
                        out.push_str("<!DOCTYPE ");
                        out.push_str(name);
                        out.push('>');
                        continue;
                    }
                    ArenaNodeData::Comment(text) => {
                        out.push_str("<!--");
                        out.push_str(text);
                        out.push_str("-->");
                        continue;
                    }
                    ArenaNodeData::Text(text) => {
                        let raw = dom.get(node.parent).is_some_and(|p| {
                            matches!(&p.data, ArenaNodeData::Element { name, .. }
                                if is_raw_text_element(&name.ns, &name.local))
                        });
                        if raw {
                            out.push_str(text);
                        } else {
                            out.push_str(&escape_text(text));
                        }
                        continue;
                    }
                    ArenaNodeData::Element { name, attrs } => {
                        write_start_tag(out, name, attrs);
                        if is_void_element(&name.local) {
                            continue;
                        }
                    }
                }

                if matches!(node.data, ArenaNodeData::Element { .. }) {
                    stack.push(Step::Close(id));
                }
                let mark = stack.len();
                stack.extend(dom.children(id).map(Step::Open));
                stack[mark..].reverse();
            }
            Step::Close(id) => {
                if let Some(name) = dom.element_name(id) {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;

    fn roundtrip(html: &str) -> String {
        let dom = parse_fragment(html);
        let body = dom.find_by_tag("body").expect("fragment has body");
        serialize_children(&dom, body)
    }

    #[test]
    fn test_attributes_in_source_order() {
        assert_eq!(
            roundtrip(r#"<amp-img width="720" src="a.jpg" layout="responsive"></amp-img>"#),
            r#"<amp-img width="720" src="a.jpg" layout="responsive"></amp-img>"#
        );
    }

    #[test]
    fn test_void_elements_self_closed() {
        assert_eq!(roundtrip("<p>a<br>b</p><hr>"), "<p>a<br/>b</p><hr/>");
    }

    #[test]
    fn test_tag_names_lowercased() {
        assert_eq!(roundtrip("<DIV CLASS=x>y</DIV>"), r#"<div class="x">y</div>"#);
    }

    #[test]
    fn test_text_and_attribute_escaping() {
        assert_eq!(
            roundtrip(r#"<p title="a &quot;b&quot; <c>">1 &lt; 2 &amp; 3 &gt; 0</p>"#),
            r#"<p title="a &quot;b&quot; &lt;c&gt;">1 &lt; 2 &amp; 3 &gt; 0</p>"#
        );
    }

    #[test]
    fn test_script_text_verbatim() {
        assert_eq!(
            roundtrip(r#"<script type="application/json">{"a": "<b> & c"}</script>"#),
            r#"<script type="application/json">{"a": "<b> & c"}</script>"#
        );
    }

    #[test]
    fn test_comments_and_nesting() {
        assert_eq!(
            roundtrip("<div><!-- note --><span><em>x</em></span></div>"),
            "<div><!-- note --><span><em>x</em></span></div>"
        );
    }
}
