//! Allowlist filter: rebuilds a cleaned copy of a subtree.
//!
//! Every source node gets a [`Disposition`]; the filtered tree is written
//! into a fresh [`ArenaDom`] in one pre-order walk, so the list being
//! iterated is never the list being modified. Unwrapped elements hand their
//! children to their own destination parent, which puts the children
//! exactly where the element used to be.

use std::borrow::Cow;

use html5ever::{QualName, ns};
use log::trace;

use super::{CleanerOptions, Disallowed};
use crate::dom::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute, is_void_element, write_start_tag};
use crate::policy::Policy;

/// Attributes whose values are navigable links and get a scheme check.
pub const LINK_ATTRIBUTES: &[&str] = &["href", "cite"];

/// What happens to one node of the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Copy the node (attributes filtered) and recurse.
    Keep,
    /// Drop the node itself, keep its children in its place.
    Unwrap,
    /// Drop the node and everything below it.
    Drop,
    /// Replace the tags with their escaped text, keep the children.
    Escape,
}

enum Work {
    Node { id: ArenaNodeId, parent: ArenaNodeId },
    EndTag { text: String, parent: ArenaNodeId },
}

/// Tree filter bound to one policy and option set.
pub(crate) struct Filter<'a> {
    pub policy: &'a Policy,
    pub options: &'a CleanerOptions,
}

impl Filter<'_> {
    /// Decide the fate of a node.
    pub fn disposition(&self, src: &ArenaDom, id: ArenaNodeId) -> Disposition {
        let Some(node) = src.get(id) else {
            return Disposition::Drop;
        };
        match &node.data {
            ArenaNodeData::Text(_) => Disposition::Keep,
            // A kept comment must not be able to close a raw text context.
            ArenaNodeData::Comment(text) if !self.options.strip_comments && !text.contains(['<', '>']) => {
                Disposition::Keep
            }
            ArenaNodeData::Comment(_) | ArenaNodeData::Doctype { .. } => Disposition::Drop,
            ArenaNodeData::Document => Disposition::Unwrap,
            ArenaNodeData::Element { name, .. } => {
                // Foreign (SVG, MathML) elements never pass, whatever their local name.
                if name.ns == ns!(html) && self.policy.allows_tag(&name.local) {
                    Disposition::Keep
                } else {
                    match self.options.disallowed {
                        Disallowed::Unwrap => Disposition::Unwrap,
                        Disallowed::Escape => Disposition::Escape,
                        Disallowed::Drop => Disposition::Drop,
                    }
                }
            }
        }
    }

    /// Filter the children of `root` into a new DOM (under its document node).
    pub fn filter_children(&self, src: &ArenaDom, root: ArenaNodeId) -> ArenaDom {
        let mut out = ArenaDom::new();
        let mut stack = Vec::new();
        push_children(src, root, out.document(), &mut stack);

        while let Some(work) = stack.pop() {
            let (id, parent) = match work {
                Work::EndTag { text, parent } => {
                    out.append_text(parent, &text);
                    continue;
                }
                Work::Node { id, parent } => (id, parent),
            };
            let Some(node) = src.get(id) else {
                continue;
            };

            match (self.disposition(src, id), &node.data) {
                (Disposition::Keep, ArenaNodeData::Text(text)) => {
                    if is_html_script(&out, parent) {
                        out.append_text(parent, &neutralize_script_text(text));
                    } else {
                        out.append_text(parent, text);
                    }
                }
                (Disposition::Keep, ArenaNodeData::Comment(text)) => {
                    let comment = out.create_comment(text.clone());
                    out.append(parent, comment);
                }
                (Disposition::Keep, ArenaNodeData::Element { name, attrs }) => {
                    let attrs = self.filter_attributes(name, attrs);
                    let element = out.create_element(name.clone(), attrs);
                    out.append(parent, element);
                    push_children(src, id, element, &mut stack);
                }
                (Disposition::Unwrap, data) => {
                    if let ArenaNodeData::Element { name, .. } = data {
                        trace!("unwrapping <{}>", name.local);
                    }
                    push_children(src, id, parent, &mut stack);
                }
                (Disposition::Escape, ArenaNodeData::Element { name, attrs }) => {
                    trace!("escaping <{}>", name.local);
                    let mut start = String::new();
                    write_start_tag(&mut start, name, attrs);
                    out.append_text(parent, &start);
                    if !is_void_element(&name.local) {
                        stack.push(Work::EndTag {
                            text: format!("</{}>", name.local),
                            parent,
                        });
                    }
                    push_children(src, id, parent, &mut stack);
                }
                (disposition, data) => {
                    if let ArenaNodeData::Element { name, .. } = data {
                        trace!("dropping <{}> ({disposition:?})", name.local);
                    }
                }
            }
        }

        out
    }

    /// Attributes of a kept element that pass the policy, in source order.
    fn filter_attributes(&self, name: &QualName, attrs: &[Attribute]) -> Vec<Attribute> {
        attrs
            .iter()
            .filter(|attr| {
                let attr_name = attr.qualified_name();
                let allowed = self.policy.allows_attribute(&name.local, &attr_name)
                    && (!LINK_ATTRIBUTES.contains(&attr_name.as_str())
                        || self.has_allowed_scheme(&attr.value));
                if !allowed {
                    trace!("dropping attribute {} on <{}>", attr_name, name.local);
                }
                allowed
            })
            .cloned()
            .collect()
    }

    /// Relative URLs always pass; absolute ones need an allowed scheme.
    fn has_allowed_scheme(&self, value: &str) -> bool {
        // Browsers ignore embedded tabs/newlines and leading controls.
        let compact: String = value
            .chars()
            .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
            .collect();
        match url_scheme(&compact) {
            Some(scheme) => self
                .options
                .protocols
                .iter()
                .any(|p| p.eq_ignore_ascii_case(scheme)),
            None => true,
        }
    }
}

fn push_children(src: &ArenaDom, id: ArenaNodeId, parent: ArenaNodeId, stack: &mut Vec<Work>) {
    let mark = stack.len();
    stack.extend(src.children(id).map(|child| Work::Node { id: child, parent }));
    stack[mark..].reverse();
}

/// Scheme of an absolute URL, `None` for relative references.
fn url_scheme(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let candidate = &url[..colon];
    let mut chars = candidate.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(candidate)
}

fn is_html_script(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    dom.get(id).is_some_and(|n| {
        matches!(&n.data, ArenaNodeData::Element { name, .. }
            if name.ns == ns!(html) && name.local.as_ref() == "script")
    })
}

/// End tags that can close a kept script, or the `noscript` around it.
const BREAKOUT_END_TAGS: &[&str] = &["script", "noscript"];

/// Raw script text is written out verbatim, so `</script` and `</noscript`
/// (any case) become `<\/script` and `<\/noscript`. Other text is untouched.
fn neutralize_script_text(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let closes_early = |at: usize| {
        let rest = &bytes[at + 2..];
        BREAKOUT_END_TAGS
            .iter()
            .any(|tag| rest.len() >= tag.len() && rest[..tag.len()].eq_ignore_ascii_case(tag.as_bytes()))
    };

    let mut breakouts = memchr::memmem::find_iter(bytes, b"</").filter(|&at| closes_early(at)).peekable();
    if breakouts.peek().is_none() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for at in breakouts {
        out.push_str(&text[last..at + 1]);
        out.push('\\');
        last = at + 1;
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_scheme() {
        assert_eq!(url_scheme("https://example.com"), Some("https"));
        assert_eq!(url_scheme("javascript:alert(1)"), Some("javascript"));
        assert_eq!(url_scheme("mailto:a@b.c"), Some("mailto"));
        assert_eq!(url_scheme("/path/to:thing"), None);
        assert_eq!(url_scheme("#frag"), None);
        assert_eq!(url_scheme("page.html"), None);
        assert_eq!(url_scheme("%6Aavascript:alert(1)"), None);
    }

    #[test]
    fn test_neutralize_script_text() {
        assert_eq!(neutralize_script_text(r#"{"a": 1}"#), r#"{"a": 1}"#);
        assert_eq!(
            neutralize_script_text(r#"{"html": "</p>"}"#),
            r#"{"html": "</p>"}"#
        );
        assert_eq!(
            neutralize_script_text("a</script>b</SCRIPT >c</NoScript>"),
            r"a<\/script>b<\/SCRIPT >c<\/NoScript>"
        );
        assert_eq!(neutralize_script_text("</scrip"), "</scrip");
        assert_eq!(neutralize_script_text("</"), "</");
    }

    #[test]
    fn test_foreign_elements_are_never_kept() {
        let dom = crate::dom::parse_fragment("<svg><a>x</a></svg><math><mi>y</mi></math><a>z</a>");
        let options = CleanerOptions::default();
        let filter = Filter {
            policy: Policy::standard(),
            options: &options,
        };

        let anchors = dom.descendants_by_tag(dom.document(), "a");
        assert_eq!(anchors.len(), 2);
        assert_eq!(filter.disposition(&dom, anchors[0]), Disposition::Unwrap);
        assert_eq!(filter.disposition(&dom, anchors[1]), Disposition::Keep);
    }

    #[test]
    fn test_disposition_follows_options() {
        let dom = crate::dom::parse_fragment("<form></form><p></p><!--c-->");
        let form = dom.find_by_tag("form").unwrap();
        let p = dom.find_by_tag("p").unwrap();
        let body = dom.find_by_tag("body").unwrap();
        let comment = dom.children(body).last().unwrap();

        let policy = Policy::standard();
        let mut options = CleanerOptions::default();
        let filter = Filter { policy, options: &options };
        assert_eq!(filter.disposition(&dom, p), Disposition::Keep);
        assert_eq!(filter.disposition(&dom, form), Disposition::Unwrap);
        assert_eq!(filter.disposition(&dom, comment), Disposition::Drop);

        options.disallowed = Disallowed::Drop;
        options.strip_comments = false;
        let filter = Filter { policy, options: &options };
        assert_eq!(filter.disposition(&dom, form), Disposition::Drop);
        assert_eq!(filter.disposition(&dom, comment), Disposition::Keep);
    }
}
