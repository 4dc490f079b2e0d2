//! Removal of executable `<script>` elements.
//!
//! The attribute allowlist decides on attribute *names* only, so it cannot
//! express "a `script` is fine when its `type` is a data type". This pass
//! runs first, on the cleaning copy, and detaches every `script` whose
//! `type` is not exactly one of [`TRUSTED_SCRIPT_TYPES`] (a missing `type`
//! counts as untrusted).

use log::trace;

use crate::dom::{ArenaDom, ArenaNodeId};

/// Script types that carry data rather than code.
pub const TRUSTED_SCRIPT_TYPES: &[&str] = &["application/ld+json", "application/json", "text/plain"];

/// Check a `type` attribute value against the trusted list (exact match).
pub fn is_trusted_script_type(script_type: Option<&str>) -> bool {
    script_type.is_some_and(|t| TRUSTED_SCRIPT_TYPES.contains(&t))
}

/// Detach every untrusted `script` below `root`, subtree included.
///
/// Returns the number of removed elements.
pub fn remove_untrusted_scripts(dom: &mut ArenaDom, root: ArenaNodeId) -> usize {
    let untrusted: Vec<_> = dom
        .descendants_by_tag(root, "script")
        .into_iter()
        .filter(|&id| !is_trusted_script_type(dom.get_attr(id, "type")))
        .collect();

    for &id in &untrusted {
        trace!("removing script with type {:?}", dom.get_attr(id, "type"));
        dom.detach(id);
    }
    untrusted.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    fn gate(html: &str) -> (usize, String) {
        let dom = parse_fragment(html);
        let body = dom.find_by_tag("body").unwrap();
        let mut copy = dom.clone_subtree(body);
        let copied_body = copy.root_element().unwrap();
        let removed = remove_untrusted_scripts(&mut copy, copied_body);
        (removed, serialize_children(&copy, copied_body))
    }

    #[test]
    fn test_trusted_types() {
        assert!(is_trusted_script_type(Some("application/json")));
        assert!(is_trusted_script_type(Some("application/ld+json")));
        assert!(is_trusted_script_type(Some("text/plain")));
        assert!(!is_trusted_script_type(None));
        assert!(!is_trusted_script_type(Some("")));
        assert!(!is_trusted_script_type(Some("text/javascript")));
        assert!(!is_trusted_script_type(Some("module")));
        assert!(!is_trusted_script_type(Some("Application/JSON")));
        assert!(!is_trusted_script_type(Some(" application/json")));
    }

    #[test]
    fn test_removes_untyped_and_executable_scripts() {
        let (removed, html) = gate(
            r#"<p>a</p><script>alert(1)</script><script type="module">x()</script><script type="application/json">{}</script>"#,
        );
        assert_eq!(removed, 2);
        assert_eq!(html, r#"<p>a</p><script type="application/json">{}</script>"#);
    }

    #[test]
    fn test_nested_scripts_removed() {
        let (removed, html) = gate(r#"<div><span><script src="x.js"></script>kept</span></div>"#);
        assert_eq!(removed, 1);
        assert_eq!(html, "<div><span>kept</span></div>");
    }

    #[test]
    fn test_no_scripts_is_noop() {
        let (removed, html) = gate("<p>nothing here</p>");
        assert_eq!(removed, 0);
        assert_eq!(html, "<p>nothing here</p>");
    }

    #[test]
    fn test_source_tree_untouched() {
        let dom = parse_fragment("<script>x</script>");
        let body = dom.find_by_tag("body").unwrap();
        let mut copy = dom.clone_subtree(body);
        let root = copy.root_element().unwrap();
        remove_untrusted_scripts(&mut copy, root);
        assert!(dom.find_by_tag("script").is_some());
        assert!(copy.find_by_tag("script").is_none());
    }
}
