//! Story page cleaning: script gate followed by the allowlist filter.
//!
//! Cleaning always works on a private deep copy of the input subtree, so the
//! parsed document behind a [`Story`](crate::Story) is never modified and any
//! number of threads can clean pages of the same story at once.
//!
//! Cleaning never fails. Whatever the input, the result is a string of
//! markup that only contains allowlisted elements and attributes.
//!
//! ```
//! use webstory::clean_page_fragment;
//!
//! let html = r#"<amp-story-page id="cover"><form><p sugar="no" data-coffee="yes">Hi</p></form></amp-story-page>"#;
//! assert_eq!(
//!     clean_page_fragment(html),
//!     r#"<amp-story-page id="cover"><p data-coffee="yes">Hi</p></amp-story-page>"#
//! );
//! ```

mod cleaner;
pub mod script_gate;

use std::borrow::Cow;

pub use cleaner::{Disposition, LINK_ATTRIBUTES};
pub use script_gate::{TRUSTED_SCRIPT_TYPES, is_trusted_script_type, remove_untrusted_scripts};

use log::{debug, trace};

use crate::dom::{self, ArenaDom, ArenaNodeId, serialize_children};
use crate::policy::Policy;
use cleaner::Filter;

/// Upper bound on clean-and-reparse rounds.
const MAX_ROUNDS: usize = 8;

/// Treatment of elements that are not in the tag allowlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disallowed {
    /// Remove the element, keep its children in its place.
    #[default]
    Unwrap,
    /// Render the element's tags as escaped text, keep its children.
    Escape,
    /// Remove the element together with its whole subtree.
    Drop,
}

/// Cleaner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanerOptions {
    pub disallowed: Disallowed,
    /// Remove comments (default). Kept comments may not contain `<` or `>`.
    pub strip_comments: bool,
    /// URL schemes allowed in link attributes (`href`, `cite`).
    pub protocols: Vec<String>,
}

impl Default for CleanerOptions {
    fn default() -> Self {
        Self {
            disallowed: Disallowed::Unwrap,
            strip_comments: true,
            protocols: vec!["http".into(), "https".into(), "mailto".into()],
        }
    }
}

/// Story page cleaner.
///
/// Holds a policy and options; reusable and shareable across threads.
#[derive(Debug, Clone)]
pub struct Cleaner {
    policy: Cow<'static, Policy>,
    options: CleanerOptions,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner {
    /// Cleaner with the standard policy and default options.
    pub fn new() -> Self {
        Self {
            policy: Cow::Borrowed(Policy::standard()),
            options: CleanerOptions::default(),
        }
    }

    /// Cleaner with a custom policy and options.
    pub fn with_options(policy: Policy, options: CleanerOptions) -> Self {
        Self {
            policy: Cow::Owned(policy),
            options,
        }
    }

    /// Cleaner with the standard policy and custom options.
    pub fn with_cleaner_options(options: CleanerOptions) -> Self {
        Self {
            policy: Cow::Borrowed(Policy::standard()),
            options,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn options(&self) -> &CleanerOptions {
        &self.options
    }

    /// Clean the subtree rooted at `node` (the node itself included).
    ///
    /// `dom` is only read; all destructive steps run on a deep copy.
    pub fn clean_node(&self, dom: &ArenaDom, node: ArenaNodeId) -> String {
        let mut copy = dom.clone_subtree(node);
        let root = copy.document();
        let cleaned = self.clean_tree(&mut copy, root);
        self.settle(cleaned)
    }

    /// Clean an HTML fragment, typically one `<amp-story-page>` element.
    pub fn clean_fragment(&self, html: &str) -> String {
        self.settle(self.clean_markup(html))
    }

    /// One round over freshly parsed fragment markup.
    fn clean_markup(&self, html: &str) -> String {
        let mut parsed = dom::parse_fragment(html);
        let Some(body) = parsed.find_by_tag("body") else {
            return String::new();
        };
        self.clean_tree(&mut parsed, body)
    }

    /// Script gate, allowlist filter and serialization of the children of
    /// `root` in an owned tree.
    fn clean_tree(&self, dom: &mut ArenaDom, root: ArenaNodeId) -> String {
        script_gate::remove_untrusted_scripts(dom, root);
        let filter = Filter {
            policy: &self.policy,
            options: &self.options,
        };
        let cleaned = filter.filter_children(dom, root);
        serialize_children(&cleaned, cleaned.document())
    }

    /// Reparse and clean again until a round leaves the markup unchanged.
    ///
    /// Unwrapping can leave an element where the parser never puts one (an
    /// `li` directly inside an `li` once a `form` between them is gone), and
    /// the next parse restructures it. The settled output parses back to
    /// exactly itself, so cleaning it again is a no-op.
    fn settle(&self, mut cleaned: String) -> String {
        for round in 1..MAX_ROUNDS {
            let next = self.clean_markup(&cleaned);
            if next == cleaned {
                return cleaned;
            }
            trace!("cleaning round {round} restructured the markup");
            cleaned = next;
        }
        debug!("cleaned markup still changing after {MAX_ROUNDS} rounds");
        cleaned
    }
}

/// Clean a story page fragment with the standard policy.
///
/// Usable without building a [`Story`](crate::Story).
pub fn clean_page_fragment(html: &str) -> String {
    Cleaner::new().clean_fragment(html)
}
