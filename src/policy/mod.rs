//! Tag and attribute allowlists.
//!
//! A [`Policy`] maps each allowed (lowercase) tag name to an
//! [`AttributeRule`]. The effective attribute predicate for a tag is
//!
//! ```text
//! tag-specific names ∪ global names ∪ /^data-[A-Za-z0-9\-_.:]*$/
//! ```
//!
//! The standard policy is built once from the static tables in [`tags`] and
//! [`attributes`] and shared read-only by every cleaner.
//!
//! ```
//! use webstory::Policy;
//!
//! let policy = Policy::standard();
//! assert!(policy.allows_tag("AMP-IMG"));
//! assert!(policy.allows_attribute("amp-img", "layout"));
//! assert!(policy.allows_attribute("span", "data-coffee"));
//! assert!(!policy.allows_attribute("p", "sugar"));
//! ```

pub mod attributes;
pub mod tags;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

pub use attributes::{ANIMATION_ATTRIBUTES, GLOBAL_ATTRIBUTES, is_data_attribute};
pub use tags::{ALLOWED_TAGS, SVG_TAGS};

type Name = Cow<'static, str>;

/// Allowed attribute names for one tag, globals included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRule {
    allowed: HashSet<Name>,
}

impl AttributeRule {
    /// Rule allowing the global attributes plus `extra`.
    fn with_globals<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = Name>,
    {
        let allowed = GLOBAL_ATTRIBUTES
            .iter()
            .chain(ANIMATION_ATTRIBUTES)
            .map(|name| Cow::Borrowed(*name))
            .chain(extra)
            .collect();
        Self { allowed }
    }

    /// Check an attribute name against this rule.
    ///
    /// Named attributes compare exactly; the `data-*` pattern is always accepted.
    pub fn allows(&self, attr: &str) -> bool {
        self.allowed.contains(attr) || is_data_attribute(attr)
    }

    /// The enumerated names (excluding the `data-*` pattern).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(|n| &**n)
    }
}

/// Mapping from allowed tag name to its attribute rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    rules: HashMap<Name, AttributeRule>,
}

impl Policy {
    /// The web story page allowlist (cached).
    pub fn standard() -> &'static Self {
        static STANDARD: LazyLock<Policy> = LazyLock::new(Policy::build_standard);
        &STANDARD
    }

    fn build_standard() -> Self {
        let rules = ALLOWED_TAGS
            .iter()
            .map(|&tag| {
                let extra = attributes::tag_attributes(tag)
                    .iter()
                    .flat_map(|group| group.iter())
                    .map(|name| Cow::Borrowed(*name));
                (Cow::Borrowed(tag), AttributeRule::with_globals(extra))
            })
            .collect();
        Self { rules }
    }

    /// Start from the standard allowlist and extend it.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder {
            policy: Self::standard().clone(),
        }
    }

    /// Look up the rule for a tag. Tag names compare case-insensitively.
    pub fn rule(&self, tag: &str) -> Option<&AttributeRule> {
        if tag.bytes().any(|b| b.is_ascii_uppercase()) {
            self.rules.get(tag.to_ascii_lowercase().as_str())
        } else {
            self.rules.get(tag)
        }
    }

    /// Check whether a tag is allowed.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.rule(tag).is_some()
    }

    /// Effective attribute predicate: false for tags that are not allowed.
    pub fn allows_attribute(&self, tag: &str, attr: &str) -> bool {
        self.rule(tag).is_some_and(|rule| rule.allows(attr))
    }

    /// All allowed tag names.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|t| &**t)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Builder extending the standard [`Policy`].
///
/// ```
/// use webstory::Policy;
///
/// let policy = Policy::builder()
///     .allow_tag("amp-story-bookend")
///     .allow_attributes("amp-img", ["object-fit"])
///     .build();
/// assert!(policy.allows_attribute("amp-story-bookend", "id"));
/// assert!(policy.allows_attribute("amp-img", "object-fit"));
/// ```
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    /// Allow a tag with only the global attributes.
    pub fn allow_tag(mut self, tag: &str) -> Self {
        self.policy
            .rules
            .entry(Cow::Owned(tag.to_ascii_lowercase()))
            .or_insert_with(|| AttributeRule::with_globals(std::iter::empty()));
        self
    }

    /// Allow extra attributes on a tag, allowing the tag if needed.
    pub fn allow_attributes<I, S>(mut self, tag: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rule = self
            .policy
            .rules
            .entry(Cow::Owned(tag.to_ascii_lowercase()))
            .or_insert_with(|| AttributeRule::with_globals(std::iter::empty()));
        rule.allowed
            .extend(attrs.into_iter().map(|a| Cow::Owned(a.into())));
        self
    }

    /// Remove a tag from the allowlist.
    pub fn deny_tag(mut self, tag: &str) -> Self {
        self.policy.rules.remove(tag.to_ascii_lowercase().as_str());
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}
