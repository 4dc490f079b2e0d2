//! Allowed attribute names: global, per-tag and the `data-*` pattern.
//!
//! Names are stored lowercase, as the parser delivers them.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Attributes allowed on every element (AMP validator global attributes).
pub const GLOBAL_ATTRIBUTES: &[&str] = &[
    // Microdata
    "itemid",
    "itemprop",
    "itemref",
    "itemscope",
    "itemtype",
    // RDFa
    "about",
    "content",
    "datatype",
    "inlist",
    "prefix",
    "property",
    "rel",
    "resource",
    "rev",
    "style",
    "typeof",
    "vocab",
    // Generic
    "accesskey",
    "class",
    "dir",
    "draggable",
    "hidden",
    "id",
    "lang",
    "slot",
    "tabindex",
    "title",
    "translate",
    // ARIA
    "aria-activedescendant",
    "aria-atomic",
    "aria-autocomplete",
    "aria-busy",
    "aria-checked",
    "aria-controls",
    "aria-current",
    "aria-describedby",
    "aria-disabled",
    "aria-dropeffect",
    "aria-expanded",
    "aria-flowto",
    "aria-grabbed",
    "aria-haspopup",
    "aria-hidden",
    "aria-invalid",
    "aria-label",
    "aria-labelledby",
    "aria-level",
    "aria-live",
    "aria-multiline",
    "aria-multiselectable",
    "aria-orientation",
    "aria-owns",
    "aria-posinset",
    "aria-pressed",
    "aria-readonly",
    "aria-relevant",
    "aria-required",
    "aria-selected",
    "aria-setsize",
    "aria-sort",
    "aria-valuemax",
    "aria-valuemin",
    "aria-valuenow",
    "aria-valuetext",
    // AMP
    "on",
    "role",
    "placeholder",
    "fallback",
    "overflow",
];

/// Story animation attributes, allowed on every element.
pub const ANIMATION_ATTRIBUTES: &[&str] = &[
    "animate-in",
    "animate-in-duration",
    "animate-in-timing-function",
    "animate-in-delay",
    "animate-in-after",
    "scale-start",
    "scale-end",
    "translate-x",
    "translate-y",
];

/// Layout attributes shared by AMP components.
const COMMON_ATTRIBUTES: &[&str] = &[
    "fallback",
    "heights",
    "layout",
    "media",
    "noloading",
    "on",
    "placeholder",
    "sizes",
    "width",
    "height",
];

/// Attributes of the `amp-story-interactive-*` components.
const INTERACTIVE_ATTRIBUTES: &[&str] = &[
    "endpoint",
    "theme",
    "chip-style",
    "prompt-text",
    "prompt-size",
    "option-1-text",
    "option-2-text",
    "option-3-text",
    "option-4-text",
    "option-1-confetti",
    "option-2-confetti",
    "option-3-confetti",
    "option-4-confetti",
    "option-1-results-category",
    "option-2-results-category",
    "option-3-results-category",
    "option-4-results-category",
    "option-1-results-threshold",
    "option-2-results-threshold",
    "option-3-results-threshold",
    "option-4-results-threshold",
];

const ALIGN: &[&str] = &["align"];
const CITE_DATETIME: &[&str] = &["datetime", "cite"];
const SPAN: &[&str] = &["span"];

/// Tag-specific attribute groups for an allowed tag.
///
/// Returns the groups whose union is the tag's own attribute set; the
/// global attributes and the `data-*` pattern come on top of these.
/// Unknown tags and tags without extra attributes get no groups.
pub fn tag_attributes(tag: &str) -> &'static [&'static [&'static str]] {
    match tag {
        "a" => &[&[
            "border",
            "download",
            "href",
            "hreflang",
            "media",
            "referrerpolicy",
            "rel",
            "role",
            "tabindex",
            "target",
            "type",
            "show-tooltip",
            "name",
        ]],
        "bdo" => &[&["dir"]],
        "blockquote" => &[&["align", "cite"]],
        "button" => &[&["disabled", "role", "tabindex"]],
        "col" | "colgroup" => &[SPAN],
        "del" | "ins" => &[CITE_DATETIME],
        "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" => &[ALIGN],
        "li" => &[&["value"]],
        "ol" => &[&["reversed", "start", "type"]],
        "q" => &[&["cite"]],
        "script" => &[&["async", "src", "custom-element", "type"]],
        "source" => &[&["media", "src", "type"]],
        "table" => &[&[
            "align",
            "bgcolor",
            "border",
            "cellpadding",
            "cellspacing",
            "sortable",
        ]],
        "td" => &[&[
            "align", "bgcolor", "colspan", "headers", "height", "rowspan", "valign", "width",
        ]],
        "th" => &[&[
            "abbr", "align", "bgcolor", "colspan", "headers", "height", "rowspan", "scope",
            "sorted", "valign", "width",
        ]],
        "time" => &[&["datetime", "pubdate"]],
        "tr" => &[&["align", "bgcolor", "height", "valign"]],
        "track" => &[&["default", "kind", "label", "src", "srclang"]],

        "amp-story-page" => &[&["auto-advance-after", "background-audio"]],
        "amp-story-grid-layer" => &[&["template", "grid-area", "aspect-ratio"]],

        "amp-analytics" => &[&["type", "config"]],
        "amp-audio" => &[&[
            "src",
            "preload",
            "autoplay",
            "loop",
            "muted",
            "controlslist",
            "artwork",
            "artist",
            "album",
            "title",
        ]],
        "amp-call-tracking" => &[&["config"]],
        "amp-date-countdown" => &[&[
            "end-date",
            "timestamp-ms",
            "timestamp-seconds",
            "timeleft-ms",
            "offset-seconds",
            "when-ended",
            "locale",
            "biggest-unit",
        ]],
        "amp-fit-text" => &[&["min-font-size", "max-font-size"], COMMON_ATTRIBUTES],
        "amp-font" => &[&[
            "font-family",
            "timeout",
            "on-load-add-class",
            "on-error-add-class",
            "on-error-remove-class",
            "font-weight",
            "font-style",
            "font-variant",
            "layout",
        ]],
        "amp-gist" => &[&["layout", "height"]],
        "amp-google-vrview-image" => &[&[
            "src", "width", "height", "layout", "stereo", "yaw", "yaw-only",
        ]],
        "amp-img" => &[
            &["src", "srcset", "sizes", "alt", "attribution", "height", "width"],
            COMMON_ATTRIBUTES,
        ],
        "amp-install-serviceworker" => &[&["src", "layout"]],
        "amp-list" => &[
            &[
                "src",
                "credentials",
                "items",
                "max-items",
                "single-item",
                "xssi-prefix",
                "reset-on-refresh",
                "load-more",
                "load-more-bookmark",
            ],
            COMMON_ATTRIBUTES,
        ],
        "amp-live-list" => &[&["disabled"]],
        "amp-pixel" => &[&["src", "referrerpolicy", "allow-ssr-img"], COMMON_ATTRIBUTES],
        "amp-state" => &[&["src"]],
        "amp-story-interactive-binary-poll"
        | "amp-story-interactive-poll"
        | "amp-story-interactive-quiz"
        | "amp-story-interactive-results" => &[INTERACTIVE_ATTRIBUTES],
        "amp-twitter" => &[COMMON_ATTRIBUTES],
        "amp-video" => &[
            &[
                "src",
                "poster",
                "autoplay",
                "controls",
                "controlslist",
                "loop",
                "crossorigin",
                "disableremoteplayback",
                "muted",
                "noaudio",
                "rotate-to-fullscreen",
                "artwork",
                "artist",
                "album",
                "title",
            ],
            COMMON_ATTRIBUTES,
        ],
        _ => &[],
    }
}

static DATA_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data-[A-Za-z0-9\-_.:]*$").expect("data-* pattern is a valid regex")
});

/// Check whether an attribute name belongs to the `data-*` family.
pub fn is_data_attribute(name: &str) -> bool {
    DATA_ATTRIBUTE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_attribute_pattern() {
        assert!(is_data_attribute("data-coffee"));
        assert!(is_data_attribute("data-"));
        assert!(is_data_attribute("data-a.b:c_d-E9"));
        assert!(!is_data_attribute("data"));
        assert!(!is_data_attribute("xdata-coffee"));
        assert!(!is_data_attribute("data-a b"));
        assert!(!is_data_attribute("data-a\"b"));
        assert!(!is_data_attribute("data-x\n"));
    }

    #[test]
    fn test_tag_attribute_groups() {
        let amp_img: Vec<_> = tag_attributes("amp-img").iter().flat_map(|g| g.iter()).collect();
        assert!(amp_img.contains(&&"src"));
        assert!(amp_img.contains(&&"layout"));
        assert!(!amp_img.contains(&&"href"));

        assert!(tag_attributes("span").is_empty());
        assert!(tag_attributes("form").is_empty());
    }

    #[test]
    fn test_names_are_lowercase() {
        let groups = [GLOBAL_ATTRIBUTES, ANIMATION_ATTRIBUTES, COMMON_ATTRIBUTES, INTERACTIVE_ATTRIBUTES];
        for name in groups.iter().flat_map(|g| g.iter()) {
            assert_eq!(*name, name.to_ascii_lowercase());
        }
        for tag in crate::policy::ALLOWED_TAGS {
            for name in tag_attributes(tag).iter().flat_map(|g| g.iter()) {
                assert_eq!(*name, name.to_ascii_lowercase(), "{tag}");
            }
        }
    }
}
