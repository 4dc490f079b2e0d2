//! Allowed element names for story page markup.

/// Elements permitted inside a cleaned `<amp-story-page>`.
///
/// Standard elements follow the children AMP allows in
/// `amp-story-grid-layer`; the `amp-*` names are the story layout
/// containers, media embeds and interactive widgets, plus the extra
/// elements permitted in `amp-story-cta-layer`.
pub const ALLOWED_TAGS: &[&str] = &[
    // Story structure
    "amp-story-page",
    "amp-story-grid-layer",
    "amp-story-cta-layer",
    // Standard elements
    "a",
    "abbr",
    "address",
    "article",
    "aside",
    "b",
    "bdi",
    "bdo",
    "blockquote",
    "br",
    "caption",
    "cite",
    "code",
    "col",
    "colgroup",
    "data",
    "dd",
    "del",
    "dfn",
    "div",
    "dl",
    "dt",
    "em",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "i",
    "ins",
    "kbd",
    "li",
    "main",
    "mark",
    "nav",
    "noscript",
    "ol",
    "p",
    "pre",
    "q",
    "rp",
    "rt",
    "rtc",
    "ruby",
    "s",
    "samp",
    "script",
    "section",
    "small",
    "source",
    "span",
    "strong",
    "sub",
    "sup",
    "table",
    "tbody",
    "td",
    "template",
    "tfoot",
    "th",
    "thead",
    "time",
    "tr",
    "track",
    "u",
    "ul",
    "var",
    "wbr",
    // Media embeds and widgets
    "amp-analytics",
    "amp-audio",
    "amp-date-countdown",
    "amp-experiment",
    "amp-fit-text",
    "amp-font",
    "amp-gist",
    "amp-google-vrview-image",
    "amp-img",
    "amp-install-serviceworker",
    "amp-list",
    "amp-live-list",
    "amp-pixel",
    "amp-state",
    "amp-story-360",
    "amp-story-interactive-binary-poll",
    "amp-story-interactive-poll",
    "amp-story-interactive-quiz",
    "amp-story-interactive-results",
    "amp-timeago",
    "amp-twitter",
    "amp-video",
    // Call-to-action layer extras
    "amp-call-tracking",
    "button",
];

/// SVG element names. None of them are allowed: working out a safe attribute
/// set for SVG is not done, so SVG markup is filtered like any other
/// disallowed element.
pub const SVG_TAGS: &[&str] = &[
    "circle",
    "clippath",
    "defs",
    "desc",
    "ellipse",
    "fecolormatrix",
    "fecomposite",
    "feflood",
    "fegaussianblur",
    "femerge",
    "femergenode",
    "feoffset",
    "filter",
    "g",
    "glyph",
    "glyphref",
    "hkern",
    "image",
    "line",
    "lineargradient",
    "marker",
    "mask",
    "metadata",
    "path",
    "pattern",
    "polygon",
    "polyline",
    "radialgradient",
    "rect",
    "solidcolor",
    "stop",
    "svg",
    "switch",
    "symbol",
    "text",
    "textpath",
    "title",
    "tref",
    "tspan",
    "use",
    "view",
    "vkern",
];
