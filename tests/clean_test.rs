//! Page cleaning tests through the public API.

use proptest::prelude::*;

use webstory::{Cleaner, CleanerOptions, Disallowed, Policy, StoryPage, clean_page_fragment, decode_html};

// ============================================================================
// Fragments
// ============================================================================

#[test]
fn test_bad_cover_page() {
    let html = r#"<amp-story-page id="cover"><amp-story-grid-layer template="vertical"><script>alert('x')</script><script type="application/json">{"a": "b & c"}</script><form action="/x"><p data-coffee="yes" sugar="no">Hi</p></form></amp-story-grid-layer></amp-story-page>"#;
    let expected = r#"<amp-story-page id="cover"><amp-story-grid-layer template="vertical"><script type="application/json">{"a": "b & c"}</script><p data-coffee="yes">Hi</p></amp-story-grid-layer></amp-story-page>"#;

    assert_eq!(clean_page_fragment(html), expected);
    assert_eq!(StoryPage::clean_html_fragment(html), expected);
}

#[test]
fn test_trusted_script_types() {
    for script_type in ["application/ld+json", "application/json", "text/plain"] {
        let html = format!(r#"<script type="{script_type}">{{}}</script>"#);
        assert_eq!(clean_page_fragment(&html), html);
    }
    for script_type in ["text/javascript", "module", "APPLICATION/JSON", ""] {
        let html = format!(r#"<p>a<script type="{script_type}">x()</script>b</p>"#);
        assert_eq!(clean_page_fragment(&html), "<p>ab</p>");
    }
}

#[test]
fn test_unknown_amp_component_is_unwrapped() {
    assert_eq!(
        clean_page_fragment(r#"<amp-story-page id="p"><amp-iframe src="x"><p>inner</p></amp-iframe></amp-story-page>"#),
        r#"<amp-story-page id="p"><p>inner</p></amp-story-page>"#
    );
}

#[test]
fn test_animation_attributes() {
    let html = r#"<div animate-in="fly-in-left" animate-in-duration="0.5s" animate-in-delay="1s">x</div>"#;
    assert_eq!(clean_page_fragment(html), html);
}

#[test]
fn test_tag_case_is_normalized() {
    assert_eq!(
        clean_page_fragment(r#"<AMP-IMG SRC="a.jpg" LAYOUT="fill"></AMP-IMG>"#),
        r#"<amp-img src="a.jpg" layout="fill"></amp-img>"#
    );
}

#[test]
fn test_empty_and_text_only() {
    assert_eq!(clean_page_fragment(""), "");
    assert_eq!(clean_page_fragment("just text & more"), "just text &amp; more");
}

#[test]
fn test_legacy_encoded_fragment() {
    let html = decode_html(b"<meta charset=\"windows-1252\"><p>caf\xE9 \x93quoted\x94</p>");
    assert_eq!(clean_page_fragment(&html), "<p>caf\u{e9} \u{201c}quoted\u{201d}</p>");
}

#[test]
fn test_escape_mode_through_public_api() {
    let cleaner = Cleaner::with_cleaner_options(CleanerOptions {
        disallowed: Disallowed::Escape,
        ..Default::default()
    });
    assert_eq!(
        cleaner.clean_fragment("<p>a<input name=q>b</p>"),
        r#"<p>a&lt;input name="q"/&gt;b</p>"#
    );
}

#[test]
fn test_restricted_policy() {
    let policy = Policy::builder().deny_tag("amp-img").build();
    let cleaner = Cleaner::with_options(policy, CleanerOptions::default());
    assert_eq!(
        cleaner.clean_fragment(r#"<amp-story-page id="p"><amp-img src="a.jpg"></amp-img></amp-story-page>"#),
        r#"<amp-story-page id="p"></amp-story-page>"#
    );
}

#[test]
fn test_custom_protocols() {
    let cleaner = Cleaner::with_cleaner_options(CleanerOptions {
        protocols: vec!["https".into()],
        ..Default::default()
    });
    assert_eq!(
        cleaner.clean_fragment(r#"<a href="http://example.com">x</a><a href="HTTPS://example.com">y</a>"#),
        r#"<a>x</a><a href="HTTPS://example.com">y</a>"#
    );
}

// ============================================================================
// Reparse stability
// ============================================================================

#[test]
fn test_scope_boundary_unwrap_is_stable() {
    let cases = [
        ("<ul><li>a<form><li>b</li></form></li></ul>", "<ul><li>a</li><li>b</li></ul>"),
        ("<p>x<object><p>y</p></object>z</p>", "<p>x</p><p>y</p>z<p></p>"),
        (
            "<table><tr><td>a<svg><td>b</td></svg></td></tr></table>",
            "<table><tbody><tr><td>ab</td></tr></tbody></table>",
        ),
    ];
    for (html, expected) in cases {
        let cleaned = clean_page_fragment(html);
        assert_eq!(cleaned, expected, "cleaning {html}");
        assert_eq!(clean_page_fragment(&cleaned), cleaned, "recleaning {html}");
    }
}

#[test]
fn test_foreign_lookalikes_are_unwrapped() {
    assert_eq!(clean_page_fragment(r#"<svg><a href="/y">2</a></svg>"#), "2");
    assert_eq!(clean_page_fragment("<svg><tbody><tr>x</tr></tbody></svg>"), "x");
    assert_eq!(clean_page_fragment("<math><mi>p</mi></math>"), "p");

    let cleaned = clean_page_fragment(r#"<a href="/x">1<svg><a href="/y">2</a></svg></a>"#);
    assert_eq!(cleaned, r#"<a href="/x">12</a>"#);
    assert!(!cleaned.contains("/y"));
}

#[test]
fn test_escape_mode_is_stable_inside_tables() {
    let cleaner = Cleaner::with_cleaner_options(CleanerOptions {
        disallowed: Disallowed::Escape,
        ..Default::default()
    });
    let cleaned = cleaner.clean_fragment("<table><tr><td>a</td><form></form></tr></table>");
    assert_eq!(cleaner.clean_fragment(&cleaned), cleaned);
}

// ============================================================================
// Properties
// ============================================================================

fn markup_piece() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "<p>",
        "</p>",
        "<span>",
        "</span>",
        "<div>",
        "</div>",
        "<em>",
        "</em>",
        "<form>",
        "</form>",
        "<ul>",
        "</ul>",
        "<li>",
        "</li>",
        "<object>",
        "</object>",
        "<table>",
        "<tr>",
        "<td>",
        "</td>",
        "</tr>",
        "</table>",
        "<svg>",
        "</svg>",
        "<math>",
        "</math>",
        r#"<a href="/x">"#,
        "</a>",
        r#"<b class="x" onclick="y()">"#,
        "</b>",
        "<script>steal()</script>",
        r#"<script type="application/json">{"k": 1}</script>"#,
        "<!-- note -->",
        "text",
        " & ",
    ])
}

proptest! {
    #[test]
    fn cleaning_is_idempotent(pieces in prop::collection::vec(markup_piece(), 0..24)) {
        let html = pieces.concat();
        let once = clean_page_fragment(&html);
        let twice = clean_page_fragment(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn cleaned_output_has_no_disallowed_markup(pieces in prop::collection::vec(markup_piece(), 0..24)) {
        let cleaned = clean_page_fragment(&pieces.concat());
        for tag in ["<form", "<object", "<svg", "<math"] {
            prop_assert!(!cleaned.contains(tag), "{} survived in {}", tag, cleaned);
        }
        prop_assert!(!cleaned.contains("onclick"));
        prop_assert!(!cleaned.contains("steal()"));
        prop_assert!(!cleaned.contains("<!--"));
    }

    #[test]
    fn arbitrary_input_never_panics(html in ".{0,200}") {
        let _ = clean_page_fragment(&html);
    }
}
