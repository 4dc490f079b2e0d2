//! WASM bindings for browser-based story cleaning.
//!
//! This module exposes story parsing and page cleaning to JavaScript via
//! wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::Story;
use crate::clean::clean_page_fragment;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Clean a single `<amp-story-page>` fragment with the standard policy.
#[wasm_bindgen(js_name = cleanPageFragment)]
pub fn clean_page_fragment_js(html: &str) -> String {
    clean_page_fragment(html)
}

/// Parse a story document and return its metadata and page ids as JSON.
#[wasm_bindgen(js_name = storyMetadata)]
pub fn story_metadata(html: &str) -> Result<String, JsValue> {
    let story = Story::parse(html).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&story).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a story document and return its cleaned pages as a JSON array of
/// `{id, html}` objects.
#[wasm_bindgen(js_name = cleanStoryPages)]
pub fn clean_story_pages(html: &str) -> Result<String, JsValue> {
    let story = Story::parse(html).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let pages: Vec<_> = story
        .pages()
        .iter()
        .map(|page| serde_json::json!({ "id": page.id(), "html": page.clean_html() }))
        .collect();
    serde_json::to_string(&pages).map_err(|e| JsValue::from_str(&e.to_string()))
}
