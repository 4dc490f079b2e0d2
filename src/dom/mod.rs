//! Document tree: parsing, querying and serialization.
//!
//! Markup goes through html5ever into an [`ArenaDom`]. Parsing never fails:
//! unclosed tags, unknown elements and stray text are recovered the way a
//! browser would recover them.
//!
//! Scripting is treated as disabled while parsing, so the contents of
//! `<noscript>` become ordinary elements that the cleaner can inspect
//! instead of an opaque run of text.

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use serialize::{serialize_children, serialize_node};
pub(crate) use serialize::{is_void_element, write_start_tag};

use html5ever::driver::ParseOpts;
use html5ever::parse_document as html5ever_parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

use tree_sink::DomBuilder;

fn parse_opts() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Parse a full HTML document.
pub fn parse_document(html: &str) -> ArenaDom {
    html5ever_parse_document(DomBuilder::new(), parse_opts())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse a fragment of HTML (not a full document).
///
/// The fragment is wrapped in an explicit document with an already-closed
/// `<head>`, so every node of the fragment ends up inside `<body>`, in order.
pub fn parse_fragment(html: &str) -> ArenaDom {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    parse_document(&wrapped)
}
