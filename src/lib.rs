//! # webstory
//!
//! Parse web stories (AMP story documents) and clean their pages against an
//! allowlist of elements and attributes.
//!
//! ## Features
//!
//! - Story metadata: title, publisher, logo and poster images, custom CSS
//! - Ordered pages, each available as parsed or cleaned markup
//! - Executable scripts removed, data scripts (`application/json`, ...) kept
//! - Configurable policy and handling of disallowed elements
//!
//! ## Quick Start
//!
//! ```
//! use webstory::Story;
//!
//! let story = Story::parse(r#"<!doctype html>
//! <html><body>
//!   <amp-story standalone title="Joy of Pets" publisher="AMP tutorials">
//!     <amp-story-page id="cover">
//!       <amp-story-grid-layer template="fill">
//!         <h1 onclick="steal()">The Joy of Pets</h1>
//!       </amp-story-grid-layer>
//!     </amp-story-page>
//!   </amp-story>
//! </body></html>"#).unwrap();
//!
//! assert_eq!(story.to_string(), "<Story: Joy of Pets>");
//! let cover = story.page("cover").unwrap();
//! assert!(!cover.clean_html().contains("onclick"));
//! ```
//!
//! Pages that were extracted elsewhere can be cleaned on their own:
//!
//! ```
//! let cleaned = webstory::clean_page_fragment(
//!     r#"<amp-story-page id="p"><script>alert(1)</script><p>hi</p></amp-story-page>"#,
//! );
//! assert_eq!(cleaned, r#"<amp-story-page id="p"><p>hi</p></amp-story-page>"#);
//! ```

pub mod clean;
pub mod dom;
pub mod error;
pub mod policy;
mod story;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use clean::{Cleaner, CleanerOptions, Disallowed, clean_page_fragment};
pub use error::{Error, Result};
pub use policy::{AttributeRule, Policy, PolicyBuilder};
pub use story::{Story, StoryPage};
pub use util::decode_html;
