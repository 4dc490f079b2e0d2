//! Web story model: metadata and ordered pages.
//!
//! A [`Story`] owns the parsed document. Each [`StoryPage`] refers into that
//! document by node id and shares it through an [`Arc`], so pages are cheap
//! to clone and can be sent to other threads for cleaning.

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use log::debug;

use crate::clean::Cleaner;
use crate::dom::{self, ArenaDom, ArenaNodeId, serialize_node};
use crate::error::{Error, Result};
use crate::util::decode_html;

/// A parsed web story.
///
/// # Example
///
/// ```
/// use webstory::Story;
///
/// let story = Story::parse(r#"
///     <amp-story title="Joy of Pets" publisher="AMP tutorials">
///       <amp-story-page id="cover"></amp-story-page>
///     </amp-story>
/// "#).unwrap();
///
/// assert_eq!(story.title(), Some("Joy of Pets"));
/// assert_eq!(story.pages()[0].id(), Some("cover"));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Story {
    title: Option<String>,
    publisher: Option<String>,
    publisher_logo_src: Option<String>,
    poster_portrait_src: Option<String>,
    poster_square_src: Option<String>,
    poster_landscape_src: Option<String>,
    custom_css: Option<String>,
    pages: Vec<StoryPage>,
}

impl Story {
    /// Parse a story document.
    ///
    /// Fails with [`Error::InvalidStory`] when the document has no
    /// `<amp-story>` element. Missing metadata attributes are not errors.
    pub fn parse(html: &str) -> Result<Self> {
        Self::from_dom(dom::parse_document(html))
    }

    /// Parse a story from raw bytes, detecting the character encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(&decode_html(bytes))
    }

    /// Read and parse a story document.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    fn from_dom(dom: ArenaDom) -> Result<Self> {
        let Some(root) = dom.find_by_tag("amp-story") else {
            debug!("document has no <amp-story> element");
            return Err(Error::InvalidStory("no <amp-story> element found".into()));
        };

        let attr = |name: &str| dom.get_attr(root, name).map(str::to_string);
        let title = attr("title");
        let publisher = attr("publisher");
        let publisher_logo_src = attr("publisher-logo-src");
        let poster_portrait_src = attr("poster-portrait-src");
        let poster_square_src = attr("poster-square-src");
        let poster_landscape_src = attr("poster-landscape-src");

        let custom_css = dom
            .descendants_by_tag(dom.document(), "style")
            .into_iter()
            .find(|&id| dom.has_attr(id, "amp-custom"))
            .map(|id| dom.text_of(id));

        let page_nodes: Vec<_> = dom.child_elements_by_tag(root, "amp-story-page").collect();
        let dom = Arc::new(dom);
        let pages: Vec<_> = page_nodes
            .into_iter()
            .map(|node| StoryPage::new(Arc::clone(&dom), node))
            .collect();

        debug!("parsed story {:?} with {} pages", title, pages.len());

        Ok(Self {
            title,
            publisher,
            publisher_logo_src,
            poster_portrait_src,
            poster_square_src,
            poster_landscape_src,
            custom_css,
            pages,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn publisher_logo_src(&self) -> Option<&str> {
        self.publisher_logo_src.as_deref()
    }

    pub fn poster_portrait_src(&self) -> Option<&str> {
        self.poster_portrait_src.as_deref()
    }

    pub fn poster_square_src(&self) -> Option<&str> {
        self.poster_square_src.as_deref()
    }

    pub fn poster_landscape_src(&self) -> Option<&str> {
        self.poster_landscape_src.as_deref()
    }

    /// Text of the first `<style amp-custom>` element in the document.
    pub fn custom_css(&self) -> Option<&str> {
        self.custom_css.as_deref()
    }

    /// Pages in document order (direct `<amp-story-page>` children of the root).
    pub fn pages(&self) -> &[StoryPage] {
        &self.pages
    }

    /// Find a page by its `id` attribute.
    pub fn page(&self, id: &str) -> Option<&StoryPage> {
        self.pages.iter().find(|p| p.id() == Some(id))
    }
}

impl FromStr for Story {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Story: {}>", self.title.as_deref().unwrap_or("None"))
    }
}

/// One page of a story: a view into the story's parsed document.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StoryPage {
    id: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    dom: Arc<ArenaDom>,
    #[cfg_attr(feature = "serde", serde(skip))]
    node: ArenaNodeId,
}

impl StoryPage {
    fn new(dom: Arc<ArenaDom>, node: ArenaNodeId) -> Self {
        let id = dom.get_attr(node, "id").map(str::to_string);
        Self { id, dom, node }
    }

    /// The page's `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The page markup as parsed, unfiltered.
    pub fn html(&self) -> String {
        serialize_node(&self.dom, self.node)
    }

    /// The page markup with untrusted scripts removed and the standard
    /// allowlist applied.
    pub fn clean_html(&self) -> String {
        self.clean_html_with(&Cleaner::new())
    }

    /// The page markup cleaned with a custom cleaner.
    pub fn clean_html_with(&self, cleaner: &Cleaner) -> String {
        cleaner.clean_node(&self.dom, self.node)
    }

    /// Clean a standalone `<amp-story-page>` fragment.
    pub fn clean_html_fragment(html: &str) -> String {
        crate::clean::clean_page_fragment(html)
    }
}

impl fmt::Debug for StoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryPage")
            .field("id", &self.id)
            .field("node", &self.node)
            .finish()
    }
}

impl fmt::Display for StoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<StoryPage: {}>", self.id.as_deref().unwrap_or("None"))
    }
}
