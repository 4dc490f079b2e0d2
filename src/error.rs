//! Error types for story parsing.

use thiserror::Error;

/// Errors that can occur while building a [`Story`](crate::Story).
///
/// Malformed markup and policy filtering never produce errors; the only
/// failure of the core is a document without an `<amp-story>` element.
#[derive(Error, Debug)]
pub enum Error {
    /// The detail names what is missing; it is not part of the message.
    #[error("The passed HTML is not a valid web story")]
    InvalidStory(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_story_message() {
        let err = Error::InvalidStory("no <amp-story> element found".into());
        assert_eq!(err.to_string(), "The passed HTML is not a valid web story");
    }
}
