pub mod book;
pub mod sentences;
pub mod source;

// Re-export the main types for convenience
pub use book::{Quote, QuoteBook, QuoteError};
pub use sentences::SentenceQuotes;
pub use source::{BundledQuotes, FixedQuote, QuoteSource};

/// Used whenever a source hands back nothing worth typing
pub const FALLBACK_TEXT: &str = "Lorem ipsum dolor sit amet";

/// Trim raw source text, substituting the fallback when nothing is left.
pub fn prepare_target(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        tracing::debug!("quote source returned empty text, using fallback");
        FALLBACK_TEXT.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_target_trims() {
        assert_eq!(prepare_target("  hello world \n"), "hello world");
    }

    #[test]
    fn test_prepare_target_fallback() {
        assert_eq!(prepare_target(""), FALLBACK_TEXT);
        assert_eq!(prepare_target("   \t "), FALLBACK_TEXT);
    }

    #[test]
    fn test_bundled_quotes_feed_sessions() {
        let mut source = BundledQuotes::new().unwrap();
        let target = prepare_target(&source.next_quote());
        assert!(crate::session::Session::new(target).is_ok());
    }
}
