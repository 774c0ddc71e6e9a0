use rand::Rng;

use super::book::{QuoteBook, QuoteError};

/// Supplies the text for the next session
pub trait QuoteSource {
    /// Raw text; may be empty or padded, callers clean it up.
    fn next_quote(&mut self) -> String;

    /// Who said the quote last handed out by `next_quote`, when known
    fn attribution(&self) -> Option<&str> {
        None
    }
}

impl<S: QuoteSource + ?Sized> QuoteSource for Box<S> {
    fn next_quote(&mut self) -> String {
        (**self).next_quote()
    }

    fn attribution(&self) -> Option<&str> {
        (**self).attribution()
    }
}

/// Random quotes from an embedded collection
#[derive(Debug, Clone)]
pub struct BundledQuotes {
    book: QuoteBook,
    last: Option<usize>,
}

impl BundledQuotes {
    pub fn new() -> Result<Self, QuoteError> {
        Self::named("classic")
    }

    pub fn named(name: &str) -> Result<Self, QuoteError> {
        Ok(Self::from_book(QuoteBook::load(name)?))
    }

    /// Books built by hand may be empty; such a source only ever yields empty text.
    pub fn from_book(book: QuoteBook) -> Self {
        Self { book, last: None }
    }

    fn pick_index(&self) -> Option<usize> {
        let rng = &mut rand::thread_rng();
        let len = self.book.len();
        if len == 0 {
            return None;
        }

        Some(match self.last {
            // never serve the same quote twice in a row
            Some(last) if len > 1 => (last + rng.gen_range(1..len)) % len,
            _ => rng.gen_range(0..len),
        })
    }
}

impl QuoteSource for BundledQuotes {
    fn next_quote(&mut self) -> String {
        self.last = self.pick_index();
        match self.last.and_then(|idx| self.book.quotes.get(idx)) {
            Some(quote) => quote.text.clone(),
            None => String::new(),
        }
    }

    fn attribution(&self) -> Option<&str> {
        let quote = self.book.quotes.get(self.last?)?;
        Some(quote.author.as_str()).filter(|author| !author.trim().is_empty())
    }
}

/// Always the same user supplied text
#[derive(Debug, Clone)]
pub struct FixedQuote(pub String);

impl QuoteSource for FixedQuote {
    fn next_quote(&mut self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::Quote;

    fn book(texts: &[&str]) -> QuoteBook {
        QuoteBook {
            name: "test".to_string(),
            quotes: texts
                .iter()
                .map(|t| Quote {
                    text: t.to_string(),
                    author: "anon".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_fixed_quote() {
        let mut source = FixedQuote("hello".to_string());
        assert_eq!(source.next_quote(), "hello");
        assert_eq!(source.next_quote(), "hello");
    }

    #[test]
    fn test_bundled_quotes_come_from_book() {
        let mut source = BundledQuotes::from_book(book(&["one", "two", "three"]));
        for _ in 0..20 {
            let quote = source.next_quote();
            assert!(["one", "two", "three"].contains(&quote.as_str()));
        }
    }

    #[test]
    fn test_bundled_quotes_do_not_repeat_back_to_back() {
        let mut source = BundledQuotes::from_book(book(&["one", "two"]));
        let mut previous = source.next_quote();
        for _ in 0..20 {
            let next = source.next_quote();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_single_quote_book_repeats() {
        let mut source = BundledQuotes::from_book(book(&["only"]));
        assert_eq!(source.next_quote(), "only");
        assert_eq!(source.next_quote(), "only");
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn QuoteSource> = Box::new(FixedQuote("boxed".to_string()));
        assert_eq!(source.next_quote(), "boxed");
        assert_eq!(source.attribution(), None);
    }

    #[test]
    fn test_empty_book_yields_empty_text() {
        let mut source = BundledQuotes::from_book(book(&[]));

        assert_eq!(source.next_quote(), "");
        assert_eq!(source.next_quote(), "");
        assert_eq!(source.attribution(), None);
    }

    #[test]
    fn test_attribution_follows_last_quote() {
        let mut source = BundledQuotes::from_book(QuoteBook {
            name: "test".to_string(),
            quotes: vec![
                Quote {
                    text: "first".to_string(),
                    author: "Ada".to_string(),
                },
                Quote {
                    text: "second".to_string(),
                    author: "Grace".to_string(),
                },
            ],
        });
        assert_eq!(source.attribution(), None);

        for _ in 0..6 {
            let text = source.next_quote();
            let expected = if text == "first" { "Ada" } else { "Grace" };
            assert_eq!(source.attribution(), Some(expected));
        }
    }

    #[test]
    fn test_blank_author_is_no_attribution() {
        let mut source = BundledQuotes::from_book(QuoteBook {
            name: "test".to_string(),
            quotes: vec![Quote {
                text: "only".to_string(),
                author: "  ".to_string(),
            }],
        });
        source.next_quote();
        assert_eq!(source.attribution(), None);
    }
}
