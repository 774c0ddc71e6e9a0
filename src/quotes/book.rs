use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

static QUOTE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/quotes/data");

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("quote collection not found: {0}")]
    NotFound(String),
    #[error("quote collection {0} is not valid utf-8")]
    NotUtf8(String),
    #[error("unable to deserialize quote collection: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quote collection {0} is empty")]
    Empty(String),
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

/// A named collection of quotes embedded in the binary
#[derive(Deserialize, Clone, Debug)]
pub struct QuoteBook {
    pub name: String,
    pub quotes: Vec<Quote>,
}

impl QuoteBook {
    pub fn load(name: &str) -> Result<Self, QuoteError> {
        let file_name = format!("{name}.json");
        let file = QUOTE_DIR
            .get_file(&file_name)
            .ok_or_else(|| QuoteError::NotFound(file_name.clone()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| QuoteError::NotUtf8(file_name.clone()))?;

        Self::parse(contents)
    }

    pub fn parse(json: &str) -> Result<Self, QuoteError> {
        let book: QuoteBook = from_str(json)?;
        if book.quotes.is_empty() {
            return Err(QuoteError::Empty(book.name));
        }
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
