use cgisf_lib::cgisf;
use rand::Rng;

use super::source::QuoteSource;

/// Generated nonsense sentences, for when the bundled quotes get too familiar
#[derive(Debug, Clone)]
pub struct SentenceQuotes {
    number_of_sentences: usize,
}

impl SentenceQuotes {
    pub fn new(number_of_sentences: usize) -> Self {
        Self {
            number_of_sentences,
        }
    }

    pub fn generate(&self) -> Vec<String> {
        let rng = &mut rand::thread_rng();
        (0..self.number_of_sentences)
            .map(|_| {
                cgisf(
                    rng.gen_range(1..3),
                    rng.gen_range(1..3),
                    rng.gen_range(1..5),
                    rng.gen_bool(0.5),
                    rng.gen_range(1..3),
                    rng.gen_bool(0.5),
                )
            })
            .collect()
    }
}

impl QuoteSource for SentenceQuotes {
    fn next_quote(&mut self) -> String {
        self.generate().concat().trim().to_string()
    }
}
