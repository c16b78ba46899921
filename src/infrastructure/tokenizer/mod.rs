pub mod stemmer;
pub mod stopwords;
pub mod unicode;

pub use unicode::UnicodeTokenizer;
