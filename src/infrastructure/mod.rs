pub mod sqlite;
pub mod tokenizer;
