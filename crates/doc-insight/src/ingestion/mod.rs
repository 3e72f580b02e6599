//! Document intake

mod parser;

pub use parser::FileParser;
