pub mod ast;
pub mod cursor;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod span;

pub use parser::parse_statement;
