pub mod decode;
pub mod parse;
