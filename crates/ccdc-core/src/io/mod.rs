pub mod decode;
pub mod table;
pub mod writer;
