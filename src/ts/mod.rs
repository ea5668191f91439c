//! Qt Linguist TS (XML) format support.

pub mod reader;
pub mod writer;

pub use reader::{
    ReadError,
    parse_file,
    parse_str,
};
pub use writer::{
    WriteError,
    to_xml,
    write_file,
};
