//! Class-file layer: reading headers, version compatibility, and declaration
//! decoding.

mod compat;
mod decoder;
mod reader;
mod signature;

pub use compat::FormatShim;
pub use decoder::{BinaryDecoder, DeclarationDecoder, ParsingOptions};
pub use reader::{ClassPrelude, ClassReader, ConstantPool, MAGIC, declared_class_name};
pub use signature::formal_type_parameters;
