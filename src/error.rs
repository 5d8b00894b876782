//! Error types.
//!
//! Missing classes are not errors: they leave symbols uncompleted and are
//! recorded in the engine's not-found set. These types cover the failures that
//! remain once bytes are in hand.

use std::io;

use thiserror::Error;

/// Failure while reading a class file.
#[derive(Debug, Error)]
pub enum ClassParseError {
    #[error("unexpected end of class file")]
    UnexpectedEof,
    #[error("invalid class file magic header")]
    InvalidMagic,
    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("invalid modified UTF-8 in constant pool entry {index}")]
    InvalidUtf8 { index: u16 },
    #[error("malformed signature: {0}")]
    InvalidSignature(String),
}

/// Failure surfaced by the symbol engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read `{name}` from the classpath: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode `{name}`: {source}")]
    Decode {
        name: String,
        #[source]
        source: ClassParseError,
    },
}

impl EngineError {
    /// Name of the class whose bytes could not be used.
    pub fn class_name(&self) -> &str {
        match self {
            EngineError::Io { name, .. } | EngineError::Decode { name, .. } => name,
        }
    }
}
