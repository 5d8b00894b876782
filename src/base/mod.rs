//! Foundation types for the resolver.
//!
//! This module provides:
//! - [`Flags`] - Modifier flags and the accepted bytecode mask
//! - [`names`] - Conversions between flat, binary and short names
//!
//! This module has NO dependencies on other crate modules.

mod flags;
pub mod names;

pub use flags::{ACC_SUPER, Flags};
