//! # classpath-symbols
//!
//! Lazy symbol resolution over a classpath of JVM class files.
//!
//! Packages and types are materialized the first time they are named and only
//! decoded when something needs their members.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir        → Symbol arena, identity caches, lazy completion, diagnostics
//!   ↓
//! classfile  → Header reader, version shim, declaration decoder
//!   ↓
//! project    → Byte sources (directories, archives, in-memory)
//!   ↓
//! base       → Primitives (name forms, modifier flags)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use classpath_symbols::{Classpath, SymbolEngine};
//!
//! let classpath = Classpath::from_path_list(std::ffi::OsStr::new("target/classes"));
//! let mut engine = SymbolEngine::new(classpath);
//!
//! let list = engine.get_type("java/util/List");
//! engine.complete(list)?;
//! for name in engine.diagnostics() {
//!     eprintln!("missing: {name}");
//! }
//! # Ok::<(), classpath_symbols::EngineError>(())
//! ```

/// Foundation types: name forms and modifier flags
pub mod base;

/// Class-file reading and declaration decoding
pub mod classfile;

/// Engine configuration
pub mod config;

/// Error types
pub mod error;

/// Symbol model and the resolution engine
pub mod hir;

/// Byte sources
pub mod project;

pub use base::Flags;
pub use config::EngineConfig;
pub use error::{ClassParseError, EngineError};
pub use hir::{PackageId, SharedEngine, Symbol, SymbolEngine, TypeId};
pub use project::{ByteSource, Classpath, DirectoryClasspath, InMemoryClasspath};
