//! Symbol model and the lazy resolution engine.
//!
//! - [`SymbolEngine`] - identity caches and the completion protocol
//! - [`TypeSymbol`], [`PackageSymbol`] - symbol data held in the engine's arena
//! - [`TypeId`], [`PackageId`], [`Symbol`] - non-owning handles
//! - [`diagnostics`] - reporting classes missing from the classpath

pub mod diagnostics;
mod engine;
mod ids;
mod symbols;

pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity};
pub use engine::{SharedEngine, SymbolEngine};
pub use ids::{PackageId, Symbol, TypeId};
pub use symbols::{
    CompletionState, Member, MemberKind, Owner, PackageSymbol, Scope, TypeParameter, TypeRef,
    TypeSymbol,
};
