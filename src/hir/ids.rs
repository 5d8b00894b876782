//! Handles into the symbol arena.

use std::fmt;

/// Handle to a type symbol owned by a [`SymbolEngine`](super::SymbolEngine).
///
/// A `TypeId` is a lightweight index (just a u32). It never owns the symbol it
/// points to, so owner back-references between types cannot form ownership cycles.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Handle to a package symbol owned by a [`SymbolEngine`](super::SymbolEngine).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PackageId(u32);

impl PackageId {
    /// The root (default) package, created with every engine.
    pub const ROOT: PackageId = PackageId(0);

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageId({})", self.0)
    }
}

/// Any symbol the engine hands out, or the not-found sentinel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Symbol {
    Package(PackageId),
    Type(TypeId),
    /// A name that could not be proven to exist on the classpath.
    NotFound,
}

impl Symbol {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Symbol::NotFound)
    }

    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            Symbol::Type(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_package(&self) -> Option<PackageId> {
        match self {
            Symbol::Package(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<TypeId> for Symbol {
    fn from(id: TypeId) -> Self {
        Symbol::Type(id)
    }
}

impl From<PackageId> for Symbol {
    fn from(id: PackageId) -> Self {
        Symbol::Package(id)
    }
}
