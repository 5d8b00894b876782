//! Symbol data stored in the engine's arena.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Flags;
use super::ids::{PackageId, TypeId};

/// Where a symbol is in the lazy-completion protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionState {
    /// No completer attached: nothing backs this symbol on the classpath.
    Uncompleted,
    /// Backing bytes exist and will be decoded on first demand.
    Pending,
    /// Decoding has happened (or was attempted); never repeated.
    Completed,
}

impl CompletionState {
    pub fn is_pending(self) -> bool {
        self == CompletionState::Pending
    }

    pub fn is_completed(self) -> bool {
        self == CompletionState::Completed
    }
}

/// The owner of a type symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Top-level type.
    Package(PackageId),
    /// Nested type.
    Type(TypeId),
}

/// A reference to a type from a supertype or interface slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Class(TypeId),
    /// Placeholder for types whose declaration could not be loaded.
    Unknown,
}

impl TypeRef {
    pub fn as_class(self) -> Option<TypeId> {
        match self {
            TypeRef::Class(id) => Some(id),
            TypeRef::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == TypeRef::Unknown
    }
}

/// What a member is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Field { descriptor: SmolStr },
    Method { descriptor: SmolStr },
    /// A nested type declared by the owner.
    NestedType(TypeId),
}

/// A member declared by a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: SmolStr,
    pub kind: MemberKind,
    pub flags: Flags,
}

impl Member {
    pub fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field { .. })
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }
}

/// Members of a type, keyed by simple name, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    members: IndexMap<SmolStr, Vec<Member>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, member: Member) {
        self.members.entry(member.name.clone()).or_default().push(member);
    }

    /// First member with this name.
    pub fn lookup(&self, name: &str) -> Option<&Member> {
        self.members.get(name).and_then(|members| members.first())
    }

    /// All members with this name (overloads).
    pub fn lookup_all(&self, name: &str) -> &[Member] {
        self.members.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A formal type parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: SmolStr,
}

/// A class, interface, enum or annotation type.
#[derive(Clone, Debug)]
pub struct TypeSymbol {
    pub(crate) name: SmolStr,
    pub(crate) owner: Owner,
    pub(crate) qualified_name: SmolStr,
    pub(crate) completion: CompletionState,
    pub flags: Flags,
    pub members: Scope,
    pub type_parameters: Vec<TypeParameter>,
    /// `None` until completion, or for types without a superclass.
    pub supertype: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub source_file: Option<SmolStr>,
}

impl TypeSymbol {
    pub(crate) fn new(flags: Flags, name: SmolStr, owner: Owner, qualified_name: SmolStr) -> Self {
        Self {
            name,
            owner,
            qualified_name,
            completion: CompletionState::Uncompleted,
            flags,
            members: Scope::new(),
            type_parameters: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            source_file: None,
        }
    }

    /// Name relative to the owner (`Inner` for `a.Outer$Inner`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Flat qualified name (`a.Outer$Inner`).
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn completion(&self) -> CompletionState {
        self.completion
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.owner, Owner::Type(_))
    }

    pub fn is_interface(&self) -> bool {
        self.flags.contains(Flags::INTERFACE)
    }

    pub fn is_annotation(&self) -> bool {
        self.flags.contains(Flags::ANNOTATION)
    }

    pub fn is_enum(&self) -> bool {
        self.flags.contains(Flags::ENUM)
    }
}

/// A package.
#[derive(Clone, Debug)]
pub struct PackageSymbol {
    pub(crate) name: SmolStr,
    pub(crate) owner: Option<PackageId>,
    pub(crate) completion: CompletionState,
    pub(crate) package_info: Option<TypeId>,
}

impl PackageSymbol {
    pub(crate) fn root() -> Self {
        Self {
            name: SmolStr::default(),
            owner: None,
            completion: CompletionState::Completed,
            package_info: None,
        }
    }

    pub(crate) fn new(name: SmolStr) -> Self {
        Self {
            name,
            owner: Some(PackageId::ROOT),
            completion: CompletionState::Uncompleted,
            package_info: None,
        }
    }

    /// Full dotted name; empty for the root package.
    pub fn qualified_name(&self) -> &str {
        &self.name
    }

    /// `None` only for the root package.
    pub fn owner(&self) -> Option<PackageId> {
        self.owner
    }

    pub fn completion(&self) -> CompletionState {
        self.completion
    }

    /// The `package-info` type, linked once the package is completed.
    pub fn package_info(&self) -> Option<TypeId> {
        self.package_info
    }
}
