//! Symbol cache and lazy completion.
//!
//! # Architecture
//!
//! The engine owns every symbol it hands out. Types and packages live in two
//! arenas and are referenced through [`TypeId`] / [`PackageId`] handles, so owner
//! back-references never carry ownership. Two identity maps index the arenas:
//!
//! - flat name → type (`classes`)
//! - qualified name → package (`packages`)
//!
//! A symbol is created on first request. If its class file exists on the
//! classpath it is left *pending* and only decoded when [`SymbolEngine::complete`]
//! is called for it; otherwise it stays *uncompleted* for good and its name is
//! recorded as not found.
//!
//! The engine is single-threaded. Wrap it with [`SymbolEngine::into_shared`] to
//! use it from several threads behind one lock.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::base::{Flags, names};
use crate::classfile::{BinaryDecoder, DeclarationDecoder, FormatShim, ParsingOptions, declared_class_name};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::project::ByteSource;
use super::ids::{PackageId, Symbol, TypeId};
use super::symbols::{CompletionState, Owner, PackageSymbol, TypeRef, TypeSymbol};

/// An engine shared between threads behind a single lock.
pub type SharedEngine = Arc<Mutex<SymbolEngine>>;

/// Lazily materialized symbol graph over a classpath.
pub struct SymbolEngine {
    config: EngineConfig,
    source: Box<dyn ByteSource>,
    decoder: Arc<dyn BinaryDecoder>,
    shim: FormatShim,
    /// The single source of truth for type symbols.
    types: Vec<TypeSymbol>,
    /// The single source of truth for package symbols; index 0 is the root.
    packages: Vec<PackageSymbol>,
    /// Indexed by flat name.
    classes: FxHashMap<SmolStr, TypeId>,
    packages_by_name: FxHashMap<SmolStr, PackageId>,
    classes_not_found: BTreeSet<SmolStr>,
}

impl SymbolEngine {
    /// Create an engine over `source` with the default configuration.
    pub fn new(source: impl ByteSource + 'static) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    /// Create an engine over `source`; the decoder and format shim take
    /// their version limit from `config`.
    pub fn with_config(source: impl ByteSource + 'static, config: EngineConfig) -> Self {
        let decoder = DeclarationDecoder::new(config.newest_supported_major);
        Self {
            shim: FormatShim::new(config.newest_supported_major),
            config,
            source: Box::new(source),
            decoder: Arc::new(decoder),
            types: Vec::new(),
            packages: vec![PackageSymbol::root()],
            classes: FxHashMap::default(),
            packages_by_name: FxHashMap::default(),
            classes_not_found: BTreeSet::new(),
        }
    }

    /// Replace the binary decoder used by [`complete`](Self::complete).
    pub fn with_decoder(mut self, decoder: impl BinaryDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Wrap the engine for use from several threads.
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // ARENA ACCESS
    // ========================================================================

    /// The type symbol behind `id`. Panics on a handle from another engine.
    pub fn type_symbol(&self, id: TypeId) -> &TypeSymbol {
        &self.types[id.index() as usize]
    }

    /// Mutable access to the type symbol behind `id`.
    pub fn type_symbol_mut(&mut self, id: TypeId) -> &mut TypeSymbol {
        &mut self.types[id.index() as usize]
    }

    /// The package symbol behind `id`.
    pub fn package(&self, id: PackageId) -> &PackageSymbol {
        &self.packages[id.index() as usize]
    }

    fn package_mut(&mut self, id: PackageId) -> &mut PackageSymbol {
        &mut self.packages[id.index() as usize]
    }

    pub fn root_package(&self) -> PackageId {
        PackageId::ROOT
    }

    /// Cached type for a flat or binary name, without creating it.
    pub fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.classes.get(names::flat_name(name).as_str()).copied()
    }

    /// Cached package for a qualified name, without creating it.
    pub fn lookup_package(&self, name: &str) -> Option<PackageId> {
        if name.trim().is_empty() {
            return Some(PackageId::ROOT);
        }
        self.packages_by_name.get(name).copied()
    }

    /// Number of type symbols in the arena, registered or not.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of packages, including the root.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    fn alloc_type(&mut self, symbol: TypeSymbol) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        self.types.push(symbol);
        id
    }

    // ========================================================================
    // NAMES
    // ========================================================================

    /// Rebuild a full name by walking owners up to the root package.
    ///
    /// A package owner contributes `name.`, a type owner contributes `name$`.
    pub fn form_full_name(&self, name: &str, site: Owner) -> String {
        let mut result = name.to_string();
        let mut owner = Some(site);
        while let Some(current) = owner {
            match current {
                Owner::Package(id) if id.is_root() => break,
                Owner::Package(id) => {
                    let package = self.package(id);
                    result = format!("{}{}{}", package.qualified_name(), names::PACKAGE_SEPARATOR, result);
                    owner = package.owner().map(Owner::Package);
                }
                Owner::Type(id) => {
                    let ty = self.type_symbol(id);
                    result = format!("{}{}{}", ty.name(), names::NESTING_SEPARATOR, result);
                    owner = Some(ty.owner());
                }
            }
        }
        result
    }

    /// Full name of a type rebuilt from its owner chain.
    pub fn full_name(&self, id: TypeId) -> String {
        let ty = self.type_symbol(id);
        self.form_full_name(ty.name(), ty.owner())
    }

    /// Name of a type joined to its enclosing types (`Outer$Inner`).
    pub fn nested_name(&self, id: TypeId) -> String {
        let ty = self.type_symbol(id);
        match ty.owner() {
            Owner::Type(owner) => format!("{}{}{}", self.nested_name(owner), names::NESTING_SEPARATOR, ty.name()),
            Owner::Package(_) => ty.name().to_string(),
        }
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Allocate a type introduced from source rather than bytecode.
    ///
    /// The symbol is not cached until [`register`](Self::register) is called.
    pub fn new_source_type(&mut self, flags: Flags, name: &str, owner: Owner) -> TypeId {
        let qualified_name = self.form_full_name(name, owner);
        self.alloc_type(TypeSymbol::new(flags, name.into(), owner, qualified_name.into()))
    }

    /// Cache a type created outside the engine.
    ///
    /// # Panics
    /// Panics if a type with the same full name is already cached.
    pub fn register(&mut self, id: TypeId) -> TypeId {
        let flat = SmolStr::new(self.type_symbol(id).qualified_name());
        assert!(
            !self.classes.contains_key(&flat),
            "registering class 2 times: {flat}"
        );
        self.classes.insert(flat, id);
        id
    }

    /// Get or create the package with the given qualified name.
    ///
    /// A blank name is the root package. New packages are pending so that their
    /// `package-info` is looked up on completion.
    pub fn enter_package(&mut self, qualified_name: &str) -> PackageId {
        if qualified_name.trim().is_empty() {
            return PackageId::ROOT;
        }
        if let Some(&id) = self.packages_by_name.get(qualified_name) {
            return id;
        }
        let id = PackageId::new(self.packages.len() as u32);
        let mut package = PackageSymbol::new(qualified_name.into());
        package.completion = CompletionState::Pending;
        self.packages.push(package);
        self.packages_by_name.insert(qualified_name.into(), id);
        debug!(package = qualified_name, "entered package");
        id
    }

    // ========================================================================
    // TYPE RESOLUTION
    // ========================================================================

    /// Shorthand for `get_or_create(None, name, Flags::empty())`.
    pub fn get_type(&mut self, binary_name: &str) -> TypeId {
        self.get_or_create(None, binary_name, Flags::empty())
    }

    /// Get the type for a binary or flat name, creating it on first request.
    ///
    /// `owner` is the enclosing type when the caller knows it. Otherwise nesting
    /// is derived from `$` in the name. `flags` are raw class-file flags; only the
    /// accepted subset is stored on a new symbol.
    pub fn get_or_create(&mut self, owner: Option<TypeId>, binary_name: &str, flags: Flags) -> TypeId {
        let flat = names::flat_name(binary_name);
        if let Some(&id) = self.classes.get(flat.as_str()) {
            return id;
        }

        let short = names::short_name(&flat);
        let package = names::package_part(&flat);
        // An owner whose name does not prefix the requested one would break the
        // owner walk back to `flat`; derive the owner from the name instead.
        let explicit = owner.filter(|&owner| {
            let owner_name = self.type_symbol(owner).qualified_name();
            let encloses = names::inner_class_name(owner_name, &flat).is_some();
            if !encloses {
                warn!(class = %flat, owner = owner_name, "ignoring owner that does not enclose the class");
            }
            encloses
        });
        let owner = match explicit {
            Some(owner) => Some(owner),
            None => self.enclosing_class(short, package),
        };
        let filtered = Flags::filter_bytecode(flags.bits());

        let symbol = match owner {
            Some(owner) => {
                let name = names::inner_class_name(self.type_symbol(owner).qualified_name(), &flat)
                    .unwrap_or(short);
                TypeSymbol::new(filtered, name.into(), Owner::Type(owner), flat.as_str().into())
            }
            None => {
                let package = self.enter_package(package);
                TypeSymbol::new(filtered, short.into(), Owner::Package(package), flat.as_str().into())
            }
        };
        let id = self.alloc_type(symbol);

        if self.probe(&flat) {
            self.type_symbol_mut(id).completion = CompletionState::Pending;
            debug!(class = %flat, "created pending type");
        } else {
            let ty = self.type_symbol_mut(id);
            ty.supertype = Some(TypeRef::Unknown);
            ty.interfaces.clear();
            // Annotations are often missing from the classpath without harm.
            if !names::is_package_info(&flat) && !Flags::is_annotation(flags.bits()) {
                self.classes_not_found.insert(flat.as_str().into());
            }
            debug!(class = %flat, "class not found on classpath");
        }

        self.classes.insert(flat.into(), id);
        id
    }

    /// Find the enclosing type of a nested class from its short name.
    ///
    /// Legacy compilers emit names such as `Outer$$Inner`; when the candidate
    /// `Outer$` has no class file, trailing `$` are stripped until one is found.
    fn enclosing_class(&mut self, short: &str, package: &str) -> Option<TypeId> {
        let enclosing = names::enclosing_class_name(short);
        if enclosing.is_empty() {
            return None;
        }
        let mut candidate = names::full_name(package, enclosing);
        let mut found = self.probe(&candidate);
        while !found && candidate.ends_with(names::NESTING_SEPARATOR) {
            candidate.pop();
            found = self.probe(&candidate);
        }
        if names::short_name(&candidate).is_empty() {
            return None;
        }
        Some(self.get_type(&candidate))
    }

    fn probe(&self, flat: &str) -> bool {
        let found = self.source.contains(&names::binary_name(flat));
        trace!(class = flat, found, "probed classpath");
        found
    }

    fn bytes_for_class(&self, flat: &str) -> Result<Option<Vec<u8>>, EngineError> {
        let binary = names::binary_name(flat);
        let Some(mut bytes) = self.source.fetch(&binary).map_err(|source| EngineError::Io {
            name: flat.to_string(),
            source,
        })?
        else {
            return Ok(None);
        };
        self.shim.normalize(&mut bytes);
        Ok(Some(bytes))
    }

    // ========================================================================
    // COMPLETION
    // ========================================================================

    /// Populate a symbol from its class file, if it has not been already.
    ///
    /// Completing a completed symbol is a no-op. Types without a class file
    /// have no completer and are left as they are.
    ///
    /// # Panics
    /// Panics when handed the not-found sentinel, or a type that is not the one
    /// cached under its name.
    pub fn complete(&mut self, symbol: impl Into<Symbol>) -> Result<(), EngineError> {
        match symbol.into() {
            Symbol::Package(id) => self.complete_package(id),
            Symbol::Type(id) => self.complete_type(id),
            Symbol::NotFound => panic!("cannot complete the not-found symbol"),
        }
    }

    fn complete_package(&mut self, id: PackageId) -> Result<(), EngineError> {
        if self.package(id).completion().is_completed() {
            return Ok(());
        }
        let info_name = names::package_info_name(self.package(id).qualified_name());
        let info = self.get_type(&info_name);
        let package = self.package_mut(id);
        package.package_info = Some(info);
        package.completion = CompletionState::Completed;
        debug!(package = %info_name, "completed package");
        self.complete_type(info)
    }

    fn complete_type(&mut self, id: TypeId) -> Result<(), EngineError> {
        let state = self.type_symbol(id).completion();
        if state.is_completed() {
            return Ok(());
        }
        let flat = SmolStr::new(self.type_symbol(id).qualified_name());
        assert!(
            self.classes.get(&flat) == Some(&id),
            "completing `{flat}` through a symbol that is not the cached one"
        );
        if !state.is_pending() {
            trace!(class = %flat, "no completer attached");
            return Ok(());
        }

        let Some(bytes) = self.bytes_for_class(&flat)? else {
            debug!(class = %flat, "class file disappeared before completion");
            return Ok(());
        };
        // Marked before decoding so that requests made by the decoder see a
        // completed symbol.
        self.type_symbol_mut(id).completion = CompletionState::Completed;

        let decoder = Arc::clone(&self.decoder);
        decoder
            .decode(self, id, &bytes, ParsingOptions::SKIP_ALL)
            .map_err(|source| EngineError::Decode {
                name: flat.to_string(),
                source,
            })?;
        debug!(class = %flat, "completed type");
        Ok(())
    }

    /// Complete every pending symbol, including those discovered on the way.
    ///
    /// Returns how many symbols were completed.
    pub fn complete_all(&mut self) -> Result<usize, EngineError> {
        let mut completed = 0;
        let mut next_package = 0;
        let mut next_type = 0;
        while next_package < self.packages.len() || next_type < self.types.len() {
            while next_package < self.packages.len() {
                let id = PackageId::new(next_package as u32);
                next_package += 1;
                if self.package(id).completion().is_pending() {
                    self.complete_package(id)?;
                    completed += 1;
                }
            }
            while next_type < self.types.len() {
                let id = TypeId::new(next_type as u32);
                next_type += 1;
                if self.type_symbol(id).completion().is_pending() {
                    self.complete_type(id)?;
                    if self.type_symbol(id).completion().is_completed() {
                        completed += 1;
                    }
                }
            }
        }
        Ok(completed)
    }

    // ========================================================================
    // VERIFIED LOAD
    // ========================================================================

    /// Load a type only if its class file declares exactly the requested name.
    ///
    /// On case-insensitive storage a request for `a.b.java` may be served by
    /// `a/b/JAVA.class`; the declared name in the file header settles it.
    pub fn load_by_name(&mut self, fullname: &str) -> Result<Symbol, EngineError> {
        let flat = names::flat_name(fullname);
        if let Some(&id) = self.classes.get(flat.as_str()) {
            return Ok(Symbol::Type(id));
        }

        let Some(bytes) = self.bytes_for_class(&flat)? else {
            return Ok(Symbol::NotFound);
        };
        let declared = declared_class_name(&bytes).map_err(|source| EngineError::Decode {
            name: flat.clone(),
            source,
        })?;
        if declared != names::binary_name(&flat) {
            debug!(requested = %flat, declared = %declared, "class file declares another name");
            return Ok(Symbol::NotFound);
        }
        Ok(Symbol::Type(self.get_type(&flat)))
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    /// Names requested but not found on the classpath, sorted.
    pub fn diagnostics(&self) -> &BTreeSet<SmolStr> {
        &self.classes_not_found
    }
}

impl std::fmt::Debug for SymbolEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolEngine")
            .field("types", &self.types.len())
            .field("packages", &self.packages.len())
            .field("classes_not_found", &self.classes_not_found.len())
            .finish()
    }
}
