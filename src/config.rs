//! Engine configuration.

/// Major version of Java 21 class files.
pub const JAVA_21_MAJOR: u16 = 65;

/// Settings for a [`SymbolEngine`](crate::hir::SymbolEngine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Newest class-file major version the declaration decoder accepts.
    ///
    /// Newer files are downgraded to this version before decoding.
    pub newest_supported_major: u16,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_newest_supported_major(mut self, major: u16) -> Self {
        self.newest_supported_major = major;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            newest_supported_major: JAVA_21_MAJOR,
        }
    }
}
