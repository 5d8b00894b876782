//! Classpath plumbing: the byte sources the engine reads class files from.

mod classpath;

#[cfg(feature = "jar")]
pub use classpath::JarClasspath;
pub use classpath::{ByteSource, Classpath, DirectoryClasspath, InMemoryClasspath};
