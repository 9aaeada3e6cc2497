pub mod io;
pub mod isolation;
pub mod outline;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::{DocumentLines, DocumentStore, FsStore, IoError, MemoryStore};
pub use isolation::*;
pub use outline::{BulletMarker, IndentUnit, ListSyntax};
