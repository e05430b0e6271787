// Persistence for coins, skins and match history.
// Plain-string key-value storage with atomic per-key file writes.

pub mod error;
pub mod records;
pub mod store;

pub use error::SaveError;
pub use records::{MatchMode, MatchRecord};
pub use store::{FileStore, KvStore, MemoryStore};
