//! Fixed-capacity track cache with least-recently-used eviction.

pub mod error;
pub mod lru;
pub mod slot;

pub use lru::LruCache;
