//! Standard fetchers for postgate gates.

pub mod cache;
pub mod fetchers;
pub mod lookup;
pub mod prelude;

pub use cache::{HashCache, MemoryCache};
pub use fetchers::{ConstFetch, DelayFetch, MapFetch};
pub use lookup::{CachedLookup, Directory};
