pub use crate::cache::{HashCache, MemoryCache};
pub use crate::fetchers::{ConstFetch, DelayFetch, MapFetch};
pub use crate::lookup::{CachedLookup, Directory};
