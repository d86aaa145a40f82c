//! Map type used for sparse tick bitmap words.
//!
//! `rustc-hash` takes precedence over `ahash` when both features are on.

#[cfg(feature = "rustc-hash")]
pub type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(all(feature = "ahash", not(feature = "rustc-hash")))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(not(any(feature = "rustc-hash", feature = "ahash")))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;
