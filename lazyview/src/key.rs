use alloc::string::String;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

// Key → slot storage for the bounded cache. Hashing needs `std`; without it lookups go through
// an ordered map.
#[cfg(feature = "std")]
pub(crate) type SlotMap<S> = HashMap<String, S>;
#[cfg(not(feature = "std"))]
pub(crate) type SlotMap<S> = BTreeMap<String, S>;
