//! Obfuscated, time-sortable 63-bit identifiers.
//!
//! A [`MintId`] packs a millisecond timestamp offset (53 bits) together with
//! a per-namespace counter reduced modulo 1024 (10 bits) into a single
//! non-negative integer that fits a signed 64-bit column:
//!
//! ```text
//!  Bit Index:  63           63 62            10 9              0
//!              +--------------+----------------+---------------+
//!  Field:      | reserved (1) | timestamp (53) | sequence (10) |
//!              +--------------+----------------+---------------+
//!              |<--------- MSB ----- 64 bits ----- LSB ------->|
//! ```
//!
//! IDs minted later sort numerically greater than earlier ones for the same
//! namespace, as long as the clock does not move backward and fewer than
//! 1024 IDs are minted within one millisecond. The low bits obscure raw
//! insertion order without sacrificing index locality.
//!
//! # Example
//!
//! ```
//! use mintid::{AtomicCounterStore, Minter, MonotonicClock};
//!
//! let minter = Minter::new(AtomicCounterStore::new(), MonotonicClock::default());
//! minter.register_namespace("orders")?;
//!
//! let id = minter.try_allocate("orders")?;
//! assert!(id.to_i64() >= 0);
//! # Ok::<(), mintid::Error>(())
//! ```

mod counter;
mod error;
mod id;
mod minter;
mod time;

pub use crate::counter::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::minter::*;
pub use crate::time::*;
