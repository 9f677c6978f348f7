//! `loglog-counter` is a Rust crate designed to estimate the number of distinct string keys in a stream
//! or file using a fixed amount of memory.
//!
//! This library uses classic HyperLogLog with `2^P` one-byte registers, a deterministic 32-bit
//! one-at-a-time hash and small/large range bias corrections.
//!
//! ```
//! use loglog_counter::Estimator;
//!
//! let mut estimator = Estimator::new(12)?;
//! for key in ["apple", "banana", "apple"] {
//!     estimator.update(key);
//! }
//! assert_eq!(estimator.estimate().round(), 2.0);
//! # Ok::<(), loglog_counter::Error>(())
//! ```
mod error;
pub mod estimator;
pub mod hash;
pub mod lines;
pub mod registers;

pub use error::{Error, Result};
pub use estimator::Estimator;
pub use lines::count_lines;
