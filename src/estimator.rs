//! Cardinality estimator allows to estimate number of distinct string keys
//! in the stream or dataset and is defined by a precision `P` in [4..16] range,
//! which defines number of bits to use for HyperLogLog register indices.
//!
//! # Data-structure design rationale
//!
//! ## Memory footprint
//! Estimator keeps `M = 2^P` one-byte registers allocated once at construction:
//! - P = 4: 16 bytes of registers
//! - P = 10: 1 KiB of registers
//! - P = 15: 32 KiB of registers
//! - P = 16: 64 KiB of registers
//!
//! ## Accuracy
//! Expected relative error is `1.04 / sqrt(M)`:
//!   P = 10: 1.04 / sqrt(2^10) = 3.25%
//!   P = 12: 1.04 / sqrt(2^12) = 1.62%
//!   P = 14: 1.04 / sqrt(2^14) = 0.81%
//!   P = 16: 1.04 / sqrt(2^16) = 0.41%
//!
//! # Insert
//! For every key the 32-bit hash `x` is split into:
//! - register index `j` - the top `P` bits of `x`.
//! - register rank - `1 + leading zeros` of `(x << P) | ((1 << (P - 1)) + 1)`.
//!   The constant term always sets a bit, so the rank is capped at `33 - P`.
//!
//! # Estimate
//! Raw HyperLogLog estimate `E = alpha * M^2 / sum(2^-register)` is corrected in three regimes:
//! - `E <= 2.5 * M` - linear counting `M * ln(M / V)` when there are `V > 0` zero registers.
//! - `E <= 2^32 / 30` - raw estimate.
//! - otherwise - large range correction `-2^32 * ln(1 - E / 2^32)`.
//!
//! Original HyperLogLog paper:
//! https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf
//!
//! # Concurrency
//! `update` is a read-modify-write of a single register and is not synchronized. It takes
//! `&mut self`, so sharing an estimator between threads requires external locking
//! (e.g. `Mutex<Estimator>`). `estimate` only reads the registers.

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use tracing::debug;

use crate::error::{Error, Result};
use crate::hash::hash;
use crate::registers::{rank, RegisterArray};

/// Minimum supported precision
pub const MIN_PRECISION: u8 = 4;
/// Maximum supported precision
pub const MAX_PRECISION: u8 = 16;
/// Precision used by `Default` and by the command-line tool
pub const DEFAULT_PRECISION: u8 = 15;

/// `2^32`, size of the hash space
const POW_2_32: f64 = (1u64 << 32) as f64;

/// HyperLogLog cardinality estimator over string keys
#[derive(Clone, PartialEq)]
pub struct Estimator {
    /// Number of hash bits used for register index
    precision: u8,
    /// Bias correction constant for `M` registers
    alpha: f64,
    /// HyperLogLog registers
    registers: RegisterArray,
}

impl Estimator {
    /// Creates new instance of `Estimator` with `2^precision` registers.
    ///
    /// Fails with [`Error::InvalidPrecision`] when `precision` is outside of [4..16] range.
    pub fn new(precision: u8) -> Result<Self> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(Error::InvalidPrecision(precision));
        }

        Ok(Self::with_precision(precision))
    }

    /// Creates new instance of `Estimator` assuming `precision` is already validated
    fn with_precision(precision: u8) -> Self {
        let registers = RegisterArray::new(precision);
        let alpha = alpha(registers.len());
        debug!(precision, registers = registers.len(), alpha, "created estimator");

        Self {
            precision,
            alpha,
            registers,
        }
    }

    /// Insert a key into `Estimator`
    #[inline]
    pub fn update(&mut self, key: &str) {
        let (idx, rank) = self.index_and_rank(hash(key));
        self.registers.update(idx, rank);
    }

    /// Return register index and rank for the hash `x`
    #[inline]
    fn index_and_rank(&self, x: i32) -> (usize, u8) {
        let x = x as u32;
        let p = u32::from(self.precision);
        let idx = (x >> (32 - p)) as usize;
        // Constant term is added before OR-ing, see module docs.
        let w = (x << p) | ((1 << (p - 1)) + 1);
        (idx, rank(w) as u8)
    }

    /// Return cardinality estimate.
    ///
    /// Linear counting computes `M / V` in `f64`. Tools computing this ratio in `f32`
    /// may truncate a few small range estimates to a different integer (e.g. P = 15,
    /// V = 6162 gives 54757 here and 54756 with an `f32` ratio).
    ///
    /// Once the raw estimate reaches `2^32` the large range correction is undefined
    /// and the result is `NaN` or infinite.
    #[inline]
    pub fn estimate(&self) -> f64 {
        estimate_registers(&self.registers, self.alpha)
    }

    /// Return precision of `Estimator`
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Return number of registers
    #[inline]
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Return `true` if no key has been inserted yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Return number of registers set to 0
    #[inline]
    pub fn zeros(&self) -> usize {
        self.registers.zeros()
    }

    /// Return raw register values
    #[inline]
    pub fn registers(&self) -> &[u8] {
        self.registers.as_slice()
    }

    /// Return memory size of `Estimator`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.size_of()
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }
}

impl Debug for Estimator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, zeros: {}, estimate: {:.4} }}",
            self.precision,
            self.zeros(),
            self.estimate()
        )
    }
}

impl<S: AsRef<str>> Extend<S> for Estimator {
    fn extend<I: IntoIterator<Item = S>>(&mut self, keys: I) {
        keys.into_iter().for_each(|key| self.update(key.as_ref()));
    }
}

/// Apply HyperLogLog estimate with small and large range corrections to `registers`
#[inline]
fn estimate_registers(registers: &RegisterArray, alpha: f64) -> f64 {
    let m = registers.len() as f64;
    let raw = alpha * m * m / registers.harmonic_sum();
    correct(raw, m, registers.zeros())
}

/// Select estimate regime for `raw` estimate of `m` registers with `zeros` zero registers
#[inline]
fn correct(raw: f64, m: f64, zeros: usize) -> f64 {
    if raw <= 2.5 * m {
        match zeros {
            0 => raw,
            zeros => m * (m / zeros as f64).ln(),
        }
    } else if raw <= POW_2_32 / 30.0 {
        raw
    } else {
        -POW_2_32 * (1.0 - raw / POW_2_32).ln()
    }
}

/// Parameter for bias correction
#[inline]
fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}
