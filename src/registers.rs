//! ## Register array
//! Fixed-size array of `M = 2^P` HyperLogLog registers, one byte per register.
//!
//! Each register stores the highest rank observed among hashes routed to its bucket.
//! Registers only ever grow: `update` is a max-update and there is no way to reset or
//! remove a register once set.

use std::mem::size_of_val;

/// HyperLogLog registers of a single estimator
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterArray {
    regs: Box<[u8]>,
}

impl RegisterArray {
    /// Create zero-initialized array of `2^precision` registers
    #[inline]
    pub(crate) fn new(precision: u8) -> Self {
        Self {
            regs: vec![0u8; 1 << precision].into_boxed_slice(),
        }
    }

    /// Build register array from raw register values
    #[cfg(test)]
    pub(crate) fn from_vec(regs: Vec<u8>) -> Self {
        Self {
            regs: regs.into_boxed_slice(),
        }
    }

    /// Return number of registers
    #[inline]
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Return `true` if every register is still zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regs.iter().all(|&r| r == 0)
    }

    /// Get `idx` register
    #[inline]
    pub fn get(&self, idx: usize) -> u8 {
        self.regs[idx]
    }

    /// Raise `idx` register to `rank` if it is larger than the current value.
    /// Returns true if the register grew.
    #[inline]
    pub fn update(&mut self, idx: usize, rank: u8) -> bool {
        let reg = &mut self.regs[idx];
        if rank > *reg {
            *reg = rank;
            return true;
        }
        false
    }

    /// Return number of registers set to 0
    #[inline]
    pub fn zeros(&self) -> usize {
        self.regs.iter().filter(|&&r| r == 0).count()
    }

    /// Return harmonic sum of registers: `sum(2^-r)`
    #[inline]
    pub fn harmonic_sum(&self) -> f64 {
        self.regs
            .iter()
            .map(|&r| 1.0 / ((1u64 << r) as f64))
            .sum()
    }

    /// Return raw register values
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.regs
    }

    /// Return memory size of registers
    #[inline]
    pub fn size_of(&self) -> usize {
        size_of_val(&*self.regs)
    }
}

/// Return `1 + leading zeros` of `w`, or 0 when `w` has no bits set.
#[inline]
pub fn rank(w: u32) -> u32 {
    if w == 0 {
        0
    } else {
        w.leading_zeros() + 1
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0 => 0; "zero word")]
    #[test_case(1 => 32; "lowest bit")]
    #[test_case(9 => 29; "nine")]
    #[test_case(0x8000_0000 => 1; "highest bit")]
    #[test_case(0x0001_0000 => 16; "middle bit")]
    #[test_case(u32::MAX => 1; "all bits")]
    fn test_rank(w: u32) -> u32 {
        rank(w)
    }

    #[test_case(4 => 16)]
    #[test_case(10 => 1024)]
    #[test_case(16 => 65536)]
    fn test_new_is_zeroed(precision: u8) -> usize {
        let regs = RegisterArray::new(precision);
        assert!(regs.is_empty());
        assert_eq!(regs.zeros(), regs.len());
        assert_eq!(regs.harmonic_sum(), regs.len() as f64);
        assert_eq!(regs.size_of(), regs.len());
        regs.len()
    }

    #[test]
    fn test_update_is_max() {
        let mut regs = RegisterArray::new(4);

        assert!(regs.update(3, 5));
        assert_eq!(regs.get(3), 5);

        // Lower or equal ranks never decrease the register.
        assert!(!regs.update(3, 2));
        assert!(!regs.update(3, 5));
        assert_eq!(regs.get(3), 5);

        assert!(regs.update(3, 7));
        assert_eq!(regs.get(3), 7);

        assert_eq!(regs.zeros(), 15);
        assert!(!regs.is_empty());
    }

    #[test]
    fn test_harmonic_sum() {
        let regs = RegisterArray::from_vec(vec![0, 1, 2, 3]);
        assert_eq!(regs.harmonic_sum(), 1.0 + 0.5 + 0.25 + 0.125);
        assert_eq!(regs.zeros(), 1);
        assert_eq!(regs.as_slice(), &[0, 1, 2, 3]);
    }
}
