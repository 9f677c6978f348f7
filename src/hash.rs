//! ## Key hashing
//! Keys are hashed with a variant of Bob Jenkins' one-at-a-time mixer producing a 32-bit value.
//!
//! The mixing loop is the usual `h += c; h += h << 10; h ^= h >> 6` over every character code,
//! but the finalization differs from the textbook function:
//! - `h += h << 3`
//! - `h ^= h >> 6`
//! - `h += h << 16`
//!
//! All arithmetic is 32-bit signed with wraparound, and right shifts are arithmetic (sign-extending).
//! Character codes are UTF-16 code units, so characters outside the Basic Multilingual Plane
//! contribute both of their surrogates.
//!
//! The hash is not cryptographic, but it is stable across runs, processes and platforms.

/// Hash `key` into a raw 32-bit pattern.
///
/// The result may be negative; callers should treat it as bits rather than a magnitude.
#[inline]
pub fn hash(key: &str) -> i32 {
    let mut h = key.encode_utf16().fold(0i32, |mut h, c| {
        h = h.wrapping_add(i32::from(c));
        h = h.wrapping_add(h.wrapping_shl(10));
        h ^ (h >> 6)
    });

    h = h.wrapping_add(h.wrapping_shl(3));
    h ^= h >> 6;
    h.wrapping_add(h.wrapping_shl(16))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("" => 0; "empty key")]
    #[test_case("a" => -1548442713; "single ascii char")]
    #[test_case("hello" => -1119713789; "ascii word")]
    #[test_case("test item 1" => -1683991480; "ascii with spaces")]
    #[test_case("Привет" => 1919035972; "cyrillic")]
    #[test_case("😀" => -1162855632; "supplementary plane char")]
    fn test_hash(key: &str) -> i32 {
        hash(key)
    }

    #[test]
    fn test_hash_is_deterministic() {
        for i in 0..1000 {
            let key = format!("item{}", i);
            assert_eq!(hash(&key), hash(&key.clone()));
        }
    }

    #[test]
    fn test_hash_distinguishes_order() {
        assert_ne!(hash("ab"), hash("ba"));
    }
}
