//! Address set name hashing
//!
//! OVN address set names are referenced from ACL match expressions
//! (`ip4.src == $<name>`), so they must start with a letter and may not
//! contain `.` or other delimiters. Semantic names such as
//! `namespace.policy.ingress` do not satisfy that, so the stored primary key
//! is a hash of the semantic name and the semantic name itself is kept in
//! `external_ids:name`.
//!
//! The hash is FNV-1a 64-bit rendered as an unsigned decimal behind a fixed
//! letter prefix. It is stable across processes and hosts. Distinct names can
//! collide; nothing here detects that.

use std::hash::Hasher;

/// Prefix placed in front of the decimal hash
pub const ADDRESS_SET_PREFIX: char = 'a';

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hasher
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    /// Create a hasher at the FNV offset basis
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1a64 {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// Hash a semantic address set name into a valid OVN address set name
///
/// ```
/// use ovn_addrset_core::hash::hashed_address_set;
///
/// assert_eq!(hashed_address_set("ns1.0"), "a16687120342526660291");
/// ```
pub fn hashed_address_set(name: &str) -> String {
    let mut hasher = Fnv1a64::new();
    hasher.write(name.as_bytes());
    format!("{}{}", ADDRESS_SET_PREFIX, hasher.finish())
}
