use num_bigint::{BigUint, RandBigInt};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use zeroize::{Zeroize, Zeroizing};

use super::KeyExchange;
use crate::algorithm::hash::HashType;
use crate::error::{SshError, SshResult};

/// Common generator for the fixed MODP groups
const DH_G: u32 = 2;

/// diffie-hellman-group14 value for p (RFC 3526, 2048 bit)
const DH_P_14: [u8; 256] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC9, 0x0F, 0xDA, 0xA2,
    0x21, 0x68, 0xC2, 0x34, 0xC4, 0xC6, 0x62, 0x8B, 0x80, 0xDC, 0x1C, 0xD1,
    0x29, 0x02, 0x4E, 0x08, 0x8A, 0x67, 0xCC, 0x74, 0x02, 0x0B, 0xBE, 0xA6,
    0x3B, 0x13, 0x9B, 0x22, 0x51, 0x4A, 0x08, 0x79, 0x8E, 0x34, 0x04, 0xDD,
    0xEF, 0x95, 0x19, 0xB3, 0xCD, 0x3A, 0x43, 0x1B, 0x30, 0x2B, 0x0A, 0x6D,
    0xF2, 0x5F, 0x14, 0x37, 0x4F, 0xE1, 0x35, 0x6D, 0x6D, 0x51, 0xC2, 0x45,
    0xE4, 0x85, 0xB5, 0x76, 0x62, 0x5E, 0x7E, 0xC6, 0xF4, 0x4C, 0x42, 0xE9,
    0xA6, 0x37, 0xED, 0x6B, 0x0B, 0xFF, 0x5C, 0xB6, 0xF4, 0x06, 0xB7, 0xED,
    0xEE, 0x38, 0x6B, 0xFB, 0x5A, 0x89, 0x9F, 0xA5, 0xAE, 0x9F, 0x24, 0x11,
    0x7C, 0x4B, 0x1F, 0xE6, 0x49, 0x28, 0x66, 0x51, 0xEC, 0xE4, 0x5B, 0x3D,
    0xC2, 0x00, 0x7C, 0xB8, 0xA1, 0x63, 0xBF, 0x05, 0x98, 0xDA, 0x48, 0x36,
    0x1C, 0x55, 0xD3, 0x9A, 0x69, 0x16, 0x3F, 0xA8, 0xFD, 0x24, 0xCF, 0x5F,
    0x83, 0x65, 0x5D, 0x23, 0xDC, 0xA3, 0xAD, 0x96, 0x1C, 0x62, 0xF3, 0x56,
    0x20, 0x85, 0x52, 0xBB, 0x9E, 0xD5, 0x29, 0x07, 0x70, 0x96, 0x96, 0x6D,
    0x67, 0x0C, 0x35, 0x4E, 0x4A, 0xBC, 0x98, 0x04, 0xF1, 0x74, 0x6C, 0x08,
    0xCA, 0x18, 0x21, 0x7C, 0x32, 0x90, 0x5E, 0x46, 0x2E, 0x36, 0xCE, 0x3B,
    0xE3, 0x9E, 0x77, 0x2C, 0x18, 0x0E, 0x86, 0x03, 0x9B, 0x27, 0x83, 0xA2,
    0xEC, 0x07, 0xA2, 0x8F, 0xB5, 0xC5, 0x5D, 0xF0, 0x6F, 0x4C, 0x52, 0xC9,
    0xDE, 0x2B, 0xCB, 0xF6, 0x95, 0x58, 0x17, 0x18, 0x39, 0x95, 0x49, 0x7C,
    0xEA, 0x95, 0x6A, 0xE5, 0x15, 0xD2, 0x26, 0x18, 0x98, 0xFA, 0x05, 0x10,
    0x15, 0x72, 0x8E, 0x5A, 0x8A, 0xAC, 0xAA, 0x68, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF,
];

/// diffie-hellman-group1 value for p (RFC 2409 Second Oakley Group, 1024 bit)
const DH_P_1: [u8; 128] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC9, 0x0F, 0xDA, 0xA2,
    0x21, 0x68, 0xC2, 0x34, 0xC4, 0xC6, 0x62, 0x8B, 0x80, 0xDC, 0x1C, 0xD1,
    0x29, 0x02, 0x4E, 0x08, 0x8A, 0x67, 0xCC, 0x74, 0x02, 0x0B, 0xBE, 0xA6,
    0x3B, 0x13, 0x9B, 0x22, 0x51, 0x4A, 0x08, 0x79, 0x8E, 0x34, 0x04, 0xDD,
    0xEF, 0x95, 0x19, 0xB3, 0xCD, 0x3A, 0x43, 0x1B, 0x30, 0x2B, 0x0A, 0x6D,
    0xF2, 0x5F, 0x14, 0x37, 0x4F, 0xE1, 0x35, 0x6D, 0x6D, 0x51, 0xC2, 0x45,
    0xE4, 0x85, 0xB5, 0x76, 0x62, 0x5E, 0x7E, 0xC6, 0xF4, 0x4C, 0x42, 0xE9,
    0xA6, 0x37, 0xED, 0x6B, 0x0B, 0xFF, 0x5C, 0xB6, 0xF4, 0x06, 0xB7, 0xED,
    0xEE, 0x38, 0x6B, 0xFB, 0x5A, 0x89, 0x9F, 0xA5, 0xAE, 0x9F, 0x24, 0x11,
    0x7C, 0x4B, 0x1F, 0xE6, 0x49, 0x28, 0x66, 0x51, 0xEC, 0xE6, 0x53, 0x81,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

pub(crate) struct DhGroup {
    pub p: BigUint,
    pub g: BigUint,
    /// subgroup order q = (p - 1) / 2
    pub q: BigUint,
}

impl DhGroup {
    fn from_prime(p_bytes: &[u8]) -> Self {
        let p = BigUint::from_bytes_be(p_bytes);
        let q = (&p - 1u32) >> 1;
        DhGroup {
            p,
            g: BigUint::from(DH_G),
            q,
        }
    }
}

pub(crate) static GROUP14: Lazy<DhGroup> = Lazy::new(|| DhGroup::from_prime(&DH_P_14));
pub(crate) static GROUP1: Lazy<DhGroup> = Lazy::new(|| DhGroup::from_prime(&DH_P_1));

/// Fixed-group Diffie-Hellman, client side.
pub(super) struct Dh {
    group: &'static DhGroup,
    hash_type: HashType,
    /// private exponent x, big endian; wiped on drop
    private_key: Vec<u8>,
    public_key: Vec<u8>,
}

impl Dh {
    pub fn new(group: &'static DhGroup, hash_type: HashType) -> SshResult<Self> {
        let mut rng = OsRng;
        // x uniform in [1, q - 1]
        let x = rng.gen_biguint_range(&BigUint::from(1u32), &group.q);
        let e = group.g.modpow(&x, &group.p);
        if e < BigUint::from(2u32) {
            return Err(SshError::CryptoError(
                "degenerate DH public value generated".to_string(),
            ));
        }
        Ok(Dh {
            group,
            hash_type,
            private_key: x.to_bytes_be(),
            public_key: e.to_bytes_be(),
        })
    }
}

impl KeyExchange for Dh {
    fn get_public_key(&self) -> &[u8] {
        &self.public_key
    }

    fn get_shared_secret(&self, puk: &[u8]) -> SshResult<Zeroizing<Vec<u8>>> {
        let their_pub = BigUint::from_bytes_be(puk);
        // theirs must lie in [2, p - 2]; 0, 1, p - 1 and p are degenerate
        let p_min1 = &self.group.p - 1u32;
        if their_pub < BigUint::from(2u32) || their_pub >= p_min1 {
            return Err(SshError::InvalidPublicValue);
        }
        let x = BigUint::from_bytes_be(&self.private_key);
        let k = their_pub.modpow(&x, &self.group.p);
        Ok(Zeroizing::new(k.to_bytes_be()))
    }

    fn get_hash_type(&self) -> HashType {
        self.hash_type
    }
}

impl Drop for Dh {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paste::paste;

    macro_rules! shared_secret_matches {
        ($name:ident, $group:expr) => {
            paste! {
                #[test]
                fn [<shared_secret_matches_ $name>]() {
                    let alice = Dh::new(&$group, HashType::SHA1).unwrap();
                    let bob = Dh::new(&$group, HashType::SHA1).unwrap();
                    let k_a = alice.get_shared_secret(bob.get_public_key()).unwrap();
                    let k_b = bob.get_shared_secret(alice.get_public_key()).unwrap();
                    assert_eq!(*k_a, *k_b);
                    assert!(!k_a.is_empty());
                }
            }
        };
    }

    shared_secret_matches!(group14, GROUP14);
    shared_secret_matches!(group1, GROUP1);

    #[test]
    fn public_value_within_range() {
        let dh = Dh::new(&GROUP14, HashType::SHA1).unwrap();
        let e = BigUint::from_bytes_be(dh.get_public_key());
        assert!(e >= BigUint::from(2u32));
        assert!(e <= &GROUP14.p - 2u32);
    }

    #[test]
    fn rejects_degenerate_public_values() {
        let dh = Dh::new(&GROUP14, HashType::SHA1).unwrap();
        let p = GROUP14.p.to_bytes_be();
        let p_min1 = (&GROUP14.p - 1u32).to_bytes_be();
        for bad in [vec![0u8], vec![1u8], p_min1, p] {
            match dh.get_shared_secret(&bad) {
                Err(SshError::InvalidPublicValue) => {}
                other => panic!("expected InvalidPublicValue, got {:?}", other.map(|v| v.len())),
            }
        }
    }

    #[test]
    fn subgroup_order_is_half_p() {
        assert_eq!(&GROUP14.q << 1, &GROUP14.p - 1u32);
        assert_eq!(&GROUP1.q << 1, &GROUP1.p - 1u32);
    }
}
