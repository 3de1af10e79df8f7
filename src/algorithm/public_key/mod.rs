mod rsa;

use num_bigint::BigUint;

pub(crate) use self::rsa::{RsaSha1, RsaSha256};
use crate::algorithm::PubKey;
use crate::error::SshResult;
use crate::model::Data;

/// # 公钥算法
/// 主要用于对服务端签名的验证
pub trait PublicKey: Send + Sync {
    fn new() -> Self
    where
        Self: Sized;
    fn verify_signature(&self, ks: &[u8], message: &[u8], sig: &[u8]) -> SshResult<bool>;
}

pub(crate) fn from(s: PubKey) -> Box<dyn PublicKey> {
    match s {
        PubKey::SshRsa => Box::new(RsaSha1::new()),
        PubKey::RsaSha2_256 => Box::new(RsaSha256::new()),
    }
}

/// Modulus bit length of an RSA host-key blob
/// (string algo, mpint e, mpint n).
pub(crate) fn rsa_mod_bits(ks: &[u8]) -> SshResult<u64> {
    let mut data = Data::from(ks.to_vec());
    data.get_u8s();
    data.get_mpint();
    let n = BigUint::from_bytes_be(data.get_mpint().as_slice());
    Ok(n.bits())
}
