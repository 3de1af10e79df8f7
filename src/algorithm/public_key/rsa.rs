use rsa::{BigUint, Pkcs1v15Sign, RsaPublicKey};

use super::PublicKey as PubK;
use crate::algorithm::hash::{self, HashType};
use crate::error::{SshError, SshResult};
use crate::model::Data;

fn decode_public_key(ks: &[u8]) -> SshResult<RsaPublicKey> {
    let mut data = Data::from(ks.to_vec());
    // algorithm name embedded in the blob
    data.get_u8s();

    let e = BigUint::from_bytes_be(data.get_mpint().as_slice());
    let n = BigUint::from_bytes_be(data.get_mpint().as_slice());
    RsaPublicKey::new(n, e).map_err(|e| SshError::CryptoError(e.to_string()))
}

/// ssh-rsa, RSASSA-PKCS1-v1_5 over SHA-1
pub(crate) struct RsaSha1;

impl PubK for RsaSha1 {
    fn new() -> Self
    where
        Self: Sized,
    {
        Self
    }

    fn verify_signature(&self, ks: &[u8], message: &[u8], sig: &[u8]) -> SshResult<bool> {
        let public_key = decode_public_key(ks)?;
        let digest = hash::digest(message, HashType::SHA1);
        let scheme = Pkcs1v15Sign::new::<sha1::Sha1>();

        Ok(public_key.verify(scheme, &digest, sig).is_ok())
    }
}

/// rsa-sha2-256, RSASSA-PKCS1-v1_5 over SHA-256
pub(crate) struct RsaSha256;

impl PubK for RsaSha256 {
    fn new() -> Self
    where
        Self: Sized,
    {
        Self
    }

    fn verify_signature(&self, ks: &[u8], message: &[u8], sig: &[u8]) -> SshResult<bool> {
        let public_key = decode_public_key(ks)?;
        let digest = hash::digest(message, HashType::SHA256);
        let scheme = Pkcs1v15Sign::new::<sha2::Sha256>();

        Ok(public_key.verify(scheme, &digest, sig).is_ok())
    }
}
