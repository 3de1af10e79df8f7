use zeroize::Zeroizing;

use crate::algorithm::hash::HashType;
use crate::algorithm::Kex;
use crate::error::SshResult;

/// # 密钥交换方法
///
/// 密钥交换方法规定如何生成用于加密和验证的一次性会话密钥，以及如何进行服务器验证。
pub(crate) mod dh;

pub trait KeyExchange: Send + Sync {
    fn get_public_key(&self) -> &[u8];
    fn get_shared_secret(&self, puk: &[u8]) -> SshResult<Zeroizing<Vec<u8>>>;
    fn get_hash_type(&self) -> HashType;
}

pub(crate) fn from(kex: Kex) -> SshResult<Box<dyn KeyExchange>> {
    match kex {
        Kex::DiffieHellmanGroup14Sha1 => Ok(Box::new(dh::Dh::new(&dh::GROUP14, HashType::SHA1)?)),
        Kex::DiffieHellmanGroup14Sha256 => {
            Ok(Box::new(dh::Dh::new(&dh::GROUP14, HashType::SHA256)?))
        }
        Kex::DiffieHellmanGroup1Sha1 => Ok(Box::new(dh::Dh::new(&dh::GROUP1, HashType::SHA1)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_type_follows_the_algorithm_name() {
        assert_eq!(
            from(Kex::DiffieHellmanGroup14Sha1).unwrap().get_hash_type(),
            HashType::SHA1
        );
        assert_eq!(
            from(Kex::DiffieHellmanGroup14Sha256)
                .unwrap()
                .get_hash_type(),
            HashType::SHA256
        );
        assert_eq!(
            from(Kex::DiffieHellmanGroup1Sha1).unwrap().get_hash_type(),
            HashType::SHA1
        );
    }
}
