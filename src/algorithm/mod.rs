pub mod hash;
pub(crate) mod key_exchange;
pub(crate) mod public_key;

use strum_macros::{AsRefStr, EnumString};

/// 密钥交换算法
#[derive(Copy, Clone, PartialEq, Eq, Debug, AsRefStr, EnumString)]
pub enum Kex {
    #[strum(serialize = "diffie-hellman-group14-sha1")]
    DiffieHellmanGroup14Sha1,
    #[strum(serialize = "diffie-hellman-group14-sha256")]
    DiffieHellmanGroup14Sha256,
    #[strum(serialize = "diffie-hellman-group1-sha1")]
    DiffieHellmanGroup1Sha1,
}

/// 非对称签名算法
#[derive(Copy, Clone, PartialEq, Eq, Debug, AsRefStr, EnumString)]
pub enum PubKey {
    #[strum(serialize = "rsa-sha2-256")]
    RsaSha2_256,
    #[strum(serialize = "ssh-rsa")]
    SshRsa,
}

/// 对称加密算法
///
/// The cipher implementations themselves live in the transport layer;
/// key exchange only negotiates the names.
#[derive(Copy, Clone, PartialEq, Eq, Debug, AsRefStr, EnumString)]
pub enum Enc {
    #[strum(serialize = "aes128-ctr")]
    Aes128Ctr,
    #[strum(serialize = "aes256-ctr")]
    Aes256Ctr,
    #[strum(serialize = "none")]
    None,
}

/// MAC（消息验证码）算法
#[derive(Copy, Clone, PartialEq, Eq, Debug, AsRefStr, EnumString)]
pub enum Mac {
    #[strum(serialize = "hmac-sha2-256")]
    HmacSha2_256,
    #[strum(serialize = "hmac-sha1")]
    HmacSha1,
    #[strum(serialize = "none")]
    None,
}

/// 压缩算法
#[derive(Copy, Clone, PartialEq, Eq, Debug, AsRefStr, EnumString)]
pub enum Compress {
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "zlib@openssh.com")]
    ZlibOpenSsh,
}

/// 语言
///
/// RFC 4253 sends the language name-lists empty in practice; the single
/// empty name stands in for "no language" on both sides.
#[derive(Copy, Clone, PartialEq, Eq, Debug, AsRefStr, EnumString)]
pub enum Lang {
    #[strum(serialize = "")]
    None,
}
