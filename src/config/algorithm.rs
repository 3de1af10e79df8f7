use std::{
    fmt::{Debug, Display},
    ops::{Deref, DerefMut},
    str::FromStr,
};
use tracing::*;

use crate::{
    algorithm::{Compress, Enc, Kex, Lang, Mac, PubKey},
    constant::ssh_msg_code,
    error::{SshError, SshResult},
    model::Data,
    util,
};

macro_rules! create_wrapped_type {
    ($name: ident, $value_type: ty) => {
        #[derive(Clone, Default)]
        pub struct $name(pub Vec<$value_type>);
        impl Deref for $name {
            type Target = Vec<$value_type>;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    "{}",
                    self.iter()
                        .map(|&x| x.as_ref().to_owned())
                        .collect::<Vec<String>>()
                        .join(",")
                )
            }
        }

        impl TryFrom<Vec<String>> for $name {
            type Error = SshError;
            fn try_from(v: Vec<String>) -> Result<Self, Self::Error> {
                let v = v
                    .iter()
                    .filter_map(|x| <$value_type>::from_str(x.as_str()).ok())
                    .collect::<Vec<$value_type>>();
                Ok(Self(v))
            }
        }

        impl From<Vec<$value_type>> for $name {
            fn from(v: Vec<$value_type>) -> Self {
                Self(v)
            }
        }
    };
}

create_wrapped_type!(Kexs, Kex);
create_wrapped_type!(PubKeys, PubKey);
create_wrapped_type!(Encs, Enc);
create_wrapped_type!(Macs, Mac);
create_wrapped_type!(Compresses, Compress);
create_wrapped_type!(Langs, Lang);

/// The per-category algorithm lists of one side of the connection.
///
/// The local instance is built once at startup and ranked by
/// preference; the remote instance is whatever the server announced in
/// its KEXINIT, order carrying no weight.
#[derive(Clone, Default)]
pub struct AlgList {
    pub key_exchange: Kexs,
    pub public_key: PubKeys,
    pub c_encryption: Encs,
    pub s_encryption: Encs,
    pub c_mac: Macs,
    pub s_mac: Macs,
    pub c_compress: Compresses,
    pub s_compress: Compresses,
    pub c_lang: Langs,
    pub s_lang: Langs,
    /// the peer announced a guessed kex packet already in flight
    pub(crate) first_kex_packet_follows: bool,
}

impl Debug for AlgList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "kex: \"{}\", ", self.key_exchange)?;
        write!(f, "pubkey: \"{}\", ", self.public_key)?;
        write!(f, "c_enc: \"{}\", ", self.c_encryption)?;
        write!(f, "s_enc: \"{}\", ", self.s_encryption)?;
        write!(f, "c_mac: \"{}\", ", self.c_mac)?;
        write!(f, "s_mac: \"{}\", ", self.s_mac)?;
        write!(f, "c_compress: \"{}\", ", self.c_compress)?;
        write!(f, "s_compress: \"{}\", ", self.s_compress)?;
        write!(f, "c_lang: \"{}\", ", self.c_lang)?;
        write!(f, "s_lang: \"{}\"", self.s_lang)
    }
}

impl AlgList {
    pub fn new() -> Self {
        AlgList {
            ..Default::default()
        }
    }

    pub fn client_default() -> Self {
        AlgList {
            key_exchange: vec![
                Kex::DiffieHellmanGroup14Sha1,
                Kex::DiffieHellmanGroup14Sha256,
                Kex::DiffieHellmanGroup1Sha1,
            ]
            .into(),
            public_key: vec![PubKey::RsaSha2_256, PubKey::SshRsa].into(),
            c_encryption: vec![Enc::Aes128Ctr, Enc::Aes256Ctr, Enc::None].into(),
            s_encryption: vec![Enc::Aes128Ctr, Enc::Aes256Ctr, Enc::None].into(),
            c_mac: vec![Mac::HmacSha2_256, Mac::HmacSha1, Mac::None].into(),
            s_mac: vec![Mac::HmacSha2_256, Mac::HmacSha1, Mac::None].into(),
            c_compress: vec![Compress::None, Compress::ZlibOpenSsh].into(),
            s_compress: vec![Compress::None, Compress::ZlibOpenSsh].into(),
            c_lang: vec![Lang::None].into(),
            s_lang: vec![Lang::None].into(),
            first_kex_packet_follows: false,
        }
    }

    /// Parse a remote SSH_MSG_KEXINIT payload.
    pub fn unpack(data: Data) -> SshResult<Self> {
        if data.first() != Some(&ssh_msg_code::SSH_MSG_KEXINIT) {
            return Err(SshError::ProtocolError(
                "expected remote KEXINIT, found something else".to_string(),
            ));
        }
        Self::from(data)
    }

    fn from(mut data: Data) -> SshResult<Self> {
        data.get_u8();
        // skip the 16-byte cookie
        data.skip(16);
        let mut server_algorithm = Self::new();

        macro_rules! try_convert {
            ($hint: literal, $field: ident) => {
                let alg_string = util::vec_u8_to_string(data.get_u8s(), ",")?;
                info!("server {}: {:?}", $hint, alg_string);
                server_algorithm.$field = alg_string.try_into()?;
            };
        }
        try_convert!("key exchange", key_exchange);
        try_convert!("public key", public_key);
        try_convert!("c2s encryption", c_encryption);
        try_convert!("s2c encryption", s_encryption);
        try_convert!("c2s mac", c_mac);
        try_convert!("s2c mac", s_mac);
        try_convert!("c2s compression", c_compress);
        try_convert!("s2c compression", s_compress);
        try_convert!("c2s language", c_lang);
        try_convert!("s2c language", s_lang);

        server_algorithm.first_kex_packet_follows = data.get_u8() != 0;
        // reserved uint32
        data.get_u32();

        debug!("converted server algorithms: [{:?}]", server_algorithm);
        Ok(server_algorithm)
    }

    /// Resolve the suite: for every category take the first local entry
    /// that the server offers anywhere in its list. Local preference
    /// dominates; the server's ranking is ignored.
    pub fn match_with(&self, other: &Self) -> SshResult<Self> {
        macro_rules! match_field {
            ($our: expr, $their: expr, $field: ident, $err_hint: literal) => {
                $our.$field
                    .iter()
                    .find_map(|k| {
                        if $their.$field.contains(k) {
                            Some(*k)
                        } else {
                            None
                        }
                    })
                    .ok_or_else(|| {
                        let err_msg = format!(
                            "Key_agreement: the {} fails to match, \
                        algorithms supported by the server: {}, \
                        algorithms supported by the client: {}",
                            $err_hint, $their.$field, $our.$field
                        );
                        error!(err_msg);
                        SshError::NegotiationError(err_msg)
                    })
            };
        }

        // categories that may fall back to a local "none" entry when
        // nothing matches
        macro_rules! match_field_or_none {
            ($our: expr, $their: expr, $field: ident, $none: expr, $err_hint: literal) => {
                $our.$field
                    .iter()
                    .find_map(|k| {
                        if $their.$field.contains(k) {
                            Some(*k)
                        } else {
                            None
                        }
                    })
                    .or_else(|| {
                        if $our.$field.contains(&$none) {
                            Some($none)
                        } else {
                            None
                        }
                    })
                    .ok_or_else(|| {
                        let err_msg = format!(
                            "Key_agreement: the {} fails to match, \
                        algorithms supported by the server: {}, \
                        algorithms supported by the client: {}",
                            $err_hint, $their.$field, $our.$field
                        );
                        error!(err_msg);
                        SshError::NegotiationError(err_msg)
                    })
            };
        }

        // kex and host key are mandatory, no fallback exists
        let kex = match_field!(self, other, key_exchange, "DH algorithm")?;
        let pubkey = match_field!(self, other, public_key, "signature algorithm")?;

        let c_enc = match_field_or_none!(
            self,
            other,
            c_encryption,
            Enc::None,
            "client encryption algorithm"
        )?;
        let s_enc = match_field_or_none!(
            self,
            other,
            s_encryption,
            Enc::None,
            "server encryption algorithm"
        )?;

        let c_mac = match_field_or_none!(self, other, c_mac, Mac::None, "client mac algorithm")?;
        let s_mac = match_field_or_none!(self, other, s_mac, Mac::None, "server mac algorithm")?;

        let c_compress = match_field_or_none!(
            self,
            other,
            c_compress,
            Compress::None,
            "client compression algorithm"
        )?;
        let s_compress = match_field_or_none!(
            self,
            other,
            s_compress,
            Compress::None,
            "server compression algorithm"
        )?;

        let c_lang = match_field_or_none!(self, other, c_lang, Lang::None, "client language")?;
        let s_lang = match_field_or_none!(self, other, s_lang, Lang::None, "server language")?;

        let negotiated = Self {
            key_exchange: vec![kex].into(),
            public_key: vec![pubkey].into(),
            c_encryption: vec![c_enc].into(),
            s_encryption: vec![s_enc].into(),
            c_mac: vec![c_mac].into(),
            s_mac: vec![s_mac].into(),
            c_compress: vec![c_compress].into(),
            s_compress: vec![s_compress].into(),
            c_lang: vec![c_lang].into(),
            s_lang: vec![s_lang].into(),
            first_kex_packet_follows: false,
        };

        info!("matched algorithms [{:?}]", negotiated);

        Ok(negotiated)
    }

    /// True when the peer's announced guess (the first entries of its
    /// kex and host-key lists) matches the negotiated suite.
    pub(crate) fn guessed_right(&self, negotiated: &Self) -> bool {
        self.key_exchange.first() == negotiated.key_exchange.first()
            && self.public_key.first() == negotiated.public_key.first()
    }

    fn as_i(&self) -> Vec<u8> {
        let mut data = Data::new();
        data.put_str(&self.key_exchange.to_string());
        data.put_str(&self.public_key.to_string());
        data.put_str(&self.c_encryption.to_string());
        data.put_str(&self.s_encryption.to_string());
        data.put_str(&self.c_mac.to_string());
        data.put_str(&self.s_mac.to_string());
        data.put_str(&self.c_compress.to_string());
        data.put_str(&self.s_compress.to_string());
        data.put_str(&self.c_lang.to_string());
        data.put_str(&self.s_lang.to_string());
        data.to_vec()
    }

    /// Build the local SSH_MSG_KEXINIT payload.
    pub fn pack(&self) -> Data {
        info!("client algorithms: [{:?}]", self);
        let mut data = Data::new();
        data.put_u8(ssh_msg_code::SSH_MSG_KEXINIT);
        data.extend(util::cookie());
        data.extend(self.as_i());
        data.put_u8(false as u8).put_u32(0_u32);
        data
    }
}
