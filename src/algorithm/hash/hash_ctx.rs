use zeroize::Zeroize;

use crate::model::Data;

/// <https://www.rfc-editor.org/rfc/rfc4253#section-8>
///
/// The key exchange produces two values: a shared secret K, and an
/// exchange hash H.  Encryption and authentication keys are derived from
/// these.  The exchange hash H from the first key exchange is
/// additionally used as the session identifier, which is a unique
/// identifier for this connection.  Once computed, the session
/// identifier is not changed, even if keys are later re-exchanged.
///
/// H = hash(V_C || V_S || I_C || I_S || K_S || e || f || K)
///
/// Every field is stored here already encoded: the identification and
/// KEXINIT payloads as strings, the host key as a string, e, f and K as
/// mpints. `as_bytes` is therefore a plain concatenation.
#[derive(Clone, Default)]
pub struct HashCtx {
    /// string    V_C, the client's identification string (CR and LF excluded)
    pub v_c: Vec<u8>,
    /// string    V_S, the server's identification string (CR and LF excluded)
    pub v_s: Vec<u8>,

    /// string    I_C, the payload of the client's SSH_MSG_KEXINIT
    pub i_c: Vec<u8>,
    /// string    I_S, the payload of the server's SSH_MSG_KEXINIT
    pub i_s: Vec<u8>,

    /// string    K_S, the host key
    pub k_s: Vec<u8>,

    /// mpint     e, exchange value sent by the client
    pub e: Vec<u8>,
    /// mpint     f, exchange value sent by the server
    pub f: Vec<u8>,

    /// mpint     K, the shared secret
    pub k: Vec<u8>,
}

impl HashCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_v_c(&mut self, vc: &str) {
        let mut data = Data::new();
        data.put_str(vc);
        self.v_c = data.to_vec();
    }
    pub fn set_v_s(&mut self, vs: &str) {
        let mut data = Data::new();
        data.put_str(vs);
        self.v_s = data.to_vec();
    }
    pub fn set_i_c(&mut self, ic: &[u8]) {
        let mut data = Data::new();
        data.put_u8s(ic);
        self.i_c = data.to_vec();
    }
    pub fn set_i_s(&mut self, is: &[u8]) {
        let mut data = Data::new();
        data.put_u8s(is);
        self.i_s = data.to_vec();
    }
    pub fn set_k_s(&mut self, ks: &[u8]) {
        let mut data = Data::new();
        data.put_u8s(ks);
        self.k_s = data.to_vec();
    }
    pub fn set_e(&mut self, e: &[u8]) {
        let mut data = Data::new();
        data.put_mpint(e);
        self.e = data.to_vec();
    }
    pub fn set_f(&mut self, f: &[u8]) {
        let mut data = Data::new();
        data.put_mpint(f);
        self.f = data.to_vec();
    }
    pub fn set_k(&mut self, k: &[u8]) {
        let mut data = Data::new();
        data.put_mpint(k);
        self.k = data.to_vec();
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut v = vec![];
        v.extend(&self.v_c);
        v.extend(&self.v_s);
        v.extend(&self.i_c);
        v.extend(&self.i_s);
        v.extend(&self.k_s);
        v.extend(&self.e);
        v.extend(&self.f);
        v.extend(&self.k);
        v
    }
}

impl Drop for HashCtx {
    fn drop(&mut self) {
        self.k.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::HashCtx;
    use crate::algorithm::hash::{digest, HashType};

    fn sample_ctx() -> HashCtx {
        let mut ctx = HashCtx::new();
        ctx.set_v_c("SSH-2.0-client");
        ctx.set_v_s("SSH-2.0-server");
        ctx.set_i_c(&[20, 1, 2, 3]);
        ctx.set_i_s(&[20, 4, 5, 6]);
        ctx.set_k_s(&[0, 0, 0, 7, b's', b's', b'h', b'-', b'r', b's', b'a']);
        ctx.set_e(&[0x11, 0x22]);
        ctx.set_f(&[0x33, 0x44]);
        ctx.set_k(&[0x55, 0x66]);
        ctx
    }

    #[test]
    fn deterministic_for_identical_transcripts() {
        let a = digest(&sample_ctx().as_bytes(), HashType::SHA1);
        let b = digest(&sample_ctx().as_bytes(), HashType::SHA1);
        assert_eq!(a, b);
    }

    #[test]
    fn any_field_change_changes_the_hash() {
        let base = digest(&sample_ctx().as_bytes(), HashType::SHA256);

        let mut ctx = sample_ctx();
        ctx.set_v_s("SSH-2.0-other");
        assert_ne!(base, digest(&ctx.as_bytes(), HashType::SHA256));

        let mut ctx = sample_ctx();
        ctx.set_f(&[0x33, 0x45]);
        assert_ne!(base, digest(&ctx.as_bytes(), HashType::SHA256));

        let mut ctx = sample_ctx();
        ctx.set_k(&[0x55, 0x67]);
        assert_ne!(base, digest(&ctx.as_bytes(), HashType::SHA256));
    }

    #[test]
    fn secret_fields_are_mpint_encoded() {
        let mut ctx = HashCtx::new();
        ctx.set_k(&[0x80]);
        // sign guard byte in front of a high-bit first byte
        assert_eq!(ctx.k, vec![0, 0, 0, 2, 0x00, 0x80]);
    }
}
