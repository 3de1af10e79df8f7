#[allow(clippy::module_inception)]
mod hash;
mod hash_ctx;
mod hash_type;

pub use hash::Keys;
pub(crate) use hash_ctx::HashCtx;
pub use hash_type::HashType;

use ring::digest::{Context, SHA1_FOR_LEGACY_USE_ONLY, SHA256};

/// Digest `data` with the negotiated hash in one scoped
/// init/process/finalize pass. The output vector is sized by the
/// algorithm, so callers never have to pre-allocate.
pub(crate) fn digest(data: &[u8], hash_type: HashType) -> Vec<u8> {
    let mut ctx = match hash_type {
        HashType::SHA1 => Context::new(&SHA1_FOR_LEGACY_USE_ONLY),
        HashType::SHA256 => Context::new(&SHA256),
    };
    ctx.update(data);
    ctx.finish().as_ref().to_vec()
}
