use std::time::Duration;

use crate::error::SshResult;
use crate::model::Data;

/// ## Binary Packet Protocol
///
/// <https://www.rfc-editor.org/rfc/rfc4253#section-6>
///
/// The framing, padding, MAC and cipher handling of the binary packet
/// protocol live below this crate. What key exchange needs from that
/// layer is the ability to move one plaintext payload at a time, so the
/// session hands us this trait instead of a raw stream.
///
/// `recv` blocks until a full packet payload is available. When the
/// caller supplied a deadline the implementation must give up once it
/// expires and return [`SshError::TimeoutError`](crate::SshError),
/// never hang forever.
pub trait Transport {
    /// Send one packet payload to the peer.
    fn send(&mut self, payload: Data) -> SshResult<()>;

    /// Block until the next packet payload arrives, or the deadline
    /// passes.
    fn recv(&mut self, timeout: Option<Duration>) -> SshResult<Data>;
}
