mod client_kex;

use crate::algorithm::hash::Keys;
use crate::config::{AlgList, Config};
use crate::model::Data;

/// Progress of the key exchange on this connection.
///
/// The coordinator refuses to interpret any KEX message that does not
/// belong to the current state, whatever the transport below may have
/// pipelined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KexState {
    Idle,
    /// our KEXINIT is out and the remote one has been consumed
    KexInitExchanged,
    NegotiationComplete,
    DhInitSent,
    /// host key and DH reply checked out
    DhReplyVerified,
    NewKeysExchanged,
    Failed,
}

/// The key-exchange context of one connection.
///
/// Holds everything the handshake needs from the session: the immutable
/// algorithm registry and version strings, the negotiated suite, the
/// session identifier latched by the first exchange, and the derived
/// keys parked for the session to install.
pub struct Client {
    pub(crate) config: Config,
    pub(crate) negotiated: AlgList,
    /// session id
    /// 只使用第一次密钥交换生成的
    pub(crate) session_id: Vec<u8>,
    pub(crate) kex_state: KexState,
    pub(crate) buffered: Option<Data>,
    pub(crate) keys: Option<Keys>,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            negotiated: AlgList::new(),
            session_id: vec![],
            kex_state: KexState::Idle,
            buffered: None,
            keys: None,
        }
    }

    pub fn kex_state(&self) -> KexState {
        self.kex_state
    }

    /// The exchange hash of the first key exchange; empty before the
    /// handshake completes, stable across re-keys after it.
    pub fn session_id(&self) -> &[u8] {
        &self.session_id
    }

    pub fn negotiated(&self) -> &AlgList {
        &self.negotiated
    }

    /// Stash a packet the session pulled off the wire before key
    /// exchange started; the coordinator consumes it in place of its
    /// first read.
    pub fn buffer_packet(&mut self, payload: Data) {
        self.buffered = Some(payload);
    }

    /// The per-direction keys derived by the last completed exchange.
    /// Taking them is the session's cue to switch cipher contexts.
    pub fn take_keys(&mut self) -> Option<Keys> {
        self.keys.take()
    }
}
