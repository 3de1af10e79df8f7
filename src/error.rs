use std::io;
use thiserror::Error;

pub type SshResult<T> = Result<T, SshError>;

#[derive(Debug, Error)]
pub enum SshError {
    /// messages that arrive out of order or with an unexpected id
    #[error("Protocol violation: {0}")]
    ProtocolError(String),
    /// no common algorithm in a mandatory category
    #[error("Key negotiation failed: {0}")]
    NegotiationError(String),
    /// a cryptographic primitive refused to cooperate
    #[error("Crypto computation error: {0}")]
    CryptoError(String),
    /// the peer sent a degenerate or out-of-range DH public value
    #[error("Invalid DH public value from the peer")]
    InvalidPublicValue,
    /// the signature over the exchange hash does not check out
    #[error("Host key signature verification failed")]
    InvalidSignature,
    /// the stored host key differs from the one presented
    #[error("Host key mismatch for [{0}]")]
    HostKeyMismatch(String),
    #[error("Host key rejected by the user")]
    HostKeyRejected,
    #[error("Host key below the strength floor: {0} bits")]
    WeakHostKey(u64),
    /// the known hosts file cannot be opened; verification degrades
    /// to interactive-only instead of failing the connection
    #[error("Trust store unavailable: {0}")]
    TrustStoreUnavailable(String),
    #[error("Version dismatch: {0}")]
    VersionError(String),
    #[error("Timeout")]
    TimeoutError,
    #[error("Unable to parse data: {0}")]
    DataFormatError(String),
    #[error(transparent)]
    IoError(#[from] io::Error),
}
