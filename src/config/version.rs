use tracing::*;

use crate::constant::CLIENT_VERSION;
use crate::error::{SshError, SshResult};

type OurVer = String;
type ServerVer = String;

/// The identification strings both sides exchanged before key exchange
/// starts. The transport layer performs that exchange; key exchange
/// only needs the strings, CR and LF excluded, for the hash transcript.
#[derive(Debug, Clone)]
pub enum SshVersion {
    V1,
    V2(OurVer, ServerVer),
    Unknown,
}

impl Default for SshVersion {
    fn default() -> Self {
        SshVersion::Unknown
    }
}

impl SshVersion {
    /// Pair our fixed identification string with the one the server
    /// announced.
    pub fn from_server(server: &str) -> Self {
        SshVersion::V2(CLIENT_VERSION.to_string(), server.to_string())
    }

    pub fn validate(&self) -> SshResult<()> {
        if let SshVersion::V2(_, _) = self {
            info!("version negotiation was successful.");
            Ok(())
        } else {
            let err_msg = "error in version negotiation, version mismatch.";
            error!(err_msg);
            Err(SshError::VersionError(err_msg.to_string()))
        }
    }
}
