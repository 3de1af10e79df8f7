//! Dependencies
//! ```toml
//! ssh-kex-rs = "*"
//! ```
//!
//! The key-exchange core of an SSH-2.0 client: KEXINIT negotiation,
//! fixed-group Diffie-Hellman, the exchange hash, and trust-on-first-use
//! host-key verification. Packet framing, ciphers and channels live in
//! the surrounding session; this crate talks to them through the
//! [`Transport`] trait and hands back the derived
//! [`Keys`](algorithm::hash::Keys).
//!
//! Quick example:
//!
//! ```no_run
//! use std::time::Duration;
//! use ssh_kex::{Client, Config, Data, HostVerifier, SshResult, SshVersion, Transport};
//!
//! // the session's packet layer, reduced to payload in / payload out
//! struct Session {/* framing, ciphers, socket */}
//!
//! impl Transport for Session {
//!     fn send(&mut self, payload: Data) -> SshResult<()> {
//!         /* frame, encrypt, write */
//!         Ok(())
//!     }
//!     fn recv(&mut self, timeout: Option<Duration>) -> SshResult<Data> {
//!         /* read, decrypt, unframe */
//!         unimplemented!()
//!     }
//! }
//!
//! fn main() -> SshResult<()> {
//!     let mut config = Config::default();
//!     // identification strings from the version exchange
//!     config.ver = SshVersion::V2(
//!         "SSH-2.0-SSH_KEX_RS-0.1.0".to_string(),
//!         "SSH-2.0-OpenSSH_8.9".to_string(),
//!     );
//!
//!     let mut session = Session {};
//!     let mut client = Client::new(config);
//!     let mut verifier = HostVerifier::new("192.0.2.1");
//!     client.key_agreement(&mut session, &mut verifier)?;
//!
//!     // hand the derived keys to the transport layer
//!     let keys = client.take_keys().unwrap();
//!     let (ck, sk) = keys.mix_ek(32);
//!     Ok(())
//! }
//! ```

pub mod algorithm;
mod client;
mod config;
mod constant;
pub mod error;
mod known_hosts;
mod model;
mod util;

pub use client::{Client, KexState};
pub use config::{algorithm::AlgList, version::SshVersion, Config};
pub use error::{SshError, SshResult};
pub use known_hosts::{fingerprint, HostConfirm, HostVerifier, TrustDecision, TtyConfirm};
pub use model::{Data, Transport};
