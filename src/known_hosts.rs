use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use tracing::*;

use crate::algorithm::hash::{self, HashType};
use crate::algorithm::public_key;
use crate::constant::MIN_RSA_KEY_BITS;
use crate::error::{SshError, SshResult};

/// Outcome of checking one presented host key against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustDecision {
    /// no record for this host and algorithm
    Unknown,
    Trusted,
    /// a record exists and its key differs from the presented one
    Mismatched,
    UserRejected,
}

/// Asks whether an unknown host key should be accepted.
///
/// The default implementation prompts on the controlling terminal;
/// embedders that cannot prompt supply their own answer source.
pub trait HostConfirm {
    fn confirm(&mut self, host: &str, fingerprint: &str) -> SshResult<bool>;
}

/// Interactive yes/no on `/dev/tty`, falling back to stdin.
pub struct TtyConfirm;

impl HostConfirm for TtyConfirm {
    fn confirm(&mut self, host: &str, fingerprint: &str) -> SshResult<bool> {
        eprintln!(
            "The host: {} with fingerprint: {}\n\
             is not present in the known hosts file.\n\
             Are you sure you want to proceed? (y/n)",
            host, fingerprint
        );

        let mut line = String::new();
        match File::open("/dev/tty") {
            Ok(tty) => {
                BufReader::new(tty).read_line(&mut line)?;
            }
            Err(_) => {
                io::stdin().read_line(&mut line)?;
            }
        }

        let answer = line.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

/// OpenSSH-style fingerprint of a host-key blob.
pub fn fingerprint(key: &[u8]) -> String {
    let digest = hash::digest(key, HashType::SHA256);
    format!("SHA256:{}", STANDARD_NO_PAD.encode(digest))
}

/// Trust-on-first-use host-key verification against an append-only
/// store of `host algorithm base64(key)` lines.
pub struct HostVerifier {
    host: String,
    path: PathBuf,
    min_rsa_bits: u64,
    confirm: Box<dyn HostConfirm>,
}

impl HostVerifier {
    pub fn new<S: Into<String>>(host: S) -> Self {
        HostVerifier {
            host: host.into(),
            path: default_path(),
            min_rsa_bits: MIN_RSA_KEY_BITS,
            confirm: Box::new(TtyConfirm),
        }
    }

    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    pub fn min_rsa_bits(mut self, bits: u64) -> Self {
        self.min_rsa_bits = bits;
        self
    }

    pub fn confirm_with(mut self, confirm: Box<dyn HostConfirm>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Check the presented host key.
    ///
    /// Keys below the strength floor fail before any store access. An
    /// unreachable store degrades to first-use confirmation without a
    /// stored comparison; it never kills the connection on its own.
    pub fn verify(&mut self, algo: &str, key: &[u8]) -> SshResult<TrustDecision> {
        if algo.contains("rsa") {
            let bits = public_key::rsa_mod_bits(key)?;
            if bits < self.min_rsa_bits {
                error!("RSA host key too short: {} bits", bits);
                return Err(SshError::WeakHostKey(bits));
            }
        }

        let encoded = STANDARD.encode(key);
        let mut store = match self.open_db() {
            Ok(f) => Some(f),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        if let Some(file) = &store {
            match lookup(file, &self.host, algo, &encoded)? {
                TrustDecision::Trusted => {
                    info!("host [{}] found in the known hosts file.", self.host);
                    return Ok(TrustDecision::Trusted);
                }
                TrustDecision::Mismatched => {
                    error!(
                        "host key for [{}] differs from the stored one, possible MITM!",
                        self.host
                    );
                    return Ok(TrustDecision::Mismatched);
                }
                _ => {}
            }
        }

        // first contact with this host and algorithm
        let fp = fingerprint(key);
        if !self.confirm.confirm(&self.host, &fp)? {
            return Ok(TrustDecision::UserRejected);
        }

        if let Some(file) = &mut store {
            if let Err(e) = writeln!(file, "{} {} {}", self.host, algo, encoded) {
                warn!("could not record the host key: {}", e);
            }
        }
        Ok(TrustDecision::Trusted)
    }

    /// Open for reading and appending, creating the file and its parent
    /// directory when absent. A store that refuses writes is reopened
    /// read-only.
    fn open_db(&self) -> SshResult<File> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .map_err(|e| SshError::TrustStoreUnavailable(e.to_string()))?;
            }
        }

        match OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
        {
            Ok(f) => Ok(f),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                info!(
                    "could not open {} for writing, retrying read-only",
                    self.path.display()
                );
                File::open(&self.path).map_err(|e| SshError::TrustStoreUnavailable(e.to_string()))
            }
            Err(e) => Err(SshError::TrustStoreUnavailable(e.to_string())),
        }
    }
}

fn lookup(file: &File, host: &str, algo: &str, encoded: &str) -> SshResult<TrustDecision> {
    let mut mismatched = false;
    for line in BufReader::new(file).lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let (Some(h), Some(a), Some(k)) = (fields.next(), fields.next(), fields.next()) else {
            continue;
        };
        if h != host || a != algo {
            continue;
        }
        if k == encoded {
            return Ok(TrustDecision::Trusted);
        }
        mismatched = true;
    }
    if mismatched {
        Ok(TrustDecision::Mismatched)
    } else {
        Ok(TrustDecision::Unknown)
    }
}

fn default_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".ssh").join("known_hosts"),
        Err(_) => {
            warn!("could not determine the home folder of the current user");
            PathBuf::from(".ssh").join("known_hosts")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::model::Data;

    struct Yes;
    impl HostConfirm for Yes {
        fn confirm(&mut self, _: &str, _: &str) -> SshResult<bool> {
            Ok(true)
        }
    }

    struct No;
    impl HostConfirm for No {
        fn confirm(&mut self, _: &str, _: &str) -> SshResult<bool> {
            Ok(false)
        }
    }

    struct NeverAsk;
    impl HostConfirm for NeverAsk {
        fn confirm(&mut self, host: &str, _: &str) -> SshResult<bool> {
            panic!("unexpected prompt for {}", host);
        }
    }

    fn temp_store() -> PathBuf {
        static N: AtomicU32 = AtomicU32::new(0);
        std::env::temp_dir().join(format!(
            "ssh_kex_known_hosts_{}_{}",
            std::process::id(),
            N.fetch_add(1, Ordering::Relaxed)
        ))
    }

    fn rsa_blob(filler: u8) -> Vec<u8> {
        // top bit set keeps the modulus at a full 2048 bits
        let mut n = vec![0xAB_u8];
        n.extend([filler; 255]);
        let mut blob = Data::new();
        blob.put_str("ssh-rsa");
        blob.put_mpint(&[0x01, 0x00, 0x01]);
        blob.put_mpint(&n);
        blob.into_inner()
    }

    #[test]
    fn first_use_appends_and_later_lookups_skip_the_prompt() {
        let path = temp_store();
        let key = rsa_blob(0x42);

        let mut verifier = HostVerifier::new("203.0.113.7")
            .path(&path)
            .confirm_with(Box::new(Yes));
        assert_eq!(
            verifier.verify("ssh-rsa", &key).unwrap(),
            TrustDecision::Trusted
        );

        let mut verifier = HostVerifier::new("203.0.113.7")
            .path(&path)
            .confirm_with(Box::new(NeverAsk));
        assert_eq!(
            verifier.verify("ssh-rsa", &key).unwrap(),
            TrustDecision::Trusted
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn changed_key_is_a_mismatch() {
        let path = temp_store();
        let mut verifier = HostVerifier::new("203.0.113.8")
            .path(&path)
            .confirm_with(Box::new(Yes));
        verifier.verify("ssh-rsa", &rsa_blob(0x42)).unwrap();

        let mut verifier = HostVerifier::new("203.0.113.8")
            .path(&path)
            .confirm_with(Box::new(NeverAsk));
        assert_eq!(
            verifier.verify("ssh-rsa", &rsa_blob(0x43)).unwrap(),
            TrustDecision::Mismatched
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejection_stores_nothing() {
        let path = temp_store();
        let mut verifier = HostVerifier::new("203.0.113.9")
            .path(&path)
            .confirm_with(Box::new(No));
        assert_eq!(
            verifier.verify("ssh-rsa", &rsa_blob(0x42)).unwrap(),
            TrustDecision::UserRejected
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn weak_rsa_key_is_refused_before_any_lookup() {
        let mut blob = Data::new();
        blob.put_str("ssh-rsa");
        blob.put_mpint(&[0x01, 0x00, 0x01]);
        blob.put_mpint(&[0x80; 128]); // 1024 bits, below the floor
        let mut verifier = HostVerifier::new("203.0.113.10")
            .path(temp_store())
            .confirm_with(Box::new(NeverAsk));
        assert!(matches!(
            verifier.verify("ssh-rsa", &blob).unwrap_err(),
            SshError::WeakHostKey(1024)
        ));
    }

    #[test]
    fn unreachable_store_degrades_to_interactive_only() {
        // a file where a directory should be makes the store unreachable
        let blocker = temp_store();
        fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("known_hosts");

        let mut verifier = HostVerifier::new("203.0.113.11")
            .path(&path)
            .confirm_with(Box::new(Yes));
        assert_eq!(
            verifier.verify("ssh-rsa", &rsa_blob(0x42)).unwrap(),
            TrustDecision::Trusted
        );
        assert!(!path.exists());
        let _ = fs::remove_file(blocker);
    }

    #[test]
    fn records_are_scoped_by_algorithm() {
        let path = temp_store();
        let key = rsa_blob(0x42);
        let mut verifier = HostVerifier::new("203.0.113.12")
            .path(&path)
            .confirm_with(Box::new(Yes));
        verifier.verify("ssh-rsa", &key).unwrap();

        // same host, other algorithm name: first use again
        let mut verifier = HostVerifier::new("203.0.113.12")
            .path(&path)
            .confirm_with(Box::new(No));
        assert_eq!(
            verifier.verify("rsa-sha2-256", &key).unwrap(),
            TrustDecision::UserRejected
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn fingerprint_shape() {
        let fp = fingerprint(b"blob");
        assert!(fp.starts_with("SHA256:"));
        assert!(!fp.ends_with('='));
    }
}
