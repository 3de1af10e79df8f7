pub mod algorithm;
pub mod version;

use std::time::Duration;

pub use algorithm::AlgList;
pub use version::SshVersion;

#[derive(Clone)]
pub struct Config {
    pub ver: SshVersion,
    pub algs: AlgList,
    /// deadline for every blocking packet read
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algs: AlgList::client_default(),
            ver: SshVersion::default(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl Config {
    // use an empty client algorithm list
    pub fn disable_default() -> Self {
        Self {
            algs: AlgList::new(),
            ver: SshVersion::default(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}
