use std::fmt;
use url::Url;

use crate::types::{Result, Scheme};

/// Scheme and authority a client used to reach the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    base: Url,
}

impl BaseUrl {
    /// `host` may carry a port
    pub fn new(scheme: Scheme, host: &str) -> Result<Self> {
        let base = Url::parse(&format!("{}://{}", scheme, host))?;
        Ok(Self { base })
    }

    /// Absolute URL for the server-relative `path`
    pub fn join(&self, path: &str) -> String {
        let mut url = self.base.clone();
        url.set_path(path);
        url.to_string()
    }

    pub fn scheme(&self) -> &str {
        self.base.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.base.host_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())
    }
}
