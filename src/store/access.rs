//! Allow-list state guarded by the store
//!
//! The raw specification and the matchers derived from it always change
//! together; the store keeps one [`AllowList`] behind one mutex.

use std::net::IpAddr;
use std::sync::Arc;

use log::{debug, warn};

use crate::access::{self, NetMask};

/// The allow-list as seen at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessListSnapshot {
    /// Comma separated specification
    pub raw: String,
    /// Matchers parsed from `raw`
    pub matchers: Arc<[NetMask]>,
}

impl AccessListSnapshot {
    /// Check `ip` against the matchers
    pub fn allows(&self, ip: IpAddr) -> bool {
        access::matches(&self.matchers, ip)
    }
}

#[derive(Debug)]
pub(crate) struct AllowList {
    raw: String,
    matchers: Arc<[NetMask]>,
}

impl AllowList {
    /// Matchers are built on first read
    pub(crate) fn new(raw: String) -> Self {
        Self {
            raw,
            matchers: Arc::from(Vec::new()),
        }
    }

    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    /// Replace the specification and rebuild the matchers
    pub(crate) fn set(&mut self, raw: String) {
        self.raw = raw;
        for diagnostic in self.rebuild() {
            warn!("Ignoring allow-list entry {}", diagnostic);
        }
    }

    /// Current matchers, rebuilt from the specification when empty
    ///
    /// An empty list is rebuilt on every read, whether it was never built or
    /// the specification really yields nothing.
    pub(crate) fn matchers(&mut self) -> Arc<[NetMask]> {
        if self.matchers.is_empty() {
            debug!("Building allow-list matchers from '{}'", self.raw);
            let rejected = self.rebuild();
            if !rejected.is_empty() {
                debug!("{} allow-list entries rejected", rejected.len());
            }
        }
        Arc::clone(&self.matchers)
    }

    pub(crate) fn snapshot(&mut self) -> AccessListSnapshot {
        let matchers = self.matchers();
        AccessListSnapshot {
            raw: self.raw.clone(),
            matchers,
        }
    }

    fn rebuild(&mut self) -> Vec<String> {
        let parsed = access::parse(&self.raw);
        self.matchers = Arc::from(parsed.matchers);
        parsed.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_build() {
        let mut list = AllowList::new("10.0.0.0/8".to_string());
        assert!(list.matchers.is_empty());
        assert_eq!(list.matchers().len(), 1);
    }

    #[test]
    fn test_set_rebuilds() {
        let mut list = AllowList::new("127.0.0.1".to_string());
        list.set("192.168.0.0/16, bogus".to_string());
        assert_eq!(list.raw(), "192.168.0.0/16, bogus");
        let snapshot = list.snapshot();
        assert_eq!(snapshot.matchers.len(), 1);
        assert!(snapshot.allows("192.168.10.20".parse().unwrap()));
        assert!(!snapshot.allows("127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_empty_specification_stays_empty() {
        let mut list = AllowList::new(String::new());
        assert!(list.matchers().is_empty());
        assert!(list.matchers().is_empty());
    }
}
