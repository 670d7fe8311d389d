//! Network masks
//!
//! A [`NetMask`] is an address plus prefix length. It accepts the forms
//! `10.0.0.1` (single host), `10.0.0.0/8`, `10.0.0.0/255.0.0.0` and the IPv6
//! equivalents.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use thiserror::Error;

/// Error raised when a network mask expression is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct NetMaskError {
    reason: String,
}

impl NetMaskError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A validated network range used to match client addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetMask(IpNetwork);

impl NetMask {
    /// Prefix length in bits
    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    /// Check whether `ip` lies inside this range
    ///
    /// An IPv4 mask never matches an IPv6 address and vice versa.
    pub fn contains(&self, ip: IpAddr) -> bool {
        self.0.contains(ip)
    }
}

impl FromStr for NetMask {
    type Err = NetMaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NetMaskError::new("empty network mask"));
        }

        IpNetwork::from_str(s)
            .map(NetMask)
            .map_err(|e| NetMaskError::new(e.to_string()))
    }
}

impl fmt::Display for NetMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.ip(), self.0.prefix())
    }
}
