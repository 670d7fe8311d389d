//! Allow-list parsing
//!
//! Turns a comma separated list of network masks into matchers. Parsing is
//! best effort: a bad entry is reported and skipped, the rest still apply.

use std::net::IpAddr;

use log::debug;

use super::netmask::NetMask;

/// Result of parsing an allow-list specification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAccessList {
    /// Valid entries, in specification order
    pub matchers: Vec<NetMask>,
    /// One message per rejected entry, formatted as `<entry>: <reason>`
    pub diagnostics: Vec<String>,
}

impl ParsedAccessList {
    /// Whether every entry of the specification was accepted
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a comma separated allow-list
///
/// Whitespace around entries is ignored, trailing empty entries are dropped.
/// An empty specification yields no matchers and no diagnostics. Never fails.
pub fn parse(spec: &str) -> ParsedAccessList {
    let mut parsed = ParsedAccessList::default();

    if spec.trim().is_empty() {
        return parsed;
    }

    let mut tokens: Vec<&str> = spec.split(',').map(str::trim).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    for token in tokens {
        match token.parse::<NetMask>() {
            Ok(mask) => parsed.matchers.push(mask),
            Err(e) => parsed.diagnostics.push(format!("{}: {}", token, e)),
        }
    }

    debug!(
        "Parsed allow-list '{}': {} matcher(s), {} rejected",
        spec,
        parsed.matchers.len(),
        parsed.diagnostics.len()
    );

    parsed
}

/// Check whether `candidate` is inside any of `matchers`
///
/// An empty matcher list matches nothing.
pub fn matches(matchers: &[NetMask], candidate: IpAddr) -> bool {
    matchers.iter().any(|mask| mask.contains(candidate))
}
