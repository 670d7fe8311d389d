//! Encoder ladder state guarded by the store
//!
//! Holds the serialised ladder and the decoded rungs. Every write goes through
//! `set_raw` or `set_rungs`, which keep the two forms consistent.

use std::sync::Arc;

use log::debug;

use crate::encoder::{self, EncoderRung, MalformedEncoderSpec};

#[derive(Debug, Default)]
pub(crate) struct LadderCache {
    raw: Option<String>,
    rungs: Option<Arc<[EncoderRung]>>,
}

impl LadderCache {
    pub(crate) fn new(raw: Option<String>) -> Self {
        Self { raw, rungs: None }
    }

    pub(crate) fn raw(&self) -> Option<String> {
        self.raw.clone()
    }

    /// Replace the serialised form; the rungs are decoded again on next read
    pub(crate) fn set_raw(&mut self, raw: Option<String>) {
        self.raw = raw;
        self.rungs = None;
    }

    /// Replace the rungs and re-serialise them
    ///
    /// Clearing the ladder leaves an empty serialised form.
    pub(crate) fn set_rungs(&mut self, rungs: Option<Vec<EncoderRung>>) {
        self.raw = Some(encoder::encode(rungs.as_deref().unwrap_or(&[])));
        self.rungs = rungs.map(Arc::from);
    }

    /// Cached rungs, decoded from the serialised form when absent
    ///
    /// A decoding failure leaves the cache empty.
    pub(crate) fn rungs(&mut self) -> Result<Option<Arc<[EncoderRung]>>, MalformedEncoderSpec> {
        if let Some(rungs) = &self.rungs {
            return Ok(Some(Arc::clone(rungs)));
        }

        match self.raw.as_deref() {
            Some(raw) if !raw.is_empty() => {
                let rungs: Arc<[EncoderRung]> = Arc::from(encoder::decode(raw)?);
                debug!("Decoded {} encoder rung(s) from '{}'", rungs.len(), raw);
                self.rungs = Some(Arc::clone(&rungs));
                Ok(Some(rungs))
            }
            _ => Ok(None),
        }
    }

    /// Drop the decoded rungs, keeping the serialised form
    pub(crate) fn clear_rungs(&mut self) {
        self.rungs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_on_first_read() {
        let mut cache = LadderCache::new(Some("360,600000,64000".to_string()));
        let rungs = cache.rungs().unwrap().unwrap();
        assert_eq!(&*rungs, &[EncoderRung::new(360, 600_000, 64_000)]);
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(LadderCache::new(None).rungs().unwrap(), None);
        assert_eq!(LadderCache::new(Some(String::new())).rungs().unwrap(), None);
    }

    #[test]
    fn test_set_rungs_keeps_forms_in_sync() {
        let mut cache = LadderCache::default();
        cache.set_rungs(Some(vec![EncoderRung::new(720, 1_500_000, 128_000)]));
        assert_eq!(cache.raw().as_deref(), Some("720,1500000,128000"));

        cache.set_rungs(None);
        assert_eq!(cache.raw().as_deref(), Some(""));
        assert_eq!(cache.rungs().unwrap(), None);
    }

    #[test]
    fn test_set_raw_invalidates() {
        let mut cache = LadderCache::new(Some("360,600000,64000".to_string()));
        cache.rungs().unwrap();
        cache.set_raw(Some("480,abc,128000".to_string()));
        assert!(cache.rungs().is_err());
    }
}
