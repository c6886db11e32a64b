//! Hash-to-label registry.
//!
//! The filesystem tables only carry hashes; listing an archive needs
//! the reverse mapping back to path strings. The registry is loaded
//! once from a community-maintained label list and can be reloaded at
//! any time without invalidating open archives (only the rendered
//! strings change, never the raw tables).

use crate::hash40::Hash40;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Default)]
struct LabelMap {
    /// Combined 40-bit key -> label, for lookups with a length hint.
    by_hash40: HashMap<u64, String>,
    /// CRC-only key -> label, for fields that store no length.
    by_crc: HashMap<u32, String>,
}

impl LabelMap {
    fn insert(&mut self, label: &str) {
        let h = Hash40::of(label);
        self.by_hash40.insert(h.0, label.to_owned());
        self.by_crc.entry(h.crc()).or_insert_with(|| label.to_owned());
    }
}

/// Lazily initialized, reloadable hash-to-label registry.
///
/// First use is single-flight: concurrent callers of
/// [`ensure_init`](Self::ensure_init) block until one loader has
/// completed, and the loader runs exactly once.
#[derive(Default)]
pub struct HashLabels {
    map: RwLock<Option<LabelMap>>,
}

impl HashLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a label list has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.map.read().is_some()
    }

    /// Loads the registry from an iterator of labels if it has not
    /// been loaded yet.
    ///
    /// Double-checked under the write lock so that exactly one caller
    /// performs the load; late arrivals see the finished map.
    pub fn ensure_init<I, S>(&self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.map.read().is_some() {
            return;
        }
        let mut guard = self.map.write();
        if guard.is_some() {
            return;
        }
        *guard = Some(Self::build(labels));
    }

    /// Replaces the registry contents, e.g. after a dictionary update.
    ///
    /// Open archives keep their raw tables; only subsequently rendered
    /// path strings pick up the new labels.
    pub fn reload<I, S>(&self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map = Self::build(labels);
        *self.map.write() = Some(map);
    }

    fn build<I, S>(labels: I) -> LabelMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = LabelMap::default();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || label.starts_with("0x") {
                continue;
            }
            map.insert(label);
        }
        debug!("loaded {} labels", map.by_hash40.len());
        map
    }

    /// Appends a single label to an already-loaded registry.
    pub fn insert(&self, label: &str) {
        let mut guard = self.map.write();
        match guard.as_mut() {
            Some(map) => map.insert(label),
            None => {
                let mut map = LabelMap::default();
                map.insert(label);
                *guard = Some(map);
            }
        }
    }

    /// Resolves a hash to its label.
    ///
    /// With a non-zero `length_hint` the combined 40-bit key is looked
    /// up; with zero, the CRC-only map. Unknown hashes render as a
    /// `0x…` placeholder (the 40-bit value when the length is known,
    /// the bare CRC otherwise), which callers use to detect unresolved
    /// names.
    pub fn resolve(&self, crc: u32, length_hint: u8) -> String {
        let guard = self.map.read();
        let Some(map) = guard.as_ref() else {
            warn!("label registry queried before initialization");
            return Self::placeholder(crc, length_hint);
        };

        let found = if length_hint > 0 {
            map.by_hash40.get(&Hash40::from_parts(crc, length_hint).0)
        } else {
            map.by_crc.get(&crc)
        };
        found.cloned().unwrap_or_else(|| Self::placeholder(crc, length_hint))
    }

    fn placeholder(crc: u32, length_hint: u8) -> String {
        if length_hint > 0 {
            format!("0x{:x}", Hash40::from_parts(crc, length_hint))
        } else {
            format!("0x{crc:08x}")
        }
    }
}
