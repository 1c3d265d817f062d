// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::config::CacheConfig;
use super::entry::{normalize_source, Entry, StoreRequest};
use super::LOG_TARGET;
use keepsake_core::cache::{CacheError, CacheResult, FrameStamp, Signature};
use keepsake_core::resource::{Handle, Resource};
use keepsake_core::telemetry::{CacheCounters, CacheStatsSink, LogReporter, WarningReporter};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A store of derived resources keyed by [`Signature`].
///
/// Holds at most one entry per signature. Entries leave the cache in four
/// ways: an explicit purge, an invalidation of an entry that has no repair,
/// a repair that fails, or the sweep run by [`update`](Self::update) once
/// the entry is stale on both clock axes and the cache holds the only
/// reference to its payload.
///
/// All operations run on the caller's thread. Wrap the cache in a
/// [`SharedResourceCache`](super::SharedResourceCache) to share it.
pub struct ResourceCache {
    entries: HashMap<Signature, Entry>,
    clock: FrameStamp,
    config: CacheConfig,
    stats: Arc<dyn CacheStatsSink>,
    reporter: Arc<dyn WarningReporter>,
}

impl ResourceCache {
    /// Creates an empty cache with its clock at zero.
    ///
    /// Statistics go to a private [`CacheCounters`] and repair failures to
    /// the log until [`with_stats`](Self::with_stats) and
    /// [`with_reporter`](Self::with_reporter) say otherwise.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::with_capacity(config.initial_capacity),
            clock: FrameStamp::ZERO,
            config,
            stats: Arc::new(CacheCounters::new()),
            reporter: Arc::new(LogReporter),
        }
    }

    /// Sends fetch statistics to `stats`.
    pub fn with_stats(mut self, stats: Arc<dyn CacheStatsSink>) -> Self {
        self.stats = stats;
        self
    }

    /// Sends repair failures to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn WarningReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    //--- Cache operations -------------------------------------------------

    /// Looks up the resource stored under `signature`.
    ///
    /// Every call counts as a try; a missing entry also counts as a miss and
    /// returns `Ok(None)`. A dirty entry is repaired first. If the repair
    /// fails, the error goes to the warning reporter, the entry is removed,
    /// and the result is `Ok(None)`: a stale payload is never handed out.
    /// A successful fetch refreshes the entry's access time.
    ///
    /// # Errors
    ///
    /// [`CacheError::TypeMismatch`] when the entry holds another type than
    /// `T`. The entry is left as it was.
    pub fn fetch<T: Resource>(
        &mut self,
        signature: impl AsRef<str>,
        name: &str,
    ) -> CacheResult<Option<Handle<T>>> {
        let signature = signature.as_ref();
        self.stats.record_try();

        let Some(entry) = self.entries.get_mut(signature) else {
            self.stats.record_miss();
            if self.config.log.misses() {
                log::debug!(target: LOG_TARGET, "cache missing {name}");
            }
            return Ok(None);
        };

        if entry.type_id != TypeId::of::<T>() {
            return Err(CacheError::TypeMismatch {
                signature: Signature::from(signature),
                expected: type_name::<T>(),
                found: entry.type_name,
            });
        }

        if let Some(slot) = entry.repair.as_mut().filter(|slot| slot.dirty) {
            if self.config.log.repairs() {
                log::debug!(target: LOG_TARGET, "updating cached {name}");
            }
            if let Err(e) = (slot.callback)(entry.payload.as_ref()) {
                self.reporter
                    .report_warning(&format!("failed to repair cached {name} ({signature})"), &e);
                self.entries.remove(signature);
                return Ok(None);
            }
            slot.dirty = false;
        }

        entry.last_access = self.clock;
        match Handle::from_erased(entry.payload.clone()) {
            Ok(handle) => Ok(Some(handle)),
            // The type id was checked above.
            Err(_) => Err(CacheError::TypeMismatch {
                signature: Signature::from(signature),
                expected: type_name::<T>(),
                found: entry.type_name,
            }),
        }
    }

    /// Stores a resource under `signature`, replacing any previous entry.
    ///
    /// The new entry is clean and its access time is the current clock.
    pub fn store<T: Resource>(&mut self, signature: impl Into<Signature>, request: StoreRequest<T>) {
        let signature = signature.into();
        if self.config.log.storage() {
            log::debug!(target: LOG_TARGET, "caching {}", request.name);
        }
        let entry = Entry::new(request, self.clock);
        if let Some(previous) = self.entries.insert(signature, entry) {
            if self.config.log.storage() {
                log::debug!(target: LOG_TARGET, "replaced cached {}", previous.name);
            }
        }
    }

    /// Refreshes the access time of the entry under `signature` without
    /// handing out its payload. Returns `false` if there is no such entry.
    pub fn touch(&mut self, signature: impl AsRef<str>) -> bool {
        let signature = signature.as_ref();
        match self.entries.get_mut(signature) {
            Some(entry) => {
                if self.config.log.invalidations() {
                    log::debug!(target: LOG_TARGET, "touching cached {}", entry.name);
                }
                entry.last_access = self.clock;
                true
            }
            None => false,
        }
    }

    /// Marks the entry under `signature` as out of date.
    ///
    /// A repairable entry is flagged dirty; its payload stays in place and
    /// the next fetch repairs it. An entry without repair is removed. A
    /// missing entry is ignored.
    pub fn invalidate(&mut self, signature: impl AsRef<str>, name: &str) {
        if self.config.log.invalidations() {
            log::debug!(target: LOG_TARGET, "invalidating cached {name}");
        }
        self.invalidate_key(signature.as_ref());
    }

    /// Removes every entry and resets the clock to zero.
    pub fn purge(&mut self) {
        if self.config.log.storage() {
            log::debug!(target: LOG_TARGET, "purging cache");
        }
        self.entries.clear();
        self.clock = FrameStamp::ZERO;
    }

    /// Removes the entry under `signature`, if any. The clock is untouched.
    pub fn purge_entry(&mut self, signature: impl AsRef<str>, name: &str) {
        if self.config.log.storage() {
            log::debug!(target: LOG_TARGET, "purging cached {name}");
        }
        self.entries.remove(signature.as_ref());
    }

    /// Removes every entry derived from the resource at `path`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_resource(&mut self, path: impl AsRef<str>) -> usize {
        let path = normalize_source(path.as_ref());
        let log = self.config.log;
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            let derived = entry.is_derived_from(&path);
            if derived && log.storage() {
                log::debug!(target: LOG_TARGET, "purging cached {} (source {path})", entry.name);
            }
            !derived
        });
        before - self.entries.len()
    }

    /// Invalidates every entry derived from the resource at `path`, with the
    /// same rules as [`invalidate`](Self::invalidate).
    ///
    /// Returns the number of entries affected.
    pub fn invalidate_resource(&mut self, path: impl AsRef<str>) -> usize {
        let path = normalize_source(path.as_ref());
        let derived: Vec<Signature> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_derived_from(&path))
            .map(|(signature, _)| signature.clone())
            .collect();
        for signature in &derived {
            if self.config.log.invalidations() {
                log::debug!(target: LOG_TARGET, "invalidating cached {signature} (source {path})");
            }
            self.invalidate_key(signature.as_str());
        }
        derived.len()
    }

    //--- Frame tick --------------------------------------------------------

    /// Advances the clock by `delta` seconds and one frame, then evicts every
    /// entry that has been idle longer than the lifetime on both axes and
    /// whose payload nobody else holds.
    ///
    /// Meant to be called exactly once per frame. Returns the number of
    /// evicted entries.
    pub fn update(&mut self, delta: f32) -> usize {
        self.clock.advance(delta);

        let now = self.clock;
        let lifetime = self.config.lifetime;
        let log = self.config.log;
        let before = self.entries.len();
        self.entries.retain(|signature, entry| {
            let expired = (now - entry.last_access).exceeds(&lifetime) && entry.is_unreferenced();
            if expired && log.misses() {
                log::debug!(target: LOG_TARGET, "cached {} timed out ({signature})", entry.name);
            }
            !expired
        });
        before - self.entries.len()
    }

    //--- Introspection -----------------------------------------------------

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry exists under `signature`. Does not count as a fetch.
    pub fn contains(&self, signature: impl AsRef<str>) -> bool {
        self.entries.contains_key(signature.as_ref())
    }

    /// Returns `Some(true)` if the entry is waiting for a repair.
    pub fn is_dirty(&self, signature: impl AsRef<str>) -> Option<bool> {
        self.entries.get(signature.as_ref()).map(Entry::is_dirty)
    }

    /// The clock value of the entry's last successful fetch or touch.
    pub fn last_access(&self, signature: impl AsRef<str>) -> Option<FrameStamp> {
        self.entries.get(signature.as_ref()).map(|e| e.last_access)
    }

    /// The current clock.
    pub fn now(&self) -> FrameStamp {
        self.clock
    }

    /// The idle time after which unreferenced entries are evicted.
    pub fn lifetime(&self) -> FrameStamp {
        self.config.lifetime
    }

    /// The configuration the cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn invalidate_key(&mut self, signature: &str) {
        let Some(entry) = self.entries.get_mut(signature) else {
            return;
        };
        match entry.repair.as_mut() {
            Some(slot) => slot.dirty = true,
            None => {
                self.entries.remove(signature);
            }
        }
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("entries", &self.entries.len())
            .field("clock", &self.clock)
            .field("config", &self.config)
            .finish()
    }
}
