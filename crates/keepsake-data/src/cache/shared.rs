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
use super::entry::StoreRequest;
use super::proxy::Proxy;
use super::store::ResourceCache;
use keepsake_core::cache::{CacheResult, Signature};
use keepsake_core::resource::{Handle, Resource};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A [`ResourceCache`] that can be shared between threads.
///
/// Each operation takes the lock exactly once and holds it for the whole
/// operation, repairs and proxy builds included. Clones refer to the same
/// cache.
#[derive(Debug, Clone, Default)]
pub struct SharedResourceCache {
    inner: Arc<Mutex<ResourceCache>>,
}

impl SharedResourceCache {
    /// Creates an empty shared cache.
    pub fn new(config: CacheConfig) -> Self {
        Self::from_cache(ResourceCache::new(config))
    }

    /// Shares an already configured cache.
    pub fn from_cache(cache: ResourceCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Runs `f` with exclusive access to the cache.
    pub fn with<R>(&self, f: impl FnOnce(&mut ResourceCache) -> R) -> R {
        f(&mut self.guard())
    }

    /// See [`ResourceCache::fetch`].
    pub fn fetch<T: Resource>(
        &self,
        signature: impl AsRef<str>,
        name: &str,
    ) -> CacheResult<Option<Handle<T>>> {
        self.guard().fetch(signature, name)
    }

    /// See [`ResourceCache::store`].
    pub fn store<T: Resource>(&self, signature: impl Into<Signature>, request: StoreRequest<T>) {
        self.guard().store(signature, request);
    }

    /// See [`ResourceCache::lock`].
    pub fn lock<P: Proxy>(&self, proxy: &P) -> CacheResult<Handle<P::Output>> {
        self.guard().lock(proxy)
    }

    /// See [`ResourceCache::touch`].
    pub fn touch(&self, signature: impl AsRef<str>) -> bool {
        self.guard().touch(signature)
    }

    /// See [`ResourceCache::invalidate`].
    pub fn invalidate(&self, signature: impl AsRef<str>, name: &str) {
        self.guard().invalidate(signature, name);
    }

    /// See [`ResourceCache::invalidate_resource`].
    pub fn invalidate_resource(&self, path: impl AsRef<str>) -> usize {
        self.guard().invalidate_resource(path)
    }

    /// See [`ResourceCache::purge`].
    pub fn purge(&self) {
        self.guard().purge();
    }

    /// See [`ResourceCache::purge_entry`].
    pub fn purge_entry(&self, signature: impl AsRef<str>, name: &str) {
        self.guard().purge_entry(signature, name);
    }

    /// See [`ResourceCache::purge_resource`].
    pub fn purge_resource(&self, path: impl AsRef<str>) -> usize {
        self.guard().purge_resource(path)
    }

    /// See [`ResourceCache::update`].
    pub fn update(&self, delta: f32) -> usize {
        self.guard().update(delta)
    }

    /// See [`ResourceCache::len`].
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// See [`ResourceCache::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    // A repair that panics inside `fetch` leaves its entry dirty, and no
    // other operation can panic halfway through a mutation, so a poisoned
    // lock still guards a consistent cache.
    fn guard(&self) -> MutexGuard<'_, ResourceCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    #[derive(Debug)]
    struct Glyph(char);
    impl Resource for Glyph {}

    #[test]
    fn test_clones_share_one_cache() {
        let cache = SharedResourceCache::default();
        let other = cache.clone();

        cache.store("glyph(a)", StoreRequest::new("a", Glyph('a')));
        let glyph = other.fetch::<Glyph>("glyph(a)", "a").unwrap().unwrap();
        assert_eq!(glyph.0, 'a');
    }

    #[test]
    fn test_concurrent_producers() {
        let cache = SharedResourceCache::default();
        let workers: Vec<_> = ('a'..='h')
            .map(|c| {
                let cache = cache.clone();
                thread::spawn(move || {
                    let signature = Signature::compose("glyph", [c.to_string()]);
                    if cache.fetch::<Glyph>(&signature, "glyph").unwrap().is_none() {
                        cache.store(signature, StoreRequest::new("glyph", Glyph(c)));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(cache.len(), 8);
        assert_eq!(cache.with(|c| c.now().frame), 0);
    }

    #[test]
    fn test_panicking_repair_leaves_entry_dirty() {
        let cache = SharedResourceCache::default();
        let armed = Arc::new(AtomicBool::new(true));
        let trigger = Arc::clone(&armed);
        cache.store(
            "glyph(a)",
            StoreRequest::new("a", Glyph('a')).with_repair(move |_glyph: &Glyph| {
                if trigger.swap(false, Ordering::SeqCst) {
                    panic!("repair blew up");
                }
                Ok(())
            }),
        );
        cache.invalidate("glyph(a)", "a");

        let worker = cache.clone();
        let outcome = thread::spawn(move || worker.fetch::<Glyph>("glyph(a)", "a")).join();
        assert!(outcome.is_err());

        // The lock is poisoned but the entry is still there and still dirty.
        assert_eq!(cache.with(|c| c.is_dirty("glyph(a)")), Some(true));
        let glyph = cache.fetch::<Glyph>("glyph(a)", "a").unwrap().unwrap();
        assert_eq!(glyph.0, 'a');
        assert_eq!(cache.with(|c| c.is_dirty("glyph(a)")), Some(false));
    }
}
