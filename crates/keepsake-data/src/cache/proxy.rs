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

use super::entry::{Repair, StoreRequest};
use super::store::ResourceCache;
use keepsake_core::cache::{CacheError, CacheResult, Signature};
use keepsake_core::resource::{Handle, Resource};

/// Describes how to build one derived resource.
///
/// A proxy is cheap to create and carries only what is needed to build the
/// resource: where it comes from and with which parameters. Passing it to
/// [`ResourceCache::lock`] gets the cached resource, or builds and stores it.
///
/// # Examples
///
/// ```
/// use keepsake_core::resource::Resource;
/// use keepsake_data::{Proxy, ResourceCache};
///
/// struct Heightmap(Vec<f32>);
/// impl Resource for Heightmap {}
///
/// struct HeightmapProxy {
///     path: String,
/// }
///
/// impl Proxy for HeightmapProxy {
///     type Output = Heightmap;
///
///     fn kind(&self) -> &str {
///         "heightmap"
///     }
///
///     fn source(&self) -> String {
///         self.path.clone()
///     }
///
///     fn make(&self) -> anyhow::Result<Heightmap> {
///         Ok(Heightmap(vec![0.0; 16]))
///     }
/// }
///
/// let mut cache = ResourceCache::default();
/// let proxy = HeightmapProxy { path: "terrain/hills.r16".into() };
/// let first = cache.lock(&proxy).unwrap();
/// let second = cache.lock(&proxy).unwrap();
/// assert_eq!(first.0.len(), 16);
/// assert!(keepsake_core::Handle::ptr_eq(&first, &second));
/// ```
pub trait Proxy {
    /// The resource this proxy builds.
    type Output: Resource;

    /// The kind of resource, e.g. `"mesh"` or `"aabb"`.
    fn kind(&self) -> &str;

    /// Where the resource comes from: a path, or a path plus parameters.
    fn source(&self) -> String;

    /// Builds the resource from scratch.
    fn make(&self) -> anyhow::Result<Self::Output>;

    /// The cache key. Defaults to `kind(source)`.
    fn signature(&self) -> Signature {
        Signature::compose(self.kind(), [self.source()])
    }

    /// The files the resource is derived from. Defaults to [`source`](Self::source).
    fn sources(&self) -> Vec<String> {
        vec![self.source()]
    }

    /// A human-readable label for trace lines.
    fn name(&self) -> String {
        format!("{} {}", self.kind(), self.source())
    }

    /// An optional in-place repair for the built resource. Without one,
    /// invalidation drops the entry and the next lock rebuilds it.
    fn repairer(&self) -> Option<Box<dyn Repair<Self::Output>>> {
        None
    }
}

impl ResourceCache {
    /// Returns the resource described by `proxy`, building and storing it on
    /// a miss.
    ///
    /// # Errors
    ///
    /// [`CacheError::Build`] when [`Proxy::make`] fails; nothing is stored.
    /// [`CacheError::TypeMismatch`] when another producer stored a
    /// different type under the same signature.
    pub fn lock<P: Proxy>(&mut self, proxy: &P) -> CacheResult<Handle<P::Output>> {
        let signature = proxy.signature();
        let name = proxy.name();
        if let Some(handle) = self.fetch::<P::Output>(&signature, &name)? {
            return Ok(handle);
        }

        let resource = proxy.make().map_err(|source| CacheError::Build {
            signature: signature.clone(),
            source,
        })?;
        let handle = Handle::new(resource);

        let mut request = StoreRequest::new(name, handle.clone());
        for source in proxy.sources() {
            request = request.derived_from(source);
        }
        if let Some(mut repair) = proxy.repairer() {
            request = request.with_repair(move |payload: &P::Output| repair.repair(payload));
        }
        self.store(signature, request);
        Ok(handle)
    }
}
