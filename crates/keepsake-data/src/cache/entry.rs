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

use keepsake_core::cache::FrameStamp;
use keepsake_core::resource::{ErasedHandle, Handle, Resource};
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

/// Recomputes a cached payload in place after it has been invalidated.
///
/// The payload is shared, so a repairable resource keeps the parts that can
/// change behind interior mutability. The repair receives the payload as an
/// argument: a repair that captured its own handle would count as a consumer
/// and keep the entry from ever being evicted.
///
/// Any `FnMut(&T) -> anyhow::Result<()>` closure is a `Repair<T>`.
pub trait Repair<T: ?Sized>: Send + 'static {
    /// Refreshes `payload`. An error drops the entry from the cache.
    fn repair(&mut self, payload: &T) -> anyhow::Result<()>;
}

impl<T, F> Repair<T> for F
where
    T: ?Sized,
    F: FnMut(&T) -> anyhow::Result<()> + Send + 'static,
{
    fn repair(&mut self, payload: &T) -> anyhow::Result<()> {
        self(payload)
    }
}

pub(crate) type ErasedRepair =
    Box<dyn FnMut(&(dyn Any + Send + Sync)) -> anyhow::Result<()> + Send>;

fn erase_repair<T: Resource, R: Repair<T>>(mut repair: R) -> ErasedRepair {
    Box::new(
        move |payload: &(dyn Any + Send + Sync)| -> anyhow::Result<()> {
            let typed = payload.downcast_ref::<T>().ok_or_else(|| {
                anyhow::anyhow!("repair expected a payload of type {}", type_name::<T>())
            })?;
            repair.repair(typed)
        },
    )
}

/// Everything needed to store one resource.
///
/// ```
/// use keepsake_core::resource::{Handle, Resource};
/// use keepsake_data::StoreRequest;
///
/// struct Mesh(Vec<[f32; 3]>);
/// impl Resource for Mesh {}
///
/// let request = StoreRequest::new("crate mesh", Mesh(Vec::new()))
///     .derived_from("assets/crate.obj");
/// # let _ = request;
/// ```
pub struct StoreRequest<T: Resource> {
    pub(crate) name: String,
    pub(crate) payload: Handle<T>,
    pub(crate) repair: Option<ErasedRepair>,
    pub(crate) sources: Vec<String>,
}

impl<T: Resource> StoreRequest<T> {
    /// Creates a request without repair and without source back-references.
    pub fn new(name: impl Into<String>, payload: impl Into<Handle<T>>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            repair: None,
            sources: Vec::new(),
        }
    }

    /// Makes the entry repairable: invalidation marks it dirty instead of
    /// dropping it, and the next fetch runs `repair`.
    pub fn with_repair<R: Repair<T>>(mut self, repair: R) -> Self {
        self.repair = Some(erase_repair(repair));
        self
    }

    /// Records that the resource was derived from the file at `path`.
    ///
    /// [`ResourceCache::purge_resource`](super::ResourceCache::purge_resource)
    /// and [`ResourceCache::invalidate_resource`](super::ResourceCache::invalidate_resource)
    /// use these back-references.
    pub fn derived_from(mut self, path: impl AsRef<str>) -> Self {
        let path = normalize_source(path.as_ref());
        if !self.sources.contains(&path) {
            self.sources.push(path);
        }
        self
    }
}

pub(crate) struct RepairSlot {
    pub callback: ErasedRepair,
    pub dirty: bool,
}

/// One stored resource.
///
/// Dirtiness lives inside the repair slot, so an entry without a repair
/// cannot be dirty.
pub(crate) struct Entry {
    pub name: String,
    pub payload: ErasedHandle,
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub repair: Option<RepairSlot>,
    pub last_access: FrameStamp,
    pub sources: Vec<String>,
}

impl Entry {
    pub fn new<T: Resource>(request: StoreRequest<T>, now: FrameStamp) -> Self {
        Self {
            name: request.name,
            payload: request.payload.into_erased(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            repair: request.repair.map(|callback| RepairSlot {
                callback,
                dirty: false,
            }),
            last_access: now,
            sources: request.sources,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.repair.as_ref().is_some_and(|slot| slot.dirty)
    }

    /// The cache's own handle is the only strong reference left.
    pub fn is_unreferenced(&self) -> bool {
        Arc::strong_count(&self.payload) == 1
    }

    pub fn is_derived_from(&self, normalized_path: &str) -> bool {
        self.sources.iter().any(|s| s == normalized_path)
    }
}

/// Backslashes become forward slashes and a leading `./` is dropped.
pub(crate) fn normalize_source(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_owned()
}
