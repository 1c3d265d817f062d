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

use super::Resource;
use std::{any::Any, fmt, ops::Deref, sync::Arc};

/// A type-erased, reference-counted payload as the cache stores it.
///
/// It shares its reference count with every [`Handle`] created from it.
pub type ErasedHandle = Arc<dyn Any + Send + Sync>;

/// A thread-safe, reference-counted handle to a cached resource.
///
/// Cloning a handle is cheap, as it only increments the reference count
/// and does not duplicate the underlying data. The cache holds one handle
/// per entry and treats any additional strong reference as an active
/// consumer that blocks eviction.
pub struct Handle<T: Resource>(Arc<T>);

impl<T: Resource> Handle<T> {
    /// Creates a new `Handle` that takes ownership of the resource data.
    pub fn new(resource: T) -> Self {
        Self(Arc::new(resource))
    }

    /// Wraps an existing shared allocation without copying it.
    pub fn from_arc(arc: Arc<T>) -> Self {
        Self(arc)
    }

    /// Returns `true` if both handles point at the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Returns the number of strong references to the payload, this one included.
    pub fn strong_count(this: &Self) -> usize {
        Arc::strong_count(&this.0)
    }

    /// Converts the handle into its type-erased form, keeping the same allocation.
    pub fn into_erased(self) -> ErasedHandle {
        self.0
    }

    /// Recovers a typed handle from an erased one.
    ///
    /// On a type mismatch the erased handle is given back unchanged.
    pub fn from_erased(erased: ErasedHandle) -> Result<Self, ErasedHandle> {
        erased.downcast::<T>().map(Self)
    }
}

impl<T: Resource> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Resource> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Resource> AsRef<T> for Handle<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: Resource + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&*self.0).finish()
    }
}

impl<T: Resource> From<T> for Handle<T> {
    fn from(resource: T) -> Self {
        Self::new(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Texture(u32);
    impl Resource for Texture {}

    #[derive(Debug)]
    struct Mesh;
    impl Resource for Mesh {}

    #[test]
    fn test_clone_shares_allocation() {
        let a = Handle::new(Texture(7));
        let b = a.clone();

        assert!(Handle::ptr_eq(&a, &b));
        assert_eq!(Handle::strong_count(&a), 2);
        drop(b);
        assert_eq!(Handle::strong_count(&a), 1);
    }

    #[test]
    fn test_erasure_keeps_reference_count() {
        let handle = Handle::new(Texture(3));
        let erased = handle.clone().into_erased();

        assert_eq!(Arc::strong_count(&erased), 2);

        let back = Handle::<Texture>::from_erased(erased).expect("same type");
        assert!(Handle::ptr_eq(&handle, &back));
        assert_eq!(*back, Texture(3));
    }

    #[test]
    fn test_erasure_rejects_wrong_type() {
        let erased = Handle::new(Texture(1)).into_erased();
        let rejected = Handle::<Mesh>::from_erased(erased);

        let erased = rejected.expect_err("type mismatch");
        assert!(erased.downcast_ref::<Texture>().is_some());
    }
}
