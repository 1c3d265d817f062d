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

//! Provides the foundational traits and handle types for cached resources.
//!
//! A resource is any derived artifact a producer is willing to share: a
//! decoded mesh, a texture, computed bounds. This module only defines the
//! contracts. Storage and eviction live in `keepsake-data`.

mod handle;

pub use handle::*;

/// A marker trait for types that can be held by the resource cache.
///
/// The supertraits enforce the guarantees the cache relies on:
/// - `Send` + `Sync`: a payload can be shared with any subsystem, including
///   ones running on another thread.
/// - `'static`: the payload owns its data, so it can outlive the producer
///   that built it.
///
/// # Examples
///
/// ```
/// use keepsake_core::resource::Resource;
///
/// struct Mesh {
///     vertices: Vec<[f32; 3]>,
/// }
///
/// impl Resource for Mesh {}
/// ```
pub trait Resource: Send + Sync + 'static {}
