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

//! The resource cache and its collaborators.
//!
//! Producers call [`ResourceCache::fetch`] to probe, [`ResourceCache::store`]
//! on a miss, and [`ResourceCache::invalidate`] when an input changes. The
//! frame driver calls [`ResourceCache::update`] once per tick, which advances
//! the clock and runs the eviction sweep.

mod config;
mod entry;
mod proxy;
mod shared;
mod store;

pub use config::*;
pub use entry::{Repair, StoreRequest};
pub use proxy::*;
pub use shared::*;
pub use store::*;

/// Log target of every gated cache trace line.
pub const LOG_TARGET: &str = "keepsake::cache";
