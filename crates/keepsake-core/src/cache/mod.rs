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

//! Primitive types shared by every resource cache implementation.
//!
//! - [`FrameStamp`]: the dual-metric clock (elapsed time and frame count).
//! - [`Signature`]: the key identifying one derivable artifact.
//! - [`CacheError`]: the checked failures of cache operations.

mod error;
mod signature;
mod stamp;

pub use error::*;
pub use signature::*;
pub use stamp::*;
