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

//! The warning collaborator: where recovered failures are reported.

use std::fmt::Debug;

/// Receives non-fatal failures that an operation recovered from locally.
///
/// The resource cache uses it for repair callbacks that fail: the entry is
/// dropped, the caller sees a miss, and the error ends up here instead of
/// being propagated.
pub trait WarningReporter: Send + Sync + Debug + 'static {
    /// Reports `error`, which happened while working on `context`.
    fn report_warning(&self, context: &str, error: &anyhow::Error);
}

/// Forwards warnings to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl WarningReporter for LogReporter {
    fn report_warning(&self, context: &str, error: &anyhow::Error) {
        log::warn!("{context}: {error:#}");
    }
}
