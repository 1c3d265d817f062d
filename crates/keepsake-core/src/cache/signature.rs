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

use std::borrow::Borrow;
use std::fmt;

/// An opaque key identifying a uniquely derivable cached artifact.
///
/// Two producers asking for the same artifact must build the same
/// signature. [`Signature::compose`] gives them a stable way to do that from
/// a resource kind and its build parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Signature(String);

impl Signature {
    /// Wraps an already formatted key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Builds `kind(part1,part2,...)`, or just `kind` when there are no parts.
    ///
    /// ```
    /// use keepsake_core::Signature;
    ///
    /// let sig = Signature::compose("mesh", ["assets/crate.obj", "lod=2"]);
    /// assert_eq!(sig.as_str(), "mesh(assets/crate.obj,lod=2)");
    /// ```
    pub fn compose<I, S>(kind: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts = parts
            .into_iter()
            .map(|p| p.as_ref().to_owned())
            .collect::<Vec<_>>();
        if parts.is_empty() {
            Self(kind.to_owned())
        } else {
            Self(format!("{kind}({})", parts.join(",")))
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the null signature.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Signature {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for Signature {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&Signature> for Signature {
    fn from(sig: &Signature) -> Self {
        sig.clone()
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Signature {
    fn borrow(&self) -> &str {
        &self.0
    }
}
