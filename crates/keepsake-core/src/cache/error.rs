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

use super::Signature;
use std::fmt;

/// A specialized `Result` type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// An error returned by a cache operation.
///
/// Misses are not errors, and neither are repair failures: those are
/// reported to the warning sink and surface as an empty fetch.
#[derive(Debug)]
pub enum CacheError {
    /// The entry under `signature` holds a payload of another type than the
    /// one requested. This is a contract violation by the caller: two
    /// producers are using the same signature for different artifacts.
    TypeMismatch {
        /// The signature that was fetched.
        signature: Signature,
        /// The type the caller asked for.
        expected: &'static str,
        /// The type actually stored.
        found: &'static str,
    },
    /// A producer failed to build the resource on a cache miss.
    Build {
        /// The signature the resource would have been stored under.
        signature: Signature,
        /// The producer's error.
        source: anyhow::Error,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::TypeMismatch {
                signature,
                expected,
                found,
            } => write!(
                f,
                "Type mismatch for cached '{signature}': expected {expected}, found {found}"
            ),
            CacheError::Build { signature, source } => {
                write!(f, "Failed to build '{signature}': {source}")
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::TypeMismatch { .. } => None,
            CacheError::Build { source, .. } => Some(&**source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = CacheError::TypeMismatch {
            signature: Signature::from("sigA"),
            expected: "Mesh",
            found: "Texture",
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch for cached 'sigA': expected Mesh, found Texture"
        );
    }

    #[test]
    fn test_build_error_exposes_source() {
        use std::error::Error;

        let err = CacheError::Build {
            signature: Signature::from("mesh(a.obj)"),
            source: anyhow::anyhow!("file not found"),
        };
        assert!(err.to_string().contains("file not found"));
        assert!(err.source().is_some());
    }
}
