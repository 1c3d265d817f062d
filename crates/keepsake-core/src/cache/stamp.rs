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

use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// The lifetime used when none is configured: 4 seconds and 8 frames.
pub const DEFAULT_LIFETIME: FrameStamp = FrameStamp {
    elapsed: 4.0,
    frame: 8,
};

/// A point on the cache clock, or a distance between two points.
///
/// The clock runs on two axes at once: elapsed time in seconds and the
/// number of frames ticked. Staleness is only ever decided when both axes
/// agree, see [`FrameStamp::exceeds`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameStamp {
    /// Elapsed time, in seconds.
    ///
    /// Accumulated in `f64` so that per-frame deltas still register after
    /// days of uptime.
    pub elapsed: f64,
    /// Number of frames ticked.
    pub frame: u64,
}

impl FrameStamp {
    /// The origin of the clock.
    pub const ZERO: FrameStamp = FrameStamp {
        elapsed: 0.0,
        frame: 0,
    };

    /// Creates a stamp from its two components.
    pub const fn new(elapsed: f64, frame: u64) -> Self {
        Self { elapsed, frame }
    }

    /// Moves the clock forward by `delta` seconds and exactly one frame.
    ///
    /// Negative and NaN deltas count as zero, so the clock never runs backwards.
    pub fn advance(&mut self, delta: f32) {
        if delta > 0.0 {
            self.elapsed += f64::from(delta);
        }
        self.frame = self.frame.saturating_add(1);
    }

    /// Returns `true` when `self` is strictly larger than `lifetime` on BOTH axes.
    ///
    /// A long pause with few frames, or a burst of frames in a short time,
    /// is not enough on its own.
    pub fn exceeds(&self, lifetime: &FrameStamp) -> bool {
        self.elapsed > lifetime.elapsed && self.frame > lifetime.frame
    }
}

impl Sub for FrameStamp {
    type Output = FrameStamp;

    fn sub(self, rhs: FrameStamp) -> FrameStamp {
        FrameStamp {
            elapsed: self.elapsed - rhs.elapsed,
            frame: self.frame.saturating_sub(rhs.frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_both_axes() {
        let mut stamp = FrameStamp::ZERO;
        stamp.advance(0.5);
        stamp.advance(0.25);

        assert_eq!(stamp, FrameStamp::new(0.75, 2));
    }

    #[test]
    fn test_advance_ignores_negative_and_nan_delta() {
        let mut stamp = FrameStamp::new(1.0, 3);
        stamp.advance(-2.0);
        stamp.advance(f32::NAN);

        assert_eq!(stamp.elapsed, 1.0);
        assert_eq!(stamp.frame, 5);
    }

    #[test]
    fn test_subtraction_is_pointwise() {
        let later = FrameStamp::new(10.0, 20);
        let earlier = FrameStamp::new(4.0, 5);

        assert_eq!(later - earlier, FrameStamp::new(6.0, 15));
        assert_eq!((earlier - later).frame, 0);
    }

    #[test]
    fn test_exceeds_requires_both_axes() {
        let lifetime = DEFAULT_LIFETIME;

        // Long pause, few frames.
        assert!(!FrameStamp::new(100.0, 2).exceeds(&lifetime));
        // Many frames, short time.
        assert!(!FrameStamp::new(1.0, 500).exceeds(&lifetime));
        // Exactly on the threshold is not past it.
        assert!(!FrameStamp::new(4.0, 8).exceeds(&lifetime));
        assert!(!FrameStamp::new(4.5, 8).exceeds(&lifetime));
        assert!(FrameStamp::new(4.5, 9).exceeds(&lifetime));
    }

    #[test]
    fn test_advance_keeps_counting_after_long_uptime() {
        // Past 2^17 seconds an f32 accumulator drops a 144 fps delta entirely.
        let mut stamp = FrameStamp::new(131_072.0, 20_736_000);
        let start = stamp;
        for _ in 0..144 {
            stamp.advance(1.0 / 144.0);
        }

        let span = stamp - start;
        assert!((span.elapsed - 1.0).abs() < 1e-3, "span was {}", span.elapsed);
        assert_eq!(span.frame, 144);
    }

    #[test]
    fn test_serde_round_trip_shape() {
        let json = serde_json::to_string(&DEFAULT_LIFETIME).unwrap();
        assert_eq!(json, r#"{"elapsed":4.0,"frame":8}"#);
    }
}
