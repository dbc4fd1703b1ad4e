//! Star ratings
//!
//! A finished level earns 0-3 stars from the share of the time limit
//! still on the clock.

use serde::{Deserialize, Serialize};

/// Minimum remaining-time ratio for each star count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarThresholds {
    pub three: f32,
    pub two: f32,
    pub one: f32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            three: 0.70,
            two: 0.40,
            one: 0.10,
        }
    }
}

impl StarThresholds {
    /// Stars for a remaining-time ratio. NaN earns nothing.
    pub fn stars_for(&self, ratio: f32) -> u8 {
        if ratio >= self.three {
            3
        } else if ratio >= self.two {
            2
        } else if ratio >= self.one {
            1
        } else {
            0
        }
    }

    /// Seconds that must remain for each rating under a given time limit
    pub fn requirements(&self, time_limit: f32) -> StarRequirements {
        StarRequirements {
            three: time_limit * self.three,
            two: time_limit * self.two,
            one: time_limit * self.one,
        }
    }
}

/// Stars for a remaining-time ratio using the standard thresholds
pub fn stars_for(ratio: f32) -> u8 {
    StarThresholds::default().stars_for(ratio)
}

/// Remaining-time cut-offs for a time limit using the standard thresholds
pub fn star_requirements(time_limit: f32) -> StarRequirements {
    StarThresholds::default().requirements(time_limit)
}

/// Share of the time limit still remaining, or `None` for a
/// non-positive or non-finite limit
pub fn time_ratio(time_remaining: f32, time_limit: f32) -> Option<f32> {
    if !time_limit.is_finite() || time_limit <= 0.0 {
        return None;
    }
    Some(time_remaining.max(0.0) / time_limit)
}

/// Remaining-time cut-offs in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRequirements {
    pub three: f32,
    pub two: f32,
    pub one: f32,
}

impl StarRequirements {
    /// Human-readable breakdown for the reward screen
    pub fn describe(&self) -> String {
        format!(
            "Star Requirements:\n\
             - 3 Stars: Finish with {}+ remaining\n\
             - 2 Stars: Finish with {}-{} remaining\n\
             - 1 Star: Finish with {}-{} remaining\n\
             - 0 Stars: Finish with less than {} remaining",
            format_clock(self.three),
            format_clock(self.two),
            format_clock(self.three - 0.01),
            format_clock(self.one),
            format_clock(self.two - 0.01),
            format_clock(self.one),
        )
    }
}

/// Format seconds as `mm:ss`, truncating fractions
pub fn format_clock(seconds: f32) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0) as u32 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}
