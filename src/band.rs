//! Age bands and the age windows shared by report grouping and highlighting.

use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

pub const CHILD_MAX_AGE: i32 = 7;
pub const YOUTH_MAX_AGE: i32 = 23;
pub const ADULT_MAX_AGE: i32 = 60;

/// Adults in this window are split out of their band and highlighted.
pub const ADULT_TRANSITION: Range<i32> = 23..25;
/// Youths in this window are split out of their band and highlighted.
pub const YOUTH_TRANSITION: Range<i32> = 21..23;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    Child,
    Youth,
    Adult,
    Senior,
    Unknown,
}

impl AgeBand {
    /// Order in which bands appear in the assembled report.
    pub const REPORT_ORDER: [AgeBand; 5] = [
        AgeBand::Adult,
        AgeBand::Youth,
        AgeBand::Child,
        AgeBand::Senior,
        AgeBand::Unknown,
    ];

    pub fn classify(age: Option<i32>) -> Self {
        match age {
            None => AgeBand::Unknown,
            Some(age) if age < CHILD_MAX_AGE => AgeBand::Child,
            Some(age) if age < YOUTH_MAX_AGE => AgeBand::Youth,
            Some(age) if age < ADULT_MAX_AGE => AgeBand::Adult,
            Some(_) => AgeBand::Senior,
        }
    }

    /// The transition window split out of this band, if it has one.
    pub fn transition_window(&self) -> Option<Range<i32>> {
        match self {
            AgeBand::Adult => Some(ADULT_TRANSITION),
            AgeBand::Youth => Some(YOUTH_TRANSITION),
            AgeBand::Child | AgeBand::Senior | AgeBand::Unknown => None,
        }
    }

    /// True when `age` falls in this band's transition window.
    pub fn in_transition(&self, age: Option<i32>) -> bool {
        match (self.transition_window(), age) {
            (Some(window), Some(age)) => window.contains(&age),
            _ => false,
        }
    }

    /// Label written into the report's age-band column.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Child => "0-7岁",
            AgeBand::Youth => "7-23岁",
            AgeBand::Adult => "23-60岁",
            AgeBand::Senior => "60岁及以上",
            AgeBand::Unknown => "未知",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_older_band() {
        assert_eq!(AgeBand::classify(Some(6)), AgeBand::Child);
        assert_eq!(AgeBand::classify(Some(7)), AgeBand::Youth);
        assert_eq!(AgeBand::classify(Some(22)), AgeBand::Youth);
        assert_eq!(AgeBand::classify(Some(23)), AgeBand::Adult);
        assert_eq!(AgeBand::classify(Some(59)), AgeBand::Adult);
        assert_eq!(AgeBand::classify(Some(60)), AgeBand::Senior);
        assert_eq!(AgeBand::classify(None), AgeBand::Unknown);
    }

    #[test]
    fn transition_windows_sit_inside_their_band() {
        for band in AgeBand::REPORT_ORDER {
            if let Some(window) = band.transition_window() {
                for age in window {
                    assert_eq!(AgeBand::classify(Some(age)), band);
                }
            }
        }
        assert!(AgeBand::Adult.in_transition(Some(24)));
        assert!(!AgeBand::Adult.in_transition(Some(25)));
        assert!(AgeBand::Youth.in_transition(Some(21)));
        assert!(!AgeBand::Child.in_transition(Some(3)));
        assert!(!AgeBand::Youth.in_transition(None));
    }
}
