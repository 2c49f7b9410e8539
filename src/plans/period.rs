// ABOUTME: Planning period definitions and session date layout
// ABOUTME: A week spans seven days and a month thirty, both starting tomorrow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of a multi-session plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanPeriod {
    /// Seven consecutive days
    Week,
    /// Thirty consecutive days
    Month,
}

impl PlanPeriod {
    /// Parse the request value; only the exact lowercase names are accepted
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    /// Request representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Number of sessions created
    #[must_use]
    pub const fn days(&self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// One distinct date per session, starting the day after `today`
    #[must_use]
    pub fn session_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (1..=i64::from(self.days()))
            .map(|offset| today + Duration::days(offset))
            .collect()
    }
}
