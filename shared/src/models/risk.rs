//! Blister Blight disease risk assessment
//!
//! Blister Blight (*Exobasidium vexans*) spreads when tea bushes stay wet and
//! cool for several days running. The assessor flags each forecast day that is
//! both very humid and below 25°C, then classifies the estate by the longest
//! unbroken streak of such days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::forecast::{DailyForecast, ForecastDay};
use crate::types::ParseError;

/// Humidity (%) a day must exceed to count as a risk day
pub const RISK_HUMIDITY_THRESHOLD: f64 = 90.0;

/// Temperature (°C) a day must stay below to count as a risk day
pub const RISK_TEMPERATURE_THRESHOLD: f64 = 25.0;

/// Streak length at which risk becomes HIGH
pub const HIGH_RISK_STREAK: usize = 3;

/// Disease risk classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify by the length of the longest run of risk days
    pub fn from_streak(streak: usize) -> Self {
        match streak {
            0 => RiskLevel::Low,
            n if n < HIGH_RISK_STREAK => RiskLevel::Moderate,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MODERATE" => Ok(RiskLevel::Moderate),
            "HIGH" => Ok(RiskLevel::High),
            _ => Err(ParseError::new("risk level", s)),
        }
    }
}

/// Risk assessment result for Blister Blight disease
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub details: String,
    pub consecutive_risk_days: usize,
    pub forecast_summary: Vec<ForecastDay>,
}

impl RiskAssessment {
    /// Neutral assessment used when no forecast could be obtained
    pub fn unavailable(details: impl Into<String>) -> Self {
        Self {
            risk_level: RiskLevel::Low,
            details: details.into(),
            consecutive_risk_days: 0,
            forecast_summary: Vec::new(),
        }
    }
}

/// Longest run of consecutive risk days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskStreak {
    pub start: usize,
    pub len: usize,
}

/// Whether a single day meets the Blister Blight conditions.
///
/// Missing or NaN readings never qualify.
pub fn is_risk_day(day: &DailyForecast) -> bool {
    match (day.humidity, day.temperature) {
        (Some(humidity), Some(temperature)) => {
            humidity > RISK_HUMIDITY_THRESHOLD && temperature < RISK_TEMPERATURE_THRESHOLD
        }
        _ => false,
    }
}

/// Find the longest run of `true` flags; the earliest run wins ties.
pub fn longest_streak(flags: &[bool]) -> Option<RiskStreak> {
    let mut best: Option<RiskStreak> = None;
    let mut current_start = 0;
    let mut current_len = 0;

    for (i, &flag) in flags.iter().enumerate() {
        if !flag {
            current_len = 0;
            continue;
        }
        if current_len == 0 {
            current_start = i;
        }
        current_len += 1;
        if best.map_or(true, |b| current_len > b.len) {
            best = Some(RiskStreak {
                start: current_start,
                len: current_len,
            });
        }
    }

    best
}

/// Assess Blister Blight risk over a daily forecast.
///
/// The forecast must already be in chronological order. Every input day is
/// echoed in `forecast_summary`, in input order.
pub fn assess_blister_blight_risk(forecast: &[DailyForecast]) -> RiskAssessment {
    let flags: Vec<bool> = forecast.iter().map(is_risk_day).collect();

    let forecast_summary = forecast
        .iter()
        .zip(&flags)
        .map(|(day, &is_risk_day)| ForecastDay {
            date: day.date,
            temperature: day.temperature,
            humidity: day.humidity,
            weather_icon: day.weather_icon().to_string(),
            is_risk_day,
        })
        .collect();

    let streak = longest_streak(&flags);
    let consecutive_risk_days = streak.map_or(0, |s| s.len);
    let risk_level = RiskLevel::from_streak(consecutive_risk_days);

    let details = match streak {
        Some(s) => {
            let start = forecast[s.start].date;
            let end = forecast[s.start + s.len - 1].date;
            risk_details(risk_level, start, end, s.len)
        }
        None => low_risk_details(),
    };

    RiskAssessment {
        risk_level,
        details,
        consecutive_risk_days,
        forecast_summary,
    }
}

fn period(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        format!("on {}", start)
    } else {
        format!("from {} to {}", start, end)
    }
}

fn risk_details(level: RiskLevel, start: NaiveDate, end: NaiveDate, days: usize) -> String {
    let unit = if days == 1 { "day" } else { "days" };
    match level {
        RiskLevel::High => format!(
            "⚠️ High Blister Blight risk {}. Deploy fungicide immediately. \
             Conditions: {} consecutive {} with humidity >90% and temp <25°C. \
             Inspect tea bushes for early symptoms.",
            period(start, end),
            days,
            unit
        ),
        RiskLevel::Moderate => format!(
            "⚡ Moderate disease risk detected {}. Monitor tea estates closely \
             and prepare preventive fungicide sprays. {} consecutive risk {} identified.",
            period(start, end),
            days,
            unit
        ),
        RiskLevel::Low => low_risk_details(),
    }
}

fn low_risk_details() -> String {
    "✅ Low disease risk. No risk detected: weather conditions are favorable for crop health. \
     Continue regular monitoring and maintenance routines."
        .to_string()
}
