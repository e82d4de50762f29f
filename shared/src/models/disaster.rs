//! Disaster alert models
//!
//! Disaster alerts cover multi-day hazards for the estate region. Flood and
//! landslide alerts are derived from forecast conditions by the rules below;
//! the remaining kinds come from governmental events relayed by the weather
//! provider and are mapped onto the same types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hazard::{AlertSeverity, Finding, HazardCatalogue};
use crate::types::GpsCoordinates;

/// Flood risk index (0-100) above which a flood alert is raised
pub const FLOOD_INDEX_THRESHOLD: f64 = 70.0;

/// Landslide score at which a landslide alert is raised
pub const LANDSLIDE_ALERT_SCORE: u32 = 30;

/// Types of disaster alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisasterKind {
    Flood,
    HeavyRain,
    Landslide,
    Drought,
    Cyclone,
    Wind,
    Temperature,
}

/// Where a disaster alert came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertSource {
    /// Relayed by Tomorrow.io from governmental agencies
    Tomorrowio,
    /// Computed by this platform's own rules
    Custom,
}

/// Forecast conditions the disaster rules are evaluated against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisasterConditions {
    pub flood_risk_index: Option<f64>,
    /// mm/hr
    pub precipitation_intensity_mm: f64,
    /// Cumulative over the next three days, mm
    pub precipitation_3day_mm: f64,
    /// Soil saturation, 0-1
    pub soil_moisture: f64,
    pub slope_degrees: f64,
}

impl Default for DisasterConditions {
    fn default() -> Self {
        Self {
            flood_risk_index: None,
            precipitation_intensity_mm: 0.0,
            precipitation_3day_mm: 0.0,
            soil_moisture: 0.5,
            // Most up-country estates sit on moderate slopes
            slope_degrees: 20.0,
        }
    }
}

/// Score landslide risk from rainfall, soil saturation and slope.
///
/// Returns the severity band together with the 0-100 score.
pub fn landslide_risk(
    precipitation_intensity_mm: f64,
    precipitation_3day_mm: f64,
    soil_moisture: f64,
    slope_degrees: f64,
) -> (AlertSeverity, u32) {
    let mut score = 0;

    if precipitation_3day_mm > 200.0 {
        score += 40;
    } else if precipitation_3day_mm > 100.0 {
        score += 25;
    } else if precipitation_3day_mm > 50.0 {
        score += 10;
    }

    if precipitation_intensity_mm > 50.0 {
        score += 30;
    } else if precipitation_intensity_mm > 25.0 {
        score += 15;
    }

    if soil_moisture > 0.8 {
        score += 20;
    } else if soil_moisture > 0.6 {
        score += 10;
    }

    if slope_degrees > 30.0 {
        score += 10;
    } else if slope_degrees > 20.0 {
        score += 5;
    }

    let severity = match score {
        70.. => AlertSeverity::Critical,
        50..=69 => AlertSeverity::Warning,
        30..=49 => AlertSeverity::Watch,
        _ => AlertSeverity::Advisory,
    };

    (severity, score)
}

impl HazardCatalogue for DisasterKind {
    type Input = DisasterConditions;

    // The other kinds are only ever reported by the provider
    const CATALOGUE: &'static [Self] = &[DisasterKind::Flood, DisasterKind::Landslide];

    fn code(self) -> &'static str {
        match self {
            DisasterKind::Flood => "flood",
            DisasterKind::HeavyRain => "heavy_rain",
            DisasterKind::Landslide => "landslide",
            DisasterKind::Drought => "drought",
            DisasterKind::Cyclone => "cyclone",
            DisasterKind::Wind => "wind",
            DisasterKind::Temperature => "temperature",
        }
    }

    fn assess(self, c: &DisasterConditions) -> Option<Finding<Self>> {
        match self {
            DisasterKind::Flood => {
                let index = c.flood_risk_index.filter(|i| *i > FLOOD_INDEX_THRESHOLD)?;
                let severity = if index > 85.0 {
                    AlertSeverity::Warning
                } else {
                    AlertSeverity::Watch
                };
                Some(Finding {
                    kind: self,
                    severity,
                    title: format!("Flood Risk Alert - Index {:.0}%", index),
                    message: format!(
                        "High flood risk predicted. Risk index: {:.0}/100. Based on \
                         precipitation forecasts and hydrologic modeling.",
                        index
                    ),
                })
            }
            DisasterKind::Landslide => {
                let (severity, score) = landslide_risk(
                    c.precipitation_intensity_mm,
                    c.precipitation_3day_mm,
                    c.soil_moisture,
                    c.slope_degrees,
                );
                if score < LANDSLIDE_ALERT_SCORE {
                    return None;
                }
                Some(Finding {
                    kind: self,
                    severity,
                    title: format!("Landslide Risk - Score {}", score),
                    message: format!(
                        "{:.0} mm of rain expected over three days ({:.0} mm/hr peak) on \
                         saturated hillside soils. Slope stability is compromised.",
                        c.precipitation_3day_mm, c.precipitation_intensity_mm
                    ),
                })
            }
            _ => None,
        }
    }
}

/// Map a Tomorrow.io event insight onto a disaster type
pub fn map_event_type(insight: &str) -> DisasterKind {
    match insight.to_lowercase().as_str() {
        "flood" => DisasterKind::Flood,
        "tropical" => DisasterKind::Cyclone,
        "wind" => DisasterKind::Wind,
        "winter" | "temperature" => DisasterKind::Temperature,
        _ => DisasterKind::HeavyRain,
    }
}

/// Map a Tomorrow.io event severity onto the alert scale
pub fn map_severity(severity: &str) -> AlertSeverity {
    match severity.to_lowercase().as_str() {
        "moderate" => AlertSeverity::Watch,
        "severe" => AlertSeverity::Warning,
        "extreme" => AlertSeverity::Critical,
        _ => AlertSeverity::Advisory,
    }
}

/// Actionable advice for estate managers
pub fn recommendations(kind: DisasterKind, severity: AlertSeverity) -> Vec<String> {
    let urgent = severity.is_urgent();
    let advice: &[&str] = match kind {
        DisasterKind::Flood if urgent => &[
            "Move tea processing equipment to higher ground immediately",
            "Clear all drainage channels and culverts",
            "Harvest mature tea leaves if possible within next 6 hours",
            "Prepare sandbags for estate buildings and storage",
            "Evacuate workers from low-lying areas",
            "Monitor river levels every hour",
        ],
        DisasterKind::Flood => &[
            "Check drainage systems are clear",
            "Identify safe evacuation routes",
            "Stock emergency supplies (fuel, food, medical)",
            "Move valuable equipment to elevated storage",
        ],
        DisasterKind::Cyclone if urgent => &[
            "Secure all loose structures and equipment NOW",
            "Emergency harvest of tea if within 12h of storm",
            "Board up windows on estate buildings",
            "Evacuate workers to designated safe zones",
            "Stock 7 days of emergency supplies",
            "Monitor official weather updates every 2 hours",
        ],
        DisasterKind::Cyclone => &[
            "Prepare emergency kits and supplies",
            "Identify cyclone shelter locations",
            "Secure outdoor equipment",
            "Review evacuation procedures with staff",
        ],
        DisasterKind::HeavyRain => &[
            "Delay all field operations during heavy rain",
            "Protect workers from lightning (move indoors)",
            "Cover harvested tea leaves to prevent damage",
            "Check for waterlogging and ponding after storm",
            "Inspect tea bushes for physical damage",
        ],
        DisasterKind::Landslide if urgent => &[
            "EVACUATE workers from slope areas immediately",
            "Stay away from hillside tea estates",
            "Monitor for ground cracks, tilted trees, unusual sounds",
            "Do not attempt to harvest on slopes during/after heavy rain",
            "Contact local authorities for geological assessment",
        ],
        DisasterKind::Landslide => &[
            "Monitor slope stability indicators",
            "Avoid unnecessary access to steep areas",
            "Report any ground movement to authorities",
        ],
        DisasterKind::Drought => &[
            "Increase irrigation frequency immediately",
            "Apply mulch to retain soil moisture",
            "Monitor tea bush stress indicators (leaf curl, yellowing)",
            "Reduce plucking intensity to conserve plant energy",
            "Check irrigation system functionality daily",
        ],
        DisasterKind::Wind | DisasterKind::Temperature => {
            &["Monitor weather conditions closely and follow official advisories"]
        }
    };

    advice.iter().map(|s| s.to_string()).collect()
}

/// Disaster alert shown in the dashboard banner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisasterAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DisasterKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub affected_regions: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub coordinates: GpsCoordinates,
    pub radius_km: f64,
    pub source: AlertSource,
    pub recommendations: Vec<String>,
}

impl DisasterAlert {
    /// Build an alert from a fired disaster rule
    pub fn from_finding(
        finding: Finding<DisasterKind>,
        coordinates: GpsCoordinates,
        start_time: DateTime<Utc>,
        radius_km: f64,
    ) -> Self {
        Self {
            id: format!("{}_{}", finding.kind.code(), start_time.timestamp_millis()),
            kind: finding.kind,
            severity: finding.severity,
            recommendations: recommendations(finding.kind, finding.severity),
            title: finding.title,
            description: finding.message,
            affected_regions: vec!["Local Area".to_string()],
            start_time,
            end_time: None,
            coordinates,
            radius_km,
            source: AlertSource::Custom,
        }
    }
}
