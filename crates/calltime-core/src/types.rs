use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of collaborators shown on the top-collaborators slide.
pub const TOP_COLLABORATOR_LIMIT: usize = 5;

/// A fully-resolved recap for one user-year. Built once per load, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecapSnapshot {
    pub user_id: String,
    pub year: i32,
    pub stats: CareerStats,
    pub archetype: Archetype,
    pub collaborators: Vec<Collaborator>,
    pub locations: LocationData,
    pub habits: HabitData,
}

impl RecapSnapshot {
    /// Collaborators in rank order, truncated for display. Short lists are not padded.
    pub fn top_collaborators(&self) -> &[Collaborator] {
        let n = self.collaborators.len().min(TOP_COLLABORATOR_LIMIT);
        &self.collaborators[..n]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CareerStats {
    pub days_on_set: u32,
    pub total_hours: u32,
    pub project_count: u32,
    pub water_bottles_consumed: u32,
    pub steps_on_set: u64,
    pub power_distro_runs: u32,
    pub avg_call_time: String,
    pub earliest_call: String,
    pub latest_wrap: String,
}

/// Closed set of work-pattern classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ArchetypeKind {
    Specialist,
    Generalist,
    RisingStar,
    Veteran,
    Collaborator,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Archetype {
    #[serde(rename = "type")]
    pub kind: ArchetypeKind,
    pub title: String,
    pub description: String,
    /// Ordered highlight pairs shown under the badge.
    pub stats: Vec<Highlight>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    pub label: String,
    pub value: HighlightValue,
}

impl Highlight {
    pub fn new(label: impl Into<String>, value: impl Into<HighlightValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A highlight value is either a bare number or preformatted text ("92%", "5.2★").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HighlightValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for HighlightValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightValue::Int(n) => write!(f, "{n}"),
            HighlightValue::Float(x) => write!(f, "{x}"),
            HighlightValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for HighlightValue {
    fn from(n: i64) -> Self {
        HighlightValue::Int(n)
    }
}

impl From<i32> for HighlightValue {
    fn from(n: i32) -> Self {
        HighlightValue::Int(i64::from(n))
    }
}

impl From<f64> for HighlightValue {
    fn from(x: f64) -> Self {
        HighlightValue::Float(x)
    }
}

impl From<&str> for HighlightValue {
    fn from(s: &str) -> Self {
        HighlightValue::Text(s.to_string())
    }
}

impl From<String> for HighlightValue {
    fn from(s: String) -> Self {
        HighlightValue::Text(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub name: String,
    pub role: String,
    pub days_worked_together: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub primary_location: PrimaryLocation,
    pub secondary_locations: Vec<SecondaryLocation>,
    pub on_location_days: u32,
    pub total_unique_locations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryLocation {
    pub city: String,
    pub state: String,
    pub percentage: u32,
    pub days_worked: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryLocation {
    pub city: String,
    pub state: String,
    pub days_worked: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitData {
    pub avg_sleep_hours: f64,
    pub avg_morning_routine: f64,
    pub avg_arrival_early: f64,
    pub most_common_call_time: String,
    pub no_peel_streak: u32,
}

/// The fixed slide order of the slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideKind {
    Welcome,
    Stats,
    Archetype,
    Collaborators,
    HotSpots,
    Share,
}

impl SlideKind {
    pub const SEQUENCE: [SlideKind; 6] = [
        SlideKind::Welcome,
        SlideKind::Stats,
        SlideKind::Archetype,
        SlideKind::Collaborators,
        SlideKind::HotSpots,
        SlideKind::Share,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SlideKind::Welcome => "Welcome",
            SlideKind::Stats => "Your Year in Numbers",
            SlideKind::Archetype => "Your Archetype",
            SlideKind::Collaborators => "Your Top Collaborators",
            SlideKind::HotSpots => "Your Production Hot Spots",
            SlideKind::Share => "That's a Wrap",
        }
    }
}

/// Panel background variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideVariant {
    #[default]
    Default,
    Gradient,
    Dark,
}

impl SlideKind {
    pub fn variant(self) -> SlideVariant {
        match self {
            SlideKind::Welcome | SlideKind::Share => SlideVariant::Gradient,
            SlideKind::Archetype | SlideKind::HotSpots => SlideVariant::Dark,
            SlideKind::Stats | SlideKind::Collaborators => SlideVariant::Default,
        }
    }
}
