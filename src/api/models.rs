//! Wire types for everything the dashboard API returns or accepts.
//!
//! Field names follow the backend's camelCase JSON. Unknown fields in a
//! response are ignored; a missing required field fails decoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game mode of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelType {
    FacialDetection,
    FunctionalSpeech,
    PhonemePractice,
}

impl LevelType {
    pub const ALL: [LevelType; 3] = [
        LevelType::FacialDetection,
        LevelType::FunctionalSpeech,
        LevelType::PhonemePractice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelType::FacialDetection => "facial_detection",
            LevelType::FunctionalSpeech => "functional_speech",
            LevelType::PhonemePractice => "phoneme_practice",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LevelType::FacialDetection => "Facial Detection",
            LevelType::FunctionalSpeech => "Functional Speech",
            LevelType::PhonemePractice => "Phoneme Practice",
        }
    }
}

impl Default for LevelType {
    fn default() -> Self {
        LevelType::FacialDetection
    }
}

impl fmt::Display for LevelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LevelType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown level type '{}' (expected one of: facial_detection, functional_speech, phoneme_practice)",
                    s
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub game_user_id: String,
    pub name: String,
    pub image: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub gender: String,
    pub birth_date: Option<String>,
}

impl Recipient {
    pub fn full_name(&self) -> String {
        full_name(&self.title, &self.first_name, &self.last_name)
    }
}

/// Consecutive-activity aggregate computed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_start_date: Option<String>,
    pub last_activity_date: Option<String>,
    pub total_days_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDetails {
    pub game_id: String,
    pub name: String,
    pub image: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub gender: String,
    pub birth_date: Option<String>,
    pub streak: StreakSummary,
}

impl RecipientDetails {
    pub fn full_name(&self) -> String {
        full_name(&self.title, &self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientCount {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientPage {
    pub recipients: Vec<Recipient>,
    pub row_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUserBody {
    pub game_user_id: String,
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// One ordered step of a level. `number` is the 0-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub number: u32,
    pub target: String,
    pub description: String,
    pub image: String,
}

/// Row shape of the level lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub level_type: LevelType,
    #[serde(default)]
    pub subtype: Option<String>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDetails {
    pub id: String,
    #[serde(rename = "type")]
    pub level_type: LevelType,
    #[serde(default)]
    pub subtype: Option<String>,
    pub name: String,
    pub description: String,
    pub stage: Vec<Stage>,
}

/// Create payload shared by main and custom levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLevel {
    #[serde(rename = "type")]
    pub level_type: LevelType,
    pub subtype: String,
    pub name: String,
    pub description: String,
    pub stage: Vec<Stage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLevelPage {
    pub custom_levels: Vec<LevelSummary>,
    pub row_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainLevelPage {
    pub main_levels: Vec<LevelSummary>,
    pub row_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLevelIdBody {
    pub custom_level_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainLevelIdBody {
    pub main_level_id: String,
}

// ---------------------------------------------------------------------------
// Access grants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListUser {
    pub game_user_id: String,
    pub name: String,
    pub image: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
}

impl AccessListUser {
    pub fn full_name(&self) -> String {
        full_name(&self.title, &self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListPage {
    pub access_list: Vec<AccessListUser>,
    /// Older backends omit the total
    #[serde(default)]
    pub row_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrantBody {
    pub custom_level_id: String,
    pub recipient_user_id: String,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One play session, read-only from the dashboard's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub session_id: String,
    pub level_id: String,
    /// Free-form, unlike a level's type
    #[serde(rename = "type")]
    pub level_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    pub is_custom: bool,
    pub name: String,
    pub description: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOutcome {
    pub number: u32,
    pub target: String,
    pub description: String,
    pub image: String,
    pub attempts: Option<u32>,
    pub attempt_values: Option<Vec<String>>,
    pub passed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetails {
    #[serde(flatten)]
    pub entry: HistoryEntry,
    pub stage_info: Option<Vec<StageOutcome>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub history: Vec<HistoryEntry>,
    pub row_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetailsEnvelope {
    pub history: HistoryDetails,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// No parameters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Empty {}

/// 1-based page request; both fields fall back to backend defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameIdQuery {
    pub game_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListQuery {
    pub game_id: String,
    #[serde(flatten)]
    pub page: PageQuery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub game_id: String,
    pub history_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLevelIdQuery {
    pub custom_level_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainLevelIdQuery {
    pub main_level_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListQuery {
    pub custom_level_id: String,
    #[serde(flatten)]
    pub page: PageQuery,
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Envelope every mutation route answers with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}

fn full_name(title: &str, first: &str, last: &str) -> String {
    format!("{} {} {}", title, first, last)
}
