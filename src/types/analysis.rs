// src/types/analysis.rs
//! Normalized analysis structures consumed by the dashboard and the history store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ===== Analysis Payload =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub target_role: String,
    pub profile: Profile,
    pub match_score: u8,
    pub skills: Vec<Skill>,
    pub missing_skills: Vec<MissingSkill>,
    pub recommendations: Vec<Recommendation>,
    pub quiz: Vec<QuizItem>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub summary: String,
    pub languages: Vec<String>,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub level: u8,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    Web,
    IA,
    DevOps,
    Multimedia,
    Other,
}

impl SkillCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::IA => "IA",
            Self::DevOps => "DevOps",
            Self::Multimedia => "Multimedia",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSkill {
    pub name: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub skill_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub description: String,
}

// ===== History Record =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub display_name: String,
    pub target_role: String,
    pub match_score: u8,
    pub payload: AnalysisPayload,
}

/// Display name used when the analysed CV carries no name
pub const DEFAULT_DISPLAY_NAME: &str = "Analysis";

impl AnalysisRecord {
    /// Build a record for a freshly produced payload
    pub fn new(id: String, created_at: DateTime<Utc>, payload: AnalysisPayload) -> Self {
        let display_name = if payload.profile.name.trim().is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            payload.profile.name.clone()
        };

        Self {
            id,
            created_at,
            display_name,
            target_role: payload.target_role.clone(),
            match_score: payload.match_score,
            payload,
        }
    }
}
