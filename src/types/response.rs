// src/types/response.rs
//! Raw analysis service response. The service is an LLM-backed endpoint and
//! its contract drifts, so nothing here is trusted: every leaf is kept as a
//! JSON value and coerced by the mapper. Decoding a JSON object never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAnalysisResponse {
    pub name: Value,
    pub summary: Value,
    pub languages: Value,
    pub contacts: Value,
    pub score_match: Value,
    pub skills: Value,
    pub missing_skills: Value,
    pub recommendations: Value,
    pub qcm_cards: Value,
    pub experience: Value,
}

/// `phone` is a single number or a list of numbers, as a string or a number
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContacts {
    pub email: Value,
    pub phone: Value,
    pub linkedin: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSkill {
    pub name: Value,
    pub description: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawQuizCard {
    pub question: Value,
    pub options: Value,
    pub correct_answer: Value,
    pub explanation: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawExperience {
    pub title: Value,
    pub company: Value,
    pub duration: Value,
    pub description: Value,
}
