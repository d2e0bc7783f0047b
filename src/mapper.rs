// src/mapper.rs
//! Translate the analysis service response into the normalized payload

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{
    AnalysisPayload, Contact, ExperienceEntry, MissingSkill, Priority, Profile, QuizItem,
    RawAnalysisResponse, RawContacts, RawExperience, RawQuizCard, RawSkill, Recommendation,
    Skill, SkillCategory,
};

/// The service does not rate skills, every mapped skill gets this level
pub const DEFAULT_SKILL_LEVEL: u8 = 65;

pub const MISSING_SKILL_TYPE: &str = "Skill";

const HIGH_PRIORITY_COUNT: usize = 3;
const MEDIUM_PRIORITY_END: usize = 5;

const EXPECTED_QUIZ_OPTIONS: usize = 4;

/// Ordered keyword rules, first match wins. The order is significant:
/// "backend deep learning" must stay Web.
const CATEGORY_RULES: &[(&[&str], SkillCategory)] = &[
    (&["programming", "programmation"], SkillCategory::Web),
    (&["web"], SkillCategory::Web),
    (&["front"], SkillCategory::Web),
    (&["back"], SkillCategory::Web),
    (&["machine learning", "deep learning"], SkillCategory::IA),
    (
        &["natural language", "natural-language", "langage naturel", "nlp"],
        SkillCategory::IA,
    ),
    (&["vision", "computer vision"], SkillCategory::IA),
    (
        &["devops", "containerization", "conteneurisation", "docker"],
        SkillCategory::DevOps,
    ),
    (&["design"], SkillCategory::Multimedia),
];

/// Map a raw service response for `target_role` into an [`AnalysisPayload`].
/// Never fails: absent or wrong-typed fields become empty strings, empty
/// lists or zero.
pub fn map_response(target_role: &str, raw: RawAnalysisResponse) -> AnalysisPayload {
    let contacts: RawContacts = serde_json::from_value(raw.contacts).unwrap_or_default();

    let profile = Profile {
        name: text(&raw.name).unwrap_or_default().trim().to_string(),
        summary: text(&raw.summary).unwrap_or_default(),
        languages: strings_only(list(raw.languages)),
        contact: Contact {
            email: text(&contacts.email).unwrap_or_default(),
            phone: list(contacts.phone)
                .first()
                .and_then(text)
                .unwrap_or_default(),
            linkedin: text(&contacts.linkedin).unwrap_or_default(),
        },
    };

    let experience = records::<RawExperience>(raw.experience)
        .into_iter()
        .map(|entry| ExperienceEntry {
            title: text(&entry.title).unwrap_or_default(),
            company: text(&entry.company).unwrap_or_default(),
            duration: text(&entry.duration).filter(|d| !d.trim().is_empty()),
            description: text(&entry.description).unwrap_or_default(),
        })
        .collect();

    AnalysisPayload {
        target_role: target_role.trim().to_string(),
        profile,
        match_score: normalize_score(number(&raw.score_match)),
        skills: map_skills(records(raw.skills)),
        missing_skills: map_missing_skills(list(raw.missing_skills)),
        recommendations: map_recommendations(list(raw.recommendations)),
        quiz: map_quiz(records(raw.qcm_cards)),
        experience,
    }
}

/// Infer a skill category from its free-text description
pub fn infer_category(description: &str) -> SkillCategory {
    let desc = description.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| desc.contains(keyword)))
        .map(|(_, category)| *category)
        .unwrap_or(SkillCategory::Other)
}

/// Priority from position in the service's missing-skills list
pub fn priority_for_position(index: usize) -> Priority {
    if index < HIGH_PRIORITY_COUNT {
        Priority::High
    } else if index < MEDIUM_PRIORITY_END {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn normalize_score(score: Option<f64>) -> u8 {
    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// Text from a string or a number
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number from a number or a numeric string
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A lone value counts as a one-item list, null as an empty one
fn list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// List items that decode as `T`; the rest are skipped
fn records<T: DeserializeOwned>(value: Value) -> Vec<T> {
    list(value)
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

fn strings_only(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect()
}

fn map_skills(skills: Vec<RawSkill>) -> Vec<Skill> {
    skills
        .into_iter()
        .map(|skill| {
            let description = text(&skill.description).unwrap_or_default();
            Skill {
                name: text(&skill.name).unwrap_or_default(),
                category: infer_category(&description),
                description,
                level: DEFAULT_SKILL_LEVEL,
            }
        })
        .collect()
}

/// Priority follows the raw position, skipped entries still take a slot
fn map_missing_skills(missing: Vec<Value>) -> Vec<MissingSkill> {
    missing
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match value {
            Value::String(name) if !name.trim().is_empty() => Some(MissingSkill {
                name,
                priority: priority_for_position(index),
                skill_type: MISSING_SKILL_TYPE.to_string(),
            }),
            _ => None,
        })
        .collect()
}

fn map_recommendations(recommendations: Vec<Value>) -> Vec<Recommendation> {
    recommendations
        .into_iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty() && !text.starts_with("**"))
        .map(|text| match text.strip_prefix("- ") {
            Some(rest) => rest.trim().to_string(),
            None => text.trim().to_string(),
        })
        .zip(1u32..)
        .map(|(text, id)| Recommendation {
            id,
            text,
            done: false,
        })
        .collect()
}

fn map_quiz(cards: Vec<RawQuizCard>) -> Vec<QuizItem> {
    cards
        .into_iter()
        .enumerate()
        .filter_map(|(position, card)| {
            let options: Vec<String> = list(card.options)
                .iter()
                .map(|option| text(option).unwrap_or_default())
                .collect();
            let correct = integer(&card.correct_answer).unwrap_or(0);

            let correct_index = match usize::try_from(correct) {
                Ok(index) if index < options.len() => index,
                _ => {
                    app_log!(
                        warn,
                        "Dropping quiz card {}: correct answer {} outside {} options",
                        position,
                        correct,
                        options.len()
                    );
                    return None;
                }
            };

            if options.len() != EXPECTED_QUIZ_OPTIONS {
                app_log!(
                    warn,
                    "Quiz card {} has {} options, expected {}",
                    position,
                    options.len(),
                    EXPECTED_QUIZ_OPTIONS
                );
            }

            Some((
                text(&card.question),
                options,
                correct_index,
                text(&card.explanation),
            ))
        })
        .zip(1u32..)
        .map(|((question, options, correct_index, explanation), id)| QuizItem {
            id,
            question: question.unwrap_or_default(),
            options,
            correct_index,
            explanation: explanation.unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawAnalysisResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("Containers with DOCKER"), SkillCategory::DevOps);
        assert_eq!(infer_category("Deep Learning with PyTorch"), SkillCategory::IA);
        assert_eq!(infer_category("Team leadership"), SkillCategory::Other);
        assert_eq!(infer_category("Programmation orientée objet"), SkillCategory::Web);
        assert_eq!(infer_category("UI design"), SkillCategory::Multimedia);
        assert_eq!(infer_category("NLP pipelines"), SkillCategory::IA);
    }

    #[test]
    fn test_infer_category_rule_order() {
        // "back" is checked before any IA keyword
        assert_eq!(infer_category("Backend deep learning"), SkillCategory::Web);
        // "vision" is IA before "docker" is considered
        assert_eq!(infer_category("Computer vision in docker"), SkillCategory::IA);
    }

    #[test]
    fn test_missing_skill_priorities() {
        let payload = map_response(
            "Dev",
            raw(json!({"missing_skills": ["a", "b", "c", "d", "e", "f"]})),
        );
        let priorities: Vec<Priority> =
            payload.missing_skills.iter().map(|m| m.priority).collect();
        assert_eq!(
            priorities,
            vec![
                Priority::High,
                Priority::High,
                Priority::High,
                Priority::Medium,
                Priority::Medium,
                Priority::Low
            ]
        );
        assert!(payload
            .missing_skills
            .iter()
            .all(|m| m.skill_type == MISSING_SKILL_TYPE));
    }

    #[test]
    fn test_missing_skill_priority_uses_raw_position() {
        let payload = map_response(
            "Dev",
            raw(json!({"missing_skills": ["", "a", "b", "c", 4, "d", "e"]})),
        );
        let mapped: Vec<(&str, Priority)> = payload
            .missing_skills
            .iter()
            .map(|m| (m.name.as_str(), m.priority))
            .collect();
        assert_eq!(
            mapped,
            vec![
                ("a", Priority::High),
                ("b", Priority::High),
                ("c", Priority::Medium),
                ("d", Priority::Low),
                ("e", Priority::Low)
            ]
        );
    }

    #[test]
    fn test_wrong_typed_fields_are_coerced() {
        let payload = map_response(
            "Dev",
            raw(json!({
                "name": "Ana",
                "score_match": " 85 ",
                "languages": "French",
                "contacts": {"phone": [21698123456_i64], "email": 12},
                "experience": [{"title": "Intern", "duration": 2}],
                "qcm_cards": [{"question": "Q1", "options": ["a", "b", "c", 4], "correct_answer": "2"}]
            })),
        );
        assert_eq!(payload.profile.name, "Ana");
        assert_eq!(payload.match_score, 85);
        assert_eq!(payload.profile.languages, vec!["French"]);
        assert_eq!(payload.profile.contact.phone, "21698123456");
        assert_eq!(payload.profile.contact.email, "12");
        assert_eq!(payload.experience[0].duration.as_deref(), Some("2"));
        assert_eq!(payload.quiz[0].correct_index, 2);
        assert_eq!(payload.quiz[0].options[3], "4");
    }

    #[test]
    fn test_unusable_fields_take_defaults() {
        let payload = map_response(
            "Dev",
            raw(json!({
                "name": ["Ana"],
                "score_match": "high",
                "contacts": "none",
                "skills": "React",
                "missing_skills": {"name": "Go"},
                "experience": [{"title": "Intern"}, "Acme"],
                "qcm_cards": [{"options": ["a", "b"], "correct_answer": "first"}]
            })),
        );
        assert_eq!(payload.profile.name, "");
        assert_eq!(payload.match_score, 0);
        assert_eq!(payload.profile.contact, Contact::default());
        assert!(payload.skills.is_empty());
        assert!(payload.missing_skills.is_empty());
        assert_eq!(payload.experience.len(), 1);
        assert_eq!(payload.quiz[0].correct_index, 0);
    }

    #[test]
    fn test_recommendation_filter() {
        let payload = map_response(
            "Dev",
            raw(json!({"recommendations": ["", "**bold**", "- Do X", "  ", "Do Y", 7, null]})),
        );
        assert_eq!(
            payload.recommendations,
            vec![
                Recommendation {
                    id: 1,
                    text: "Do X".to_string(),
                    done: false
                },
                Recommendation {
                    id: 2,
                    text: "Do Y".to_string(),
                    done: false
                },
            ]
        );
    }

    #[test]
    fn test_absent_fields_default() {
        let payload = map_response("  Data Analyst ", RawAnalysisResponse::default());
        assert_eq!(payload.target_role, "Data Analyst");
        assert_eq!(payload.profile, Profile::default());
        assert_eq!(payload.match_score, 0);
        assert!(payload.skills.is_empty());
        assert!(payload.missing_skills.is_empty());
        assert!(payload.recommendations.is_empty());
        assert!(payload.quiz.is_empty());
        assert!(payload.experience.is_empty());
    }

    #[test]
    fn test_profile_and_score_mapping() {
        let payload = map_response(
            "Full Stack",
            raw(json!({
                "name": "Mohamed Ben Ali",
                "summary": "Student",
                "languages": ["French", "English", 3],
                "contacts": {"email": "m@x.tn", "phone": ["+216 98", "+216 22"]},
                "score_match": 154.6,
                "skills": [{"name": "React", "description": "Front-end library"}],
                "experience": [{"title": "Intern", "company": "Acme", "duration": ""}]
            })),
        );
        assert_eq!(payload.profile.name, "Mohamed Ben Ali");
        assert_eq!(payload.profile.languages, vec!["French", "English"]);
        assert_eq!(payload.profile.contact.phone, "+216 98");
        assert_eq!(payload.profile.contact.linkedin, "");
        assert_eq!(payload.match_score, 100);
        assert_eq!(payload.skills[0].category, SkillCategory::Web);
        assert_eq!(payload.skills[0].level, DEFAULT_SKILL_LEVEL);
        assert_eq!(payload.experience[0].duration, None);
        assert_eq!(payload.experience[0].description, "");
    }

    #[test]
    fn test_quiz_mapping_drops_out_of_range_cards() {
        let payload = map_response(
            "Dev",
            raw(json!({"qcm_cards": [
                {"question": "Q1", "options": ["a", "b", "c", "d"], "correct_answer": 1},
                {"question": "Q2", "options": ["a", "b"], "correct_answer": 5},
                {"question": "Q3", "options": ["a", "b", "c", "d"], "correct_answer": -1},
                {"question": "Q4", "options": [], "explanation": "none"},
                {"question": "Q5", "options": ["a", "b", "c"]}
            ]})),
        );
        let questions: Vec<&str> = payload.quiz.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(questions, vec!["Q1", "Q5"]);
        assert_eq!(payload.quiz[0].id, 1);
        assert_eq!(payload.quiz[0].correct_index, 1);
        assert_eq!(payload.quiz[1].id, 2);
        assert_eq!(payload.quiz[1].correct_index, 0);
    }
}
