// src/report.rs
//! Dashboard helpers over a normalized analysis

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::types::{AnalysisPayload, Skill, SkillCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score <= 40 {
            ScoreBand::Low
        } else if score <= 70 {
            ScoreBand::Medium
        } else {
            ScoreBand::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment<'a> {
    Plain(&'a str),
    Bold(&'a str),
}

fn bold_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("Invalid bold regex"))
}

/// Split `**bold**` runs out of a recommendation text. A run holds no `*`;
/// unmatched markers stay plain text.
pub fn split_emphasis(text: &str) -> Vec<TextSegment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in bold_regex().captures_iter(text) {
        let (Some(run), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if run.start() > last {
            segments.push(TextSegment::Plain(&text[last..run.start()]));
        }
        segments.push(TextSegment::Bold(inner.as_str()));
        last = run.end();
    }

    if last < text.len() {
        segments.push(TextSegment::Plain(&text[last..]));
    }
    segments
}

impl AnalysisPayload {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.match_score)
    }

    /// Flip a recommendation's done flag, false when the id is unknown
    pub fn toggle_recommendation(&mut self, id: u32) -> bool {
        match self.recommendations.iter_mut().find(|r| r.id == id) {
            Some(recommendation) => {
                recommendation.done = !recommendation.done;
                true
            }
            None => false,
        }
    }

    pub fn completed_recommendations(&self) -> usize {
        self.recommendations.iter().filter(|r| r.done).count()
    }

    /// Skills per category, input order kept inside each group
    pub fn skills_by_category(&self) -> BTreeMap<SkillCategory, Vec<&Skill>> {
        let mut groups: BTreeMap<SkillCategory, Vec<&Skill>> = BTreeMap::new();
        for skill in &self.skills {
            groups.entry(skill.category).or_default().push(skill);
        }
        groups
    }
}
