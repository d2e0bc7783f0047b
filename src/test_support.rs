// src/test_support.rs
//! Shared fixtures for unit tests

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::core::storage::{MemoryStorage, StorageBackend};
use crate::types::{
    AnalysisPayload, Contact, MissingSkill, Priority, Profile, QuizItem, Recommendation, Skill,
    SkillCategory,
};

pub fn sample_payload(name: &str, score: u8) -> AnalysisPayload {
    AnalysisPayload {
        target_role: "Full Stack Developer".to_string(),
        profile: Profile {
            name: name.to_string(),
            summary: "Computer science student".to_string(),
            languages: vec!["French".to_string(), "English".to_string()],
            contact: Contact {
                email: "candidate@example.com".to_string(),
                phone: "+216 98 123 456".to_string(),
                linkedin: String::new(),
            },
        },
        match_score: score,
        skills: vec![Skill {
            name: "Docker".to_string(),
            description: "Containerization".to_string(),
            level: 65,
            category: SkillCategory::DevOps,
        }],
        missing_skills: vec![MissingSkill {
            name: "TypeScript".to_string(),
            priority: Priority::High,
            skill_type: "Skill".to_string(),
        }],
        recommendations: vec![Recommendation {
            id: 1,
            text: "Build a **full-stack** portfolio".to_string(),
            done: false,
        }],
        quiz: vec![
            quiz_item(1, "What does REST stand for?", 1),
            quiz_item(2, "Which command creates a branch?", 2),
        ],
        experience: vec![],
    }
}

pub fn quiz_item(id: u32, question: &str, correct_index: usize) -> QuizItem {
    QuizItem {
        id,
        question: question.to_string(),
        options: vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "D".to_string(),
        ],
        correct_index,
        explanation: String::new(),
    }
}

/// Memory storage whose writes can be made to fail on demand
#[derive(Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
}

impl FlakyStorage {
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("Simulated storage failure");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FlakyStorage {
    async fn read(&self, slot: &str) -> Result<Option<String>> {
        self.inner.read(slot).await
    }

    async fn write(&self, slot: &str, value: &str) -> Result<()> {
        self.check()?;
        self.inner.write(slot, value).await
    }

    async fn remove(&self, slot: &str) -> Result<()> {
        self.check()?;
        self.inner.remove(slot).await
    }
}

/// Serve one canned HTTP response and return the raw request
pub async fn one_shot_server(status_line: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if n == 0 || text.contains("--\r\n") {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{}", addr), handle)
}
