//! Career Compass: CV analysis history and dashboard model.
//!
//! The crate uploads a CV and a target role to a remote analysis service,
//! normalizes the loosely typed response into an [`AnalysisPayload`], keeps a
//! persisted newest-first history of analyses and drives the self-quiz.

/// Log through `tracing` at the given level: `app_log!(info, "...", args)`
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

pub mod core;
pub mod history;
pub mod mapper;
pub mod quiz;
pub mod report;
pub mod submission;
pub mod types;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::core::{AnalysisClient, ConfigManager, StorageBackend};
pub use history::HistoryStore;
pub use mapper::map_response;
pub use quiz::{QuizSession, QuizState};
pub use report::ScoreBand;
pub use submission::{submit_analysis, CvUpload, SubmissionError};
pub use types::{AnalysisPayload, AnalysisRecord};
pub use web::start_web_server;
