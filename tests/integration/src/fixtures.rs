//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique suffix for test data, stable within a process
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{n}", std::process::id())
}

/// Unique user id in the identity provider's format
pub fn unique_user() -> String {
    format!("user_it_{}", unique_suffix().replace('-', "_"))
}

/// Create poll request
#[derive(Debug, Clone, Serialize)]
pub struct CreatePollRequest {
    pub title: String,
    pub core_question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polis_id: Option<String>,
    pub visibility: String,
    pub statements: Vec<String>,
}

impl CreatePollRequest {
    pub fn unique() -> Self {
        Self {
            title: format!("Integration poll {}", unique_suffix()),
            core_question: "What do you think?".to_string(),
            slug: None,
            polis_id: None,
            visibility: "public".to_string(),
            statements: vec![
                "First statement".to_string(),
                "Second statement".to_string(),
                "Third statement".to_string(),
            ],
        }
    }

    pub fn private() -> Self {
        Self {
            visibility: "private".to_string(),
            ..Self::unique()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PollBody {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub owner_id: String,
    pub share_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatementBody {
    pub id: i64,
    pub poll_id: i64,
    pub text: String,
    pub author_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionBody {
    pub poll_id: i64,
    pub active: Option<StatementBody>,
    pub remaining: usize,
    pub exhausted: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReactBody {
    pub next: Option<StatementBody>,
    pub remaining: usize,
    pub exhausted: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBody {
    pub id: i64,
    pub statement_id: i64,
    pub valence: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatementResultBody {
    pub statement_id: i64,
    pub text: String,
    pub agree: i64,
    pub disagree: i64,
    pub skip: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct ResultsBody {
    pub respondent_count: i64,
    pub statements: Vec<StatementResultBody>,
}

/// Body of `POST .../session/react`
pub fn react(statement_id: i64, valence: &str) -> serde_json::Value {
    serde_json::json!({ "statement_id": statement_id, "valence": valence })
}
