//! Remote high score leaderboard
//!
//! The score service is a single HTTP endpoint: GET returns the top ten as
//! `{"scores": [[name, score, level], ...]}` and POST records a new entry.
//! Failures never reach the game; they are logged and surface as "no table".

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of entries the service returns
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest player name the service stores
pub const MAX_NAME_LEN: usize = 20;

/// A single high score entry (a `[name, score, level]` triple on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u32, u32)", into = "(String, u32, u32)")]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    /// Level reached
    pub level: u32,
}

impl From<(String, u32, u32)> for HighScoreEntry {
    fn from((name, score, level): (String, u32, u32)) -> Self {
        Self { name, score, level }
    }
}

impl From<HighScoreEntry> for (String, u32, u32) {
    fn from(entry: HighScoreEntry) -> Self {
        (entry.name, entry.score, entry.level)
    }
}

#[derive(Debug, Error)]
pub enum ScoreServiceError {
    #[error("score service returned HTTP {status}")]
    Http { status: u16 },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed score data: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ScoresResponse {
    #[serde(default)]
    scores: Vec<HighScoreEntry>,
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    name: &'a str,
    score: u32,
    level: u32,
}

/// Decode a GET response body
pub fn parse_scores(body: &str) -> Result<Vec<HighScoreEntry>, ScoreServiceError> {
    let response: ScoresResponse = serde_json::from_str(body)?;
    Ok(response.scores)
}

/// Encode a POST body, cutting the name to `MAX_NAME_LEN` characters
pub fn submission_body(name: &str, score: u32, level: u32) -> Result<String, ScoreServiceError> {
    let name = match name.char_indices().nth(MAX_NAME_LEN) {
        Some((cut, _)) => &name[..cut],
        None => name,
    };
    Ok(serde_json::to_string(&Submission { name, score, level })?)
}

/// One line of the displayed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    /// 1-indexed position
    pub rank: usize,
    /// Shown verbatim; never parse it as markup
    pub name: String,
    pub score: u32,
    pub level: u32,
    /// Highlighted as the player's own result
    pub current: bool,
}

/// High score table as fetched from the service (best first)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    pub fn new(entries: Vec<HighScoreEntry>) -> Self {
        Self { entries }
    }

    /// Whether `score` would make the table. An empty table is treated as
    /// unknown and never qualifies.
    pub fn is_high_score(&self, score: u32) -> bool {
        match self.entries.last() {
            None => false,
            Some(lowest) => self.entries.len() < MAX_HIGH_SCORES || score > lowest.score,
        }
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn rank_of(&self, score: u32) -> Option<usize> {
        if !self.is_high_score(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Entries to highlight as the player's own
    pub fn is_current(&self, index: usize, score: u32) -> bool {
        self.entries.get(index).is_some_and(|e| e.score == score)
    }

    /// Table rows for a player who just scored `score`
    pub fn rows(&self, score: u32) -> Vec<ScoreRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| ScoreRow {
                rank: i + 1,
                name: entry.name.clone(),
                score: entry.score,
                level: entry.level,
                current: self.is_current(i, score),
            })
            .collect()
    }
}

/// Client for the score endpoint
#[derive(Debug, Clone)]
pub struct ScoreClient {
    endpoint: String,
}

impl ScoreClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current table; None on any failure
    #[cfg(target_arch = "wasm32")]
    pub async fn fetch_high_scores(&self) -> Option<Vec<HighScoreEntry>> {
        match self.try_fetch().await {
            Ok(scores) => {
                log::info!("Fetched {} high scores", scores.len());
                Some(scores)
            }
            Err(e) => {
                log::error!("Error fetching high scores: {}", e);
                None
            }
        }
    }

    /// Record a score; false on any failure
    #[cfg(target_arch = "wasm32")]
    pub async fn submit_score(&self, name: &str, score: u32, level: u32) -> bool {
        match self.try_submit(name, score, level).await {
            Ok(()) => {
                log::info!("Submitted score {} (level {})", score, level);
                true
            }
            Err(e) => {
                log::error!("Error submitting score: {}", e);
                false
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn try_fetch(&self) -> Result<Vec<HighScoreEntry>, ScoreServiceError> {
        use gloo_net::http::Request;

        let response = Request::get(&self.endpoint)
            .send()
            .await
            .map_err(|e| ScoreServiceError::Transport(e.to_string()))?;
        if !response.ok() {
            return Err(ScoreServiceError::Http {
                status: response.status(),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| ScoreServiceError::Transport(e.to_string()))?;
        parse_scores(&body)
    }

    #[cfg(target_arch = "wasm32")]
    async fn try_submit(
        &self,
        name: &str,
        score: u32,
        level: u32,
    ) -> Result<(), ScoreServiceError> {
        use gloo_net::http::Request;

        // Plain-text body: the endpoint doesn't answer CORS preflights
        let body = submission_body(name, score, level)?;
        let response = Request::post(&self.endpoint)
            .body(body)
            .map_err(|e| ScoreServiceError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ScoreServiceError::Transport(e.to_string()))?;
        if !response.ok() {
            return Err(ScoreServiceError::Http {
                status: response.status(),
            });
        }
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn fetch_high_scores(&self) -> Option<Vec<HighScoreEntry>> {
        log::warn!("High scores unavailable natively ({})", self.endpoint);
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub async fn submit_score(&self, _name: &str, _score: u32, _level: u32) -> bool {
        log::warn!("Score submission unavailable natively ({})", self.endpoint);
        false
    }
}
