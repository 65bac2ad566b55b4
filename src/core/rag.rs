use crate::core::WineApi;
use crate::domain::model::{RagAnswerResponse, WineSearchResult};
use crate::utils::error::{Result, WineError};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Network,
    Cache,
}

#[derive(Debug, Clone)]
pub struct RagOutcome {
    pub query: String,
    pub answer: RagAnswerResponse,
    pub source: AnswerSource,
}

impl RagOutcome {
    /// 把來源轉成搜尋結果的格式，方便以同一種清單顯示
    pub fn source_wines(&self) -> Vec<WineSearchResult> {
        self.answer.sources.iter().map(WineSearchResult::from).collect()
    }
}

/// 自然語言問答；同一個問題（去除前後空白後）只會向後端詢問一次
pub struct RagSession<A: WineApi> {
    api: Arc<A>,
    cache: HashMap<String, RagAnswerResponse>,
    submitted: bool,
}

impl<A: WineApi> RagSession<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            cache: HashMap::new(),
            submitted: false,
        }
    }

    pub async fn ask(&mut self, query: &str) -> Result<RagOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WineError::validation("Question cannot be empty"));
        }

        if let Some(cached) = self.cache.get(query) {
            tracing::debug!("Serving cached answer for: {}", query);
            self.submitted = true;
            return Ok(RagOutcome {
                query: query.to_string(),
                answer: cached.clone(),
                source: AnswerSource::Cache,
            });
        }

        let answer = self.api.rag_answer(query).await?;
        tracing::debug!("Answer received with {} sources", answer.sources.len());
        self.cache.insert(query.to_string(), answer.clone());
        self.submitted = true;

        Ok(RagOutcome {
            query: query.to_string(),
            answer,
            source: AnswerSource::Network,
        })
    }

    pub fn cached(&self, query: &str) -> Option<&RagAnswerResponse> {
        self.cache.get(query.trim())
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }
}
