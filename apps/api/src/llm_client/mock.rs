//! Scripted `TextGenerator` for tests. Records every prompt it receives.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};

pub struct ScriptedGenerator {
    replies: Vec<String>,
    fail_at: Option<usize>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Answers call `i` with `replies[i]`, or `"reply {i}"` past the end.
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: replies.into_iter().map(str::to_string).collect(),
            fail_at: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Makes call number `index` (zero-based) fail with a 500.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let index = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        if self.fail_at == Some(index) {
            return Err(LlmError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            });
        }
        Ok(self
            .replies
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("reply {index}")))
    }
}
