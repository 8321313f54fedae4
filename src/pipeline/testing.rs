//! Scripted stand-ins for the provider traits

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    provider::{ChatMessage, ImageSource, Role, SamplingParams, TextGenerator},
};

/// Replays queued completion answers in order; chat calls answer
/// `paragraph <n>`
pub struct ScriptedGenerator {
    answers: Mutex<VecDeque<String>>,
    completions: Mutex<usize>,
    chat_contexts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            completions: Mutex::new(0),
            chat_contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn completions(&self) -> usize {
        *self.completions.lock().unwrap()
    }

    pub fn chats(&self) -> usize {
        self.chat_contexts.lock().unwrap().len()
    }

    /// Assistant messages seen by each chat call
    pub fn chat_contexts(&self) -> Vec<String> {
        self.chat_contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, _prompt: &str, _params: &SamplingParams) -> AppResult<String> {
        *self.completions.lock().unwrap() += 1;
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn chat(&self, messages: &[ChatMessage], _params: &SamplingParams) -> AppResult<String> {
        let context = messages
            .iter()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let mut contexts = self.chat_contexts.lock().unwrap();
        contexts.push(context);
        Ok(format!("paragraph {}", contexts.len()))
    }
}

/// Resolves every description to a deterministic URL
pub struct FixedImages;

#[async_trait]
impl ImageSource for FixedImages {
    async fn resolve(&self, description: &str) -> AppResult<String> {
        Ok(format!(
            "https://images.test/photo?{}",
            description.replace(' ', "%20")
        ))
    }
}
