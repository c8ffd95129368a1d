//! Test utilities.
//!
//! `ScriptedModel` stands in for the chat model so chain, tool, and agent
//! tests run deterministically without network access, while SPARQL still
//! executes against a real store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm::{ChatModel, ModelError};

/// A chat model that replays a fixed list of responses in order and records
/// every prompt it is shown. Clones share state, so a test can keep a clone
/// as a probe after handing the model to a chain.
#[derive(Clone)]
pub struct ScriptedModel {
    inner: Arc<Inner>,
}

struct Inner {
    responses: Vec<String>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(Inner {
                responses: responses.into_iter().map(Into::into).collect(),
                index: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Prompts seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.inner.prompts.lock().expect("prompt log poisoned").clone()
    }

    /// Number of responses consumed so far.
    pub fn calls(&self) -> usize {
        self.inner.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.inner
            .prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        let index = self.inner.index.fetch_add(1, Ordering::SeqCst);
        self.inner.responses.get(index).cloned().ok_or_else(|| {
            ModelError::new(format!(
                "scripted model exhausted after {} responses",
                self.inner.responses.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_responses_in_order() {
        let model = ScriptedModel::new(["first", "second"]);
        assert_eq!(model.generate("a").await.unwrap(), "first");
        assert_eq!(model.generate("b").await.unwrap(), "second");
        assert_eq!(model.calls(), 2);
        assert_eq!(model.prompts(), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_exhaustion_is_an_error() {
        let model = ScriptedModel::new(Vec::<String>::new());
        let err = model.generate("a").await.unwrap_err();
        assert!(err.to_string().contains("exhausted"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let model = ScriptedModel::new(["only"]);
        let probe = model.clone();
        model.generate("seen").await.unwrap();
        assert_eq!(probe.prompts(), ["seen"]);
        assert_eq!(probe.calls(), 1);
    }
}
