// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock natural-language classifier with scripted replies.

use std::sync::Mutex;

use async_trait::async_trait;

use brandbot_core::BrandbotError;
use brandbot_core::traits::IntentClassifier;

/// What the mock classifier should do on the next call.
#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Fail(String),
}

/// A classifier returning scripted replies and counting prompts.
#[derive(Default)]
pub struct MockClassifier {
    script: Mutex<Vec<Script>>,
    prompts: Mutex<Vec<String>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw completion text to return.
    pub fn reply_with(&self, text: impl Into<String>) {
        self.script.lock().unwrap().push(Script::Reply(text.into()));
    }

    /// Queue an error for the next call.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.script.lock().unwrap().push(Script::Fail(message.into()));
    }

    /// All prompts the classifier was asked, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(&self, prompt: &str) -> Result<String, BrandbotError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                None
            } else {
                Some(script.remove(0))
            }
        };
        match next {
            Some(Script::Reply(text)) => Ok(text),
            Some(Script::Fail(message)) => Err(BrandbotError::Classifier {
                message,
                source: None,
            }),
            None => Err(BrandbotError::Classifier {
                message: "mock classifier has no scripted reply".into(),
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_replies_in_order() {
        let classifier = MockClassifier::new();
        classifier.reply_with(r#"{"category":"logo"}"#);
        classifier.fail_with("service unavailable");

        assert!(classifier.classify("first").await.is_ok());
        assert!(classifier.classify("second").await.is_err());
        assert_eq!(classifier.call_count(), 2);
        assert_eq!(classifier.prompts()[0], "first");
    }
}
