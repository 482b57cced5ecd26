//! Canned-response chat assistant.

use serde::Serialize;
use tracing::debug;

use folio_core::config::AssistantConfig;

/// One assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    /// Matched topic, or `None` for the fallback.
    pub topic: Option<String>,
    /// Language the reply is in.
    pub language: String,
    /// Reply text.
    pub text: String,
}

/// Keyword lookup over the configured topics.
#[derive(Debug, Clone)]
pub struct Assistant {
    config: AssistantConfig,
}

impl Assistant {
    /// Creates an assistant from its configuration.
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }

    fn resolve_language(&self, requested: Option<&str>) -> String {
        let requested = requested.map(|l| l.trim().to_lowercase());
        match requested {
            Some(lang) if self.config.fallback.contains_key(&lang) => lang,
            _ => self.config.default_language.clone(),
        }
    }

    /// Reply of the first topic with a keyword contained in `message`,
    /// otherwise the fallback.
    pub fn reply(&self, message: &str, language: Option<&str>) -> AssistantReply {
        let language = self.resolve_language(language);
        let lowered = message.to_lowercase();

        let matched = self.config.topics.iter().find(|topic| {
            topic
                .keywords
                .iter()
                .any(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
        });

        let (topic, replies) = match matched {
            Some(t) => (Some(t.name.clone()), &t.replies),
            None => (None, &self.config.fallback),
        };
        let text = replies
            .get(&language)
            .or_else(|| replies.get(&self.config.default_language))
            .cloned()
            .unwrap_or_default();

        debug!(topic = topic.as_deref().unwrap_or("fallback"), %language, "Assistant reply");
        AssistantReply {
            topic,
            language,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant() -> Assistant {
        Assistant::new(AssistantConfig::default())
    }

    #[test]
    fn test_first_matching_topic_wins() {
        let reply = assistant().reply("What SKILLS and projects do you have?", None);
        assert_eq!(reply.topic.as_deref(), Some("skills"));
        assert_eq!(reply.language, "en");
        assert!(!reply.text.is_empty());
    }

    #[test]
    fn test_arabic_keywords_and_language() {
        let reply = assistant().reply("ما هي مهاراتك؟", Some("ar"));
        assert_eq!(reply.topic.as_deref(), Some("skills"));
        assert_eq!(reply.language, "ar");
        assert_ne!(reply.text, assistant().reply("skills", Some("en")).text);
    }

    #[test]
    fn test_fallback_and_unknown_language() {
        let reply = assistant().reply("zzz", Some("fr"));
        assert_eq!(reply.topic, None);
        assert_eq!(reply.language, "en");
        assert!(!reply.text.is_empty());
    }
}
