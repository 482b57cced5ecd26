//! Chat widget configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canned-response chat widget configuration.
///
/// Topics are checked in order; the first topic with any keyword contained
/// in the lowercased question wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Language used when a request names none or an unknown one.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Ordered keyword topics.
    #[serde(default = "default_topics")]
    pub topics: Vec<AssistantTopic>,
    /// Reply per language when no topic matches.
    #[serde(default = "default_fallback")]
    pub fallback: HashMap<String, String>,
}

/// A keyword topic and its reply per language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantTopic {
    /// Topic name, for logs.
    pub name: String,
    /// Lowercase keywords matched as substrings.
    pub keywords: Vec<String>,
    /// Reply per language code.
    pub replies: HashMap<String, String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            topics: default_topics(),
            fallback: default_fallback(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn topic(name: &str, keywords: &[&str], en: &str, ar: &str) -> AssistantTopic {
    AssistantTopic {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        replies: HashMap::from([
            ("en".to_string(), en.to_string()),
            ("ar".to_string(), ar.to_string()),
        ]),
    }
}

fn default_topics() -> Vec<AssistantTopic> {
    vec![
        topic(
            "skills",
            &["skill", "مهار", "tech"],
            "I work across web and mobile development, from interface design to backend services.",
            "أعمل في تطوير الويب والتطبيقات، من تصميم الواجهات إلى الخدمات الخلفية.",
        ),
        topic(
            "experience",
            &["experience", "خبر", "year"],
            "I have several years of hands-on experience delivering production projects.",
            "لدي سنوات من الخبرة العملية في تسليم مشاريع حقيقية.",
        ),
        topic(
            "contact",
            &["hire", "work", "وظف", "عمل", "contact", "تواصل"],
            "I am open to new work. Use the contact section of this site to get in touch.",
            "أنا متاح لأعمال جديدة. استخدم قسم التواصل في هذا الموقع للتواصل معي.",
        ),
        topic(
            "projects",
            &["project", "مشروع", "portfolio", "أعمال"],
            "Browse the gallery above to see recent projects and their screenshots.",
            "تصفح المعرض أعلاه لرؤية أحدث المشاريع وصورها.",
        ),
        topic(
            "greeting",
            &["hello", "hi", "مرحب", "اهلا", "hey"],
            "Hello! Ask me about skills, experience, projects, or how to get in touch.",
            "مرحباً! اسألني عن المهارات أو الخبرة أو المشاريع أو طريقة التواصل.",
        ),
        topic(
            "age",
            &["age", "old", "عمر", "سن"],
            "That is a personal detail I keep off this site, but I am happy to talk about my work.",
            "هذه معلومة شخصية لا أنشرها هنا، لكن يسعدني الحديث عن عملي.",
        ),
        topic(
            "pricing",
            &["price", "cost", "سعر", "تكلفة"],
            "Pricing depends on scope. Share your project details through the contact section for a quote.",
            "السعر يعتمد على حجم العمل. شارك تفاصيل مشروعك عبر قسم التواصل للحصول على عرض.",
        ),
    ]
}

fn default_fallback() -> HashMap<String, String> {
    HashMap::from([
        (
            "en".to_string(),
            "Thanks for the question! Try asking about skills, experience, projects, or contact."
                .to_string(),
        ),
        (
            "ar".to_string(),
            "شكراً لسؤالك! جرّب السؤال عن المهارات أو الخبرة أو المشاريع أو التواصل.".to_string(),
        ),
    ])
}
