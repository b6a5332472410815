//! Controller-facing message catalogs.
//!
//! The onboarding controller appends a handful of fixed assistant texts to
//! the transcript (seed greeting, failure fallbacks, save confirmation).
//! They come from an injected `Translator` so tests can run against a known
//! catalog and the wizard can serve Hindi-speaking owners.

use std::sync::Arc;

/// Source of the fixed assistant-side texts used by the session controller.
pub trait Translator: Send + Sync {
    /// Seed greeting for a fresh transcript.
    fn greeting(&self) -> String;

    /// Fallback appended when the chat-completion call fails.
    fn chat_failed(&self) -> String;

    /// Fallback appended when saving the business fails.
    fn save_failed(&self) -> String;

    /// Confirmation appended after the business is persisted.
    fn saved_confirmation(&self, business_name: &str) -> String;
}

/// English catalog (default).
pub struct EnglishCatalog;

impl Translator for EnglishCatalog {
    fn greeting(&self) -> String {
        "Hey there! 👋 Welcome to BotBuilder — I'll help you set up a WhatsApp \
         bot for your business in just a few minutes.\n\nTo get started, what \
         kind of business do you run?"
            .to_string()
    }

    fn chat_failed(&self) -> String {
        "Oops, I couldn't process that. Please check your connection and try \
         again! 🙏"
            .to_string()
    }

    fn save_failed(&self) -> String {
        "Something went wrong saving your business. Please try again."
            .to_string()
    }

    fn saved_confirmation(&self, business_name: &str) -> String {
        format!(
            "🎉 Your business \"{business_name}\" has been set up! Head over to \
             Inventory to add your products, then check your Dashboard to see \
             your bot in action."
        )
    }
}

/// Hindi catalog.
pub struct HindiCatalog;

impl Translator for HindiCatalog {
    fn greeting(&self) -> String {
        "नमस्ते! 👋 BotBuilder में आपका स्वागत है — मैं कुछ ही मिनटों में आपके \
         व्यवसाय के लिए WhatsApp बॉट सेट करने में मदद करूँगा।\n\nशुरू करने के \
         लिए बताइए, आप किस तरह का व्यवसाय चलाते हैं?"
            .to_string()
    }

    fn chat_failed(&self) -> String {
        "माफ़ कीजिए, यह प्रोसेस नहीं हो पाया। कृपया अपना कनेक्शन जाँचें और फिर \
         से कोशिश करें! 🙏"
            .to_string()
    }

    fn save_failed(&self) -> String {
        "आपका व्यवसाय सेव करते समय कुछ गड़बड़ हो गई। कृपया फिर से कोशिश करें।"
            .to_string()
    }

    fn saved_confirmation(&self, business_name: &str) -> String {
        format!(
            "🎉 आपका व्यवसाय \"{business_name}\" सेट हो गया है! Inventory में \
             जाकर अपने प्रोडक्ट जोड़ें, फिर Dashboard पर अपना बॉट देखें।"
        )
    }
}

/// Pick a catalog by language tag. Unknown tags fall back to English.
pub fn catalog_for(lang: &str) -> Arc<dyn Translator> {
    match lang.to_ascii_lowercase().as_str() {
        "hi" | "hindi" => Arc::new(HindiCatalog),
        _ => Arc::new(EnglishCatalog),
    }
}
