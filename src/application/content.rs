//! Canned message content for onboarding and FAQ replies

use crate::domain::entities::ContentBlock;

/// Fallback FAQ link used when none is configured.
pub const DEFAULT_FAQ_URL: &str = "https://bit.ly/2IJSzNV";

fn welcome_message(faq_url: &str) -> String {
    format!(
        "Welcome! :wave:\n\n\
         *PLEASE READ THE FAQ before asking any questions:* {faq_url}\n\n\
         If your question is not answered in the FAQ feel free to ask it here.\n\
         *Please provide as much detail as possible* with your question in a thread.\n\
         We will get back to you *as soon as possible*.\n\n\
         Thank you - The Team"
    )
}

fn autoreply_message(faq_url: &str) -> String {
    format!(
        "Welcome! :wave:\n\n\
         *PLEASE READ THE FAQ:* {faq_url}\n\n\
         If your question is not answered in the FAQ someone will follow up in this thread.\n\
         If you want to *provide more information* please *add it to this thread*.\n\
         We will get back to you *as soon as possible*.\n\n\
         Thank you - The Team"
    )
}

/// Welcome block shown to users joining a channel.
pub fn welcome_block(faq_url: &str) -> ContentBlock {
    ContentBlock::section(welcome_message(faq_url))
}

/// Informational block posted when a trigger word fires.
pub fn autoreply_block(faq_url: &str) -> ContentBlock {
    ContentBlock::section(autoreply_message(faq_url))
}

/// One-line FAQ pointer.
pub fn faq_block(faq_url: &str) -> ContentBlock {
    ContentBlock::section(format!("*FAQ:* {faq_url}"))
}
