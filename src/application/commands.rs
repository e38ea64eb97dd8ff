//! Command table - static mapping from command token to response

use std::collections::HashMap;

use crate::application::content;
use crate::domain::entities::Response;

/// Static table of text commands and their canned responses.
///
/// Built once at startup. The `!commands` and `!help` entries are derived
/// from the full installed token set, themselves included, so the listing
/// always matches what the table actually serves.
pub struct CommandTable {
    commands: HashMap<String, Response>,
}

impl CommandTable {
    pub fn build(faq_url: &str) -> Self {
        let mut commands = HashMap::new();
        commands.insert(
            "!welcome".to_string(),
            Response::block(content::welcome_block(faq_url)),
        );
        commands.insert(
            "!onboard".to_string(),
            Response::block(content::welcome_block(faq_url)),
        );
        commands.insert(
            "!question".to_string(),
            Response::block(content::autoreply_block(faq_url)),
        );
        commands.insert(
            "!faq".to_string(),
            Response::block(content::faq_block(faq_url)),
        );
        commands.insert("!ping".to_string(), Response::text("pong"));

        let mut tokens: Vec<String> = commands.keys().cloned().collect();
        tokens.push("!commands".to_string());
        tokens.push("!help".to_string());
        tokens.sort();
        let listing = tokens.join("\n");
        commands.insert("!commands".to_string(), Response::text(listing.clone()));
        commands.insert("!help".to_string(), Response::text(listing));

        Self { commands }
    }

    /// Look up a command by its whole text, case-insensitive and trimmed.
    pub fn get(&self, token: &str) -> Option<&Response> {
        self.commands.get(&token.trim().to_lowercase())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
