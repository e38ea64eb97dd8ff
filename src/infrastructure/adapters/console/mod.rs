//! Console intake for development/testing
//!
//! Feeds the dispatcher from stdin, one event callback payload as JSON
//! per line. The production webhook endpoint lives outside this crate;
//! this intake exercises the same decode boundary.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::dispatcher::Dispatcher;
use crate::application::errors::BotError;
use crate::domain::traits::Gateway;
use crate::infrastructure::adapters::slack::decode_event;

pub struct ConsoleIntake;

impl ConsoleIntake {
    /// Read JSON-line payloads from stdin until EOF, dispatching each
    /// decodable event. Undecodable lines are logged and skipped.
    pub async fn run<G: Gateway>(dispatcher: &Dispatcher<G>) -> Result<(), BotError> {
        tracing::info!("console intake started; feed one event payload per line");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(e.to_string()))?
        {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let payload: serde_json::Value = match serde_json::from_str(line) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!("skipping unparseable payload: {}", err);
                    continue;
                }
            };
            match decode_event(&payload) {
                Some(event) => dispatcher.dispatch(event).await,
                None => tracing::debug!("ignoring unrecognized event payload"),
            }
        }

        tracing::info!("console intake closed");
        Ok(())
    }
}
