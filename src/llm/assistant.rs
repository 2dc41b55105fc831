use log::{info, warn};

use crate::briefing::render_briefing;
use crate::error::Result;
use crate::llm::client::ChatClient;
use crate::llm::prompts::{system_prompt, ASSISTANT_NAME, REPORT_INSTRUCTION};
use crate::llm::types::{ChatMessage, SlideOutline};
use crate::Dashboard;

/// Chat assistant that answers questions about a dashboard.
pub struct FinanceAssistant {
    client: ChatClient,
    name: String,
}

impl FinanceAssistant {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            name: ASSISTANT_NAME.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask a single question about the dashboard.
    pub async fn ask(&self, question: &str, dashboard: &Dashboard) -> Result<String> {
        self.ask_with_history(question, &[], dashboard).await
    }

    /// Ask a follow-up question. `history` holds the earlier user and assistant turns.
    pub async fn ask_with_history(
        &self,
        question: &str,
        history: &[ChatMessage],
        dashboard: &Dashboard,
    ) -> Result<String> {
        let messages = self.build_messages(question, history, dashboard);
        info!("{}: answering question about '{}'", self.name, dashboard.title);
        self.client.complete(&messages).await
    }

    /// Asks the model for a slide-by-slide outline of a report deck.
    pub async fn draft_report(&self, dashboard: &Dashboard) -> Result<Vec<SlideOutline>> {
        let messages = self.build_messages(REPORT_INSTRUCTION, &[], dashboard);
        info!("{}: drafting report for '{}'", self.name, dashboard.title);

        let reply = self.client.complete(&messages).await?;
        let slides: Vec<SlideOutline> = serde_json::from_str(strip_code_fence(&reply))?;

        if slides.is_empty() {
            warn!("{}: model returned an empty slide outline", self.name);
        }
        Ok(slides)
    }

    pub(crate) fn build_messages(
        &self,
        question: &str,
        history: &[ChatMessage],
        dashboard: &Dashboard,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(format!(
            "{}\n\n---\n\n{}",
            system_prompt(&self.name),
            render_briefing(dashboard)
        )));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(question));
        messages
    }
}

/// Models often wrap JSON in a ```json fence despite being told not to.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
