// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingestion controller.
//!
//! Each text message of an authenticated webhook delivery walks the states
//! of [`IngestState`] in order. A failure anywhere is logged with the last
//! state reached and answered with a best-effort apology; nothing is
//! propagated to the HTTP layer.

use std::sync::Arc;

use chrono::DateTime;
use kedai_context::{OrderPipeline, ReplyGenerator};
use kedai_core::{
    ConversationStore, DeliveryAdapter, IncomingOutcome, Intent, KedaiError, NewIncoming,
};
use kedai_router::IntentClassifier;
use kedai_whatsapp::{InboundText, WebhookPayload};
use tracing::{debug, error, info, warn};

/// Sent when processing a message fails.
pub const APOLOGY_REPLY: &str = "Maaf, terjadi error di server saya 🙏";

/// Progress of one inbound message through the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Validated,
    ContactUpserted,
    ConversationResolved,
    MessagePersisted,
    Classified,
    PipelineRun,
    ReplyGenerated,
    ReplyPersisted,
    Delivered,
}

impl std::fmt::Display for IngestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestState::Validated => write!(f, "validated"),
            IngestState::ContactUpserted => write!(f, "contact_upserted"),
            IngestState::ConversationResolved => write!(f, "conversation_resolved"),
            IngestState::MessagePersisted => write!(f, "message_persisted"),
            IngestState::Classified => write!(f, "classified"),
            IngestState::PipelineRun => write!(f, "pipeline_run"),
            IngestState::ReplyGenerated => write!(f, "reply_generated"),
            IngestState::ReplyPersisted => write!(f, "reply_persisted"),
            IngestState::Delivered => write!(f, "delivered"),
        }
    }
}

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A reply was generated, persisted and handed to delivery.
    Replied { intent: Intent },
    /// The channel message id was already stored.
    Duplicate,
    /// Nothing to process (malformed payload, status callback, no text).
    Ignored,
    /// Processing stopped after `state`.
    Failed { state: IngestState },
}

impl IngestOutcome {
    pub fn is_replied(&self) -> bool {
        matches!(self, IngestOutcome::Replied { .. })
    }
}

/// Drives inbound messages from webhook payload to delivered reply.
pub struct IngestController {
    store: Arc<dyn ConversationStore>,
    classifier: IntentClassifier,
    pipeline: OrderPipeline,
    replies: ReplyGenerator,
    delivery: Arc<dyn DeliveryAdapter>,
}

/// Per-message progress carried across states.
struct Progress {
    state: IngestState,
    contact_id: Option<i64>,
}

impl Progress {
    fn advance(&mut self, state: IngestState) {
        self.state = state;
        debug!(contact_id = ?self.contact_id, state = %state, "ingest state");
    }
}

impl IngestController {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        classifier: IntentClassifier,
        pipeline: OrderPipeline,
        replies: ReplyGenerator,
        delivery: Arc<dyn DeliveryAdapter>,
    ) -> Self {
        Self {
            store,
            classifier,
            pipeline,
            replies,
            delivery,
        }
    }

    /// Processes an authenticated raw webhook body.
    ///
    /// Messages are handled one after another in payload order. A body that
    /// is not a webhook payload, or carries no text, yields a single
    /// [`IngestOutcome::Ignored`].
    pub async fn ingest_payload(&self, raw: &[u8]) -> Vec<IngestOutcome> {
        let Some(payload) = WebhookPayload::parse(raw) else {
            debug!("webhook body is not a payload, ignoring");
            return vec![IngestOutcome::Ignored];
        };
        let messages = payload.text_messages();
        if messages.is_empty() {
            debug!("webhook payload carries no text messages");
            return vec![IngestOutcome::Ignored];
        }

        let mut outcomes = Vec::with_capacity(messages.len());
        for message in &messages {
            outcomes.push(self.handle(message).await);
        }
        outcomes
    }

    /// Processes one inbound text message.
    pub async fn handle(&self, message: &InboundText) -> IngestOutcome {
        let mut progress = Progress {
            state: IngestState::Validated,
            contact_id: None,
        };

        match self.process(message, &mut progress).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    wa_id = %message.wa_id,
                    state = %progress.state,
                    error = %e,
                    "failed to process inbound message"
                );
                if let Some(contact_id) = progress.contact_id {
                    self.apologize(&message.wa_id, contact_id).await;
                }
                IngestOutcome::Failed {
                    state: progress.state,
                }
            }
        }
    }

    async fn process(
        &self,
        message: &InboundText,
        progress: &mut Progress,
    ) -> Result<IngestOutcome, KedaiError> {
        info!(wa_id = %message.wa_id, message_id = %message.message_id, "inbound message");

        if self.store.has_incoming(&message.message_id).await? {
            info!(message_id = %message.message_id, "duplicate delivery, skipping");
            return Ok(IngestOutcome::Duplicate);
        }

        let contact = self
            .store
            .upsert_contact(&message.wa_id, message.profile_name.as_deref())
            .await?;
        progress.contact_id = Some(contact.id);
        progress.advance(IngestState::ContactUpserted);

        let conversation = self.store.open_conversation(contact.id).await?;
        progress.advance(IngestState::ConversationResolved);

        let incoming = match self
            .store
            .record_incoming(NewIncoming {
                conversation_id: conversation.id,
                contact_id: contact.id,
                wa_message_id: message.message_id.clone(),
                text: message.text.clone(),
                timestamp: message.timestamp.as_deref().and_then(unix_to_iso),
            })
            .await?
        {
            IncomingOutcome::Created(incoming) => incoming,
            IncomingOutcome::Duplicate => {
                info!(message_id = %message.message_id, "concurrent duplicate delivery, skipping");
                return Ok(IngestOutcome::Duplicate);
            }
        };
        progress.advance(IngestState::MessagePersisted);

        let record = self.classifier.classify(&message.text).await;
        progress.advance(IngestState::Classified);

        let outcome = self.pipeline.run(&record).await;
        progress.advance(IngestState::PipelineRun);

        let reply = self
            .replies
            .generate(conversation.id, Some(incoming.id), &outcome.context, &message.text)
            .await;
        progress.advance(IngestState::ReplyGenerated);

        self.store
            .record_outgoing(conversation.id, contact.id, &reply)
            .await?;
        progress.advance(IngestState::ReplyPersisted);

        if let Err(e) = self.delivery.send_text(&message.wa_id, &reply).await {
            warn!(wa_id = %message.wa_id, error = %e, "reply delivery failed");
        }
        progress.advance(IngestState::Delivered);

        info!(wa_id = %message.wa_id, intent = %outcome.intent, "reply sent");
        Ok(IngestOutcome::Replied {
            intent: outcome.intent,
        })
    }

    /// Persists and sends [`APOLOGY_REPLY`] on the contact's OPEN conversation.
    async fn apologize(&self, wa_id: &str, contact_id: i64) {
        let conversation = match self.store.find_open_conversation(contact_id).await {
            Ok(Some(conversation)) => conversation,
            Ok(None) => {
                debug!(contact_id, "no open conversation, skipping apology");
                return;
            }
            Err(e) => {
                warn!(contact_id, error = %e, "could not look up conversation for apology");
                return;
            }
        };

        if let Err(e) = self
            .store
            .record_outgoing(conversation.id, contact_id, APOLOGY_REPLY)
            .await
        {
            warn!(contact_id, error = %e, "failed to persist apology");
        }
        if let Err(e) = self.delivery.send_text(wa_id, APOLOGY_REPLY).await {
            warn!(contact_id, error = %e, "failed to deliver apology");
        }
    }
}

/// Platform unix-seconds timestamp as the store's ISO-8601 form.
fn unix_to_iso(raw: &str) -> Option<String> {
    let secs = raw.trim().parse::<i64>().ok()?;
    let at = DateTime::from_timestamp(secs, 0)?;
    Some(at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}
