//! Conversation controller: message log, selected model, and the busy gate.
//!
//! All state is mutated by the owner of [`ConversationController`]. Chat turns run
//! as spawned tasks and report back over a channel; the owner applies them with
//! [`ConversationController::poll_completions`] (UI loop) or
//! [`ConversationController::next_completion`] (async callers).

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::core::llm::{ChatError, ChatRouter};
use crate::core::message::Message;
use crate::core::models::{Model, ModelRegistry};

/// Snapshot of a conversation, published to subscribers after every change.
#[derive(Debug, Clone)]
pub struct ConversationState {
    /// Insertion order is display order.
    pub messages: Vec<Message>,
    pub selected_model: Model,
    /// True from the user message until its assistant reply is appended.
    pub is_busy: bool,
}

/// Why `send_message` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    Blank,
    Busy,
}

/// Handle to an in-flight chat turn.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: u64,
    /// Model the reply will be attributed to.
    pub model_id: String,
    cancel: CancellationToken,
}

impl PendingRequest {
    /// Best-effort cancellation. The turn still completes with a "cancelled" reply.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[derive(Debug)]
pub enum SendOutcome {
    Sent(PendingRequest),
    Ignored(IgnoredReason),
}

struct Completion {
    request_id: u64,
    model: Model,
    result: Result<String, ChatError>,
}

pub struct ConversationController {
    router: Arc<ChatRouter>,
    models: ModelRegistry,
    state: ConversationState,
    snapshots: watch::Sender<ConversationState>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    runtime: Handle,
    /// Cancelled on drop; every request token is a child of it.
    lifetime: CancellationToken,
    in_flight: Option<PendingRequest>,
    next_request_id: u64,
}

impl ConversationController {
    /// Create an empty conversation with `initial_model` selected (registry default if unknown).
    /// Chat turns are spawned on `runtime`.
    pub fn new(
        router: Arc<ChatRouter>,
        models: ModelRegistry,
        initial_model: &str,
        runtime: Handle,
    ) -> Self {
        let selected_model = models
            .find(initial_model)
            .unwrap_or_else(|| models.default_model())
            .clone();
        let state = ConversationState {
            messages: Vec::new(),
            selected_model,
            is_busy: false,
        };
        let (snapshots, _) = watch::channel(state.clone());
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            router,
            models,
            state,
            snapshots,
            completions_tx,
            completions_rx,
            runtime,
            lifetime: CancellationToken::new(),
            in_flight: None,
            next_request_id: 1,
        }
    }

    pub fn list_models(&self) -> &[Model] {
        self.models.list()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.snapshots.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }

    /// Append a user message and start the chat turn.
    /// Blank text and sends while a turn is in flight are ignored.
    pub fn send_message(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored(IgnoredReason::Blank);
        }
        if self.state.is_busy {
            log::debug!("send ignored: request already in flight");
            return SendOutcome::Ignored(IgnoredReason::Busy);
        }

        self.state.messages.push(Message::user(text));
        self.state.is_busy = true;
        self.publish();

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let model = self.state.selected_model.clone();
        let cancel = self.lifetime.child_token();
        let pending = PendingRequest {
            id: request_id,
            model_id: model.id.clone(),
            cancel: cancel.clone(),
        };
        self.in_flight = Some(pending.clone());

        let router = Arc::clone(&self.router);
        let tx = self.completions_tx.clone();
        let text = text.to_string();
        log::info!("request {} -> {}", request_id, model.id);
        let route_model = model.clone();
        let route = self
            .runtime
            .spawn(async move { router.route(&route_model, &text).await });
        let abort = route.abort_handle();
        self.runtime.spawn(async move {
            // The route runs in its own task so a panic still produces a completion.
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    abort.abort();
                    Err(ChatError::Cancelled)
                }
                joined = route => {
                    joined.unwrap_or_else(|e| Err(ChatError::Aborted(e.to_string())))
                }
            };
            let _ = tx.send(Completion {
                request_id,
                model,
                result,
            });
        });

        SendOutcome::Sent(pending)
    }

    /// Change the model used for the next send. In-flight turns keep their model.
    pub fn select_model(&mut self, model_id: &str) -> Result<&Model, ChatError> {
        let model = self
            .models
            .find(model_id)
            .cloned()
            .ok_or_else(|| ChatError::UnsupportedModel {
                model_id: model_id.to_string(),
                provider: "configured".to_string(),
            })?;
        self.state.selected_model = model;
        self.publish();
        Ok(&self.state.selected_model)
    }

    /// Remove all messages. An in-flight reply is still appended when it arrives.
    pub fn clear_chat(&mut self) {
        self.state.messages.clear();
        self.publish();
    }

    /// Cancel the in-flight turn, if any. Returns true if there was one.
    pub fn cancel_pending(&mut self) -> bool {
        match &self.in_flight {
            Some(pending) => {
                pending.cancel();
                true
            }
            None => false,
        }
    }

    /// Apply every completion that has already arrived. Returns how many were applied.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the in-flight turn and return the assistant message it appended.
    /// Returns None immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Message> {
        if !self.state.is_busy {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        self.apply(completion);
        self.state.messages.last().cloned()
    }

    fn apply(&mut self, completion: Completion) {
        let Completion {
            request_id,
            model,
            result,
        } = completion;
        if self.in_flight.as_ref().is_some_and(|p| p.id == request_id) {
            self.in_flight = None;
        }
        let message = match result {
            Ok(text) => {
                log::info!("request {} completed ({} chars)", request_id, text.len());
                Message::assistant(text, &model)
            }
            Err(e) => {
                log::warn!(
                    "request {} failed (retryable: {}): {}",
                    request_id,
                    e.is_retryable(),
                    e
                );
                Message::assistant_error(&e, &model)
            }
        };
        self.state.messages.push(message);
        self.state.is_busy = false;
        self.publish();
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
