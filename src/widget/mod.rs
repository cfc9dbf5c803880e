pub mod context;
pub mod message_log;

use crate::channel::ControlSender;
use crate::client::AnswerClient;
use crate::models::ask::{ AskOutcome, AskRequest };
use crate::models::chat::{ Display, MessageEntry, Role };
use crate::models::control::ControlSignal;
use crate::render::{ render_or_raw, Renderer };
use self::context::extract_exchange_context;
use self::message_log::{ MessageLog, PlaceholderHandle };
use log::{ debug, info, warn };
use std::sync::Arc;
use thiserror::Error;

pub const GREETING: &str = "Hey! 👋 I'm your AI business assistant.\nHow can I help you today?";
pub const THINKING_TEXT: &str = "🤔 Thinking...";

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("embedding parent is not accessible: {0}")]
    Inaccessible(String),
}

/// Where the conversation is drawn.
pub trait WidgetSurface {
    fn entry_appended(&mut self, entry: &MessageEntry);
    fn entry_replaced(&mut self, entry: &MessageEntry);
    fn clear_input(&mut self);
    fn hide_root(&mut self);
    /// Shows the standalone toggle if the page has one.
    fn reveal_standalone_toggle(&mut self);
}

/// Answers whether the widget runs inside an embedding page. `Ok(None)` means
/// standalone.
pub trait FrameEnvironment {
    fn parent(&self) -> Result<Option<ControlSender>, EnvironmentError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Standalone;

impl FrameEnvironment for Standalone {
    fn parent(&self) -> Result<Option<ControlSender>, EnvironmentError> {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct Embedded {
    parent: ControlSender,
}

impl Embedded {
    pub fn new(parent: ControlSender) -> Self {
        Self { parent }
    }
}

impl FrameEnvironment for Embedded {
    fn parent(&self) -> Result<Option<ControlSender>, EnvironmentError> {
        Ok(Some(self.parent.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Embedded: the host was asked to hide the frame.
    SignalledParent,
    /// Standalone: the widget hid itself.
    HidLocally,
}

/// A submission waiting for its answer. Owns the placeholder it will replace.
#[derive(Debug)]
pub struct PendingSubmission {
    placeholder: PlaceholderHandle,
    request: AskRequest,
}

impl PendingSubmission {
    pub fn request(&self) -> &AskRequest {
        &self.request
    }

    pub fn placeholder_ordinal(&self) -> usize {
        self.placeholder.ordinal()
    }
}

pub struct ConversationWidget<S: WidgetSurface, F: FrameEnvironment> {
    log: MessageLog,
    client: Arc<dyn AnswerClient>,
    renderer: Arc<dyn Renderer>,
    surface: S,
    environment: F,
}

impl<S: WidgetSurface, F: FrameEnvironment> ConversationWidget<S, F> {
    /// Creates the widget with its log seeded by the greeting.
    pub fn new(
        client: Arc<dyn AnswerClient>,
        renderer: Arc<dyn Renderer>,
        surface: S,
        environment: F
    ) -> Self {
        let mut widget = Self {
            log: MessageLog::new(),
            client,
            renderer,
            surface,
            environment,
        };
        widget.append_assistant_markdown(GREETING);
        widget
    }

    /// Runs one full submission. `None` when the input was blank and nothing
    /// was sent.
    pub async fn submit_query(&mut self, input: &str) -> Option<AskOutcome> {
        let pending = self.begin_submission(input)?;
        let outcome = self.client.ask(pending.request()).await;
        self.complete_submission(pending, &outcome);
        Some(outcome)
    }

    /// Appends the user entry and its placeholder and builds the request.
    /// Context is taken before the placeholder exists so it cannot leak into
    /// its own request.
    pub fn begin_submission(&mut self, input: &str) -> Option<PendingSubmission> {
        let query = input.trim();
        if query.is_empty() {
            debug!("Ignoring blank submission");
            return None;
        }

        let entry = self.log.append(Role::User, query, false, Display::Plain(query.to_string()));
        self.surface.entry_appended(entry);
        self.surface.clear_input();

        let context = extract_exchange_context(self.log.entries());
        let placeholder = self.log.append_placeholder(THINKING_TEXT);
        if let Some(entry) = self.log.get(placeholder.ordinal()) {
            self.surface.entry_appended(entry);
        }

        let request = AskRequest::new(query).with_context(
            &context.previous_user_query,
            &context.previous_assistant_answer
        );
        Some(PendingSubmission { placeholder, request })
    }

    /// Replaces the submission's placeholder with the reply for `outcome`.
    pub fn complete_submission(&mut self, pending: PendingSubmission, outcome: &AskOutcome) {
        let reply = outcome.reply_text();
        let display = render_or_raw(self.renderer.as_ref(), &reply);
        let ordinal = pending.placeholder_ordinal();

        match self.log.replace_placeholder(pending.placeholder, reply, display) {
            Some(entry) => self.surface.entry_replaced(entry),
            None => warn!("Placeholder #{} does not belong to this conversation", ordinal),
        }
    }

    /// Embedded: asks the host to close and leaves local state alone.
    /// Standalone: hides the widget and shows its toggle.
    pub fn request_close(&mut self) -> CloseAction {
        match self.environment.parent() {
            Ok(Some(parent)) => {
                info!("Requesting close from embedding page");
                parent.post(ControlSignal::Close);
                CloseAction::SignalledParent
            }
            Ok(None) => {
                self.surface.hide_root();
                self.surface.reveal_standalone_toggle();
                CloseAction::HidLocally
            }
            Err(e) => {
                debug!("Treating widget as standalone: {}", e);
                self.surface.hide_root();
                CloseAction::HidLocally
            }
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn append_assistant_markdown(&mut self, text: &str) {
        let display = render_or_raw(self.renderer.as_ref(), text);
        let entry = self.log.append(Role::Assistant, text, true, display);
        self.surface.entry_appended(entry);
    }
}
