pub mod origin;

use crate::channel::ControlReceiver;
use crate::models::control::ControlSignal;
use log::{ debug, info };
use serde_json::Value;

pub const FRAME_TITLE: &str = "Superion Chatbot";
pub const TOGGLE_LABEL: &str = "Open chat";
pub const TOGGLE_GLYPH: &str = "✳";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Closed,
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSpec {
    pub src: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleSpec {
    pub aria_label: String,
    pub role: String,
    pub tab_index: i32,
    pub glyph: String,
}

impl Default for ToggleSpec {
    fn default() -> Self {
        Self {
            aria_label: TOGGLE_LABEL.to_string(),
            role: "button".to_string(),
            tab_index: 0,
            glyph: TOGGLE_GLYPH.to_string(),
        }
    }
}

/// User input arriving on the toggle element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleInput<'a> {
    Click,
    Key(&'a str),
}

/// The embedding page, as far as the host needs to touch it.
pub trait PageSurface {
    /// Appends the frame element, initially hidden.
    fn append_frame(&mut self, frame: &FrameSpec);
    /// Appends the toggle element, initially visible.
    fn append_toggle(&mut self, toggle: &ToggleSpec);
    fn show_frame(&mut self);
    fn hide_frame(&mut self);
    fn show_toggle(&mut self);
    fn focus_frame(&mut self);
    fn focus_toggle(&mut self);
}

/// Owns the toggle and the frame on the embedding page and tracks whether the
/// conversation is showing. Knows nothing about conversation content.
pub struct HostController<P: PageSurface> {
    page: P,
    visibility: Visibility,
    mounted: bool,
    frame_src: Option<String>,
}

impl<P: PageSurface> HostController<P> {
    pub fn new(page: P) -> Self {
        Self {
            page,
            visibility: Visibility::Closed,
            mounted: false,
            frame_src: None,
        }
    }

    /// Injects the frame and the toggle. Only the first call has any effect;
    /// returns whether this call mounted.
    pub fn mount(&mut self, script_src: Option<&str>, page_origin: &str) -> bool {
        if self.mounted {
            debug!("Widget already mounted, ignoring");
            return false;
        }

        let host = origin::resolve_frame_origin(script_src, page_origin);
        let frame = FrameSpec {
            src: origin::frame_src(&host),
            title: FRAME_TITLE.to_string(),
        };
        info!("Mounting chat frame from {}", frame.src);

        self.page.append_frame(&frame);
        self.page.append_toggle(&ToggleSpec::default());
        self.frame_src = Some(frame.src);
        self.mounted = true;
        true
    }

    pub fn activate_toggle(&mut self) {
        self.open();
    }

    /// Returns true when the input activated the toggle, in which case the
    /// default action of the key should be suppressed.
    pub fn on_toggle_input(&mut self, input: ToggleInput<'_>) -> bool {
        match input {
            ToggleInput::Click | ToggleInput::Key("Enter") | ToggleInput::Key(" ") => {
                self.activate_toggle();
                true
            }
            ToggleInput::Key(_) => false,
        }
    }

    pub fn receive_open_signal(&mut self) {
        self.open();
    }

    pub fn receive_close_signal(&mut self) {
        self.close();
    }

    /// Dispatches one payload from the control channel. Unrecognized payloads
    /// are other traffic on the same channel and are dropped.
    pub fn on_control_message(&mut self, payload: &Value) {
        match ControlSignal::from_payload(payload) {
            Some(ControlSignal::Close) => self.receive_close_signal(),
            Some(ControlSignal::Open) => self.receive_open_signal(),
            None => debug!("Ignoring unrelated channel payload"),
        }
    }

    /// Handles inbound payloads until every sender is gone.
    pub async fn listen(&mut self, mut rx: ControlReceiver) {
        while let Some(payload) = rx.recv().await {
            self.on_control_message(&payload);
        }
        debug!("Control channel closed");
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn frame_src(&self) -> Option<&str> {
        self.frame_src.as_deref()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    fn open(&mut self) {
        if !self.mounted || self.visibility == Visibility::Open {
            return;
        }
        // toggle stays rendered underneath the frame
        self.page.show_frame();
        self.page.focus_frame();
        self.visibility = Visibility::Open;
    }

    fn close(&mut self) {
        if !self.mounted || self.visibility == Visibility::Closed {
            return;
        }
        self.page.hide_frame();
        self.page.show_toggle();
        self.page.focus_toggle();
        self.visibility = Visibility::Closed;
    }
}
