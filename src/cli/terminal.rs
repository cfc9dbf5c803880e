use crate::channel::{ control_channel, ControlSender };
use crate::cli::ChatArgs;
use crate::client::HttpAnswerClient;
use crate::host::{ FrameSpec, HostController, PageSurface, ToggleSpec };
use crate::models::chat::{ MessageEntry, Role };
use crate::models::control::ControlSignal;
use crate::render::MarkdownRenderer;
use crate::widget::{
    CloseAction,
    ConversationWidget,
    Embedded,
    FrameEnvironment,
    Standalone,
    WidgetSurface,
};
use log::{ info, warn };
use std::error::Error;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::io::{ stdin, AsyncBufRead, AsyncBufReadExt, BufReader };

/// Prints the conversation to stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface;

fn speaker(entry: &MessageEntry) -> &'static str {
    match entry.role {
        Role::User => "you",
        Role::Assistant => "bot",
    }
}

impl WidgetSurface for TerminalSurface {
    fn entry_appended(&mut self, entry: &MessageEntry) {
        if entry.role == Role::User {
            // already echoed by the terminal
            return;
        }
        println!("[{}] {}", speaker(entry), entry.text);
    }

    fn entry_replaced(&mut self, entry: &MessageEntry) {
        println!("[{}] {}", speaker(entry), entry.text);
    }

    fn clear_input(&mut self) {}

    fn hide_root(&mut self) {
        println!("(chat hidden)");
    }

    fn reveal_standalone_toggle(&mut self) {}
}

/// Stand-in for the embedding page: reports what would change on screen.
#[derive(Debug, Default)]
pub struct TerminalPage;

impl PageSurface for TerminalPage {
    fn append_frame(&mut self, frame: &FrameSpec) {
        println!("(page) frame '{}' -> {}", frame.title, frame.src);
    }

    fn append_toggle(&mut self, toggle: &ToggleSpec) {
        println!("(page) toggle {} [{}]", toggle.glyph, toggle.aria_label);
    }

    fn show_frame(&mut self) {
        println!("(page) chat opened");
    }

    fn hide_frame(&mut self) {
        println!("(page) chat closed");
    }

    fn show_toggle(&mut self) {}

    fn focus_frame(&mut self) {}

    fn focus_toggle(&mut self) {}
}

pub async fn run(args: &ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let client = Arc::new(HttpAnswerClient::new(args.endpoint.clone()));
    let renderer = Arc::new(MarkdownRenderer::new());
    let input = BufReader::new(stdin());

    if !args.embedded {
        let mut widget = ConversationWidget::new(client, renderer, TerminalSurface, Standalone);
        return drive(&mut widget, input, None).await;
    }

    let mut host = HostController::new(TerminalPage);
    host.mount(args.script_src.as_deref(), &args.page_origin);

    let (tx, rx) = control_channel();
    let opener = tx.clone();
    let host_task = tokio::spawn(async move {
        host.listen(rx).await;
    });

    let mut widget = ConversationWidget::new(client, renderer, TerminalSurface, Embedded::new(tx));
    opener.post(ControlSignal::Open);
    drive(&mut widget, input, Some(&opener)).await?;

    // the host stops listening once every sender is gone
    drop(widget);
    drop(opener);
    host_task.await?;
    Ok(())
}

/// Reads lines until EOF or `/quit`. `/close` goes through the widget's close
/// control, `/open` is an external open signal to the host. Blank lines are
/// ignored by the widget itself.
async fn drive<S, F, R>(
    widget: &mut ConversationWidget<S, F>,
    input: R,
    opener: Option<&ControlSender>
) -> Result<(), Box<dyn Error + Send + Sync>>
    where S: WidgetSurface, F: FrameEnvironment, R: AsyncBufRead + Unpin
{
    println!("Commands: /close, /open, /quit");
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping unreadable input line: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match line.trim() {
            "/quit" => {
                break;
            }
            "/close" => {
                if widget.request_close() == CloseAction::HidLocally {
                    info!("Standalone widget closed");
                    break;
                }
            }
            "/open" => {
                match opener {
                    Some(opener) => opener.post(ControlSignal::Open),
                    None => println!("(no host page in standalone mode)"),
                }
            }
            _ => {
                widget.submit_query(&line).await;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AnswerClient;
    use crate::models::ask::{ AskOutcome, AskRequest };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoClient {
        queries: Mutex<Vec<String>>,
    }

    impl EchoClient {
        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnswerClient for EchoClient {
        async fn ask(&self, request: &AskRequest) -> AskOutcome {
            self.queries.lock().unwrap().push(request.query.clone());
            AskOutcome::Answer {
                answer: format!("echo: {}", request.query),
                confidence: None,
            }
        }
    }

    fn widget<F: FrameEnvironment>(
        client: Arc<EchoClient>,
        env: F
    ) -> ConversationWidget<TerminalSurface, F> {
        ConversationWidget::new(client, Arc::new(MarkdownRenderer::new()), TerminalSurface, env)
    }

    #[tokio::test]
    async fn submits_lines_but_not_blank_ones() {
        let client = Arc::new(EchoClient::default());
        let mut widget = widget(client.clone(), Standalone);

        drive(&mut widget, &b"   \nhello\n\n"[..], None).await.unwrap();

        assert_eq!(client.queries(), vec!["hello".to_string()]);
        assert_eq!(widget.log().len(), 3);
        assert_eq!(widget.log().entries()[2].text, "echo: hello");
    }

    #[tokio::test]
    async fn close_ends_a_standalone_session() {
        let client = Arc::new(EchoClient::default());
        let mut widget = widget(client.clone(), Standalone);

        drive(&mut widget, &b"/close\nafter close\n"[..], None).await.unwrap();

        assert!(client.queries().is_empty());
        assert_eq!(widget.log().len(), 1);
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let client = Arc::new(EchoClient::default());
        let mut widget = widget(client.clone(), Standalone);

        drive(&mut widget, &b"/quit\nignored\n"[..], None).await.unwrap();

        assert!(client.queries().is_empty());
    }

    #[tokio::test]
    async fn embedded_open_and_close_reach_the_host() {
        let client = Arc::new(EchoClient::default());
        let (tx, mut rx) = control_channel();
        let opener = tx.clone();
        let mut widget = widget(client.clone(), Embedded::new(tx));

        drive(&mut widget, &b"/open\n/close\nstill here\n"[..], Some(&opener)).await.unwrap();

        assert_eq!(rx.try_recv(), Some(json!("superion:open")));
        assert_eq!(rx.try_recv(), Some(json!("superion:close")));
        assert_eq!(rx.try_recv(), None);
        assert_eq!(client.queries(), vec!["still here".to_string()]);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped() {
        let client = Arc::new(EchoClient::default());
        let mut widget = widget(client.clone(), Standalone);

        drive(&mut widget, &b"\xff\xfe\nhello\n"[..], None).await.unwrap();

        assert_eq!(client.queries(), vec!["hello".to_string()]);
    }
}
