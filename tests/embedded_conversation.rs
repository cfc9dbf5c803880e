use serde_json::json;
use std::sync::Arc;
use superion_widget::channel::control_channel;
use superion_widget::client::HttpAnswerClient;
use superion_widget::host::{ FrameSpec, HostController, PageSurface, ToggleSpec, Visibility };
use superion_widget::models::chat::MessageEntry;
use superion_widget::render::MarkdownRenderer;
use superion_widget::widget::{ CloseAction, ConversationWidget, Embedded, WidgetSurface };
use wiremock::matchers::{ body_json, method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

#[derive(Default)]
struct Page {
    frames: usize,
    toggles: usize,
    frame_visible: bool,
    toggle_focused: bool,
}

impl PageSurface for Page {
    fn append_frame(&mut self, _frame: &FrameSpec) {
        self.frames += 1;
    }
    fn append_toggle(&mut self, _toggle: &ToggleSpec) {
        self.toggles += 1;
    }
    fn show_frame(&mut self) {
        self.frame_visible = true;
        self.toggle_focused = false;
    }
    fn hide_frame(&mut self) {
        self.frame_visible = false;
    }
    fn show_toggle(&mut self) {}
    fn focus_frame(&mut self) {}
    fn focus_toggle(&mut self) {
        self.toggle_focused = true;
    }
}

#[derive(Default)]
struct Frame {
    hidden: bool,
    replaced: Vec<usize>,
}

impl WidgetSurface for Frame {
    fn entry_appended(&mut self, _entry: &MessageEntry) {}
    fn entry_replaced(&mut self, entry: &MessageEntry) {
        self.replaced.push(entry.ordinal);
    }
    fn clear_input(&mut self) {}
    fn hide_root(&mut self) {
        self.hidden = true;
    }
    fn reveal_standalone_toggle(&mut self) {}
}

#[tokio::test]
async fn close_from_widget_hides_frame_on_host() {
    let mut host = HostController::new(Page::default());
    host.mount(Some("https://bot.example.com/static/embed.js"), "https://shop.test");
    host.mount(Some("https://bot.example.com/static/embed.js"), "https://shop.test");
    host.activate_toggle();
    assert_eq!(host.visibility(), Visibility::Open);

    let (tx, rx) = control_channel();
    let host_task = tokio::spawn(async move {
        host.listen(rx).await;
        host
    });

    let endpoint = MockServer::start().await;
    let mut widget = ConversationWidget::new(
        Arc::new(HttpAnswerClient::new(endpoint.uri())),
        Arc::new(MarkdownRenderer::new()),
        Frame::default(),
        Embedded::new(tx.clone())
    );

    assert_eq!(widget.request_close(), CloseAction::SignalledParent);
    assert!(!widget.surface().hidden);
    tx.post_raw(json!({ "source": "analytics" }));
    drop(tx);
    drop(widget);

    let host = host_task.await.unwrap();
    assert_eq!(host.visibility(), Visibility::Closed);
    assert_eq!(host.page().frames, 1);
    assert_eq!(host.page().toggles, 1);
    assert!(!host.page().frame_visible);
    assert!(host.page().toggle_focused);
}

#[tokio::test]
async fn follow_up_carries_previous_exchange() {
    let endpoint = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({
            "query": "Tell me pricing strategies",
            "prev_user_query": "Tell me pricing strategies",
            "prev_assistant_answer": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "Try **value based** pricing." })))
        .expect(1)
        .mount(&endpoint).await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({
            "query": "can you suggest any from this?",
            "prev_user_query": "can you suggest any from this?",
            "prev_assistant_answer": "Try **value based** pricing."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&endpoint).await;

    let (tx, _rx) = control_channel();
    let mut widget = ConversationWidget::new(
        Arc::new(HttpAnswerClient::new(endpoint.uri())),
        Arc::new(MarkdownRenderer::new()),
        Frame::default(),
        Embedded::new(tx)
    );

    widget.submit_query("Tell me pricing strategies").await;
    widget.submit_query("  ").await;
    widget.submit_query("can you suggest any from this?").await;

    let texts: Vec<_> = widget.log().entries().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts.len(), 5);
    assert_eq!(texts[2], "Try **value based** pricing.");
    assert_eq!(texts[4], "No response received.");
    assert_eq!(widget.surface().replaced, vec![2, 4]);
}
