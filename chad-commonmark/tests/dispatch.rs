#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
use std::{
  cell::RefCell,
  panic::{AssertUnwindSafe, catch_unwind},
  rc::Rc,
  time::Duration,
};

use chad_commonmark::{
  ChatView,
  ClickOutcome,
  EventBus,
  MarkdownOptions,
  MarkdownProcessor,
  NavigationEvent,
  dispatch::{
    COPIED_LABEL,
    CopyVariant,
    MemoryClipboard,
    UnavailableClipboard,
    dom::has_class,
  },
  viewer::{PdfMeta, PdfNavigator},
};
use tokio::{task, time::sleep};

fn render(md: &str) -> String {
  MarkdownProcessor::new(MarkdownOptions {
    highlight_code: false,
    ..MarkdownOptions::chat()
  })
  .render_html(md)
}

fn mount(md: &str) -> (ChatView<MemoryClipboard>, Rc<MemoryClipboard>) {
  let clipboard = Rc::new(MemoryClipboard::new());
  let view = ChatView::mount(&render(md), Rc::clone(&clipboard), EventBus::new());
  (view, clipboard)
}

fn recorder(
  bus: &EventBus<NavigationEvent>,
) -> Rc<RefCell<Vec<NavigationEvent>>> {
  let seen = Rc::new(RefCell::new(Vec::new()));
  let sink = Rc::clone(&seen);
  bus.subscribe(move |event: &NavigationEvent| {
    sink.borrow_mut().push(event.clone());
  });
  seen
}

#[tokio::test(start_paused = true)]
async fn test_block_copy_shows_feedback_then_reverts() {
  let (view, clipboard) = mount("```py\nprint(\"<hi>\")\n```\n");
  let button = view.select_first(".copy-code-button").expect("button");
  let icon = view.select_first(".copy-icon").expect("icon");
  let original_label = button.text_contents();

  let outcome = view.click(&icon);
  assert_eq!(outcome, ClickOutcome::Copy {
    variant: CopyVariant::Block,
    text:    "print(\"<hi>\")\n".to_string(),
  });

  view
    .run_until(async {
      sleep(Duration::from_millis(1)).await;
      assert_eq!(clipboard.contents().as_deref(), Some("print(\"<hi>\")\n"));
      assert!(has_class(&button, "copied"));
      assert_eq!(button.text_contents(), COPIED_LABEL);

      sleep(Duration::from_millis(1998)).await;
      assert!(has_class(&button, "copied"));

      sleep(Duration::from_millis(2)).await;
    })
    .await;

  assert!(!has_class(&button, "copied"));
  assert_eq!(button.text_contents(), original_label);
  assert!(view.select_first(".copy-code-button .copy-icon").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_feedback_is_independent_per_block() {
  let (view, _clipboard) = mount("```\none\n```\n\n```\ntwo\n```\n");
  let buttons = view.select_all(".copy-code-button");
  assert_eq!(buttons.len(), 2);

  view
    .run_until(async {
      view.click(&buttons[0]);
      sleep(Duration::from_millis(1000)).await;
      view.click(&buttons[1]);
      sleep(Duration::from_millis(1001)).await;

      assert!(!has_class(&buttons[0], "copied"));
      assert!(has_class(&buttons[1], "copied"));

      sleep(Duration::from_millis(1000)).await;
      assert!(!has_class(&buttons[1], "copied"));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_second_click_does_not_restart_feedback() {
  let (view, clipboard) = mount("```\ncode\n```\n");
  let button = view.select_first(".copy-code-button").expect("button");

  view
    .run_until(async {
      view.click(&button);
      sleep(Duration::from_millis(1000)).await;
      view.click(&button);
      sleep(Duration::from_millis(1001)).await;
    })
    .await;

  assert_eq!(clipboard.write_count(), 2);
  assert!(!has_class(&button, "copied"));
  assert_eq!(button.text_contents(), "📋 Copy");
}

#[tokio::test(start_paused = true)]
async fn test_inline_copy_has_no_feedback() {
  let (view, clipboard) = mount("Run `cargo test` now.");
  let button = view
    .select_first(".copy-inline-code-button")
    .expect("inline button");

  let outcome = view.click(&button);
  assert_eq!(outcome, ClickOutcome::Copy {
    variant: CopyVariant::Inline,
    text:    "cargo test".to_string(),
  });

  view.run_until(sleep(Duration::from_millis(1))).await;
  assert_eq!(clipboard.contents().as_deref(), Some("cargo test"));
  assert!(!has_class(&button, "copied"));
}

#[tokio::test(start_paused = true)]
async fn test_clipboard_failure_shows_no_feedback() {
  let view = ChatView::mount(
    &render("```\ncode\n```\n"),
    Rc::new(UnavailableClipboard),
    EventBus::new(),
  );
  let button = view.select_first(".copy-code-button").expect("button");

  assert!(matches!(view.click(&button), ClickOutcome::Copy { .. }));
  view.run_until(sleep(Duration::from_millis(1))).await;
  assert!(!has_class(&button, "copied"));
}

#[tokio::test(start_paused = true)]
async fn test_unmount_ignores_clicks_and_cancels_timers() {
  let (mut view, clipboard) = mount("```\ncode\n```\n");
  let button = view.select_first(".copy-code-button").expect("button");

  view.click(&button);
  view.run_until(sleep(Duration::from_millis(1))).await;
  assert_eq!(view.pending_tasks(), 1);

  view.unmount();
  assert!(!view.is_mounted());
  assert_eq!(view.pending_tasks(), 0);
  assert_eq!(view.click(&button), ClickOutcome::Ignored);
  assert_eq!(clipboard.write_count(), 1);

  // Still usable as a plain future once unmounted.
  assert_eq!(view.run_until(async { 7 }).await, 7);
}

#[tokio::test]
async fn test_copy_click_on_a_plain_runtime() {
  let (view, clipboard) = mount("```\ncode\n```\n");
  let button = view.select_first(".copy-code-button").expect("button");

  let outcome = catch_unwind(AssertUnwindSafe(|| view.click(&button)));
  assert!(matches!(outcome, Ok(ClickOutcome::Copy { .. })));

  view.run_until(task::yield_now()).await;
  assert_eq!(clipboard.contents().as_deref(), Some("code\n"));
}

#[test]
fn test_copy_click_without_a_runtime_queues_the_write() {
  let (view, clipboard) = mount("Run `ls`.");
  let button = view
    .select_first(".copy-inline-code-button")
    .expect("inline button");

  let outcome = catch_unwind(AssertUnwindSafe(|| view.click(&button)));
  assert!(matches!(outcome, Ok(ClickOutcome::Copy { .. })));
  assert_eq!(view.pending_tasks(), 1);
  assert_eq!(clipboard.write_count(), 0);
}

#[test]
fn test_navigation_click_publishes_event() {
  let bus = EventBus::new();
  let seen = recorder(&bus);
  let view = ChatView::mount(
    &render("Open <!-- pdfnav: name=\"notes.pdf\" page=5 id=doc1 -->."),
    Rc::new(MemoryClipboard::new()),
    bus,
  );
  let button = view.select_first(".pdf-nav-button").expect("nav button");
  assert_eq!(button.text_contents(), "notes.pdf, Page 5");

  let outcome = view.click(&button);
  let expected = NavigationEvent {
    pdf_id:      "doc1".to_string(),
    page_number: 5,
  };
  assert_eq!(outcome, ClickOutcome::Navigate {
    event:      expected.clone(),
    deliveries: 1,
  });
  assert_eq!(*seen.borrow(), vec![expected]);
}

#[test]
fn test_unsubscribed_handler_receives_nothing() {
  let bus = EventBus::new();
  let count = Rc::new(RefCell::new(0));
  let token = {
    let count = Rc::clone(&count);
    bus.subscribe(move |_: &NavigationEvent| *count.borrow_mut() += 1)
  };
  let view = ChatView::mount(
    &render("<!-- pdfnav: name=\"a.pdf\" page=1 id=a -->\n"),
    Rc::new(MemoryClipboard::new()),
    bus.clone(),
  );
  bus.unsubscribe(token);

  let button = view.select_first(".pdf-nav-button").expect("nav button");
  assert!(matches!(
    view.click(&button),
    ClickOutcome::Navigate { deliveries: 0, .. }
  ));
  assert_eq!(*count.borrow(), 0);
}

#[test]
fn test_malformed_navigation_payload_is_ignored() {
  let bus = EventBus::new();
  let seen = recorder(&bus);
  let view = ChatView::mount(
    "<button class=\"pdf-nav-button\" data-pdf-id=\"\" \
     data-page-number=\"3\">a</button><button class=\"pdf-nav-button\" \
     data-pdf-id=\"x\" data-page-number=\"three\">b</button><button \
     class=\"pdf-nav-button\" data-pdf-id=\"x\">c</button>",
    Rc::new(MemoryClipboard::new()),
    bus,
  );

  for button in view.select_all(".pdf-nav-button") {
    assert_eq!(view.click(&button), ClickOutcome::Ignored);
  }
  assert!(seen.borrow().is_empty());
}

#[test]
fn test_clicks_elsewhere_are_ignored() {
  let (view, clipboard) = mount("Just **text**.");
  let strong = view.select_first("strong").expect("strong");
  assert_eq!(view.click(&strong), ClickOutcome::Ignored);
  assert_eq!(clipboard.write_count(), 0);
}

#[test]
fn test_navigation_reaches_the_viewer() {
  let bus = EventBus::new();
  let mut navigator = PdfNavigator::new(vec![PdfMeta {
    id:         "abc123".to_string(),
    name:       "report.pdf".to_string(),
    page_count: Some(20),
  }]);
  navigator.attach(&bus);

  let view = ChatView::mount(
    &render(
      r#"See <!-- pdfnav: name="report.pdf" page=3 id=abc123 --> for details."#,
    ),
    Rc::new(MemoryClipboard::new()),
    bus,
  );
  let button = view.select_first(".pdf-nav-button").expect("nav button");
  view.click(&button);

  assert_eq!(
    navigator.selected().map(|pdf| pdf.id),
    Some("abc123".to_string())
  );
  assert_eq!(navigator.target_page().map(|page| page.get()), Some(3));
}
