use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use campus_core::components::{
  NotificationCenter,
  SearchBox,
  SearchStep,
  StatsPanel,
  Uploader
};
use campus_core::config::{
  EndpointConfig,
  SearchConfig,
  UploadConfig
};
use campus_core::intake::FileMeta;
use campus_core::notify::{
  Notifier,
  Severity
};
use campus_core::{
  Api,
  ApiError
};
use serde_json::{
  Value,
  json
};

/// Canned responses keyed by URL; every
/// call is recorded.
#[derive(Default)]
struct FakeApi {
  responses:
    RefCell<BTreeMap<String, Result<Value, ApiError>>>,
  calls:     RefCell<Vec<(String, String)>>
}

impl FakeApi {
  fn respond(
    &self,
    url: &str,
    response: Result<Value, ApiError>
  ) {
    self
      .responses
      .borrow_mut()
      .insert(url.to_string(), response);
  }

  fn calls(&self) -> Vec<(String, String)> {
    self.calls.borrow().clone()
  }

  fn answer(
    &self,
    method: &str,
    url: &str
  ) -> Result<Value, ApiError> {
    self.calls.borrow_mut().push((
      method.to_string(),
      url.to_string()
    ));
    self
      .responses
      .borrow()
      .get(url)
      .cloned()
      .unwrap_or_else(|| {
        Err(ApiError::Status {
          url:    url.to_string(),
          status: 404
        })
      })
  }
}

impl Api for FakeApi {
  async fn get(
    &self,
    url: &str
  ) -> Result<Value, ApiError> {
    self.answer("GET", url)
  }

  async fn post(
    &self,
    url: &str,
    _body: &Value
  ) -> Result<Value, ApiError> {
    self.answer("POST", url)
  }

  async fn get_text(
    &self,
    url: &str
  ) -> Result<String, ApiError> {
    self
      .answer("GET", url)
      .map(|value| value.to_string())
  }
}

#[derive(Default)]
struct RecordingNotifier {
  toasts: RefCell<Vec<(String, Severity)>>
}

impl Notifier for RecordingNotifier {
  fn notify_with(
    &self,
    message: &str,
    severity: Severity,
    _duration: Option<Duration>
  ) {
    self
      .toasts
      .borrow_mut()
      .push((message.to_string(), severity));
  }
}

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_env_filter("campus_core=debug")
    .try_init();
}

const RECENT: &str =
  "/notifications/ajax/recent-notifications/";
const UNREAD: &str =
  "/notifications/ajax/unread-count/";

fn seeded_center()
-> (Rc<FakeApi>, NotificationCenter<FakeApi>)
{
  let api = Rc::new(FakeApi::default());
  api.respond(
    RECENT,
    Ok(json!({
      "notifications": [
        {"id": 1, "is_read": false, "title": "Fee due"},
        {"id": 2, "is_read": true, "title": "Welcome"}
      ]
    }))
  );
  api.respond(UNREAD, Ok(json!({"count": 1})));
  api.respond(
    "/notifications/1/mark-read/",
    Ok(json!({"success": true}))
  );
  api.respond(
    "/notifications/2/mark-read/",
    Ok(json!({"success": true}))
  );
  api.respond(
    "/notifications/99/mark-read/",
    Ok(json!({"success": true}))
  );
  let center = NotificationCenter::new(
    Rc::clone(&api),
    EndpointConfig::default()
  );
  (api, center)
}

#[tokio::test]
async fn notification_center_loads_list_then_count()
 {
  init_tracing();
  let (api, center) = seeded_center();

  center.activate().await;

  let state = center.store().snapshot();
  assert_eq!(state.notifications.len(), 2);
  assert_eq!(state.unread_count, 1);
  assert!(!state.loading);
  assert_eq!(
    api.calls(),
    vec![
      ("GET".to_string(), RECENT.to_string()),
      ("GET".to_string(), UNREAD.to_string())
    ]
  );
}

#[tokio::test]
async fn unread_count_never_goes_negative()
 {
  init_tracing();
  let (_api, center) = seeded_center();
  center.activate().await;

  for id in [1, 1, 2, 99, 1, 2] {
    center.mark_as_read(id).await;
  }

  let state = center.store().snapshot();
  assert_eq!(state.unread_count, 0);
  assert!(
    state
      .notifications
      .iter()
      .all(|n| n.is_read)
  );
}

#[tokio::test]
async fn acknowledging_a_read_item_still_decrements()
 {
  init_tracing();
  let (api, center) = seeded_center();
  api.respond(UNREAD, Ok(json!({"count": 3})));
  center.activate().await;
  assert_eq!(
    center.store().snapshot().unread_count,
    3
  );

  center.mark_as_read(2).await;
  let state = center.store().snapshot();
  assert_eq!(state.unread_count, 2);
  assert!(state.notifications[1].is_read);

  center.mark_as_read(99).await;
  assert_eq!(
    center.store().snapshot().unread_count,
    2
  );
}

#[tokio::test]
async fn failed_acknowledgement_leaves_state_alone()
 {
  init_tracing();
  let (api, center) = seeded_center();
  center.activate().await;
  api.respond(
    "/notifications/1/mark-read/",
    Err(ApiError::MissingToken)
  );

  let before = center.store().snapshot();
  center.mark_as_read(1).await;
  assert_eq!(
    center.store().snapshot(),
    before
  );
}

#[tokio::test]
async fn failed_loads_fall_back_to_empty_state()
 {
  init_tracing();
  let api = Rc::new(FakeApi::default());
  api.respond(
    RECENT,
    Err(ApiError::network(
      RECENT, "offline"
    ))
  );
  api.respond(
    UNREAD,
    Ok(json!({"unexpected": true}))
  );
  let center = NotificationCenter::new(
    Rc::clone(&api),
    EndpointConfig::default()
  );

  center.activate().await;
  let state = center.store().snapshot();
  assert!(state.notifications.is_empty());
  assert_eq!(state.unread_count, 0);
  assert!(!state.loading);
}

fn search_box(
  api: &Rc<FakeApi>
) -> SearchBox<FakeApi> {
  SearchBox::new(
    Rc::clone(api),
    SearchConfig {
      url: "/students/search/".to_string(),
      ..SearchConfig::default()
    }
  )
}

#[tokio::test]
async fn burst_of_keystrokes_sends_one_request_for_final_query()
 {
  init_tracing();
  let api = Rc::new(FakeApi::default());
  api.respond(
    "/students/search/?q=maria",
    Ok(json!({"results": [{"id": 3, "name": "Maria"}]}))
  );
  let search = search_box(&api);

  let tickets: Vec<_> = ["ma", "mar", "mari", "maria"]
    .into_iter()
    .filter_map(|query| {
      match search.input(query) {
        | SearchStep::Scheduled(ticket) => {
          Some(ticket)
        }
        | SearchStep::Cleared => None
      }
    })
    .collect();
  assert_eq!(tickets.len(), 4);
  assert_eq!(
    search.debounce(),
    Duration::from_millis(300)
  );

  // Timers that escaped cancellation still
  // must not reach the server.
  let mut sent = 0;
  for ticket in tickets {
    if search.run(ticket).await {
      sent += 1;
    }
  }

  assert_eq!(sent, 1);
  assert_eq!(
    api.calls(),
    vec![(
      "GET".to_string(),
      "/students/search/?q=maria".to_string()
    )]
  );
  let state = search.store().snapshot();
  assert_eq!(state.results.len(), 1);
  assert!(!state.loading);
}

#[tokio::test]
async fn short_query_clears_results_without_request()
 {
  init_tracing();
  let api = Rc::new(FakeApi::default());
  api.respond(
    "/students/search/?q=jo",
    Ok(json!({"results": [{"id": 1}, {"id": 2}]}))
  );
  let search = search_box(&api);

  let SearchStep::Scheduled(ticket) =
    search.input("jo")
  else {
    panic!("two characters should schedule");
  };
  assert!(search.run(ticket).await);
  assert_eq!(
    search.store().snapshot().results.len(),
    2
  );

  assert_eq!(
    search.input("j"),
    SearchStep::Cleared
  );
  let state = search.store().snapshot();
  assert!(state.results.is_empty());
  assert_eq!(state.query, "j");
  assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn selecting_a_result_resets_the_box()
 {
  init_tracing();
  let api = Rc::new(FakeApi::default());
  api.respond(
    "/students/search/?q=li",
    Ok(json!({"results": [{"id": 8, "name": "Li"}]}))
  );
  let search = search_box(&api);
  let SearchStep::Scheduled(ticket) =
    search.input("li")
  else {
    panic!("should schedule");
  };
  search.run(ticket).await;

  let picked = search
    .select(0)
    .expect("result at index 0");
  assert_eq!(picked["name"], "Li");
  let state = search.store().snapshot();
  assert!(state.query.is_empty());
  assert!(state.results.is_empty());

  // The old ticket died with the selection.
  assert!(!search.run(ticket).await);
}

#[tokio::test]
async fn failed_search_clears_results() {
  init_tracing();
  let api = Rc::new(FakeApi::default());
  let search = search_box(&api);
  let SearchStep::Scheduled(ticket) =
    search.input("zz top")
  else {
    panic!("should schedule");
  };
  assert!(search.run(ticket).await);
  assert!(
    search.store().snapshot().results.is_empty()
  );
}

fn meta(
  name: &str,
  size: u64,
  mime_type: &str
) -> FileMeta {
  FileMeta {
    name: name.to_string(),
    size,
    mime_type: mime_type.to_string()
  }
}

#[test]
fn single_select_uploader_keeps_latest_file()
 {
  init_tracing();
  let notifier = RecordingNotifier::default();
  let uploader =
    Uploader::<FileMeta, String>::new(
      UploadConfig::default()
    );
  let preview = |file: &FileMeta| {
    Some(format!("blob:{}", file.name))
  };

  uploader.handle_files(
    vec![meta("a.pdf", 10, "application/pdf")],
    &notifier,
    preview
  );
  uploader.handle_files(
    vec![meta("b.png", 20, "image/png")],
    &notifier,
    preview
  );

  let files =
    uploader.store().snapshot().files;
  assert_eq!(files.len(), 1);
  assert_eq!(files[0].name, "b.png");
  assert_eq!(
    files[0].preview.as_deref(),
    Some("blob:b.png")
  );
  assert!(notifier.toasts.borrow().is_empty());
}

#[test]
fn uploader_rejects_with_error_toast() {
  init_tracing();
  let notifier = RecordingNotifier::default();
  let uploader =
    Uploader::<FileMeta, String>::new(
      UploadConfig {
        multiple: true,
        allowed_types: vec![
          "image/png".to_string(),
          "application/pdf".to_string(),
        ],
        ..UploadConfig::default()
      }
    );

  let staged = uploader.handle_files(
    vec![
      meta("a.pdf", 10, "application/pdf"),
      meta("huge.png", 6 * 1024 * 1024, "image/png"),
      meta("notes.txt", 10, "text/plain"),
      meta("b.png", 10, "image/png"),
    ],
    &notifier,
    |_| None
  );

  assert_eq!(staged, 2);
  let names: Vec<String> = uploader
    .store()
    .snapshot()
    .files
    .into_iter()
    .map(|file| file.name)
    .collect();
  assert_eq!(names, vec!["a.pdf", "b.png"]);

  let toasts = notifier.toasts.borrow();
  assert_eq!(toasts.len(), 2);
  assert!(
    toasts
      .iter()
      .all(|(_, severity)| *severity == Severity::Error)
  );
  assert!(toasts[0].0.contains("5MB"));
  assert!(toasts[1].0.starts_with("File type not allowed"));
}

#[test]
fn uploader_only_previews_images_and_removes_by_index()
 {
  init_tracing();
  let notifier = RecordingNotifier::default();
  let uploader =
    Uploader::<FileMeta, String>::new(
      UploadConfig {
        multiple: true,
        ..UploadConfig::default()
      }
    );
  uploader.handle_files(
    vec![
      meta("id.jpg", 10, "image/jpeg"),
      meta("cv.pdf", 10, "application/pdf"),
      meta("map.png", 10, "image/png"),
    ],
    &notifier,
    |file| Some(file.name.clone())
  );

  let files =
    uploader.store().snapshot().files;
  assert!(files[0].preview.is_some());
  assert!(files[1].preview.is_none());

  let removed = uploader
    .remove_file(1)
    .expect("index 1 exists");
  assert_eq!(removed.name, "cv.pdf");
  assert!(uploader.remove_file(5).is_none());
  assert_eq!(
    uploader.store().snapshot().files.len(),
    2
  );
}

#[test]
fn single_select_batch_keeps_only_last_file()
 {
  let notifier = RecordingNotifier::default();
  let uploader =
    Uploader::<FileMeta, String>::new(
      UploadConfig::default()
    );
  uploader.handle_files(
    vec![
      meta("a.pdf", 10, "application/pdf"),
      meta("b.pdf", 10, "application/pdf"),
    ],
    &notifier,
    |_| None
  );
  let files =
    uploader.store().snapshot().files;
  assert_eq!(files.len(), 1);
  assert_eq!(files[0].name, "b.pdf");
}

const STATS: &str =
  "/staff-panel/ajax/dashboard-stats/";

#[tokio::test]
async fn stats_refresh_replaces_data_and_toasts()
 {
  init_tracing();
  let api = Rc::new(FakeApi::default());
  api.respond(
    STATS,
    Ok(json!({"students": 120, "pending_fees": 4}))
  );
  let notifier = RecordingNotifier::default();
  let panel =
    StatsPanel::new(Rc::clone(&api), STATS);
  assert!(panel.store().snapshot().loading);

  panel.activate().await;
  let state = panel.store().snapshot();
  assert!(!state.loading);
  assert_eq!(state.stats["students"], 120);

  api.respond(
    STATS,
    Ok(json!({"students": 121}))
  );
  panel.refresh(&notifier).await;
  let state = panel.store().snapshot();
  assert_eq!(state.stats.len(), 1);
  assert_eq!(state.stats["students"], 121);
  assert_eq!(
    *notifier.toasts.borrow(),
    vec![(
      "Stats refreshed".to_string(),
      Severity::Success
    )]
  );
}

#[tokio::test]
async fn stats_failure_keeps_previous_numbers()
 {
  init_tracing();
  let api = Rc::new(FakeApi::default());
  api.respond(STATS, Ok(json!({"students": 5})));
  let notifier = RecordingNotifier::default();
  let panel =
    StatsPanel::new(Rc::clone(&api), STATS);
  panel.activate().await;

  api.respond(
    STATS,
    Err(ApiError::decode(STATS, "not json"))
  );
  panel.refresh(&notifier).await;

  let state = panel.store().snapshot();
  assert_eq!(state.stats["students"], 5);
  assert!(!state.loading);
  assert_eq!(
    *notifier.toasts.borrow(),
    vec![(
      "Stats refreshed".to_string(),
      Severity::Success
    )]
  );
}

#[tokio::test]
async fn typed_helpers_decode_or_report_shape()
 {
  init_tracing();
  let api = FakeApi::default();
  api.respond(
    UNREAD,
    Ok(json!({"count": "many"}))
  );
  api.respond(
    "/notifications/ajax/ack/",
    Ok(json!({"count": 3}))
  );

  let err = api
    .get_as::<campus_shared::UnreadCount>(
      UNREAD
    )
    .await
    .expect_err("count is not a number");
  assert!(matches!(
    err,
    ApiError::Decode { .. }
  ));

  let ack: campus_shared::UnreadCount = api
    .post_as(
      "/notifications/ajax/ack/",
      &json!({})
    )
    .await
    .expect("ack decodes");
  assert_eq!(ack.count, 3);
}
