#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::mpsc::Sender;

    use rewire_core::TestClock;
    use serde_json::{Value, json};
    use web_time::Duration;

    use crate::clipboard::*;
    use crate::fetch::*;
    use crate::form::*;
    use crate::input::*;
    use crate::media::*;
    use crate::page::*;
    use crate::store::*;
    use crate::toggle::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // toggle

    #[test]
    fn test_toggle_flip() {
        let light = use_toggle(false);
        assert!(!light.get());
        light.flip();
        assert!(light.get());
        light.flip();
        assert!(!light.get());
    }

    // store

    #[test]
    fn test_store_round_trip() {
        let backend: Rc<MemoryStore> = Rc::new(MemoryStore::new());

        let name = use_stored(backend.clone(), "name", "Guest".to_string());
        assert_eq!(name.get(), "Guest");

        name.set("Ada".to_string());
        assert_eq!(name.get(), "Ada");

        // A fresh read of the same key sees the written value, not its default.
        let again = use_stored(backend.clone(), "name", "Other".to_string());
        assert_eq!(again.get(), "Ada");
    }

    #[test]
    fn test_store_converges_with_backend() {
        let backend: Rc<MemoryStore> = Rc::new(MemoryStore::new());
        let count = use_stored(backend.clone(), "count", 0i64);

        count.set(3);
        assert_eq!(backend.read("count").as_deref(), Some("3"));

        count.update(|v| *v += 1);
        assert_eq!(backend.read("count").as_deref(), Some("4"));
    }

    /// Backend whose writes can be made to fail silently, the way a full
    /// or read-only durable store would.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: Cell<bool>,
    }

    impl StorageBackend for FlakyStore {
        fn read(&self, key: &str) -> Option<String> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, text: &str) {
            if self.fail_writes.get() {
                log::warn!("could not persist {key:?}");
                return;
            }
            self.inner.write(key, text);
        }
    }

    #[test]
    fn test_store_value_survives_backend_write_failure() {
        init_logging();
        let backend = Rc::new(FlakyStore::default());
        let name = use_stored(backend.clone(), "name", "Guest".to_string());

        backend.fail_writes.set(true);
        name.set("Ada".to_string());

        // In-memory value stays authoritative even though the write was lost.
        assert_eq!(name.get(), "Ada");
        assert_eq!(backend.read("name").as_deref(), Some("\"Guest\""));

        // The next successful mutation reconverges the backend.
        backend.fail_writes.set(false);
        name.set("Grace".to_string());
        assert_eq!(backend.read("name").as_deref(), Some("\"Grace\""));
    }

    #[test]
    fn test_store_malformed_falls_back_to_default() {
        init_logging();
        let backend: Rc<MemoryStore> = Rc::new(MemoryStore::new());
        backend.write("count", "{not json");

        let count = use_stored(backend.clone(), "count", 7i64);
        assert_eq!(count.get(), 7);
        // The default replaced the malformed entry.
        assert_eq!(backend.read("count").as_deref(), Some("7"));
    }

    // media

    #[test]
    fn test_media_query_parsing() {
        assert_eq!(
            "(max-width: 768px)".parse::<MediaQuery>(),
            Ok(MediaQuery::MaxWidth(768.0))
        );
        assert_eq!(
            "(min-width: 600px)".parse::<MediaQuery>(),
            Ok(MediaQuery::MinWidth(600.0))
        );
        assert_eq!(
            "(prefers-color-scheme: dark)".parse::<MediaQuery>(),
            Ok(MediaQuery::PrefersColorScheme(ColorScheme::Dark))
        );
        assert!(matches!(
            "(max-width: oops)".parse::<MediaQuery>(),
            Err(QueryError::Malformed(_))
        ));
        assert!(matches!(
            "(orientation: portrait)".parse::<MediaQuery>(),
            Err(QueryError::Unsupported(_))
        ));
    }

    #[test]
    fn test_media_watch_reevaluates_on_env_change() {
        let env = Environment::default(); // 1280px wide
        let mobile = use_media_query(&env, "(max-width: 768px)").unwrap();
        assert!(!mobile.matches());

        env.set_viewport(600.0, 800.0);
        assert!(mobile.matches());

        env.set_viewport(1024.0, 800.0);
        assert!(!mobile.matches());
    }

    #[test]
    fn test_media_watch_color_scheme() {
        let env = Environment::default();
        let dark = use_media_query(&env, "(prefers-color-scheme: dark)").unwrap();
        assert!(!dark.matches());

        env.set_color_scheme(ColorScheme::Dark);
        assert!(dark.matches());
    }

    #[test]
    fn test_media_watch_drop_releases_subscription() {
        let env = Environment::default();
        let watch = use_media_query(&env, "(max-width: 768px)").unwrap();
        let matches = watch.signal().clone();
        assert_eq!(env.signal().subscriber_count(), 1);

        drop(watch);
        assert_eq!(env.signal().subscriber_count(), 0);

        // The stale watch no longer tracks the environment.
        env.set_viewport(600.0, 800.0);
        assert!(!matches.get());
    }

    // fetch

    #[derive(Default)]
    struct ManualTransport {
        dispatched: RefCell<Vec<(FetchRequest, u64, Sender<Completion>)>>,
    }

    impl Transport for ManualTransport {
        fn dispatch(&self, request: FetchRequest, generation: u64, done: Sender<Completion>) {
            self.dispatched.borrow_mut().push((request, generation, done));
        }
    }

    impl ManualTransport {
        fn count(&self) -> usize {
            self.dispatched.borrow().len()
        }

        fn resolve(&self, index: usize, outcome: Result<FetchResponse, FetchError>) {
            let dispatched = self.dispatched.borrow();
            let (_, generation, done) = &dispatched[index];
            done.send((*generation, outcome)).unwrap();
        }

        fn ok(&self, index: usize, status: u16, body: &str) {
            self.resolve(
                index,
                Ok(FetchResponse {
                    status,
                    body: body.to_owned(),
                }),
            );
        }
    }

    #[test]
    fn test_fetch_success() {
        let transport = Rc::new(ManualTransport::default());
        let todos: Fetcher<Value> = use_fetch(transport.clone(), "https://api.example.com/data");
        assert_eq!(todos.status(), FetchStatus::Pending);

        transport.ok(0, 200, r#"{"a":1}"#);
        todos.pump();

        let snap = todos.snapshot();
        assert_eq!(snap.status, FetchStatus::Success);
        assert_eq!(snap.data, Some(json!({"a": 1})));
        assert_eq!(snap.error, None);
    }

    #[test]
    fn test_fetch_non_2xx_is_failure() {
        let transport = Rc::new(ManualTransport::default());
        let todos: Fetcher<Value> = use_fetch(transport.clone(), "https://api.example.com/error");

        transport.ok(0, 500, "internal server error");
        todos.pump();

        let snap = todos.snapshot();
        assert_eq!(snap.status, FetchStatus::Failure);
        assert_eq!(snap.data, None);
        let message = snap.error.unwrap();
        assert!(message.contains("500"), "got {message:?}");
    }

    #[test]
    fn test_fetch_network_error_is_failure() {
        let transport = Rc::new(ManualTransport::default());
        let todos: Fetcher<Value> = use_fetch(transport.clone(), "https://api.example.com/data");

        transport.resolve(0, Err(FetchError::Network("connection refused".into())));
        todos.pump();

        let snap = todos.snapshot();
        assert_eq!(snap.status, FetchStatus::Failure);
        assert!(snap.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_fetch_malformed_body_is_failure() {
        let transport = Rc::new(ManualTransport::default());
        let todos: Fetcher<Value> = use_fetch(transport.clone(), "https://api.example.com/data");

        transport.ok(0, 200, "{truncated");
        todos.pump();

        assert_eq!(todos.status(), FetchStatus::Failure);
    }

    #[test]
    fn test_fetch_same_identity_is_not_reissued() {
        let transport = Rc::new(ManualTransport::default());
        let todos: Fetcher<Value> = use_fetch(transport.clone(), "https://api.example.com/data");
        assert_eq!(transport.count(), 1);

        todos.load(FetchRequest::new("https://api.example.com/data"));
        assert_eq!(transport.count(), 1);

        // A different header map is a different identity.
        todos.load(FetchRequest::new("https://api.example.com/data").header("accept", "text/plain"));
        assert_eq!(transport.count(), 2);
    }

    #[test]
    fn test_fetch_stale_response_suppressed() {
        let transport = Rc::new(ManualTransport::default());
        let todos: Fetcher<Value> = use_fetch(transport.clone(), "https://api.example.com/data1");
        todos.load(FetchRequest::new("https://api.example.com/data2"));

        // The superseded request resolves after the newer one.
        transport.ok(1, 200, "2");
        transport.ok(0, 200, "1");
        todos.pump();

        let snap = todos.snapshot();
        assert_eq!(snap.status, FetchStatus::Success);
        assert_eq!(snap.data, Some(json!(2)));
    }

    #[test]
    fn test_fetch_stale_response_suppressed_in_arrival_order() {
        let transport = Rc::new(ManualTransport::default());
        let todos: Fetcher<Value> = use_fetch(transport.clone(), "https://api.example.com/data1");
        todos.load(FetchRequest::new("https://api.example.com/data2"));

        // Old completion arrives first; it must not win, and the newer one must.
        transport.ok(0, 200, "1");
        todos.pump();
        assert_eq!(todos.status(), FetchStatus::Pending);

        transport.ok(1, 200, "2");
        todos.pump();
        assert_eq!(todos.snapshot().data, Some(json!(2)));
    }

    // form

    #[test]
    fn test_form_rule_sets_and_clears_error() {
        let form = use_form::<i64>()
            .field("age", 0)
            .rule("age", |age| (*age < 18).then(|| "must be at least 18".to_string()))
            .build();

        form.set_field("age", 16);
        assert_eq!(form.field_errors("age"), vec!["must be at least 18"]);
        assert!(!form.is_valid());

        form.set_field("age", 21);
        assert!(form.field_errors("age").is_empty());
        assert!(form.is_valid());
    }

    #[test]
    fn test_form_multiple_rules_accumulate_in_order() {
        let form = use_form::<String>()
            .field("name", String::new())
            .rule("name", |v| v.is_empty().then(|| "required".to_string()))
            .rule("name", |v| (v.len() < 3).then(|| "too short".to_string()))
            .build();

        assert_eq!(form.field_errors("name"), vec!["required", "too short"]);

        form.set_field("name", "Jo".to_string());
        assert_eq!(form.field_errors("name"), vec!["too short"]);

        form.set_field("name", "Joan".to_string());
        assert!(form.is_valid());
    }

    #[test]
    fn test_form_reset_restores_initial_values_and_revalidates() {
        let form = use_form::<String>()
            .field("email", "a@b.c".to_string())
            .rule("email", |v| {
                (!v.contains('@')).then(|| "invalid email".to_string())
            })
            .build();
        assert!(form.is_valid());

        form.set_field("email", "nope".to_string());
        assert!(!form.is_valid());

        form.reset();
        assert_eq!(form.value("email").as_deref(), Some("a@b.c"));
        assert!(form.is_valid());
    }

    #[test]
    fn test_form_snapshot_preserves_declaration_order() {
        let form = use_form::<Value>()
            .field("name", json!(""))
            .field("email", json!(""))
            .field("age", json!(0))
            .build();

        form.set_field("age", json!(30));
        let snapshot = form.snapshot();
        let names: Vec<&str> = snapshot.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["name", "email", "age"]);
        assert_eq!(form.value("age"), Some(json!(30)));
    }

    #[test]
    fn test_form_unknown_field_is_ignored() {
        init_logging();
        let form = use_form::<i64>().field("age", 0).build();
        form.set_field("aeg", 30);
        assert_eq!(form.value("age"), Some(0));
    }

    #[test]
    fn test_form_change_callback_fires_per_mutation() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_clone = changes.clone();

        let form = use_form::<i64>()
            .field("age", 0)
            .on_field_change(move |name, value| {
                changes_clone.borrow_mut().push((name.to_owned(), *value));
            })
            .build();

        form.set_field("age", 16);
        form.set_field("age", 21);
        assert_eq!(
            *changes.borrow(),
            vec![("age".to_owned(), 16), ("age".to_owned(), 21)]
        );
    }

    // input

    #[test]
    fn test_input_validates_on_every_commit() {
        let name = use_validated_input("Initial".to_string(), |v: &String| {
            (v.len() < 5).then(|| "must be at least 5 characters".to_string())
        });
        assert_eq!(name.error(), None);

        name.set("abc".to_string());
        assert_eq!(name.error().as_deref(), Some("must be at least 5 characters"));

        name.set("abcdef".to_string());
        assert_eq!(name.error(), None);
    }

    #[test]
    fn test_input_debounce_commits_after_delay() {
        let clock = TestClock::new();
        clock.install();

        let query = use_input(String::new());
        query.set_debounced("ru".to_string(), Duration::from_millis(300));

        query.tick();
        assert_eq!(query.value(), "");
        assert!(query.has_pending());

        clock.advance(Duration::from_millis(300));
        query.tick();
        assert_eq!(query.value(), "ru");
        assert!(!query.has_pending());
    }

    #[test]
    fn test_input_debounce_latest_edit_wins() {
        let clock = TestClock::new();
        clock.install();

        let query = use_input(String::new());
        query.set_debounced("ru".to_string(), Duration::from_millis(300));

        clock.advance(Duration::from_millis(200));
        query.set_debounced("rust".to_string(), Duration::from_millis(300));

        // The first stage's deadline passes, but it was superseded.
        clock.advance(Duration::from_millis(200));
        query.tick();
        assert_eq!(query.value(), "");

        clock.advance(Duration::from_millis(100));
        query.tick();
        assert_eq!(query.value(), "rust");
    }

    // page

    #[test]
    fn test_page_window_slices() {
        let pages = use_pagination(vec![1, 2, 3, 4, 5], 2);
        assert_eq!(pages.total_pages(), 3);

        assert_eq!(pages.page_items(), vec![1, 2]);
        assert!(pages.go_to(2));
        assert_eq!(pages.page_items(), vec![3, 4]);
        assert!(pages.go_to(3));
        assert_eq!(pages.page_items(), vec![5]);
    }

    #[test]
    fn test_page_out_of_range_is_noop() {
        let pages = use_pagination(vec![1, 2, 3, 4, 5], 2);
        let notified = Rc::new(Cell::new(0));
        let notified_clone = notified.clone();
        pages.on_change(move |_| notified_clone.set(notified_clone.get() + 1));

        assert!(!pages.go_to(0));
        assert!(!pages.go_to(4));
        assert_eq!(pages.current_page(), 1);
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn test_page_accepted_change_notifies_exactly_once() {
        let pages = use_pagination(vec![1, 2, 3, 4, 5], 2);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        pages.on_change(move |p| seen_clone.borrow_mut().push(p));

        assert!(pages.go_to(2));
        assert!(pages.next());
        assert!(!pages.next()); // past the end
        assert!(pages.prev());
        assert_eq!(*seen.borrow(), vec![2, 3, 2]);
    }

    #[test]
    fn test_page_set_items_recomputes_and_clamps() {
        let pages = use_pagination((1..=10).collect::<Vec<_>>(), 3);
        assert_eq!(pages.total_pages(), 4);
        assert!(pages.go_to(4));

        pages.set_items((1..=5).collect());
        assert_eq!(pages.total_pages(), 2);
        assert_eq!(pages.current_page(), 2);
        assert_eq!(pages.page_items(), vec![4, 5]);
    }

    #[test]
    fn test_page_empty_collection() {
        let pages = use_pagination(Vec::<i32>::new(), 2);
        assert_eq!(pages.total_pages(), 0);
        assert!(!pages.go_to(1));
        assert!(pages.page_items().is_empty());
    }

    #[test]
    fn test_page_of_item() {
        let pages = use_pagination(vec!["a", "b", "c", "d", "e"], 2);
        assert_eq!(pages.page_of(&"a"), Some(1));
        assert_eq!(pages.page_of(&"e"), Some(3));
        assert_eq!(pages.page_of(&"z"), None);
    }

    // clipboard

    #[derive(Default)]
    struct RecordingClipboard {
        texts: RefCell<Vec<String>>,
        fail: Cell<bool>,
    }

    impl ClipboardWrite for RecordingClipboard {
        fn write(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail.get() {
                return Err(ClipboardError::Write("denied".into()));
            }
            self.texts.borrow_mut().push(text.to_owned());
            Ok(())
        }
    }

    #[test]
    fn test_clipboard_flag_clears_after_hold() {
        let clock = TestClock::new();
        clock.install();

        let writer = Rc::new(RecordingClipboard::default());
        let clipboard = use_clipboard(writer.clone());

        assert!(clipboard.copy("x").is_ok());
        assert!(clipboard.just_copied());
        assert_eq!(*writer.texts.borrow(), vec!["x"]);

        clock.advance(Duration::from_millis(1999));
        clipboard.tick();
        assert!(clipboard.just_copied());

        clock.advance(Duration::from_millis(1));
        clipboard.tick();
        assert!(!clipboard.just_copied());
    }

    #[test]
    fn test_clipboard_new_copy_restarts_hold() {
        let clock = TestClock::new();
        clock.install();

        let writer = Rc::new(RecordingClipboard::default());
        let clipboard = use_clipboard(writer);

        clipboard.copy("first").unwrap();
        clock.advance(Duration::from_millis(1500));
        clipboard.copy("second").unwrap();

        // 2s from the first copy, but only 500ms from the second.
        clock.advance(Duration::from_millis(500));
        clipboard.tick();
        assert!(clipboard.just_copied());

        clock.advance(Duration::from_millis(1500));
        clipboard.tick();
        assert!(!clipboard.just_copied());
    }

    #[test]
    fn test_clipboard_failed_write_reported_not_flagged() {
        init_logging();
        let writer = Rc::new(RecordingClipboard::default());
        writer.fail.set(true);

        let clipboard = use_clipboard(writer.clone());
        assert!(matches!(
            clipboard.copy("x"),
            Err(ClipboardError::Write(_))
        ));
        assert!(!clipboard.just_copied());
        assert!(writer.texts.borrow().is_empty());
    }
}
