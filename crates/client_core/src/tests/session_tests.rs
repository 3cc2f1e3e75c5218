use super::*;
use crate::view_sync::{ViewSync, Viewport};
use async_trait::async_trait;

#[derive(Default)]
struct RecordingViewport {
    scrolls: Mutex<Vec<usize>>,
}

#[async_trait]
impl Viewport for RecordingViewport {
    async fn scroll_to_latest(&self, message_count: usize) {
        self.scrolls.lock().await.push(message_count);
    }
}

async fn wait_for_scrolls(viewport: &RecordingViewport, expected: usize) -> Vec<usize> {
    for _ in 0..100 {
        let scrolls = viewport.scrolls.lock().await.clone();
        if scrolls.len() >= expected {
            return scrolls;
        }
        tokio::task::yield_now().await;
    }
    panic!("view sync never caught up");
}

#[tokio::test]
async fn messages_keep_insertion_order() {
    let store = SessionStore::new();
    assert_eq!(store.append_message(Message::user("one")).await, 0);
    assert_eq!(store.append_message(Message::bot("two", Vec::new())).await, 1);
    assert_eq!(store.append_message(Message::user("three")).await, 2);

    let texts: Vec<String> = store
        .messages()
        .await
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn set_pending_reports_previous_value_and_emits_on_change_only() {
    let store = SessionStore::new();
    let mut events = store.subscribe();

    assert!(!store.set_pending(true).await);
    assert!(store.set_pending(true).await);
    assert!(store.is_pending().await);
    assert!(store.set_pending(false).await);

    assert_eq!(events.try_recv().expect("event"), SessionEvent::PendingChanged(true));
    assert_eq!(events.try_recv().expect("event"), SessionEvent::PendingChanged(false));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn snapshot_reflects_messages_and_flag() {
    let store = SessionStore::new();
    store.append_message(Message::user("q")).await;
    store.set_pending(true).await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.messages(), &[Message::user("q")]);
    assert!(snapshot.pending_answer());
}

#[tokio::test]
async fn view_sync_scrolls_on_every_append() {
    let store = SessionStore::new();
    let viewport = Arc::new(RecordingViewport::default());
    let task = ViewSync::spawn(&store, viewport.clone());

    store.append_message(Message::user("q")).await;
    store.set_pending(true).await;
    store.append_message(Message::bot("a", Vec::new())).await;
    store.set_pending(false).await;

    assert_eq!(wait_for_scrolls(&viewport, 2).await, vec![1, 2]);
    assert_eq!(store.len().await, 2);

    drop(store);
    task.await.expect("view sync exits once the store is gone");
}

#[tokio::test]
async fn lagging_view_sync_jumps_to_the_current_length() {
    let store = SessionStore::with_event_capacity(4);
    let viewport = Arc::new(RecordingViewport::default());
    let task = ViewSync::spawn(&store, viewport.clone());

    for i in 0..10 {
        store.append_message(Message::user(format!("q{i}"))).await;
    }

    assert_eq!(wait_for_scrolls(&viewport, 1).await, vec![10]);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(*viewport.scrolls.lock().await, vec![10]);

    store.append_message(Message::bot("a", Vec::new())).await;
    assert_eq!(wait_for_scrolls(&viewport, 2).await, vec![10, 11]);

    drop(store);
    task.await.expect("view sync exits once the store is gone");
}
