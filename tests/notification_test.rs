mod helpers;

use futures::SinkExt;
use helpers::{RecordingNotifier, accept, bind, wait_until};
use reminder_realtime_rs::{
    EventKind, Notifier, RealtimeClient, RealtimeClientBuilder, RealtimeClientOptions,
    StaticTokenProvider,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

fn client_with_notifier(url: &str, notifier: Arc<dyn Notifier>) -> RealtimeClient {
    RealtimeClientBuilder::new(
        url,
        Arc::new(StaticTokenProvider::new("test-token")),
        RealtimeClientOptions::default(),
    )
    .unwrap()
    .with_notifier(notifier)
    .build()
}

#[tokio::test]
async fn reminder_created_round_trips_into_one_notification() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        ws.send(Message::Text(
            r#"{"type":"reminder_created","data":{"id":"42","text":"Buy milk"}}"#.into(),
        ))
        .await
        .unwrap();
        let _hold = ws;
        std::future::pending::<()>().await;
    });

    let notifier = RecordingNotifier::granted();
    let client = client_with_notifier(&url, notifier.clone());
    client.connect().await.unwrap();

    assert!(wait_until(Duration::from_secs(2), || notifier.shown_count() == 1).await);

    let shown = notifier.shown.lock().unwrap();
    assert_eq!(shown[0].title, "Reminder created");
    assert_eq!(shown[0].body, "Buy milk");
    assert_eq!(shown[0].tag, "created-42");
    assert_eq!(shown[0].url, "/reminders");
}

#[tokio::test]
async fn system_notification_uses_placeholder_body_and_custom_target() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        ws.send(Message::Text(
            r#"{"type":"system_notification","data":{"title":"Alert","url":"/x"}}"#.into(),
        ))
        .await
        .unwrap();
        let _hold = ws;
        std::future::pending::<()>().await;
    });

    let notifier = RecordingNotifier::granted();
    let client = client_with_notifier(&url, notifier.clone());
    client.connect().await.unwrap();

    assert!(wait_until(Duration::from_secs(2), || notifier.shown_count() == 1).await);

    let shown = notifier.shown.lock().unwrap();
    assert_eq!(shown[0].title, "Alert");
    assert_eq!(shown[0].body, "You have a new notification");
    assert_eq!(shown[0].url, "/x");
    assert!(shown[0].tag.starts_with("system-"));
}

#[tokio::test]
async fn reminder_updates_notify_only_when_completed() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        ws.send(Message::Text(
            r#"{"type":"reminder_updated","data":{"id":"7","text":"Call the doctor","completed":false}}"#
                .into(),
        ))
        .await
        .unwrap();
        ws.send(Message::Text(
            r#"{"type":"reminder_updated","data":{"id":"7","text":"Call the doctor","completed":true}}"#
                .into(),
        ))
        .await
        .unwrap();
        let _hold = ws;
        std::future::pending::<()>().await;
    });

    let notifier = RecordingNotifier::granted();
    let client = client_with_notifier(&url, notifier.clone());

    // Both frames still reach ordinary listeners
    let updates = Arc::new(AtomicUsize::new(0));
    let updates_for_listener = Arc::clone(&updates);
    client.on(
        EventKind::ReminderUpdated,
        Arc::new(move |_| {
            updates_for_listener.fetch_add(1, Ordering::SeqCst);
        }),
    );

    client.connect().await.unwrap();

    assert!(
        wait_until(Duration::from_secs(2), || {
            updates.load(Ordering::SeqCst) == 2
        })
        .await
    );
    assert!(wait_until(Duration::from_secs(2), || notifier.shown_count() == 1).await);

    let shown = notifier.shown.lock().unwrap();
    assert_eq!(shown[0].title, "Reminder completed");
    assert_eq!(shown[0].tag, "completed-7");
}

#[tokio::test]
async fn denied_permission_drops_the_notification_but_not_the_event() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        ws.send(Message::Text(
            r#"{"type":"reminder_notification","data":{"id":"1","message":"Standup in 5"}}"#.into(),
        ))
        .await
        .unwrap();
        let _hold = ws;
        std::future::pending::<()>().await;
    });

    let notifier = RecordingNotifier::denied();
    let client = client_with_notifier(&url, notifier.clone());

    let deliveries = Arc::new(AtomicUsize::new(0));
    let deliveries_for_listener = Arc::clone(&deliveries);
    client.on(
        EventKind::ReminderNotification,
        Arc::new(move |_| {
            deliveries_for_listener.fetch_add(1, Ordering::SeqCst);
        }),
    );

    client.connect().await.unwrap();

    assert!(
        wait_until(Duration::from_secs(2), || {
            deliveries.load(Ordering::SeqCst) == 1
        })
        .await
    );
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(notifier.shown_count(), 0);
}
