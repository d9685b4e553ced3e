use reminder_realtime_rs::{
    EventKind, RealtimeClient, RealtimeClientOptions, RealtimeSubscription, StaticTokenProvider,
};
use std::sync::Arc;
use std::time::Duration;

/// Connect to a notification gateway and print everything it pushes
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing to see logs
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let url = std::env::var("REALTIME_URL").expect("REALTIME_URL must be set in .env");
    let token = std::env::var("REALTIME_TOKEN").expect("REALTIME_TOKEN must be set in .env");

    println!("Connecting to: {}\n", url);

    let client = Arc::new(RealtimeClient::new(
        &url,
        Arc::new(StaticTokenProvider::new(token)),
        RealtimeClientOptions::default(),
    )?);

    for kind in [
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::Error,
        EventKind::ReminderNotification,
        EventKind::ReminderCreated,
        EventKind::ReminderUpdated,
        EventKind::SystemNotification,
    ] {
        client.on(
            kind.clone(),
            Arc::new(move |event| println!("[{}] {:?}", kind, event)),
        );
    }

    client.connect().await?;

    // Watch the connection the way a UI widget would
    let subscription =
        RealtimeSubscription::with_poll_interval(Arc::clone(&client), Duration::from_secs(1));

    for _ in 0..30 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let status = subscription.status();
        println!(
            "status: connected={} attempts={} state={:?}",
            status.is_connected, status.reconnect_attempts, status.ready_state
        );
    }

    client.disconnect().await?;
    println!("Done");

    Ok(())
}
