use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::Router;
use inbox_shield::{
    classifier::ClassifierClient,
    config::ClassifierConfig,
    scan::{InputStaging, ScanController, ScanOutcome},
};
use tokio::net::TcpListener;
use url::Url;

/// Request bodies the fake service has seen, in arrival order.
pub type Received = Arc<Mutex<Vec<serde_json::Value>>>;

/// Serves `router` on an ephemeral local port and returns its base address.
pub async fn spawn_service(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake service");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve fake service");
    });
    Url::parse(&format!("http://{addr}")).expect("service url")
}

/// An address nothing is listening on.
pub async fn dead_address() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("dead url")
}

pub fn client(base_url: Url, timeout: Duration) -> ClassifierClient {
    ClassifierClient::new(
        reqwest::Client::new(),
        ClassifierConfig {
            base_url,
            request_timeout: Some(timeout),
        },
    )
}

pub async fn scan_text(client: &ClassifierClient, text: &str) -> ScanOutcome {
    let mut staging = InputStaging::new();
    staging.set_text(text);
    let mut controller = ScanController::new();
    controller
        .scan(&staging, client)
        .await
        .cloned()
        .expect("text should be eligible")
}
