//! Fetch example
//!
//! Issues two GET requests against the Star Wars API, cancels a third one
//! mid-flight and prints how each of them settled.
//!
//! Run with: cargo run --example fetch

use courier_http::client::TracingObserver;
use courier_http::{AbortController, HttpClient, HttpError, RequestOptions};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("Courier Fetch Example");
    println!("=====================\n");

    let client = HttpClient::new().with_progress_observer(Arc::new(TracingObserver));

    let options = RequestOptions::new()
        .with_header("Accept", "application/json")?
        .with_timeout(Duration::from_secs(10))
        .report_progress();

    let people = client
        .get("https://swapi.dev/api/people/", Some(options.clone()))
        .await;
    report("people", people);

    let planets = client
        .get(
            "https://swapi.dev/api/planets/",
            Some(options.clone().with_param("page", 2)),
        )
        .await;
    report("planets", planets);

    let controller = AbortController::new();
    let cancelled = options.with_signal(&controller.signal());
    let (starships, _) = tokio::join!(
        client.get("https://swapi.dev/api/starships/", Some(cancelled)),
        async {
            tokio::task::yield_now().await;
            controller.abort();
        }
    );
    report("starships", starships);

    Ok(())
}

fn report(label: &str, result: courier_http::Result<courier_http::Payload>) {
    match result {
        Ok(payload) => {
            let count = payload
                .as_json()
                .and_then(|json| json.get("count"))
                .cloned()
                .unwrap_or_default();
            println!("{}: ok, count = {}", label, count);
        }
        Err(HttpError::Failed(e)) => {
            println!("{}: failed with status {} ({})", label, e.status(), e);
        }
        Err(e) => println!("{}: {} ({})", label, e.name(), e),
    }
}
