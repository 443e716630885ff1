use std::error::Error;

use prompt_relay::PromptResponse;
use tracing_subscriber::EnvFilter;

/// Send one prompt to a running relay and print the reply.
///
/// Usage: `cargo run --example chat -- [relay-url] [prompt]`
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let mut args = std::env::args().skip(1);
    let relay = args
        .next()
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let prompt = args.next().unwrap_or_else(|| "whats 1 + 1".to_string());

    println!("Sending prompt to {relay}: {prompt}");

    let res = reqwest::Client::new()
        .post(format!("{relay}/chat"))
        .query(&[("prompt", prompt.as_str())])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body: serde_json::Value = res.json().await.unwrap_or_default();
        let detail = body["detail"].as_str().unwrap_or("no detail");
        return Err(format!("Relay returned {status}: {detail}").into());
    }

    let reply: PromptResponse = res.json().await?;
    println!("Received response: {}", reply.response);
    Ok(())
}
