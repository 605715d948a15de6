//! CLI Status Command
//!
//! Asks a running server for its health payload.

use std::time::Duration;

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    println!("PsychoScore status: checking...");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    match client
        .get(format!("http://localhost:{port}/health"))
        .send()
        .await
    {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("PsychoScore is not running on port {port}");
        }
    }
    Ok(())
}
