use serde_json::json;
use synaptic_core::Tool;
use synaptic_hive::{answer_text, data_sources, HiveSearchTool};
use tracing_subscriber::EnvFilter;

fn summarize(label: &str, result: &serde_json::Value) {
    println!("--- {label} ---");
    match answer_text(result) {
        Some(answer) => println!("  answer:  {answer}"),
        None => println!("  raw:     {result}"),
    }
    if let Some(sources) = data_sources(result) {
        println!("  sources: {}", sources.len());
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Reads HIVE_INTELLIGENCE_API_KEY (and optionally HIVE_BASE_URL).
    let tool = HiveSearchTool::from_env()?;

    // ------------------------------------------------------------------
    // 1. Simple prompt
    // ------------------------------------------------------------------
    let result = tool
        .call(json!({"prompt": "What's the current price of Bitcoin?"}))
        .await?;
    summarize("prompt", &result);

    // ------------------------------------------------------------------
    // 2. Conversation history
    // ------------------------------------------------------------------
    let messages = json!([
        {"role": "user", "content": "Tell me about Uniswap"},
        {"role": "assistant", "content": "Uniswap is a decentralized exchange protocol..."},
        {"role": "user", "content": "What's its trading volume today?"}
    ]);
    let result = tool.call(json!({"messages": messages})).await?;
    summarize("messages", &result);

    // ------------------------------------------------------------------
    // 3. All generation controls
    // ------------------------------------------------------------------
    let result = tool
        .call(json!({
            "prompt": "Explain the pros and cons of yield farming in DeFi",
            "temperature": 0.2,
            "top_p": 0.85,
            "top_k": 40,
            "include_data_sources": true
        }))
        .await?;
    summarize("deterministic", &result);

    let result = tool
        .call(json!({
            "prompt": "Explain the pros and cons of yield farming in DeFi",
            "temperature": 0.8,
            "top_p": 0.95,
            "top_k": 50,
            "include_data_sources": false
        }))
        .await?;
    summarize("creative", &result);

    // ------------------------------------------------------------------
    // 4. History plus parameters
    // ------------------------------------------------------------------
    let result = tool
        .call(json!({
            "messages": messages,
            "temperature": 0.5,
            "top_k": 30,
            "include_data_sources": true
        }))
        .await?;
    summarize("messages + parameters", &result);

    tracing::info!("hive search demo finished");
    Ok(())
}
