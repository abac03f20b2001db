//! Chat command catalog.
//!
//! Eleven market-scan commands, each bound to the same coin-watch response
//! schema (only the status field name varies).

use super::{date_string, source_list, url_string, CategoryConfig, ErrorLabels};
use serde_json::{json, Map, Value};

/// System prompt for crypto-focused chatbot and command responses.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a cryptocurrency expert, highly knowledgeable in the latest blockchain technology, cryptocurrencies (e.g., Bitcoin, Ethereum), decentralized finance (DeFi), NFTs, and market trends. Provide accurate, concise, and up-to-date responses tailored to the user's query. Focus on clarity, avoiding jargon unless necessary. All responses should be crypto, blockchain, or DeFi related.";

/// Coin-watch response schema shared by every command; `status_key` is the
/// only per-command difference.
fn coin_watch_schema(status_key: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        status_key.to_string(),
        json!({ "type": "string", "enum": ["Found", "Not Found"] }),
    );
    properties.insert(
        "coins".to_string(),
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "summary": { "type": "string", "minLength": 250, "maxLength": 750 },
                    "source": url_string(),
                    "publish_date": date_string(),
                },
                "required": ["title", "summary", "source", "publish_date"],
            },
            "maxItems": 5,
        }),
    );
    properties.insert("reason".to_string(), json!({ "type": "string" }));
    properties.insert("sources".to_string(), source_list());

    json!({
        "type": "object",
        "properties": properties,
        "required": [status_key, "coins", "reason", "sources"],
    })
}

fn command(name: &str, description: &str, prompt: &str) -> CategoryConfig {
    let key = name.to_ascii_lowercase();
    let mut display_name = key.clone();
    display_name[..1].make_ascii_uppercase();
    let schema = coin_watch_schema(&format!("{key}_status"));
    CategoryConfig {
        key,
        display_name,
        model: "sonar".to_string(),
        description: description.to_string(),
        prompt: prompt.to_string(),
        schema: Some(schema),
        labels: ErrorLabels::for_name(name),
    }
}

pub(super) fn build() -> Vec<CategoryConfig> {
    vec![
        command(
            "DROP",
            "Identifies emerging cryptocurrencies with strong airdrop buzz and wallet growth recently.",
            r#"Search for emerging cryptocurrencies with strong airdrop buzz and wallet growth recently. Respond with a JSON object containing:
- drop_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's airdrop event or social activity
  - summary: String, 50-150 words, including coin name, market cap, 24h airdrop mentions on X, 7-day wallet growth (%), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "DYNAMO",
            "Identifies emerging DeFi cryptocurrencies with strong on-chain activity recently.",
            r#"Search for emerging DeFi cryptocurrencies with strong on-chain activity recently. Respond with a JSON object containing:
- dynamo_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's DeFi activity or market movement
  - summary: String, 50-150 words, including coin name, market cap, TVL, 7-day TVL growth (%), transaction count, and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "FLASH",
            "Identifies smaller cryptocurrencies that have shown a sharp recovery after a price drop in the last day.",
            r#"Search for smaller cryptocurrencies that have shown a sharp recovery after a price drop in the last 24 hours. Respond with a JSON object containing:
- flash_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's recovery event or market movement
  - summary: String, 50-150 words, including coin name, market cap, 12h price drop (%), 2h price recovery (%), X sentiment score (quantitative or qualitative, e.g., positive sentiment), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "GHOST",
            "Identifies low-cap cryptocurrencies with sudden blockchain activity and price gains in the last day.",
            r#"Search for low-cap cryptocurrencies with sudden blockchain activity and price gains in the last 24 hours. Respond with a JSON object containing:
- ghost_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's activity surge or market movement
  - summary: String, 50-150 words, including coin name, market cap, 24h transaction count, 24h price change (%), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "GREEN",
            "Identifies emerging eco-friendly cryptocurrencies with strong adoption recently.",
            r#"Search for emerging eco-friendly cryptocurrencies with strong adoption recently. Respond with a JSON object containing:
- green_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's adoption or market movement
  - summary: String, 50-150 words, including coin name, market cap, active addresses, 7-day transaction growth (%), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "MEME",
            "Identifies emerging meme coins with strong social media hype in the last day.",
            r#"Search for emerging meme coins with strong social media hype in the last 24 hours. Respond with a JSON object containing:
- meme_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's social hype or market movement
  - summary: String, 50-150 words, including coin name, market cap, X follower count, 24h hashtag mentions, and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "MOON",
            "Identifies micro-cap cryptocurrencies with strong price spikes and active development recently.",
            r#"Search for micro-cap cryptocurrencies with strong price spikes and active development in the last 48 hours. Respond with a JSON object containing:
- moon_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's price spike or developer activity
  - summary: String, 50-150 words, including coin name, market cap, 48h price change (%), GitHub activity (quantitative or qualitative, e.g., notable commits), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "NUGS",
            "Identifies emerging NFT-related cryptocurrencies with strong marketplace activity recently.",
            r#"Search for emerging NFT-related cryptocurrencies with strong marketplace activity recently. Respond with a JSON object containing:
- nugs_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's NFT activity or market movement
  - summary: String, 50-150 words, including coin name, market cap, 7-day NFT sales volume, sales count growth (%), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "PUMP",
            "Identifies mid-cap cryptocurrencies with over 15% price surge this week and strong wallet holder retention.",
            r#"Search for mid-cap cryptocurrencies with over 15% price surge this week and strong wallet holder retention. Respond with a JSON object containing:
- pump_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's price surge or holder activity
  - summary: String, 50-150 words, including coin name, market cap, 7-day price change (%), wallet retention rate (%), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "STABLE",
            "Identifies lesser-known stablecoins with notable supply growth and high trading volume recently.",
            r#"Search for lesser-known stablecoins with notable supply growth and high trading volume recently. Respond with a JSON object containing:
- stable_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's circulation or trading activity
  - summary: String, 50-150 words, including coin name, market cap, 7-day supply growth (%), 24h trading volume, and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
        command(
            "ZOMBIE",
            "Identifies smaller older cryptocurrencies with strong trading activity and price gains in the last day.",
            r#"Search for smaller older cryptocurrencies with strong trading activity and price gains in the last 24 hours. Respond with a JSON object containing:
- zombie_status: "Found" or "Not Found"
- coins: Array of objects, each with:
  - title: String, descriptive title of the coin's trading activity or market movement
  - summary: String, 50-150 words, including coin name, market cap, launch year, 24h volume, 24h price change (%), and context
  - source: String, valid URL to the source
  - publish_date: String, publication date (e.g., 05/03/2025)
- reason: String, explanation if no coins found
- sources: Array of strings, valid URLs to sources
Ensure the JSON is valid and matches the schema."#,
        ),
    ]
}
