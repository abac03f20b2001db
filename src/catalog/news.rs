//! News curation configuration.
//!
//! One template for every news dispatch: the topic list and lookback
//! window are the only variable parts.

use super::{date_string, source_list, url_string};
use serde_json::{json, Value};

/// System prompt for structured news curation.
pub const NEWS_SYSTEM_PROMPT: &str = r#"You are an expert curator tasked with fetching recent, specific content for specified topics using comprehensive web searches. Respond with a valid JSON object matching the provided schema, containing:
- news_status: String, "Content Found" or "No Content Found"
- articles: Array of objects, each with:
  - title: String, article title
  - summary: String, detailed summary (50-150 words)
  - url: String, direct URL to the source (must be a valid HTTP/HTTPS URL)
  - publish_date: String, publication date (MM/DD/YYYY)
  - source: String, source name or hostname
- reason: String, explanation if no content found
- sources: Array of strings, URLs of all sources (must be a valid HTTP/HTTPS URLs)
Sources must be from distinct domains, cover varied subtopics within the specified topics, and prioritize open-access content from reputable websites, forums, or platforms, excluding paywalled sources. Avoid generic news roundups or vague headlines. Content must be specific, published within the specified date range, and provide clear, event-focused details."#;

/// Topics a caller may request news for.
pub const ALLOWED_INTERESTS: &[&str] = &[
    "Web3",
    "Blockchain",
    "DeFi",
    "NFT",
    "Hybrid DeFi Products",
    "Blockchain-based KYC Solutions",
    "AI-Powered Smart Contracts",
    "Crypto Tax Reporting Tools",
    "Tokenized Money Market Funds",
    "Digital Gold Tokens",
    "Decentralized Crypto Accounting",
    "Cross-Border Crypto Payments",
    "Blockchain IoT Security",
    "Immutable Medical Records",
    "Smart Contract Formal Verification",
    "Decentralized Autonomous Supply Chains",
    "Blockchain-based Voting Systems",
    "Permissioned Blockchain Networks",
    "Fair Value Crypto Accounting",
    "Crypto Asset Management Platforms",
    "On-Chain Derivatives Trading",
    "Privacy-Preserving DeFi Protocols",
    "Blockchain Regulatory Compliance Tools",
    "Real-World Asset Tokenization (RWA)",
    "Decentralized Identity",
    "DAO Governance Tools",
    "Cross-Chain Yield Aggregator",
    "Layer 2 Scaling Solutions",
    "On-Chain Social Feeds",
    "DeFi Lending Protocols",
    "NFT Utility Platforms",
    "Play-to-Earn Blockchain Games",
    "Decentralized Autonomous Organizations (DAOs)",
    "Crypto Staking Pools",
    "Liquidity Mining Strategies",
    "Decentralized Insurance",
    "Web3 Creator Economy",
    "Interoperable NFTs",
    "Privacy Coins",
    "Decentralized Exchanges (DEXs)",
    "Smart Contract Security Audits",
    "Blockchain Oracles",
    "Digital Asset Management Platforms",
    "Institutional Crypto Custody Solutions",
];

/// News curation configuration: model, system prompt, response schema.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub model: String,
    pub system_prompt: String,
    pub schema: Value,
    pub max_results: u32,
}

pub(super) fn build() -> NewsConfig {
    NewsConfig {
        model: "sonar".to_string(),
        system_prompt: NEWS_SYSTEM_PROMPT.to_string(),
        schema: news_schema(),
        max_results: 8,
    }
}

fn news_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "news_status": { "type": "string", "enum": ["Content Found", "No Content Found"] },
            "articles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "summary": { "type": "string" },
                        "url": url_string(),
                        "publish_date": date_string(),
                        "source": { "type": "string" },
                    },
                    "required": ["title", "summary", "url", "publish_date", "source"],
                },
            },
            "reason": { "type": "string" },
            "sources": source_list(),
        },
        "required": ["news_status", "articles", "reason", "sources"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_schema_shape() {
        let config = build();
        assert_eq!(config.model, "sonar");
        assert_eq!(config.max_results, 8);
        let required = config.schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert!(config.schema["properties"]["articles"]["items"]["properties"]["publish_date"]
            .is_object());
    }

    #[test]
    fn test_allowed_interests_contain_core_topics() {
        assert!(ALLOWED_INTERESTS.contains(&"DeFi"));
        assert!(ALLOWED_INTERESTS.contains(&"Web3"));
        assert!(!ALLOWED_INTERESTS.contains(&"Sports"));
    }
}
