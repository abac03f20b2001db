//! Scoring category catalog.
//!
//! Thirteen analysis dimensions for a coin/network pair. Most share the
//! same rated-item response shape; audit, team, and whitepaper carry their
//! own item structure.

use super::{source_list, url_string, CategoryConfig, ErrorLabels};
use serde_json::{json, Map, Value};

/// System prompt for blockchain project analysis, instructing JSON output.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an AI assistant specializing in blockchain project analysis. Provide accurate, detailed, and up-to-date information for the specified cryptocurrency and blockchain network. Respond with a valid JSON object matching the schema described in the user prompt, using comprehensive web searches and reliable sources to evaluate the requested category (e.g., audit, whitepaper). Ensure the response is concise and includes a final_score field calculated as specified.";

/// Item shape shared by the rated analysis categories: a finding with a
/// qualitative weight and a numeric score.
fn rated_item(qualifier: &str, qualifier_values: &[&str], score_min: i64, score_max: i64) -> Value {
    let mut properties = Map::new();
    properties.insert("type".to_string(), json!({ "type": "string" }));
    properties.insert("description".to_string(), json!({ "type": "string" }));
    properties.insert(
        qualifier.to_string(),
        json!({ "type": "string", "enum": qualifier_values }),
    );
    properties.insert("source".to_string(), url_string());
    properties.insert(
        "score".to_string(),
        json!({ "type": "integer", "minimum": score_min, "maximum": score_max }),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": ["type", "description", qualifier, "source", "score"],
    })
}

/// Top-level analysis response schema: status, item array, final_score,
/// reason, sources.
fn analysis_schema(
    status_key: &str,
    status_values: &[&str],
    items_key: &str,
    item_schema: Value,
    score_min: i64,
    score_max: i64,
    max_items: Option<u64>,
) -> Value {
    let mut items = json!({ "type": "array", "items": item_schema });
    if let Some(max) = max_items {
        items["maxItems"] = max.into();
    }

    let mut properties = Map::new();
    properties.insert(
        status_key.to_string(),
        json!({ "type": "string", "enum": status_values }),
    );
    properties.insert(items_key.to_string(), items);
    properties.insert(
        "final_score".to_string(),
        json!({ "type": "integer", "minimum": score_min, "maximum": score_max }),
    );
    properties.insert("reason".to_string(), json!({ "type": "string" }));
    properties.insert("sources".to_string(), source_list());

    json!({
        "type": "object",
        "properties": properties,
        "required": [status_key, items_key, "final_score", "reason", "sources"],
    })
}

fn category(
    key: &str,
    display_name: &str,
    model: &str,
    description: &str,
    prompt: &str,
    schema: Value,
) -> CategoryConfig {
    CategoryConfig {
        key: key.to_string(),
        display_name: display_name.to_string(),
        model: model.to_string(),
        description: description.to_string(),
        prompt: prompt.to_string(),
        schema: Some(schema),
        labels: ErrorLabels::for_name(key),
    }
}

const STRENGTH: &[&str] = &["High", "Medium", "Low"];

pub(super) fn build() -> Vec<CategoryConfig> {
    vec![
        category(
            "audit",
            "Audit",
            "sonar-pro",
            "For finding audits on the asset. Consistently retrieves audit reports, with occasional empty responses from Sonar, triggering retries.",
            r#"Search for smart contract audit reports for "{{asset}}" on the "{{network}}" blockchain, focusing on firms like Certik, OpenZeppelin, Hacken, Trail of Bits, Chainsecurity, Cyberscope, EtherAuthority, Callisto, NCC Group, or Certora. Respond with a JSON object containing:
- audit_status: "Found" or "Not Found"
- audits: Array of objects, each with:
  - firm: String, name of the auditing firm
  - year: Integer, year conducted (YYYY)
  - scope: String, technical focus (e.g., "token minting")
  - findings: Object with keys critical, high, medium, low, informational (integers or "Unspecified"), and resolved (boolean or "Unknown")
  - source: String, valid URL to the audit report (e.g., https://example.com/report.pdf)
  - score: Integer, 0-100 based on findings and resolution (Unspecified/Unknown=70, No findings=80, All resolved=100, Unresolved threats=0-50 by severity)
- final_score: Integer, 0-100, average of audit scores or 50 if no data
- reason: String, explanation if no audits found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "audit_status",
                &["Found", "Not Found"],
                "audits",
                json!({
                    "type": "object",
                    "properties": {
                        "firm": { "type": "string" },
                        "year": { "type": "integer" },
                        "scope": { "type": "string" },
                        "findings": {
                            "type": "object",
                            "properties": {
                                "critical": { "type": ["integer", "string"] },
                                "high": { "type": ["integer", "string"] },
                                "medium": { "type": ["integer", "string"] },
                                "low": { "type": ["integer", "string"] },
                                "informational": { "type": ["integer", "string"] },
                                "resolved": { "type": ["boolean", "string"] },
                            },
                            "required": ["critical", "high", "medium", "low", "informational", "resolved"],
                        },
                        "source": url_string(),
                        "score": { "type": "integer", "minimum": 0, "maximum": 100 },
                    },
                    "required": ["firm", "year", "scope", "findings", "source", "score"],
                }),
                0,
                100,
                None,
            ),
        ),
        category(
            "code_quality",
            "CodeQuality",
            "sonar-pro",
            "For determining code quality based on public GitHub or other repository data.",
            r#"Analyze the code quality of "{{asset}}" on the "{{network}}" blockchain, focusing on GitHub repositories or public codebases. Respond with a JSON object containing:
- code_quality_status: "High Quality", "Moderate Quality", "Low Quality", or "No Codebase Found"
- code_quality: Array of objects, each with:
  - type: String, e.g., "GitHub Activity"
  - description: String, details of the aspect
  - strength: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/repository)
  - score: Integer, 0-100 (High=80-100, Moderate=50-79, Low=0-49)
- final_score: Integer, 0-100, average of code_quality scores or 50 if no data
- reason: String, explanation if no codebase found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "code_quality_status",
                &["High Quality", "Moderate Quality", "Low Quality", "No Codebase Found"],
                "code_quality",
                rated_item("strength", STRENGTH, 0, 100),
                0,
                100,
                None,
            ),
        ),
        category(
            "ecosystem_adoption",
            "EcosystemAdoption",
            "sonar-pro",
            "For assessing ecosystem adoption. Works better for major assets like Ethereum or Solana.",
            r#"Analyze the ecosystem adoption of "{{asset}}" on the "{{network}}" blockchain. Respond with a JSON object containing:
- adoption_status: "High Adoption", "Moderate Adoption", "Low Adoption", or "No Adoption Found"
- adoption: Array of objects, each with:
  - type: String, e.g., "Partnerships"
  - description: String, details of the metric
  - significance: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/report)
  - score: Integer, 0-100 (High=80-100, Moderate=50-79, Low=0-49)
- final_score: Integer, 0-100, average of adoption scores or 50 if no data
- reason: String, explanation if no adoption data found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "adoption_status",
                &["High Adoption", "Moderate Adoption", "Low Adoption", "No Adoption Found"],
                "adoption",
                rated_item("significance", STRENGTH, 0, 100),
                0,
                100,
                None,
            ),
        ),
        category(
            "goal",
            "Goal",
            "sonar-pro",
            "For identifying the asset's stated goals. Finds publicly listed goals, though scoring can be ambiguous.",
            r#"Analyze "{{asset}}" on the "{{network}}" blockchain for stated project goals. Respond with a JSON object containing:
- goal_status: "Goals Found" or "No Goals Found"
- goals: Array of objects, each with:
  - type: String, e.g., "Decentralization"
  - description: String, details of the goal
  - feasibility: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/document)
  - score: Integer, 0-100 (High=80-100, Medium=50-79, Low=20-49, Unclear=0-19)
- final_score: Integer, 0-100, average of goal scores or 50 if no data
- reason: String, explanation if no goals found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "goal_status",
                &["Goals Found", "No Goals Found"],
                "goals",
                rated_item("feasibility", STRENGTH, 0, 100),
                0,
                100,
                None,
            ),
        ),
        category(
            "governance",
            "Governance",
            "sonar-pro",
            "For evaluating how the asset is governed or governs its tokens.",
            r#"Analyze the governance model of "{{asset}}" on the "{{network}}" blockchain. Respond with a JSON object containing:
- governance_status: "Active Governance", "Partial Governance", or "No Governance Found"
- governance: Array of objects, each with:
  - type: String, e.g., "On-Chain Voting"
  - description: String, details of the aspect
  - strength: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/governance)
  - score: Integer, 0-100 (Strong=80-100, Moderate=50-79, Weak=0-49)
- final_score: Integer, 0-100, average of governance scores or 50 if no data
- reason: String, explanation if no governance found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "governance_status",
                &["Active Governance", "Partial Governance", "No Governance Found"],
                "governance",
                rated_item("strength", STRENGTH, 0, 100),
                0,
                100,
                None,
            ),
        ),
        category(
            "market",
            "Market",
            "sonar-pro",
            "For analyzing market trends. Less detailed than direct market API pulls but generally valid.",
            r#"Analyze "{{asset}}" on the "{{network}}" blockchain for market activity metrics like volume, market cap, volatility, moving average, and trend direction. Respond with a JSON object containing:
- market_status: "Active Market", "Stable Market", "Volatile Market", or "No Market Data Found"
- market_activities: Array of objects, each with:
  - type: String, e.g., "Trading Volume"
  - description: String, details of the metric
  - significance: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/article)
  - score: Integer, -100 to 100 based on market health
- final_score: Integer, -100 to 100, average of market_activities scores or 0 if no data
- reason: String, explanation if no market data found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "market_status",
                &["Active Market", "Stable Market", "Volatile Market", "No Market Data Found"],
                "market_activities",
                rated_item("significance", STRENGTH, -100, 100),
                -100,
                100,
                None,
            ),
        ),
        category(
            "regulatory_compliance",
            "RegulatoryCompliance",
            "sonar-pro",
            "For assessing regulatory compliance with bodies like FinCEN or SEC.",
            r#"Analyze the regulatory compliance of "{{asset}}" on the "{{network}}" blockchain. Respond with a JSON object containing:
- compliance_status: "Compliant", "Partially Compliant", "Non-Compliant", or "No Compliance Data Found"
- compliance: Array of objects, each with:
  - type: String, e.g., "KYC/AML Policies"
  - description: String, details of the aspect
  - significance: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/report)
  - score: Integer, 0-100 (Compliant=80-100, Partial=50-79, Non-Compliant=0-49)
- final_score: Integer, 0-100, average of compliance scores or 50 if no data
- reason: String, explanation if no compliance data found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "compliance_status",
                &["Compliant", "Partially Compliant", "Non-Compliant", "No Compliance Data Found"],
                "compliance",
                rated_item("significance", STRENGTH, 0, 100),
                0,
                100,
                None,
            ),
        ),
        category(
            "scam",
            "Scam",
            "sonar-pro",
            "For detecting scam indicators on the network or asset. Often identifies phishers or scammers across all network/asset pairs.",
            r#"Analyze "{{asset}}" on the "{{network}}" blockchain for scam indicators. Respond with a JSON object containing:
- scam_status: "Indicators Found" or "No Indicators Found"
- indicators: Array of up to 5 objects, each with:
  - type: String, e.g., "Fake Team"
  - description: String, details of the indicator, properly escaped to avoid JSON syntax errors (e.g., escape quotes, ampersands)
  - severity: String, "Critical", "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/report), properly escaped
  - score: Integer, 0-100 (Critical=100-80, High=79-60, Medium=59-40, Low=39-20, No issues=19-0)
- final_score: Integer, 0-100, 100 if no indicators, otherwise 100 minus average of indicator scores plus 25, clamped to 0-100
- reason: String, explanation if no indicators found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com), properly escaped. If no specific URL is available, use the project's official website.
Ensure the JSON is valid, with all strings properly escaped to prevent syntax errors. URLs must start with http:// or https:// and be accessible."#,
            analysis_schema(
                "scam_status",
                &["Indicators Found", "No Indicators Found"],
                "indicators",
                rated_item("severity", &["Critical", "High", "Medium", "Low"], 0, 100),
                0,
                100,
                Some(5),
            ),
        ),
        category(
            "sentiment",
            "Sentiment",
            "sonar-pro",
            "For analyzing market sentiment via social trends. Retrieves sentiment data from platforms like X or news sources.",
            r#"Analyze "{{asset}}" on the "{{network}}" blockchain for current sentiment and trends. Respond with a JSON object containing:
- sentiment_status: "Positive Sentiment", "Negative Sentiment", "Neutral Sentiment", or "No Sentiment Found"
- sentiments: Array of objects, each with:
  - type: String, e.g., "Community Support"
  - description: String, details of the sentiment
  - strength: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/article)
  - score: Integer, 0-100 (Positive=80-100, Neutral=50-79, Negative=20-49, Unclear=0-19)
- final_score: Integer, 0-100, average of sentiment scores or 50 if no data
- reason: String, explanation if no sentiment found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "sentiment_status",
                &["Positive Sentiment", "Negative Sentiment", "Neutral Sentiment", "No Sentiment Found"],
                "sentiments",
                rated_item("strength", STRENGTH, 0, 100),
                0,
                100,
                None,
            ),
        ),
        category(
            "team",
            "Team",
            "sonar-pro",
            "For finding team members on asset. Generally reliable, correctly identifying pseudonymous founders or team members.",
            r#"Search for information about the core team or developers of "{{asset}}" on the "{{network}}" blockchain, focusing on official project websites, GitHub, LinkedIn, or credible sources like CoinMarketCap or CoinGecko. Respond with a JSON object containing:
- team_status: "Found" or "Not Found"
- team: Array of objects, each with:
  - name: String, individual or team name
  - role: String, e.g., "Lead Developer"
  - background: String, professional background
  - validity: String, "Valid", "Invalid", or "Unverified"
  - source: String, valid URL to the source (e.g., https://example.com/profile)
  - score: Integer, 0-100 (Valid=90-100, Unverified=60-80, Invalid=0-49)
- final_score: Integer, 0-100, average of team scores or 50 if no data
- reason: String, explanation if no team info found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "team_status",
                &["Found", "Not Found"],
                "team",
                json!({
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "role": { "type": "string" },
                        "background": { "type": "string" },
                        "validity": { "type": "string", "enum": ["Valid", "Invalid", "Unverified"] },
                        "source": url_string(),
                        "score": { "type": "integer", "minimum": 0, "maximum": 100 },
                    },
                    "required": ["name", "role", "background", "validity", "source", "score"],
                }),
                0,
                100,
                None,
            ),
        ),
        category(
            "tokenomics",
            "Tokenomics",
            "sonar-pro",
            "For analyzing how the asset handles its tokens, including supply and distribution.",
            r#"Analyze the tokenomics of "{{asset}}" on the "{{network}}" blockchain. Respond with a JSON object containing:
- tokenomics_status: "Detailed Found", "Partial Found", or "Not Found"
- tokenomics: Array of objects, each with:
  - type: String, e.g., "Supply Distribution"
  - description: String, details of the aspect
  - significance: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/tokenomics)
  - score: Integer, 0-100 (Balanced=80-100, Moderate=50-79, Poor=0-49)
- final_score: Integer, 0-100, average of tokenomics scores or 50 if no data
- reason: String, explanation if no data found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "tokenomics_status",
                &["Detailed Found", "Partial Found", "Not Found"],
                "tokenomics",
                rated_item("significance", STRENGTH, 0, 100),
                0,
                100,
                None,
            ),
        ),
        category(
            "value",
            "Value",
            "sonar-reasoning-pro",
            "For evaluating the overall value of an asset. Uses reasoning to perform multiple checks in one prompt call.",
            r#"Analyze "{{asset}}" on the "{{network}}" blockchain for comprehensive value metrics, considering market activity, sentiment, project goals, adoption, technology, and risks. Respond with a JSON object containing:
- value_status: "High Value", "Moderate Value", "Low Value", or "No Value Data Found"
- value_metrics: Array of objects, each with:
  - type: String, e.g., "Market Performance"
  - description: String, details of the metric
  - significance: String, "High", "Medium", or "Low"
  - source: String, valid URL to the source (e.g., https://example.com/analysis)
  - score: Integer, -100 to 100 (Strong=80-100, Moderate=50-79, Weak=20-49, Negative=-20 to -100)
- final_score: Integer, -100 to 100, average of value_metrics scores or 0 if no data
- reason: String, explanation if no value data found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "value_status",
                &["High Value", "Moderate Value", "Low Value", "No Value Data Found"],
                "value_metrics",
                rated_item("significance", STRENGTH, -100, 100),
                -100,
                100,
                None,
            ),
        ),
        category(
            "whitepaper",
            "Whitepaper",
            "sonar-pro",
            "For finding whitepaper on asset. More reliable than audit but occasionally returns no data from Sonar.",
            r#"Search for the whitepaper for "{{asset}}" on the "{{network}}" blockchain, checking official project websites, blockchain explorers, or repositories like GitHub. Respond with a JSON object containing:
- whitepaper_status: "Found" or "Not Found"
- whitepapers: Array of objects, each with:
  - summary: String, 100-200 word summary of the project's purpose, technology, and key features
  - source: String, valid URL to the whitepaper (e.g., https://example.com/whitepaper.pdf)
  - score: Integer, 100 if found, 0 if not
- final_score: Integer, 0-100, average of whitepaper scores or 50 if no data
- reason: String, explanation if no whitepaper found
- sources: Array of strings, valid URLs to sources (e.g., https://example.com)
Ensure the JSON is valid and matches the schema."#,
            analysis_schema(
                "whitepaper_status",
                &["Found", "Not Found"],
                "whitepapers",
                json!({
                    "type": "object",
                    "properties": {
                        "summary": { "type": "string" },
                        "source": url_string(),
                        "score": { "type": "integer", "minimum": 0, "maximum": 100 },
                    },
                    "required": ["summary", "source", "score"],
                }),
                0,
                100,
                None,
            ),
        ),
    ]
}
