//! # Insight Module
//!
//! The pure half of the insight feature: what we ask the model, the shape we
//! ask it for, and how we check what comes back. The HTTP call lives in
//! `fiado-ai`.
//!
//! ## Request / Response Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products + customers                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  build_prompt()  ──► "Analise: 5 produtos em estoque. ..."              │
//! │  response_schema() ──► ARRAY of OBJECT {type, message, priority}        │
//! │        │                                                                │
//! │        ▼  (fiado-ai sends, receives text)                               │
//! │  parse_insights(text)                                                   │
//! │        ├── not JSON / not an array ──► Err ──► fallback                 │
//! │        ├── element invalid ──────────► dropped (reason kept)            │
//! │        └── zero valid left ──────────► caller uses fallback             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::types::{Customer, Insight, InsightKind, InsightPriority, Product};

/// How many insights the prompt asks for.
pub const REQUESTED_INSIGHTS: usize = 3;

/// Fallback text when no credential is configured.
pub const UNCONFIGURED_MESSAGE: &str =
    "Aguardando configuração da API para gerar insights inteligentes.";

/// Fallback text when the call was made but produced nothing usable.
pub const UNAVAILABLE_MESSAGE: &str =
    "Não foi possível gerar insights agora. Confira os devedores e o estoque baixo no painel.";

// =============================================================================
// Prompt
// =============================================================================

/// Builds the pt-BR prompt from the current shop state.
///
/// Mentions the product count, products under `low_stock_threshold`, and
/// every customer with an outstanding balance together with how many
/// entries their history has.
pub fn build_prompt(products: &[Product], customers: &[Customer], low_stock_threshold: i64) -> String {
    let low_stock: Vec<&str> = products
        .iter()
        .filter(|p| p.stock < low_stock_threshold)
        .map(|p| p.name.as_str())
        .collect();

    let debtors: Vec<String> = customers
        .iter()
        .filter(|c| c.has_debt())
        .map(|c| {
            format!(
                "{}: R$ {} ({} lançamentos)",
                c.name,
                c.balance().to_decimal_string(),
                c.history.len()
            )
        })
        .collect();

    format!(
        "Analise: {} produtos em estoque. Estoque baixo: {}. Devedores: {}. \
         Gere {} insights de negócio curtos em JSON com campos: \
         type (REPOR, TENDENCIA, FINANCEIRO, CONSELHO), message, \
         priority (ALTA, MEDIA, BAIXA) e impact opcional.",
        products.len(),
        join_or_none(&low_stock),
        join_or_none(&debtors),
        REQUESTED_INSIGHTS
    )
}

fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "nenhum".to_string()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}

/// Structured-output schema sent with the request.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "enum": ["REPOR", "TENDENCIA", "FINANCEIRO", "CONSELHO"] },
                "message": { "type": "STRING" },
                "priority": { "type": "STRING", "enum": ["ALTA", "MEDIA", "BAIXA"] },
                "impact": { "type": "STRING" }
            },
            "required": ["type", "message", "priority"]
        }
    })
}

// =============================================================================
// Response Validation
// =============================================================================

/// The response text could not be read as a list of insights at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsightParseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("response is not a JSON array")]
    NotArray,
}

/// Outcome of validating a response array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInsights {
    pub insights: Vec<Insight>,
    /// One reason per dropped element, in order.
    pub rejected: Vec<String>,
}

/// Parses and structurally validates the model's text.
///
/// A surrounding markdown code fence is tolerated. Each element must be an
/// object with a known `type`, a known `priority` and a non-blank
/// `message`; `impact` is kept only when it is a non-blank string.
pub fn parse_insights(text: &str) -> Result<ParsedInsights, InsightParseError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| InsightParseError::NotJson(e.to_string()))?;

    let Value::Array(elements) = value else {
        return Err(InsightParseError::NotArray);
    };

    let mut parsed = ParsedInsights::default();
    for (index, element) in elements.iter().enumerate() {
        match validate_element(element) {
            Ok(insight) => parsed.insights.push(insight),
            Err(reason) => parsed.rejected.push(format!("item {}: {}", index, reason)),
        }
    }
    Ok(parsed)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn validate_element(element: &Value) -> Result<Insight, String> {
    let object: &Map<String, Value> = element.as_object().ok_or("not an object")?;

    let kind = match string_field(object, "type")?.to_uppercase().as_str() {
        "REPOR" => InsightKind::Restock,
        "TENDENCIA" => InsightKind::Trend,
        "FINANCEIRO" => InsightKind::Financial,
        "CONSELHO" => InsightKind::Advice,
        other => return Err(format!("unknown type {:?}", other)),
    };

    let priority = match string_field(object, "priority")?.to_uppercase().as_str() {
        "ALTA" => InsightPriority::High,
        "MEDIA" => InsightPriority::Medium,
        "BAIXA" => InsightPriority::Low,
        other => return Err(format!("unknown priority {:?}", other)),
    };

    let message = string_field(object, "message")?.trim().to_string();
    if message.is_empty() {
        return Err("empty message".to_string());
    }

    let impact = object
        .get("impact")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(Insight {
        kind,
        message,
        priority,
        impact,
    })
}

fn string_field<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a str, String> {
    object
        .get(field)
        .ok_or_else(|| format!("missing {}", field))?
        .as_str()
        .ok_or_else(|| format!("{} is not a string", field))
}

// =============================================================================
// Fallback
// =============================================================================

/// Why the fallback is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No API credential configured; the call was never made.
    Unconfigured,
    /// The call failed or returned nothing usable.
    Unavailable,
}

/// The static single-entry list shown instead of generated insights.
pub fn fallback_insights(reason: FallbackReason) -> Vec<Insight> {
    let message = match reason {
        FallbackReason::Unconfigured => UNCONFIGURED_MESSAGE,
        FallbackReason::Unavailable => UNAVAILABLE_MESSAGE,
    };

    vec![Insight {
        kind: InsightKind::Financial,
        message: message.to_string(),
        priority: InsightPriority::Medium,
        impact: None,
    }]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger, seed, LOW_STOCK_THRESHOLD};
    use chrono::Utc;
    use crate::Money;

    #[test]
    fn test_prompt_mentions_debtors_and_counts() {
        let mut products = seed::products();
        products[4].stock = 2;
        let mut customers = seed::customers();
        ledger::record_debt(&mut customers, "c2", Money::from_cents(300), Utc::now()).unwrap();

        let prompt = build_prompt(&products, &customers, LOW_STOCK_THRESHOLD);

        assert!(prompt.starts_with("Analise: 5 produtos em estoque."));
        assert!(prompt.contains("Estoque baixo: Leite Integral."));
        assert!(prompt.contains("João Silva: R$ 45.50 (0 lançamentos)"));
        assert!(prompt.contains("Maria Oliveira: R$ 15.00 (1 lançamentos)"));
        assert!(!prompt.contains("Ricardo"));
        assert!(prompt.contains("Gere 3 insights"));
    }

    #[test]
    fn test_prompt_without_debtors() {
        let prompt = build_prompt(&[], &[], LOW_STOCK_THRESHOLD);
        assert!(prompt.contains("Estoque baixo: nenhum. Devedores: nenhum."));
    }

    #[test]
    fn test_schema_requires_core_fields() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"], json!(["type", "message", "priority"]));
    }

    #[test]
    fn test_parse_valid_response() {
        let text = r#"[
            {"type":"REPOR","message":"Leite acabando","priority":"ALTA","impact":"Evita perda de vendas"},
            {"type":"FINANCEIRO","message":"Cobrar João","priority":"MEDIA"}
        ]"#;
        let parsed = parse_insights(text).unwrap();

        assert_eq!(parsed.insights.len(), 2);
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.insights[0].kind, InsightKind::Restock);
        assert_eq!(parsed.insights[0].impact.as_deref(), Some("Evita perda de vendas"));
        assert_eq!(parsed.insights[1].priority, InsightPriority::Medium);
    }

    #[test]
    fn test_parse_drops_invalid_elements() {
        let text = r#"[
            {"type":"REPOR","message":"ok","priority":"ALTA"},
            {"type":"PROMO","message":"x","priority":"ALTA"},
            {"type":"CONSELHO","message":"  ","priority":"BAIXA"},
            {"type":"TENDENCIA","message":"y"},
            42
        ]"#;
        let parsed = parse_insights(text).unwrap();

        assert_eq!(parsed.insights.len(), 1);
        assert_eq!(parsed.rejected.len(), 4);
        assert!(parsed.rejected[0].starts_with("item 1"));
    }

    #[test]
    fn test_parse_rejects_non_arrays() {
        assert!(matches!(parse_insights("not json"), Err(InsightParseError::NotJson(_))));
        assert_eq!(parse_insights(r#"{"type":"REPOR"}"#), Err(InsightParseError::NotArray));
    }

    #[test]
    fn test_parse_tolerates_code_fence() {
        let text = "```json\n[{\"type\":\"CONSELHO\",\"message\":\"m\",\"priority\":\"BAIXA\"}]\n```";
        assert_eq!(parse_insights(text).unwrap().insights.len(), 1);
    }

    #[test]
    fn test_fallback_is_single_financial_medium() {
        for reason in [FallbackReason::Unconfigured, FallbackReason::Unavailable] {
            let list = fallback_insights(reason);
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].kind, InsightKind::Financial);
            assert_eq!(list[0].priority, InsightPriority::Medium);
        }
        assert_eq!(
            fallback_insights(FallbackReason::Unconfigured)[0].message,
            UNCONFIGURED_MESSAGE
        );
    }
}
