// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language-model intent classification with structured order extraction.
//!
//! The classifier never fails: a provider error, an unparseable answer or a
//! missing `intent` all yield [`IntentRecord::chat`].

use std::sync::Arc;

use kedai_core::{
    Intent, IntentRecord, KedaiError, OrderFields, ProviderAdapter, ProviderRequest,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::prompt::extraction_prompt;

/// Why an answer could not be turned into an [`IntentRecord`].
#[derive(Debug, thiserror::Error)]
pub enum ClassificationFailure {
    #[error("provider call failed: {0}")]
    Provider(#[source] KedaiError),

    #[error("unparseable answer: {0}")]
    Parse(String),
}

/// Classifies one customer message into ORDER or CHAT.
pub struct IntentClassifier {
    provider: Arc<dyn ProviderAdapter>,
    model: String,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn ProviderAdapter>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub async fn classify(&self, message: &str) -> IntentRecord {
        match self.try_classify(message).await {
            Ok(record) => {
                info!(intent = %record.intent, "intent classified");
                record
            }
            Err(failure) => {
                warn!(error = %failure, "classification failed, treating message as chat");
                IntentRecord::chat()
            }
        }
    }

    async fn try_classify(&self, message: &str) -> Result<IntentRecord, ClassificationFailure> {
        let request = ProviderRequest {
            model: self.model.clone(),
            prompt: extraction_prompt(message),
        };
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(ClassificationFailure::Provider)?;
        debug!(answer = %response.content, "classifier answer received");
        parse_answer(&response.content)
    }
}

/// Shape of the model's JSON answer. Values stay loose and are coerced below.
#[derive(Debug, Deserialize)]
struct RawAnswer {
    intent: Option<String>,
    #[serde(default)]
    nama: Value,
    #[serde(default)]
    alamat_lengkap: Value,
    #[serde(default)]
    kecamatan: Value,
    #[serde(default)]
    kabupaten_kota: Value,
    #[serde(default)]
    provinsi: Value,
    #[serde(default)]
    jumlah_barang: Value,
}

/// Removes Markdown code fences the model likes to add.
pub fn strip_code_fences(answer: &str) -> &str {
    let trimmed = answer.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// Parses a classifier answer into an [`IntentRecord`].
pub fn parse_answer(answer: &str) -> Result<IntentRecord, ClassificationFailure> {
    let body = strip_code_fences(answer);
    let raw: RawAnswer = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(first) => {
            // Prose around the object: retry on the outermost braces.
            let start = body.find('{');
            let end = body.rfind('}');
            match (start, end) {
                (Some(s), Some(e)) if s < e => serde_json::from_str(&body[s..=e])
                    .map_err(|e| ClassificationFailure::Parse(e.to_string()))?,
                _ => return Err(ClassificationFailure::Parse(first.to_string())),
            }
        }
    };

    let intent_label = raw
        .intent
        .ok_or_else(|| ClassificationFailure::Parse("missing intent".into()))?;
    let intent = parse_intent(&intent_label);

    let order = OrderFields {
        name: text_field(&raw.nama),
        full_address: text_field(&raw.alamat_lengkap),
        district: text_field(&raw.kecamatan),
        city: text_field(&raw.kabupaten_kota),
        province: text_field(&raw.provinsi),
        item_count: count_field(&raw.jumlah_barang),
    };
    Ok(IntentRecord { intent, order })
}

fn parse_intent(label: &str) -> Intent {
    let label = label.trim();
    if label.eq_ignore_ascii_case("Order_Pesanan") || label.eq_ignore_ascii_case("ORDER") {
        Intent::Order
    } else {
        Intent::Chat
    }
}

/// A non-blank string; `"null"` written as text counts as missing.
fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty() && !s.eq_ignore_ascii_case("null")).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integers, floats with zero fraction, or numeric strings.
fn count_field(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn parses_complete_order() {
        let answer = r#"```json
{
  "intent": "Order_Pesanan",
  "nama": "Budi Santoso",
  "alamat_lengkap": "Jl. Mawar no 5, kec. Cibeber, kota Cilegon, prov. Banten",
  "kecamatan": "Cibeber",
  "kabupaten_kota": "Cilegon",
  "provinsi": "Banten",
  "jumlah_barang": 3
}
```"#;
        let record = parse_answer(answer).unwrap();
        assert_eq!(record.intent, Intent::Order);
        assert_eq!(record.order.name.as_deref(), Some("Budi Santoso"));
        assert_eq!(record.order.district.as_deref(), Some("Cibeber"));
        assert_eq!(record.order.city.as_deref(), Some("Cilegon"));
        assert_eq!(record.order.province.as_deref(), Some("Banten"));
        assert_eq!(record.order.item_count, Some(3));
    }

    #[test]
    fn chat_answer_has_no_fields() {
        let record = parse_answer(
            r#"{"intent":"Chat_Biasa","nama":null,"alamat_lengkap":null,"kecamatan":null,"kabupaten_kota":null,"provinsi":null,"jumlah_barang":null}"#,
        )
        .unwrap();
        assert_eq!(record, IntentRecord::chat());
    }

    #[test]
    fn intent_labels() {
        assert_eq!(parse_intent("Order_Pesanan"), Intent::Order);
        assert_eq!(parse_intent("ORDER"), Intent::Order);
        assert_eq!(parse_intent("Chat_Biasa"), Intent::Chat);
        assert_eq!(parse_intent("something else"), Intent::Chat);
    }

    #[test]
    fn item_count_is_lenient_but_numeric() {
        assert_eq!(count_field(&serde_json::json!(3)), Some(3));
        assert_eq!(count_field(&serde_json::json!(2.0)), Some(2));
        assert_eq!(count_field(&serde_json::json!(2.5)), None);
        assert_eq!(count_field(&serde_json::json!("4")), Some(4));
        assert_eq!(count_field(&serde_json::json!(" 5 ")), Some(5));
        assert_eq!(count_field(&serde_json::json!("tiga")), None);
        assert_eq!(count_field(&serde_json::json!(0)), Some(0));
        assert_eq!(count_field(&Value::Null), None);
    }

    #[test]
    fn blank_and_null_text_are_missing() {
        assert_eq!(text_field(&serde_json::json!("  ")), None);
        assert_eq!(text_field(&serde_json::json!("null")), None);
        assert_eq!(text_field(&serde_json::json!(" Banten ")), Some("Banten".into()));
    }

    #[test]
    fn prose_around_json_is_tolerated() {
        let record = parse_answer("Berikut hasilnya: {\"intent\": \"ORDER\", \"nama\": \"Ani\"} semoga membantu").unwrap();
        assert_eq!(record.intent, Intent::Order);
        assert_eq!(record.order.name.as_deref(), Some("Ani"));
        assert_eq!(record.order.item_count, None);
    }

    #[test]
    fn garbage_and_missing_intent_fail() {
        assert!(parse_answer("maaf saya tidak mengerti").is_err());
        assert!(parse_answer("{\"nama\": \"Ani\"}").is_err());
    }

    #[test]
    fn failures_are_errors_with_sources() {
        use std::error::Error;

        let parse = ClassificationFailure::Parse("expected value".into());
        assert_eq!(parse.to_string(), "unparseable answer: expected value");
        assert!(parse.source().is_none());

        let provider = ClassificationFailure::Provider(KedaiError::Internal("quota".into()));
        assert!(provider.to_string().starts_with("provider call failed:"));
        assert!(provider.source().is_some());
    }
}
