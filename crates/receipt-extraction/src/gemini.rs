//! Gemini client for reading receipt fields off an image

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use receipt_core::ExtractedFields;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::media_type::detect_media_type;
use crate::traits::{ExtractionError, ExtractionResult, ReceiptExtractor};

const EXTRACTION_PROMPT: &str = "\
This image is a shop receipt. Read it and answer with a single JSON object with these keys:
- date: purchase date formatted as YYYY-MM-DD, or an empty string if it cannot be read
- store: name of the shop
- items: the purchased items as one comma-separated string
- totalAmount: the total paid, as an integer without currency symbols
If the image is not a receipt, answer with null.
Answer with JSON only.";

const PLACEHOLDER_KEYS: &[&str] = &["your-api-key", "your-gemini-api-key", "changeme"];

/// Gemini `generateContent` extractor
pub struct GeminiExtractor {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl Debug for GeminiExtractor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiExtractor")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

// generateContent request/response structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

fn validate_api_key(api_key: &str) -> ExtractionResult<()> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(ExtractionError::Config(
            "Gemini API key is required but not provided".to_string(),
        ));
    }

    if PLACEHOLDER_KEYS.contains(&key) || key.len() < 10 {
        return Err(ExtractionError::Config(
            "Gemini API key appears to be invalid or a placeholder".to_string(),
        ));
    }

    Ok(())
}

impl GeminiExtractor {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> ExtractionResult<Self> {
        validate_api_key(&api_key)?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExtractionError::Config(format!("Failed to create HTTP client for Gemini: {}", e))
            })?;

        Ok(Self {
            http_client,
            api_key: api_key.trim().to_string(),
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Call generateContent and return the text of the first candidate
    async fn generate(&self, image: &[u8], mime_type: &str) -> ExtractionResult<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                    Part::Text {
                        text: EXTRACTION_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.0,
            },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Request("Gemini request timed out".to_string())
                } else {
                    ExtractionError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| {
                ExtractionError::InvalidResponse("Gemini returned no candidates".to_string())
            })?;

        Ok(text)
    }
}

/// Strip an optional markdown code fence around the model's answer
fn unwrap_code_fence(text: &str) -> &str {
    if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else if text.contains("```") {
        text.split("```")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else {
        text.trim()
    }
}

fn text_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn items_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| text_value(Some(entry)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => text_value(other),
    }
}

fn amount_value(value: Option<&Value>) -> ExtractionResult<i64> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| {
                ExtractionError::InvalidResponse(format!("totalAmount out of range: {}", n))
            }),
        Some(Value::String(s)) => Ok(amount_from_text(s)),
        Some(other) => Err(ExtractionError::InvalidResponse(format!(
            "totalAmount has unexpected type: {}",
            other
        ))),
    }
}

/// Read an amount written as text, e.g. `¥1,280`, `1.234.567` or `€ 1.280,50`.
///
/// The last `.` or `,` is the decimal point when one or two digits follow it;
/// every other separator groups thousands. A `-` only counts when it comes
/// before the first digit. Text that still does not parse becomes 0.
fn amount_from_text(text: &str) -> i64 {
    let Some(first_digit) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let negative = text[..first_digit].contains('-');

    let kept: Vec<char> = text[first_digit..]
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let decimal_at = kept
        .iter()
        .rposition(|c| *c == '.' || *c == ',')
        .filter(|&i| {
            let fraction = &kept[i + 1..];
            (1..=2).contains(&fraction.len()) && fraction.iter().all(char::is_ascii_digit)
        });

    let mut number = String::with_capacity(kept.len() + 1);
    if negative {
        number.push('-');
    }
    for (i, c) in kept.iter().enumerate() {
        if c.is_ascii_digit() {
            number.push(*c);
        } else if Some(i) == decimal_at {
            number.push('.');
        }
    }

    match number.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount.round() as i64,
        _ => {
            tracing::warn!(total_amount = %text, "Unreadable totalAmount, using 0");
            0
        }
    }
}

/// Parse the model's answer into receipt fields.
///
/// A literal `null` answer means the model found no receipt.
fn parse_extraction_result(text: &str) -> ExtractionResult<Option<ExtractedFields>> {
    let json_text = unwrap_code_fence(text);
    let value: Value = serde_json::from_str(json_text).map_err(|e| {
        ExtractionError::InvalidResponse(format!("Failed to parse Gemini output as JSON: {}", e))
    })?;

    let object = match value {
        Value::Null => return Ok(None),
        Value::Object(map) => map,
        other => {
            return Err(ExtractionError::InvalidResponse(format!(
                "expected a JSON object, got: {}",
                other
            )))
        }
    };

    Ok(Some(ExtractedFields {
        date: text_value(object.get("date")),
        store: text_value(object.get("store")),
        items: items_value(object.get("items")),
        total_amount: amount_value(object.get("totalAmount"))?,
    }))
}

#[async_trait]
impl ReceiptExtractor for GeminiExtractor {
    async fn extract(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> ExtractionResult<Option<ExtractedFields>> {
        let mime_type = detect_media_type(&image)
            .or_else(|| Some(content_type).filter(|ct| !ct.is_empty()))
            .unwrap_or("image/jpeg");

        tracing::debug!(
            model = %self.model,
            image_size = image.len(),
            mime_type = %mime_type,
            "Sending receipt image to Gemini"
        );

        let start = std::time::Instant::now();
        let text = self.generate(&image, mime_type).await?;
        let fields = parse_extraction_result(&text)?;

        tracing::info!(
            model = %self.model,
            found = fields.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Gemini extraction completed"
        );

        Ok(fields)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
