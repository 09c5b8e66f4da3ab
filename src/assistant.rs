use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use crate::app::{ChatMessage, ChatRole};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-3-flash-preview";

const SYSTEM_INSTRUCTION: &str = "You are a helpful, empathetic, and professional \
health assistant. You provide general wellness advice, explain medical terms simply, \
and help users navigate their health journey. IMPORTANT: You must always include a \
disclaimer that you are an AI and not a doctor, especially for symptom analysis. \
Keep answers concise and terminal-friendly.";

const TIP_PROMPT: &str = "Provide a single, short, actionable daily health tip \
(max 20 words) for a general audience. Keep it encouraging.";

pub const CHAT_OFFLINE_FALLBACK: &str = "I apologize, I am currently offline due to \
a pending configuration. Please check your API key settings.";
pub const CHAT_EMPTY_FALLBACK: &str = "I apologize, I couldn't process that request.";
pub const CHAT_ERROR_FALLBACK: &str = "I'm having trouble connecting right now. \
Please try again later.";

pub const TIP_OFFLINE_FALLBACK: &str = "Stay hydrated and keep moving! (AI assistant offline)";
pub const TIP_EMPTY_FALLBACK: &str = "Stay hydrated and keep moving!";
pub const TIP_ERROR_FALLBACK: &str = "Drink water and take a short walk today.";

const DISCLAIMER: &str = "Reminder: I'm an AI assistant, not a doctor. Please consult \
a medical professional for personal health concerns.";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Client for the Gemini generateContent API. Stateless: the full
/// conversation history is sent with every turn. Without an API key every
/// call short-circuits to static fallback text, so a missing credential
/// degrades the assistant instead of breaking the app.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.api_key.is_none()
    }

    /// One assistant reply for one user turn. Never fails and never
    /// returns an empty string; transport and service errors collapse to
    /// fallback text so the conversation always gets exactly one reply.
    pub async fn chat(&self, history: &[ChatMessage], message: &str) -> String {
        let Some(key) = self.api_key.clone() else {
            return CHAT_OFFLINE_FALLBACK.to_string();
        };

        match self.try_chat(&key, history, message).await {
            Ok(text) if !text.trim().is_empty() => ensure_disclaimer(text),
            Ok(_) => CHAT_EMPTY_FALLBACK.to_string(),
            Err(_) => CHAT_ERROR_FALLBACK.to_string(),
        }
    }

    /// One-shot daily health tip. Same failure policy as `chat`.
    pub async fn health_tip(&self) -> String {
        let Some(key) = self.api_key.clone() else {
            return TIP_OFFLINE_FALLBACK.to_string();
        };

        match self.try_generate(&key, None, vec![user_content(TIP_PROMPT)]).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => TIP_EMPTY_FALLBACK.to_string(),
            Err(_) => TIP_ERROR_FALLBACK.to_string(),
        }
    }

    async fn try_chat(&self, key: &str, history: &[ChatMessage], message: &str) -> Result<String> {
        let mut contents: Vec<Content> = history.iter().map(turn_content).collect();
        contents.push(user_content(message));

        let system = Content {
            role: None,
            parts: vec![Part {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        };

        self.try_generate(key, Some(system), contents).await
    }

    async fn try_generate(
        &self,
        key: &str,
        system_instruction: Option<Content>,
        contents: Vec<Content>,
    ) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", API_BASE, MODEL);

        let request = GenerateRequest {
            contents,
            system_instruction,
        };

        let response = self.client
            .post(&url)
            .header("x-goog-api-key", key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        let generate_response: GenerateResponse = response.json().await?;
        Ok(extract_text(generate_response))
    }
}

fn user_content(text: &str) -> Content {
    Content {
        role: Some("user".to_string()),
        parts: vec![Part {
            text: text.to_string(),
        }],
    }
}

fn turn_content(message: &ChatMessage) -> Content {
    let role = match message.role {
        ChatRole::User => "user",
        // The Gemini API calls the assistant side "model"
        ChatRole::Assistant => "model",
    };
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: message.text.clone(),
        }],
    }
}

fn extract_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// The system instruction asks the model to disclaim, but nothing forces
/// it to comply. Append the disclaimer ourselves when a reply arrives
/// without one.
fn ensure_disclaimer(text: String) -> String {
    let lower = text.to_lowercase();
    let has_disclaimer = lower.contains("not a doctor")
        || lower.contains("not a medical professional")
        || lower.contains("medical advice");

    if has_disclaimer {
        text
    } else {
        format!("{}\n\n{}", text.trim_end(), DISCLAIMER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> GeminiClient {
        GeminiClient::new(None)
    }

    #[tokio::test]
    async fn chat_without_key_returns_static_fallback() {
        let client = offline_client();
        let reply = client.chat(&[], "What helps with a headache?").await;
        assert_eq!(reply, CHAT_OFFLINE_FALLBACK);
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn tip_without_key_returns_static_fallback() {
        let client = offline_client();
        let tip = client.health_tip().await;
        assert_eq!(tip, TIP_OFFLINE_FALLBACK);
        assert!(!tip.is_empty());
    }

    #[test]
    fn offline_detection() {
        assert!(GeminiClient::new(None).is_offline());
        assert!(!GeminiClient::new(Some("key".to_string())).is_offline());
    }

    #[test]
    fn disclaimer_appended_when_missing() {
        let out = ensure_disclaimer("Drink plenty of fluids and rest.".to_string());
        assert!(out.contains("not a doctor"));
    }

    #[test]
    fn disclaimer_not_duplicated() {
        let reply = "Rest up! Remember, I'm an AI and not a doctor.".to_string();
        let out = ensure_disclaimer(reply.clone());
        assert_eq!(out, reply);
    }

    #[test]
    fn history_roles_map_to_wire_names() {
        let msg = ChatMessage {
            id: 1,
            role: ChatRole::Assistant,
            text: "hello".to_string(),
        };
        let content = turn_content(&msg);
        assert_eq!(content.role.as_deref(), Some("model"));

        let msg = ChatMessage {
            id: 2,
            role: ChatRole::User,
            text: "hi".to_string(),
        };
        assert_eq!(turn_content(&msg).role.as_deref(), Some("user"));
    }

    #[test]
    fn extract_text_handles_empty_payloads() {
        let empty = GenerateResponse { candidates: vec![] };
        assert_eq!(extract_text(empty), "");

        let no_content = GenerateResponse {
            candidates: vec![Candidate { content: None }],
        };
        assert_eq!(extract_text(no_content), "");
    }

    #[test]
    fn extract_text_joins_parts() {
        let response = GenerateResponse {
            candidates: vec![Candidate {
                content: Some(ResponseContent {
                    parts: vec![
                        ResponsePart {
                            text: Some("Stay ".to_string()),
                        },
                        ResponsePart { text: None },
                        ResponsePart {
                            text: Some("hydrated.".to_string()),
                        },
                    ],
                }),
            }],
        };
        assert_eq!(extract_text(response), "Stay hydrated.");
    }
}
