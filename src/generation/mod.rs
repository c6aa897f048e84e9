use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::{
    config::GenAiConfig,
    error::{AppError, Result},
};

/// Produces certificate images from a prompt. The production impl calls
/// the hosted generation API; tests swap in a fake.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_certificate(&self, student_name: &str, event_title: &str) -> Result<Vec<u8>>;
}

/// Drafts blog content for the admin to edit before saving.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn draft_blog_post(&self, topic: &str, key_points: &[String]) -> Result<BlogDraft>;
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
}

/// Fixed certificate layout prompt, parameterized by student name and
/// event title only.
pub fn certificate_prompt(student_name: &str, event_title: &str) -> String {
    format!(
        "Generate an elegant certificate of attendance image in landscape \
         orientation. It must read 'Certificate of Attendance', prominently \
         feature the recipient name \"{}\", and state that they attended \
         \"{}\". Use a clean design with a subtle border, a dark blue and \
         gold palette, and no placeholder text.",
        student_name, event_title
    )
}

fn blog_prompt(topic: &str, key_points: &[String]) -> String {
    let mut prompt = format!(
        "Draft a blog post for a university digital-marketing club about: {}.\n\
         Respond with the post title on the first line prefixed 'TITLE: ', \
         followed by a blank line and the post body in markdown.",
        topic
    );
    if !key_points.is_empty() {
        prompt.push_str("\nCover these points:\n");
        for point in key_points {
            prompt.push_str("- ");
            prompt.push_str(point);
            prompt.push('\n');
        }
    }
    prompt
}

// Wire types for the generateContent endpoint.

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

/// HTTP client for the generation API. Constructed only when the feature
/// is enabled and an API key is configured.
pub struct GenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_model: String,
    text_model: String,
}

impl GenAiClient {
    pub fn new(config: GenAiConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let api_key = config.api_key?;
        Some(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            image_model: config
                .image_model
                .unwrap_or_else(|| "gemini-2.0-flash-preview-image-generation".to_string()),
            text_model: config
                .text_model
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
        })
    }

    async fn generate(&self, model: &str, prompt: String) -> Result<GenerateResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self.client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "Generation service returned {}",
                response.status()
            )));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| AppError::External(format!("Invalid generation response: {}", e)))
    }
}

fn first_inline_image(response: &GenerateResponse) -> Option<&str> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.as_ref())
        .map(|d| d.data.as_str())
}

fn first_text(response: &GenerateResponse) -> Option<&str> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.text.as_deref())
}

fn parse_blog_draft(text: &str, topic: &str) -> BlogDraft {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("TITLE:") {
        let (title, body) = rest.split_once('\n').unwrap_or((rest, ""));
        let title = title.trim();
        if !title.is_empty() {
            return BlogDraft {
                title: title.to_string(),
                content: body.trim_start().to_string(),
            };
        }
    }
    // Model ignored the format; fall back to the topic as the title.
    BlogDraft {
        title: topic.to_string(),
        content: trimmed.to_string(),
    }
}

#[async_trait]
impl ImageGenerator for GenAiClient {
    async fn generate_certificate(&self, student_name: &str, event_title: &str) -> Result<Vec<u8>> {
        let prompt = certificate_prompt(student_name, event_title);
        let response = self.generate(&self.image_model, prompt).await?;

        let data = first_inline_image(&response).ok_or_else(|| {
            AppError::Generation("Generation service returned no image payload".to_string())
        })?;

        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| AppError::Generation(format!("Invalid image payload: {}", e)))
    }
}

#[async_trait]
impl TextGenerator for GenAiClient {
    async fn draft_blog_post(&self, topic: &str, key_points: &[String]) -> Result<BlogDraft> {
        let prompt = blog_prompt(topic, key_points);
        let response = self.generate(&self.text_model, prompt).await?;

        let text = first_text(&response).ok_or_else(|| {
            AppError::Generation("Generation service returned no text".to_string())
        })?;

        Ok(parse_blog_draft(text, topic))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod fake {
    use std::sync::Mutex;
    use super::*;

    /// Records calls and returns a fixed payload, or fails if told to.
    pub struct FakeImageGenerator {
        pub fail: bool,
        pub calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeImageGenerator {
        pub fn new() -> Self {
            Self { fail: false, calls: Mutex::new(Vec::new()) }
        }

        pub fn failing() -> Self {
            Self { fail: true, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl ImageGenerator for FakeImageGenerator {
        async fn generate_certificate(
            &self,
            student_name: &str,
            event_title: &str,
        ) -> Result<Vec<u8>> {
            self.calls
                .lock()
                .unwrap()
                .push((student_name.to_string(), event_title.to_string()));
            if self.fail {
                return Err(AppError::Generation(
                    "Generation service returned no image payload".to_string(),
                ));
            }
            Ok(b"fake-png-bytes".to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_prompt_includes_name_and_title() {
        let prompt = certificate_prompt("Jane Doe", "SEO Workshop");
        assert!(prompt.contains("\"Jane Doe\""));
        assert!(prompt.contains("\"SEO Workshop\""));
        assert!(prompt.contains("Certificate of Attendance"));
    }

    #[test]
    fn inline_image_is_extracted_from_response() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "here is your certificate" },
                        { "inlineData": { "mimeType": "image/png", "data": "cG5n" } }
                    ]
                }
            }]
        });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(first_inline_image(&response), Some("cG5n"));
    }

    #[test]
    fn empty_response_has_no_image() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(first_inline_image(&response).is_none());
        assert!(first_text(&response).is_none());
    }

    #[test]
    fn blog_draft_parses_title_line() {
        let draft = parse_blog_draft("TITLE: Winning at SEO\n\nBody text here.", "seo");
        assert_eq!(draft.title, "Winning at SEO");
        assert_eq!(draft.content, "Body text here.");
    }

    #[test]
    fn blog_draft_falls_back_to_topic() {
        let draft = parse_blog_draft("Just a body with no title line.", "Email funnels");
        assert_eq!(draft.title, "Email funnels");
        assert_eq!(draft.content, "Just a body with no title line.");
    }
}
