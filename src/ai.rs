use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use bytes::Bytes;
use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::GroqConfig;

/// Vision-capable chat completion used for food photos.
#[async_trait]
pub trait VisionClient: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    /// Sends the image with `prompt` and returns the model's raw text reply.
    async fn describe_image(
        &self,
        prompt: &str,
        image: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String>;
}

/// Hosted speech synthesis and transcription.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes>;

    async fn transcribe(
        &self,
        audio: Bytes,
        filename: &str,
        content_type: &str,
    ) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    config: GroqConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: serde_json::Value,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl GroqClient {
    pub fn new(config: GroqConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.config
            .api_key
            .as_deref()
            .context("GROQ_API_KEY not configured")
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// `data:` URL carrying the image inline.
pub fn data_url(content_type: &str, image: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, encode_base64(image))
}

#[async_trait]
impl VisionClient for GroqClient {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn describe_image(
        &self,
        prompt: &str,
        image: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let body = ChatRequest {
            model: &self.config.vision_model,
            messages: json!([{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": data_url(content_type, &image) } },
                ],
            }]),
            temperature: 0.1,
            max_tokens: 1000,
        };

        let res: ChatResponse = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(self.api_key()?)
            .json(&body)
            .send()
            .await
            .context("groq chat completion")?
            .error_for_status()
            .context("groq chat completion status")?
            .json()
            .await
            .context("decode chat completion")?;

        let content = res
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("chat completion has no content")?;
        debug!(chars = content.len(), "vision reply received");
        Ok(content)
    }
}

#[async_trait]
impl SpeechClient for GroqClient {
    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes> {
        let audio = self
            .client
            .post(self.url("audio/speech"))
            .bearer_auth(self.api_key()?)
            .json(&json!({
                "model": self.config.tts_model,
                "voice": self.config.tts_voice,
                "input": text,
                "response_format": "wav",
            }))
            .send()
            .await
            .context("groq speech")?
            .error_for_status()
            .context("groq speech status")?
            .bytes()
            .await
            .context("read speech audio")?;
        Ok(audio)
    }

    async fn transcribe(
        &self,
        audio: Bytes,
        filename: &str,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let file = multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type)
            .context("audio content type")?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("model", self.config.stt_model.clone())
            .text("response_format", "json");

        let res: TranscriptionResponse = self
            .client
            .post(self.url("audio/transcriptions"))
            .bearer_auth(self.api_key()?)
            .timeout(Duration::from_secs(self.config.voice_timeout_secs))
            .multipart(form)
            .send()
            .await
            .context("groq transcription")?
            .error_for_status()
            .context("groq transcription status")?
            .json()
            .await
            .context("decode transcription")?;
        Ok(res.text)
    }
}
