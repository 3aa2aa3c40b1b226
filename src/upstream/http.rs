use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::app::{snippet, Result, StoryFeedError};
use crate::config::Config;
use crate::upstream::{ImageApi, ImageRequest, Message, Reply, TextApi, TextRequest};

#[derive(Serialize)]
struct ResponsesBody<'a> {
    model: &'a str,
    input: Vec<Message>,
    text: ResponseText,
}

#[derive(Serialize)]
struct ResponseText {
    format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct ImageBody<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'static str>,
}

/// Bearer-token client for an OpenAI-compatible API.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    text_timeout: Duration,
    image_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("storyfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            text_timeout: Duration::from_secs(120),
            image_timeout: Duration::from_secs(90),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(config.api_key()?, &config.openai.api_base)?;
        Ok(client.with_timeouts(
            Duration::from_secs(config.openai.text_timeout_secs),
            Duration::from_secs(config.openai.image_timeout_secs),
        ))
    }

    pub fn with_timeouts(mut self, text: Duration, image: Duration) -> Self {
        self.text_timeout = text;
        self.image_timeout = image;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        Ok(response)
    }
}

async fn into_reply(response: Response) -> Result<Reply> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = response.bytes().await?.to_vec();

    Ok(Reply {
        status,
        content_type,
        body,
    })
}

/// Turns a non-2xx reply into an error carrying a bounded body snippet.
fn expect_success(reply: Reply) -> Result<Reply> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(StoryFeedError::UpstreamStatus {
            status: reply.status,
            snippet: snippet(&reply.text()),
        })
    }
}

#[async_trait]
impl TextApi for OpenAiClient {
    async fn respond(&self, request: &TextRequest) -> Result<Value> {
        let body = ResponsesBody {
            model: &request.model,
            input: request.messages(),
            text: ResponseText {
                format: ResponseFormat {
                    kind: "json_object",
                },
            },
        };

        let response = self.post_json("responses", &body, self.text_timeout).await?;
        let reply = expect_success(into_reply(response).await?)?;
        reply.json()
    }

    async fn chat(&self, request: &TextRequest) -> Result<String> {
        let body = ChatBody {
            model: &request.model,
            messages: request.messages(),
        };

        let response = self
            .post_json("chat/completions", &body, self.text_timeout)
            .await?;
        let reply = expect_success(into_reply(response).await?)?;
        let payload = reply.json()?;

        payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                StoryFeedError::upstream_format(
                    "chat completion carried no message content",
                    &payload.to_string(),
                )
            })
    }
}

#[async_trait]
impl ImageApi for OpenAiClient {
    async fn generate(&self, request: &ImageRequest) -> Result<Reply> {
        let body = ImageBody {
            model: &request.model,
            prompt: &request.prompt,
            size: &request.size,
            response_format: request.wants_inline_data().then_some("b64_json"),
        };

        let response = self
            .post_json("images/generations", &body, self.image_timeout)
            .await?;
        into_reply(response).await
    }

    async fn download(&self, url: &str) -> Result<Reply> {
        let response = self
            .client
            .get(url)
            .timeout(self.image_timeout)
            .send()
            .await?;
        into_reply(response).await
    }
}
