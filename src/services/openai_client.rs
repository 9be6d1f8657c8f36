use std::error::Error;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use crate::domain::analysis::AnalysisPrompt;
use crate::services::analyzer::ChunkAnalyzer;

const COMPLETION_MODEL: &str = "gpt-4o-mini";
const COMPLETION_TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
}

impl Default for OpenaiClient {
    fn default() -> Self {
        OpenaiClient {
            client: Client::new(),
        }
    }
}

impl OpenaiClient {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
        }
    }
}

#[async_trait]
impl ChunkAnalyzer for OpenaiClient {
    async fn analyze_chunk(
        &self,
        chunk: &str,
        prompt: &AnalysisPrompt,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(COMPLETION_MODEL)
            .temperature(COMPLETION_TEMPERATURE)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(prompt.system_instruction())
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt.user_content(chunk))
                    .build()?
                    .into(),
            ])
            .max_tokens(1000_u32)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let reply = response
            .choices
            .first()
            .ok_or("No choices in Openai response")?
            .message
            .content
            .clone()
            .ok_or("No content in Openai response")?;

        Ok(reply)
    }
}
