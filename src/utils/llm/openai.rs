//! OpenAI-compatible text completion endpoint.

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{CreateCompletionRequest, CreateCompletionRequestArgs, Prompt, Stop};
use async_openai::Client;
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};

use crate::config::{DecodingMethod, GenerateParams, ModelConfig};
use crate::utils::llm::{Generate, InferenceError, TextChunks};

/// A hosted model reached through the `/completions` API with streaming.
///
/// Missing credentials are not rejected here. The first generation call reports them as
/// [InferenceError::Unauthenticated].
pub struct CompletionModel {
    client: Result<Client<OpenAIConfig>, String>,
    model: String,
    params: GenerateParams,
}

impl CompletionModel {
    pub fn new(config: &ModelConfig) -> Self {
        let client = match (&config.api_base, &config.api_key) {
            (Some(api_base), Some(api_key)) => {
                let mut openai_config = OpenAIConfig::new()
                    .with_api_base(api_base)
                    .with_api_key(api_key);
                if let Some(project_id) = &config.project_id {
                    openai_config = openai_config.with_org_id(project_id);
                }
                Ok(Client::with_config(openai_config))
            }
            (None, _) => Err("no inference endpoint configured".to_string()),
            (_, None) => Err("no API key configured".to_string()),
        };
        if let Err(reason) = &client {
            warn!("model {} will not be reachable: {}", config.model, reason);
        }
        Self {
            client,
            model: config.model.clone(),
            params: config.params.clone(),
        }
    }

    /// Builds the streaming request for `prompt` from the decoding parameters.
    pub(crate) fn request(&self, prompt: &str) -> Result<CreateCompletionRequest, InferenceError> {
        let temperature = match self.params.decoding {
            DecodingMethod::Greedy => 0.0,
            DecodingMethod::Sample { temperature } => temperature,
        };
        let mut args = CreateCompletionRequestArgs::default();
        args.model(self.model.clone())
            .prompt(Prompt::String(prompt.to_string()))
            .max_tokens(self.params.max_new_tokens)
            .temperature(temperature)
            .top_p(self.params.top_p)
            .stream(true);
        if !self.params.stop_sequences.is_empty() {
            args.stop(Stop::StringArray(self.params.stop_sequences.clone()));
        }
        args.build().map_err(classify)
    }
}

/// Sorts endpoint errors into the local taxonomy.
///
/// Only a rejected key counts as unauthenticated: an API error coded `invalid_api_key`, or a stream refused
/// with HTTP 401 before the first event.
fn classify(err: OpenAIError) -> InferenceError {
    match err {
        OpenAIError::InvalidArgument(message) => InferenceError::InvalidRequest(message),
        OpenAIError::ApiError(api_error) if format!("{:?}", api_error.code).contains("invalid_api_key") => {
            InferenceError::Unauthenticated(api_error.message)
        }
        OpenAIError::StreamError(message) if message.starts_with(REJECTED_STREAM) => {
            InferenceError::Unauthenticated(message)
        }
        other => InferenceError::Endpoint(other.to_string()),
    }
}

/// How the event source reports a 401 answer to the streaming request.
const REJECTED_STREAM: &str = "Invalid status code: 401";

#[async_trait]
impl Generate for CompletionModel {
    async fn generate_stream(&self, prompt: &str) -> Result<TextChunks, InferenceError> {
        let client = self.client.as_ref().map_err(|reason| InferenceError::Unauthenticated(reason.clone()))?;
        let request = self.request(prompt)?;
        debug!("requesting completion from {}", self.model);
        let responses = client.completions().create_stream(request).await.map_err(classify)?;
        let chunks = responses.map(|response| {
            response
                .map(|response| response.choices.into_iter().map(|choice| choice.text).collect::<String>())
                .map_err(classify)
        });
        Ok(chunks.boxed())
    }
}

#[cfg(test)]
mod test_openai {
    use async_openai::types::Stop;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use async_openai::error::OpenAIError;

    use super::{classify, CompletionModel};
    use crate::config::{DecodingMethod, GenerateParams, ModelConfig};
    use crate::utils::llm::{Generate, InferenceError};

    fn config(api_base: Option<String>, api_key: Option<&str>) -> ModelConfig {
        ModelConfig {
            api_base,
            api_key: api_key.map(str::to_string),
            project_id: None,
            model: "meta-llama/llama-2-70b-chat".to_string(),
            params: GenerateParams::form_defaults(),
        }
    }

    fn chunk(text: &str) -> String {
        let body = serde_json::json!({
            "id": "cmpl-1",
            "object": "text_completion",
            "created": 1700000000,
            "model": "meta-llama/llama-2-70b-chat",
            "choices": [{"text": text, "index": 0, "logprobs": null, "finish_reason": null}]
        });
        format!("data: {}\n\n", body)
    }

    #[test]
    fn test_greedy_request() {
        let model = CompletionModel::new(&config(Some("http://localhost:1".to_string()), Some("key")));
        let request = model.request("需求: 姓名").unwrap();
        assert_eq!(Some(0.0), request.temperature);
        assert_eq!(Some(3000), request.max_tokens);
        assert_eq!(Some(1.0), request.top_p);
        assert_eq!(Some(true), request.stream);
        assert!(matches!(request.stop, Some(Stop::StringArray(ref s)) if s == &vec!["<EOS>".to_string()]));
    }

    #[test]
    fn test_sampling_request() {
        let mut cfg = config(Some("http://localhost:1".to_string()), Some("key"));
        cfg.params = GenerateParams::chat_defaults();
        assert!(matches!(cfg.params.decoding, DecodingMethod::Sample { .. }));
        let request = CompletionModel::new(&cfg).request("hello").unwrap();
        assert_eq!(Some(0.7), request.temperature);
        assert_eq!(Some(200), request.max_tokens);
    }

    #[test]
    fn test_classify_rejected_stream() {
        let err = classify(OpenAIError::StreamError("Invalid status code: 401 Unauthorized".to_string()));
        assert!(err.is_unauthenticated(), "{}", err);
    }

    #[test]
    fn test_classify_digits_in_payload_are_not_auth() {
        let err = classify(OpenAIError::StreamError("failed deserialization of: {\"id\":\"cmpl-4015\"}".to_string()));
        assert!(matches!(err, InferenceError::Endpoint(_)), "{}", err);

        let err = classify(OpenAIError::StreamError("Invalid status code: 500 Internal Server Error, retry after 401s".to_string()));
        assert!(matches!(err, InferenceError::Endpoint(_)), "{}", err);
    }

    #[test]
    fn test_classify_invalid_argument() {
        let err = classify(OpenAIError::InvalidArgument("max_tokens".to_string()));
        assert!(matches!(err, InferenceError::InvalidRequest(_)), "{}", err);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unauthenticated() {
        let model = CompletionModel::new(&config(Some("http://localhost:1".to_string()), None));
        let err = model.generate("prompt").await.expect_err("no key configured");
        assert!(err.is_unauthenticated(), "{}", err);
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_unauthenticated() {
        let model = CompletionModel::new(&config(None, Some("key")));
        let err = model.generate("prompt").await.expect_err("no endpoint configured");
        assert!(err.is_unauthenticated(), "{}", err);
    }

    #[tokio::test]
    async fn test_streamed_completion_is_folded() {
        let server = MockServer::start().await;
        let body = format!("{}{}data: [DONE]\n\n", chunk("{\"姓名\": "), chunk("\"王小明\"}<EOS>"));
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let model = CompletionModel::new(&config(Some(server.uri()), Some("key")));
        let text = model.generate("prompt").await.unwrap();
        assert_eq!("{\"姓名\": \"王小明\"}", text);
    }

    #[tokio::test]
    async fn test_rejected_key_is_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "param": null, "code": "invalid_api_key"}
            })))
            .mount(&server)
            .await;

        let model = CompletionModel::new(&config(Some(server.uri()), Some("wrong")));
        let err = model.generate("prompt").await.expect_err("key is rejected");
        assert!(err.is_unauthenticated(), "{}", err);
    }
}
