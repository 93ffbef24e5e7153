//! Chatting with an LLM about a selected paper.
//!
//! [`PaperChat`] turns a front end's chat history and the selected paper into one request
//! to a [`ChatProvider`]:
//! - the system prompt introduces the paper by title and summary,
//! - the history is bounded to the last `K` turns (a turn is one human message and one
//!   assistant reply, so at most `2K` messages),
//! - the last human message is sent as the new message, or `" "` when there is none.
//!
//! [`GroqClient`] is the bundled provider. It speaks the OpenAI-compatible chat completions
//! protocol Groq exposes.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use paperchat::chat::{ChatMessage, GroqClient, PaperChat, PaperInfo};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let chat = PaperChat::new(Arc::new(GroqClient::from_env()));
//! let paper = PaperInfo {
//!   title:   "Attention Is All You Need".into(),
//!   summary: "We propose the Transformer.".into(),
//! };
//! let history = vec![ChatMessage::human("What is the main contribution?")];
//!
//! let reply = chat.reply(&paper, &history).await?;
//! println!("{}", reply.content);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Number of turns of history kept by default.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Groq's OpenAI-compatible API root.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

/// Model used unless configured otherwise.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Sampling temperature for paper chat.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Environment variable holding the Groq key.
pub const GROQ_KEY_VAR: &str = "GROQ_API_KEY";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  /// Instructions framing the conversation
  System,
  /// The person asking about the paper
  #[serde(alias = "user")]
  Human,
  /// The model
  #[serde(alias = "ai")]
  Assistant,
}

impl ChatRole {
  /// Role name in the OpenAI-compatible wire format.
  pub fn as_api_str(self) -> &'static str {
    match self {
      ChatRole::System => "system",
      ChatRole::Human => "user",
      ChatRole::Assistant => "assistant",
    }
  }
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  /// Author of the message
  pub role:    ChatRole,
  /// Message text
  pub content: String,
}

impl ChatMessage {
  /// A message from the person chatting.
  pub fn human(content: impl Into<String>) -> Self {
    Self { role: ChatRole::Human, content: content.into() }
  }

  /// A reply from the model.
  pub fn assistant(content: impl Into<String>) -> Self {
    Self { role: ChatRole::Assistant, content: content.into() }
  }
}

/// The paper a conversation is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperInfo {
  /// Paper title
  pub title:   String,
  /// Abstract or snippet
  #[serde(default)]
  pub summary: String,
}

impl From<&Paper> for PaperInfo {
  fn from(paper: &Paper) -> Self {
    Self { title: paper.title.clone(), summary: paper.summary.clone() }
  }
}

/// A chat completion service.
#[async_trait]
pub trait ChatProvider: Send + Sync {
  /// Sends `message` after `system_prompt` and `history` and returns the assistant's reply.
  ///
  /// # Errors
  ///
  /// Fails when the provider is not configured, unreachable, or answers with an error.
  async fn send(
    &self,
    system_prompt: &str,
    history: &[ChatMessage],
    message: &str,
  ) -> Result<String, PaperchatError>;
}

/// Builds the system prompt introducing `paper`.
pub fn system_prompt(paper: &PaperInfo) -> String {
  format!(
    "You are a helpful assistant discussing the research paper titled '{}'. Here's a brief \
     summary of the paper: {}",
    paper.title, paper.summary
  )
}

/// Keeps the last `window` turns of `history`, that is at most `2 * window` messages.
pub fn bounded_history(history: &[ChatMessage], window: usize) -> &[ChatMessage] {
  let keep = window.saturating_mul(2);
  &history[history.len().saturating_sub(keep)..]
}

/// Conversation orchestration on top of a [`ChatProvider`].
#[derive(Clone)]
pub struct PaperChat {
  /// Completion backend
  provider: Arc<dyn ChatProvider>,
  /// Turns of history sent with each request
  window:   usize,
}

impl std::fmt::Debug for PaperChat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PaperChat").field("window", &self.window).finish_non_exhaustive()
  }
}

impl PaperChat {
  /// Creates a chat keeping [`DEFAULT_HISTORY_WINDOW`] turns of history.
  pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
    Self { provider, window: DEFAULT_HISTORY_WINDOW }
  }

  /// Sets how many turns of history are kept.
  pub fn with_window(mut self, window: usize) -> Self {
    self.window = window;
    self
  }

  /// Turns of history kept.
  pub fn window(&self) -> usize { self.window }

  /// Answers the last human message of `history` in the context of `paper`.
  ///
  /// System messages from the caller are dropped; the system prompt always comes from the
  /// paper. When the conversation ends with a human message, that message is sent as the
  /// new message and the rest, bounded to the window, as history. Otherwise the bounded
  /// history is sent with a single space as the new message.
  pub async fn reply(
    &self,
    paper: &PaperInfo,
    history: &[ChatMessage],
  ) -> Result<ChatMessage, PaperchatError> {
    let history = history
      .iter()
      .filter(|message| message.role != ChatRole::System)
      .cloned()
      .collect::<Vec<_>>();

    let (message, earlier) = match history.split_last() {
      Some((last, earlier)) if last.role == ChatRole::Human => (last.content.as_str(), earlier),
      _ => (" ", history.as_slice()),
    };
    let earlier = bounded_history(earlier, self.window);

    debug!(
      "Chatting about {:?} with {} messages of history",
      paper.title,
      earlier.len()
    );
    let content = self.provider.send(&system_prompt(paper), earlier, message).await?;
    Ok(ChatMessage::assistant(content))
  }
}

/// Request body of the chat completions API.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
  /// Model name
  model:       &'a str,
  /// Sampling temperature
  temperature: f32,
  /// Conversation so far
  messages:    Vec<WireMessage<'a>>,
}

/// A message in the chat completions wire format.
#[derive(Debug, Serialize)]
struct WireMessage<'a> {
  /// `system`, `user`, or `assistant`
  role:    &'static str,
  /// Message text
  content: &'a str,
}

/// Response body of the chat completions API.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
  /// Generated alternatives; only the first is used
  choices: Vec<Choice>,
}

/// One generated alternative.
#[derive(Debug, Deserialize)]
struct Choice {
  /// The generated message
  message: ChoiceMessage,
}

/// Message of a [`Choice`].
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  /// Generated text
  #[serde(default)]
  content: String,
}

/// Chat completions client for Groq.
#[derive(Clone)]
pub struct GroqClient {
  /// Internal web client used to connect to the API.
  client:      reqwest::Client,
  /// Groq API key, if configured
  api_key:     Option<String>,
  /// Model name
  model:       String,
  /// Sampling temperature
  temperature: f32,
  /// API root, [`GROQ_API_URL`] unless overridden
  base_url:    String,
}

impl std::fmt::Debug for GroqClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GroqClient")
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("model", &self.model)
      .field("temperature", &self.temperature)
      .field("base_url", &self.base_url)
      .finish()
  }
}

impl GroqClient {
  /// Creates a client with an explicit API key and the default model.
  pub fn new(api_key: Option<String>) -> Self {
    Self {
      client:      reqwest::Client::new(),
      api_key:     api_key.filter(|key| !key.trim().is_empty()),
      model:       DEFAULT_MODEL.to_owned(),
      temperature: DEFAULT_TEMPERATURE,
      base_url:    GROQ_API_URL.to_owned(),
    }
  }

  /// Creates a client whose key comes from `GROQ_API_KEY`.
  pub fn from_env() -> Self { Self::new(std::env::var(GROQ_KEY_VAR).ok()) }

  /// Uses `model` instead of [`DEFAULT_MODEL`].
  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }

  /// Points the client at another OpenAI-compatible API root.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Whether an API key is configured.
  pub fn has_api_key(&self) -> bool { self.api_key.is_some() }

  /// Model requests are sent to.
  pub fn model(&self) -> &str { &self.model }
}

/// Assembles the wire messages: system prompt, history, then the new message.
fn wire_messages<'a>(
  system_prompt: &'a str,
  history: &'a [ChatMessage],
  message: &'a str,
) -> Vec<WireMessage<'a>> {
  std::iter::once(WireMessage { role: ChatRole::System.as_api_str(), content: system_prompt })
    .chain(history.iter().map(|m| WireMessage { role: m.role.as_api_str(), content: &m.content }))
    .chain(std::iter::once(WireMessage { role: ChatRole::Human.as_api_str(), content: message }))
    .collect()
}

#[async_trait]
impl ChatProvider for GroqClient {
  async fn send(
    &self,
    system_prompt: &str,
    history: &[ChatMessage],
    message: &str,
  ) -> Result<String, PaperchatError> {
    let api_key = self.api_key.as_deref().ok_or(PaperchatError::MissingApiKey(GROQ_KEY_VAR))?;

    let request = CompletionRequest {
      model:       &self.model,
      temperature: self.temperature,
      messages:    wire_messages(system_prompt, history, message),
    };
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    debug!("Sending {} messages to {url}", request.messages.len());

    let response = self.client.post(&url).bearer_auth(api_key).json(&request).send().await?;
    let status = response.status();
    let body = response.text().await?;
    trace!("Chat completion response ({status}): {body}");

    if !status.is_success() {
      warn!("Chat completion failed with status {status}");
      return Err(PaperchatError::ApiError(format!("Groq returned {status}: {body}")));
    }

    let completion: CompletionResponse = serde_json::from_str(&body)?;
    completion
      .choices
      .into_iter()
      .next()
      .map(|choice| choice.message.content)
      .ok_or_else(|| PaperchatError::ApiError("completion without choices".into()))
  }
}
