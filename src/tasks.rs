//! Task generation with graceful fallback
//!
//! A task is a short dare for the selected player. When a remote
//! generator is configured (endpoint plus credential) one request is
//! made per turn; on any failure — transport error, bad status,
//! malformed response, missing content — the provider silently falls
//! back to a random pick from the local task bank, and to a fixed
//! default line when even that is empty. No retries, no caching; a task
//! request never fails from the game's point of view.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{constants, settings::Difficulty};

/// Task handed out when both the remote generator and the bank come up empty
pub const DEFAULT_TASK: &str = "Make up a short task of your own.";

/// Model requested when the configuration does not name one
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Errors from the remote task generator
///
/// These never propagate past the provider; they only describe why a
/// fallback happened.
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be built or sent
    #[error("task request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status
    #[error("task endpoint returned {0}")]
    Status(reqwest::StatusCode),
    /// The response parsed but carried no usable content
    #[error("task response had no content")]
    MissingContent,
}

/// Configuration of the remote task generator
///
/// The generator is considered configured only when both the endpoint
/// and the credential are present; the model name is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoteConfig {
    /// Chat-completions endpoint to POST to
    #[garde(length(min = 1))]
    pub endpoint: String,
    /// Bearer token sent with every request
    #[garde(length(min = 1))]
    pub api_key: String,
    /// Model name; a default is used when absent
    #[garde(skip)]
    pub model: Option<String>,
}

/// Seam for generating a task from a prompt
///
/// Implemented by the HTTP-backed [`RemoteGenerator`]; tests substitute
/// their own implementations to exercise the fallback paths without a
/// network.
pub trait Generate {
    /// Generates a task for the given prompt
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] describing why generation failed; the caller
    /// falls back to the local bank.
    fn generate(&self, prompt: &str) -> Result<String, Error>;
}

/// Request body of the chat-completions call
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 1],
}

/// One message of the chat-completions request
#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response shape of the chat-completions call
///
/// Every field defaults so that any shape deviation shows up as missing
/// content rather than a parse error with a different fallback path.
#[derive(Deserialize, Default)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Default)]
struct ChatChoice {
    #[serde(default)]
    message: ChatContent,
}

#[derive(Deserialize, Default)]
struct ChatContent {
    #[serde(default)]
    content: String,
}

/// HTTP-backed task generator
pub struct RemoteGenerator {
    config: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl RemoteGenerator {
    /// Creates a generator for the given configuration
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the HTTP client cannot be initialized.
    pub fn new(config: RemoteConfig) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(
                constants::tasks::REQUEST_TIMEOUT_SECS,
            ))
            .build()?;
        Ok(Self { config, client })
    }
}

impl Generate for RemoteGenerator {
    fn generate(&self, prompt: &str) -> Result<String, Error> {
        let body = ChatRequest {
            model: self.config.model.as_deref().unwrap_or(DEFAULT_MODEL),
            messages: [ChatTurn {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let parsed = response.json::<ChatResponse>()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        let content = content.trim();
        if content.is_empty() {
            return Err(Error::MissingContent);
        }
        Ok(content.to_string())
    }
}

/// The local task bank
///
/// A flat list of task strings loaded from static data. An empty bank is
/// fine; the provider then answers with the default task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBank {
    tasks: Vec<String>,
}

impl TaskBank {
    /// Creates a bank from already-parsed task strings
    pub fn new(tasks: Vec<String>) -> Self {
        Self { tasks }
    }

    /// Parses a bank from the raw JSON collection
    ///
    /// Any parse failure degrades to the empty bank; loading problems
    /// never surface as errors.
    pub fn from_json_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Returns the number of tasks in the bank
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the bank holds no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Picks a uniformly random task, or `None` from an empty bank
    pub fn pick(&self) -> Option<&str> {
        if self.tasks.is_empty() {
            return None;
        }
        self.tasks
            .get(fastrand::usize(..self.tasks.len()))
            .map(String::as_str)
    }
}

/// Supplies the task for each resolved turn
///
/// Combines the optional remote generator with the local bank and the
/// hardcoded default, in that order of preference.
pub struct TaskProvider<G> {
    bank: TaskBank,
    remote: Option<G>,
}

impl TaskProvider<RemoteGenerator> {
    /// Creates a provider backed by the HTTP generator when configured
    ///
    /// A missing configuration, or one whose client fails to initialize,
    /// leaves the provider purely local.
    pub fn from_config(bank: TaskBank, config: Option<RemoteConfig>) -> Self {
        let remote = config.and_then(|config| RemoteGenerator::new(config).ok());
        Self { bank, remote }
    }
}

impl<G: Generate> TaskProvider<G> {
    /// Creates a provider with an explicit generator
    pub fn new(bank: TaskBank, remote: Option<G>) -> Self {
        Self { bank, remote }
    }

    /// Returns `true` if a remote generator is attached
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Returns the task for the selected player
    ///
    /// Tries the remote generator once when present; any failure falls
    /// back to a random local task, and an empty bank to the default
    /// line. This method never fails.
    pub fn task_for(&self, player: &str, difficulty: Difficulty) -> String {
        if let Some(remote) = &self.remote {
            let prompt = build_prompt(player, difficulty);
            if let Ok(task) = remote.generate(&prompt) {
                return task;
            }
        }

        self.bank
            .pick()
            .map_or_else(|| DEFAULT_TASK.to_string(), ToOwned::to_owned)
    }
}

/// Builds the generation prompt for a player and difficulty
fn build_prompt(player: &str, difficulty: Difficulty) -> String {
    format!(
        "Think of a short, safe and fun party task for player {player}. Difficulty: {}.",
        difficulty.label()
    )
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    struct FixedGenerator(String);

    impl Generate for FixedGenerator {
        fn generate(&self, _prompt: &str) -> Result<String, Error> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    impl Generate for FailingGenerator {
        fn generate(&self, _prompt: &str) -> Result<String, Error> {
            Err(Error::MissingContent)
        }
    }

    fn bank() -> TaskBank {
        TaskBank::new(vec![
            "Sing a song".to_string(),
            "Do ten push-ups".to_string(),
            "Tell a joke".to_string(),
        ])
    }

    #[test]
    fn test_local_pick_always_from_bank() {
        fastrand::seed(5);
        let provider: TaskProvider<FailingGenerator> = TaskProvider::new(bank(), None);
        for _ in 0..50 {
            let task = provider.task_for("Ana", Difficulty::Normal);
            assert!(bank().tasks.contains(&task));
        }
    }

    #[test]
    fn test_remote_success_wins_over_bank() {
        let provider = TaskProvider::new(
            bank(),
            Some(FixedGenerator("Balance a spoon on your nose".to_string())),
        );
        assert_eq!(
            provider.task_for("Ana", Difficulty::Hard),
            "Balance a spoon on your nose"
        );
    }

    #[test]
    fn test_remote_failure_falls_back_to_bank() {
        fastrand::seed(5);
        let provider = TaskProvider::new(bank(), Some(FailingGenerator));
        let task = provider.task_for("Ana", Difficulty::Normal);
        assert!(bank().tasks.contains(&task));
    }

    #[test]
    fn test_empty_bank_yields_default() {
        let provider: TaskProvider<FailingGenerator> = TaskProvider::new(TaskBank::default(), None);
        assert_eq!(provider.task_for("Ana", Difficulty::Easy), DEFAULT_TASK);
    }

    #[test]
    fn test_remote_failure_with_empty_bank_yields_default() {
        let provider = TaskProvider::new(TaskBank::default(), Some(FailingGenerator));
        assert_eq!(provider.task_for("Ana", Difficulty::Easy), DEFAULT_TASK);
    }

    #[test]
    fn test_prompt_names_player_and_difficulty() {
        let prompt = build_prompt("Ana", Difficulty::Insane);
        assert!(prompt.contains("Ana"));
        assert!(prompt.contains("Insane"));
    }

    #[test]
    fn test_bank_from_json_slice() {
        let parsed = TaskBank::from_json_slice(br#"["one", "two"]"#);
        assert_eq!(parsed.len(), 2);

        assert!(TaskBank::from_json_slice(b"garbage").is_empty());
        assert!(TaskBank::from_json_slice(b"").is_empty());
    }

    #[test]
    fn test_bank_pick_empty_is_none() {
        assert_eq!(TaskBank::default().pick(), None);
    }

    #[test]
    fn test_remote_config_validation() {
        let config = RemoteConfig {
            endpoint: "https://example.test/v1/chat/completions".to_string(),
            api_key: "secret".to_string(),
            model: None,
        };
        assert!(config.validate().is_ok());

        let missing_key = RemoteConfig {
            endpoint: "https://example.test".to_string(),
            api_key: String::new(),
            model: None,
        };
        assert!(missing_key.validate().is_err());
    }

    #[test]
    fn test_chat_response_tolerates_missing_fields() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());

        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {}}]}"#).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert!(parsed.choices[0].message.content.is_empty());
    }
}
