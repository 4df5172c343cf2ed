use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::api::{GenerateError, TextGenerator};
use crate::core::conversation::{Conversation, Message, Role};
use crate::core::credential::{CredentialError, CredentialStore};

/// Why a submission did not start. A blocked submit is a no-op: no state
/// transition happens and nothing is appended to the transcript.
#[derive(Debug)]
pub enum SubmitBlocked {
    /// The input trimmed to nothing.
    EmptyInput,
    /// A previous submission is still in flight.
    Busy,
    /// No credential is stored.
    NoCredential,
    /// The credential backend failed.
    Credentials(CredentialError),
}

impl fmt::Display for SubmitBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitBlocked::EmptyInput => write!(f, "nothing to send"),
            SubmitBlocked::Busy => write!(f, "a request is already in flight"),
            SubmitBlocked::NoCredential => write!(f, "no API token is configured"),
            SubmitBlocked::Credentials(err) => write!(f, "could not read API token: {err}"),
        }
    }
}

/// Result of one submit cycle.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The guard rejected the input; nothing happened.
    Ignored(SubmitBlocked),
    /// The assistant reply that was appended to the transcript.
    Reply(Message),
    /// The attempt failed; the user message stays, no reply is recorded, and
    /// the session is idle again.
    Failed(GenerateError),
}

/// A submission that passed the guard: the user message is already in the
/// transcript, the busy flag is set, and the credential has been read.
struct PendingPrompt {
    inputs: String,
    token: String,
}

/// Client-side request/response orchestrator.
///
/// Owns the transcript and the busy guard. The credential store and the text
/// generator are injected, and the credential is read once per submission and
/// passed to the generator explicitly. Every generate call is bounded by the
/// configured deadline and by the caller's cancellation token; both resolve
/// the attempt as failed and free the busy guard.
pub struct ChatSession {
    credentials: Arc<dyn CredentialStore + Send + Sync>,
    generator: Arc<dyn TextGenerator + Send + Sync>,
    conversation: Conversation,
    timeout: Duration,
    busy: bool,
}

impl ChatSession {
    pub fn new(
        credentials: Arc<dyn CredentialStore + Send + Sync>,
        generator: Arc<dyn TextGenerator + Send + Sync>,
        timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            generator,
            conversation: Conversation::new(),
            timeout,
            busy: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Runs one full submit cycle: guard, user append, bounded generate call,
    /// assistant append (or failure notice).
    pub async fn submit(&mut self, input: &str, cancel: &CancellationToken) -> SubmitOutcome {
        let pending = match self.try_begin(input) {
            Ok(pending) => pending,
            Err(blocked) => return SubmitOutcome::Ignored(blocked),
        };
        match self.resolve(pending, cancel).await {
            Ok(message) => SubmitOutcome::Reply(message.clone()),
            Err(err) => {
                tracing::debug!("generate attempt failed: {err}");
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Guard check and transition into the submitting state. On success the
    /// raw input is appended as a user message and the busy flag is set.
    fn try_begin(&mut self, input: &str) -> Result<PendingPrompt, SubmitBlocked> {
        if input.trim().is_empty() {
            return Err(SubmitBlocked::EmptyInput);
        }
        if self.busy {
            return Err(SubmitBlocked::Busy);
        }
        let token = match self.credentials.load() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(SubmitBlocked::NoCredential),
            Err(err) => return Err(SubmitBlocked::Credentials(err)),
        };

        self.busy = true;
        self.conversation.append(Role::User, input);
        Ok(PendingPrompt {
            inputs: input.to_string(),
            token,
        })
    }

    /// Waits for the generate call, the deadline, or cancellation, whichever
    /// comes first. The busy flag is freed on every path.
    async fn resolve(
        &mut self,
        pending: PendingPrompt,
        cancel: &CancellationToken,
    ) -> Result<&Message, GenerateError> {
        let generator = Arc::clone(&self.generator);
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(GenerateError::Canceled),
            attempt = tokio::time::timeout(
                self.timeout,
                generator.generate(&pending.inputs, &pending.token),
            ) => match attempt {
                Ok(result) => result,
                Err(_) => Err(GenerateError::TimedOut),
            },
        };
        self.busy = false;

        let text = result?;
        Ok(self.conversation.append(Role::Assistant, text))
    }
}
