//! Client-side request/loading/error state machine.
//!
//! The controller owns one `ClientState` value, so "loading with an error"
//! or "image while loading" cannot be expressed. `begin_submit` and
//! `complete` are the two halves of a submission; `submit` runs both
//! around the transport call.
use crate::client::store::{ImageHandle, ImageStore};
use crate::client::transport::{ProxyTransport, TransportError};
use crate::generation::{GenerationOutcome, GenerationRequest};

pub const EMPTY_PROMPT: &str = "Please enter a prompt";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";
pub const DISPLAY_ERROR: &str = "Failed to display image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    Loading,
    Success(ImageHandle),
    Error(String),
}

pub struct ClientController<T, S> {
    transport: T,
    store: S,
    prompt: String,
    state: ClientState,
}

impl<T: ProxyTransport, S: ImageStore> ClientController<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        ClientController {
            transport,
            store,
            prompt: String::new(),
            state: ClientState::Idle,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ClientState::Loading)
    }

    /// Whether the Generate control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.prompt.trim().is_empty()
    }

    /// Enter `Loading` and hand back the request to send, or settle the
    /// state without a request (empty prompt, or already loading).
    pub fn begin_submit(&mut self) -> Option<GenerationRequest> {
        if self.is_loading() {
            tracing::debug!("Ignoring submit while a request is outstanding");
            return None;
        }
        self.release_image();

        match GenerationRequest::new(&self.prompt) {
            Some(request) => {
                tracing::debug!("Idle -> Loading");
                self.state = ClientState::Loading;
                Some(request)
            }
            None => {
                self.state = ClientState::Error(EMPTY_PROMPT.to_string());
                None
            }
        }
    }

    /// Apply the result of the transport call; ignored unless `Loading`.
    pub fn complete(&mut self, result: Result<GenerationOutcome, TransportError>) {
        if !self.is_loading() {
            tracing::warn!("Dropping outcome received outside of Loading");
            return;
        }

        self.state = match result {
            Ok(GenerationOutcome::Success(image)) => match self.store.store(image) {
                Ok(handle) => {
                    tracing::debug!("Loading -> Success ({} bytes at {})", handle.size, handle.location);
                    ClientState::Success(handle)
                }
                Err(e) => {
                    tracing::warn!("Could not keep generated image: {}", e);
                    ClientState::Error(DISPLAY_ERROR.to_string())
                }
            },
            Ok(GenerationOutcome::Failure { status_code, message }) => {
                tracing::warn!("Generation failed with status {}: {}", status_code, message);
                ClientState::Error(message)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                ClientState::Error(NETWORK_ERROR.to_string())
            }
        };
    }

    pub async fn submit(&mut self) -> &ClientState {
        if let Some(request) = self.begin_submit() {
            let result = self.transport.generate(&request).await;
            self.complete(result);
        }
        &self.state
    }

    /// "Generate another": only meaningful after a success.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.state, ClientState::Success(_)) {
            return false;
        }
        self.release_image();
        self.prompt.clear();
        true
    }

    fn release_image(&mut self) {
        if let ClientState::Success(handle) = &self.state {
            self.store.release(handle);
            self.state = ClientState::Idle;
        }
    }
}
