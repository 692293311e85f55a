use crate::errors::PersistenceError;
use crate::generator::{TextGenerator, generate_with_timeout, system_context};
use crate::models::{CheckInEntry, CheckInResponse, Mood, Tone};
use crate::responder::{RandomSource, respond};
use crate::storage::{RecordStore, recent_entries};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedReply {
    Disabled,
    Reply(String),
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub timestamp: String,
    pub entry: CheckInEntry,
    pub response: String,
    pub generated: GeneratedReply,
}

impl CheckInOutcome {
    pub fn tone(&self) -> Tone {
        self.entry.tone
    }

    pub fn into_api_response(self) -> CheckInResponse {
        let (generated, generated_error) = match self.generated {
            GeneratedReply::Disabled => (None, None),
            GeneratedReply::Reply(text) => (Some(text), None),
            GeneratedReply::Unavailable(reason) => (None, Some(reason)),
        };
        CheckInResponse {
            timestamp: self.timestamp,
            tone: self.entry.tone,
            response: self.response,
            generated,
            generated_error,
        }
    }
}

pub struct CheckInService {
    store: Arc<dyn RecordStore>,
    random: Arc<dyn RandomSource>,
    generator: Option<Arc<dyn TextGenerator>>,
    generation_timeout: Duration,
    // Held around saves only; serializes read-modify-write within this process.
    submit_lock: Mutex<()>,
}

impl CheckInService {
    pub fn new(store: Arc<dyn RecordStore>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            store,
            random,
            generator: None,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            submit_lock: Mutex::new(()),
        }
    }

    pub fn with_generator(
        mut self,
        generator: Arc<dyn TextGenerator>,
        timeout: Duration,
    ) -> Self {
        self.generator = Some(generator);
        self.generation_timeout = timeout;
        self
    }

    pub async fn submit(
        &self,
        mood: Mood,
        focus: &str,
        note: &str,
    ) -> Result<CheckInOutcome, PersistenceError> {
        let entry = CheckInEntry::new(mood, focus, note);
        let response = respond(entry.tone, focus, self.random.as_ref());

        let save = async {
            let _guard = self.submit_lock.lock().await;
            self.store.save(entry.clone()).await
        };
        let (saved, generated) = tokio::join!(save, self.generate(mood, focus, note));
        let timestamp = saved?;

        info!(
            %timestamp,
            mood = mood.as_str(),
            tone = entry.tone.as_str(),
            "check-in recorded"
        );
        Ok(CheckInOutcome {
            timestamp,
            entry,
            response,
            generated,
        })
    }

    pub async fn recent(
        &self,
        limit: usize,
    ) -> Result<Vec<(String, CheckInEntry)>, PersistenceError> {
        let store = self.store.load().await?;
        Ok(recent_entries(&store, limit))
    }

    async fn generate(&self, mood: Mood, focus: &str, note: &str) -> GeneratedReply {
        let Some(generator) = self.generator.as_ref() else {
            return GeneratedReply::Disabled;
        };

        let context = system_context(mood, focus);
        let timeout = self.generation_timeout;
        match generate_with_timeout(generator.as_ref(), timeout, &context, note).await {
            Ok(text) => GeneratedReply::Reply(text),
            Err(err) => {
                warn!("generated reply unavailable: {err}");
                GeneratedReply::Unavailable(err.to_string())
            }
        }
    }
}
