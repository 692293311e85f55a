use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use vera_checkin::errors::{PersistenceError, ServiceError};
use vera_checkin::generator::TextGenerator;
use vera_checkin::models::{Mood, Tone};
use vera_checkin::responder::{respond, templates, tone_for, tone_for_label, FixedIndex};
use vera_checkin::storage::{Clock, FixedClock, InMemoryRecordStore, RecordStore};
use vera_checkin::{CheckInService, FileRecordStore, GeneratedReply};

struct Scripted {
    reply: Result<String, u16>,
    seen: Mutex<Vec<(String, String)>>,
}

impl Scripted {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate(
        &self,
        system_context: &str,
        user_text: &str,
    ) -> Result<String, ServiceError> {
        self.seen
            .lock()
            .await
            .push((system_context.to_string(), user_text.to_string()));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ServiceError::Status {
                status: *status,
                body: "unauthorized".to_string(),
            }),
        }
    }
}

struct Stalled;

#[async_trait]
impl TextGenerator for Stalled {
    async fn generate(&self, _: &str, _: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

struct Gated(Semaphore);

#[async_trait]
impl TextGenerator for Gated {
    async fn generate(&self, _: &str, _: &str) -> Result<String, ServiceError> {
        let _permit = self
            .0
            .acquire()
            .await
            .map_err(|err| ServiceError::Malformed(err.to_string()))?;
        Ok("released".to_string())
    }
}

#[derive(Default)]
struct SequenceClock(AtomicUsize);

impl Clock for SequenceClock {
    fn timestamp_key(&self) -> String {
        format!("2024-05-01 08:00:{:02}", self.0.fetch_add(1, Ordering::SeqCst))
    }
}

fn service(store: Arc<InMemoryRecordStore>) -> CheckInService {
    CheckInService::new(store, Arc::new(FixedIndex(0)))
}

fn file_service(store: FileRecordStore) -> CheckInService {
    CheckInService::new(Arc::new(store), Arc::new(FixedIndex(0)))
}

#[test]
fn every_mood_maps_to_its_tone() {
    let expected = [
        (Mood::Calm, Tone::Calm),
        (Mood::Anxious, Tone::Therapist),
        (Mood::Motivated, Tone::Hype),
        (Mood::Tired, Tone::Therapist),
        (Mood::Excited, Tone::Hype),
        (Mood::Focused, Tone::Default),
    ];
    for (mood, tone) in expected {
        assert_eq!(tone_for(mood), tone, "{mood}");
        assert_eq!(tone_for_label(mood.label()), tone);
    }
    assert_eq!(tone_for_label("Sleepy"), Tone::Default);
    assert_eq!(tone_for_label(""), Tone::Default);
}

#[test]
fn reply_is_one_of_the_tone_templates() {
    for tone in [Tone::Calm, Tone::Hype, Tone::Therapist, Tone::Default] {
        let candidates: Vec<String> = templates(tone)
            .iter()
            .map(|template| template.replace("{focus}", "taxes"))
            .collect();
        for index in 0..2 {
            let reply = respond(tone, "taxes", &FixedIndex(index));
            assert_eq!(reply, candidates[index]);
            assert!(!reply.contains("{focus}"));
        }
    }
}

#[test]
fn anxious_deep_work_example() {
    let tone = tone_for("Anxious".parse().unwrap());
    assert_eq!(tone, Tone::Therapist);
    assert_eq!(
        respond(tone, "deep work", &FixedIndex(0)),
        "Let's take it slow. I hear you. We'll stay grounded in deep work today."
    );
    assert_eq!(
        respond(tone, "deep work", &FixedIndex(1)),
        "That's okay — we'll work through it. Just return to your focus: deep work"
    );
}

#[tokio::test]
async fn submit_persists_entry_and_returns_templated_reply() {
    let store = Arc::new(InMemoryRecordStore::with_clock(FixedClock(
        "2024-05-01 08:00:00".to_string(),
    )));
    let checkins = service(store.clone());

    let outcome = checkins
        .submit(Mood::Excited, "demo day", "slept well")
        .await
        .unwrap();

    assert_eq!(outcome.timestamp, "2024-05-01 08:00:00");
    assert_eq!(outcome.tone(), Tone::Hype);
    assert_eq!(
        outcome.response,
        "Let's gooo! Big energy. Stay locked in on demo day today!"
    );
    assert_eq!(outcome.generated, GeneratedReply::Disabled);

    let saved = store.load().await.unwrap();
    assert_eq!(saved["2024-05-01 08:00:00"], outcome.entry);
    assert_eq!(saved["2024-05-01 08:00:00"].note, "slept well");
}

#[tokio::test]
async fn generated_reply_receives_note_and_context() {
    let store = Arc::new(InMemoryRecordStore::new());
    let generator = Arc::new(Scripted::replying("Take a breath first."));
    let checkins = service(store).with_generator(generator.clone(), Duration::from_secs(1));

    let outcome = checkins
        .submit(Mood::Anxious, "deep work", "too many meetings")
        .await
        .unwrap();

    assert_eq!(
        outcome.generated,
        GeneratedReply::Reply("Take a breath first.".to_string())
    );
    let seen = generator.seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0.contains("anxious"));
    assert!(seen[0].0.contains("deep work"));
    assert_eq!(seen[0].1, "too many meetings");
}

#[tokio::test]
async fn generation_failure_does_not_block_save() {
    let store = Arc::new(InMemoryRecordStore::new());
    let checkins = service(store.clone())
        .with_generator(Arc::new(Scripted::failing(401)), Duration::from_secs(1));

    let outcome = checkins.submit(Mood::Calm, "journaling", "").await.unwrap();

    match &outcome.generated {
        GeneratedReply::Unavailable(reason) => assert!(reason.contains("401")),
        other => panic!("expected unavailable reply, got {other:?}"),
    }
    assert_eq!(
        outcome.response,
        "You're centered. Keep breathing and stay focused on journaling."
    );
    assert!(store.load().await.unwrap().contains_key(&outcome.timestamp));
}

#[tokio::test]
async fn slow_generation_times_out_and_entry_is_still_saved() {
    let store = Arc::new(InMemoryRecordStore::new());
    let checkins =
        service(store.clone()).with_generator(Arc::new(Stalled), Duration::from_millis(50));

    let outcome = checkins.submit(Mood::Tired, "rest", "").await.unwrap();

    match &outcome.generated {
        GeneratedReply::Unavailable(reason) => assert!(reason.contains("timed out")),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(store.load().await.unwrap().len(), 1);

    let response = outcome.into_api_response();
    assert!(response.generated.is_none());
    assert!(response.generated_error.is_some());
}

#[tokio::test]
async fn persistence_failure_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vera_memory.json");
    std::fs::write(&path, "not json").unwrap();
    let checkins = file_service(FileRecordStore::new(&path));

    let err = checkins.submit(Mood::Focused, "x", "").await.unwrap_err();
    assert!(matches!(err, PersistenceError::Malformed { .. }));
    assert!(checkins.recent(5).await.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
}

#[tokio::test]
async fn recent_lists_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vera_memory.json");
    for (second, focus) in ["a", "b", "c"].into_iter().enumerate() {
        let clock = FixedClock(format!("2024-05-01 08:00:0{second}"));
        file_service(FileRecordStore::with_clock(&path, clock))
            .submit(Mood::Focused, focus, "")
            .await
            .unwrap();
    }

    let checkins = file_service(FileRecordStore::new(&path));
    let recent = checkins.recent(2).await.unwrap();
    let focuses: Vec<_> = recent.iter().map(|(_, entry)| entry.focus.as_str()).collect();
    assert_eq!(focuses, ["c", "b"]);
}

#[tokio::test]
async fn saves_do_not_wait_for_pending_generation() {
    let store = Arc::new(InMemoryRecordStore::with_clock(SequenceClock::default()));
    let gate = Arc::new(Gated(Semaphore::new(0)));
    let checkins = Arc::new(
        service(store.clone()).with_generator(gate.clone(), Duration::from_secs(10)),
    );

    let first = tokio::spawn({
        let checkins = checkins.clone();
        async move { checkins.submit(Mood::Calm, "first", "").await }
    });
    let second = tokio::spawn({
        let checkins = checkins.clone();
        async move { checkins.submit(Mood::Excited, "second", "").await }
    });

    tokio::time::timeout(Duration::from_secs(2), async {
        while store.load().await.unwrap().len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("both saves should land while generation is still pending");

    gate.0.add_permits(2);
    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert_eq!(first.generated, GeneratedReply::Reply("released".to_string()));
    assert_eq!(second.generated, GeneratedReply::Reply("released".to_string()));
    assert_ne!(first.timestamp, second.timestamp);
}
