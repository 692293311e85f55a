use crate::errors::UnknownMood;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Timestamp-keyed check-in history. Keys use `YYYY-MM-DD HH:MM:SS`, so
/// lexicographic order is chronological order.
pub type MemoryStore = BTreeMap<String, CheckInEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Anxious,
    Motivated,
    Tired,
    Excited,
    Focused,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Calm,
        Mood::Anxious,
        Mood::Motivated,
        Mood::Tired,
        Mood::Excited,
        Mood::Focused,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Calm => "Calm",
            Mood::Anxious => "Anxious",
            Mood::Motivated => "Motivated",
            Mood::Tired => "Tired",
            Mood::Excited => "Excited",
            Mood::Focused => "Focused",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Anxious => "anxious",
            Mood::Motivated => "motivated",
            Mood::Tired => "tired",
            Mood::Excited => "excited",
            Mood::Focused => "focused",
        }
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownMood(trimmed.to_string()))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Calm,
    Hype,
    Therapist,
    Default,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Calm => "calm",
            Tone::Hype => "hype",
            Tone::Therapist => "therapist",
            Tone::Default => "default",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredEntry")]
pub struct CheckInEntry {
    pub mood: Mood,
    pub focus: String,
    pub note: String,
    pub tone: Tone,
}

// The stored `tone` is ignored on load and recomputed from `mood`.
#[derive(Deserialize)]
struct StoredEntry {
    mood: Mood,
    focus: String,
    note: String,
}

impl From<StoredEntry> for CheckInEntry {
    fn from(stored: StoredEntry) -> Self {
        Self::new(stored.mood, stored.focus, stored.note)
    }
}

impl CheckInEntry {
    pub fn new(mood: Mood, focus: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            mood,
            focus: focus.into(),
            note: note.into(),
            tone: crate::responder::tone_for(mood),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub mood: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentEntry {
    pub timestamp: String,
    #[serde(flatten)]
    pub entry: CheckInEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentResponse {
    pub entries: Vec<RecentEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub timestamp: String,
    pub tone: Tone,
    pub response: String,
    pub generated: Option<String>,
    pub generated_error: Option<String>,
}
