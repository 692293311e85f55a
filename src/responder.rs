use crate::models::{Mood, Tone};
use rand::Rng;

const CALM: [&str; 2] = [
    "You're centered. Keep breathing and stay focused on {focus}.",
    "Peaceful energy today. Let's carry that into your focus: {focus}",
];

const HYPE: [&str; 2] = [
    "Let's gooo! Big energy. Stay locked in on {focus} today!",
    "You're on fire — keep that momentum and crush your focus: {focus}",
];

const THERAPIST: [&str; 2] = [
    "Let's take it slow. I hear you. We'll stay grounded in {focus} today.",
    "That's okay — we'll work through it. Just return to your focus: {focus}",
];

const DEFAULT: [&str; 2] = [
    "Thanks for checking in. Let's stay mindful of {focus} today.",
    "Got it. Keep {focus} in view, and let's take it one step at a time.",
];

const FOCUS_PLACEHOLDER: &str = "{focus}";

/// Source of template choices. `pick` must return an index below `len`.
pub trait RandomSource: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

pub fn tone_for(mood: Mood) -> Tone {
    match mood {
        Mood::Calm => Tone::Calm,
        Mood::Anxious => Tone::Therapist,
        Mood::Motivated => Tone::Hype,
        Mood::Tired => Tone::Therapist,
        Mood::Excited => Tone::Hype,
        Mood::Focused => Tone::Default,
    }
}

/// Like [`tone_for`], for raw labels; anything unrecognized gets `Tone::Default`.
pub fn tone_for_label(label: &str) -> Tone {
    label.parse::<Mood>().map(tone_for).unwrap_or(Tone::Default)
}

pub fn templates(tone: Tone) -> &'static [&'static str; 2] {
    match tone {
        Tone::Calm => &CALM,
        Tone::Hype => &HYPE,
        Tone::Therapist => &THERAPIST,
        Tone::Default => &DEFAULT,
    }
}

pub fn respond(tone: Tone, focus: &str, random: &dyn RandomSource) -> String {
    let candidates = templates(tone);
    let index = random.pick(candidates.len()).min(candidates.len() - 1);
    candidates[index].replace(FOCUS_PLACEHOLDER, focus)
}
