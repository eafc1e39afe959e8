//! Recognizers for the secret-unlocking input patterns.
//!
//! Pure state machines: the caller feeds raw inputs together with a
//! wall-clock timestamp in milliseconds and gets back the id of the secret
//! the pattern unlocks, if any. Recognizers keep firing on every completed
//! pattern; deduplication is the coordinator's job.

use serde::{Deserialize, Serialize};

/// ↑ ↑ ↓ ↓ ← → ← → B A
pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

pub const COUNTDOWN_SECRET: &str = "secret1";
pub const KEYWORD_SECRET: &str = "secret2";
pub const WAX_SEAL_SECRET: &str = "secret3";
pub const TITLE_DOUBLE_CLICK_SECRET: &str = "secret5";
pub const KONAMI_SECRET: &str = "secret6";
pub const LETTER_NAME_SECRET: &str = "secret8";
pub const FOOTER_SECRET: &str = "secret11";
pub const TITLE_BURST_SECRET: &str = "secret12";
pub const HIDDEN_HEART_SECRET: &str = "secret13";

/// Page elements that take part in a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Countdown,
    Footer,
    HeroTitle,
    WaxSeal,
    HiddenHeart,
    /// The recipient's name inside the letter.
    LetterName,
}

/// A raw input forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Gesture {
    /// Key name as reported by the browser (`"ArrowUp"`, `"b"`).
    KeyDown(String),
    /// A typed character.
    KeyPress(char),
    Click(Target),
    DoubleClick(Target),
}

/// Konami code progress. Any wrong key starts over.
#[derive(Debug, Clone, Default)]
pub struct KonamiSequence {
    progress: usize,
}

impl KonamiSequence {
    pub fn press(&mut self, key: &str) -> bool {
        if KONAMI_CODE[self.progress] != key {
            self.progress = 0;
            return false;
        }
        self.progress += 1;
        if self.progress == KONAMI_CODE.len() {
            self.progress = 0;
            return true;
        }
        false
    }
}

/// Detects a word typed anywhere on the page. The buffer is dropped after
/// `idle_ms` without typing.
#[derive(Debug, Clone)]
pub struct KeywordBuffer {
    keyword: String,
    buffer: String,
    idle_ms: u64,
    last_at_ms: Option<u64>,
}

impl KeywordBuffer {
    pub fn new(keyword: &str, idle_ms: u64) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            buffer: String::new(),
            idle_ms,
            last_at_ms: None,
        }
    }

    pub fn push(&mut self, ch: char, at_ms: u64) -> bool {
        if self.keyword.is_empty() {
            return false;
        }
        if self.last_at_ms.is_some_and(|last| at_ms.saturating_sub(last) >= self.idle_ms) {
            self.buffer.clear();
        }
        self.last_at_ms = Some(at_ms);
        self.buffer.extend(ch.to_lowercase());

        // Only the tail can still complete the keyword.
        let keep = self.keyword.chars().count();
        let excess = self.buffer.chars().count().saturating_sub(keep);
        if excess > 0 {
            self.buffer = self.buffer.chars().skip(excess).collect();
        }

        if self.buffer == self.keyword {
            self.buffer.clear();
            return true;
        }
        false
    }
}

/// N clicks, each within `window_ms` of the previous one.
#[derive(Debug, Clone)]
pub struct ClickBurst {
    needed: u32,
    window_ms: u64,
    count: u32,
    last_at_ms: Option<u64>,
}

impl ClickBurst {
    pub fn new(needed: u32, window_ms: u64) -> Self {
        Self {
            needed,
            window_ms,
            count: 0,
            last_at_ms: None,
        }
    }

    pub fn click(&mut self, at_ms: u64) -> bool {
        if self.last_at_ms.is_some_and(|last| at_ms.saturating_sub(last) >= self.window_ms) {
            self.count = 0;
        }
        self.last_at_ms = Some(at_ms);
        self.count += 1;
        if self.count >= self.needed {
            self.count = 0;
            return true;
        }
        false
    }
}

/// All page gestures wired to their secrets.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    konami: KonamiSequence,
    keyword: KeywordBuffer,
    countdown: ClickBurst,
    footer: ClickBurst,
    title: ClickBurst,
}

impl GestureTracker {
    /// `keyword` is the word that has to be typed (the recipient's name).
    pub fn new(keyword: &str) -> Self {
        Self {
            konami: KonamiSequence::default(),
            keyword: KeywordBuffer::new(keyword, 2_000),
            countdown: ClickBurst::new(3, 2_000),
            footer: ClickBurst::new(3, 2_000),
            title: ClickBurst::new(5, 1_000),
        }
    }

    /// Feed one input. Returns the secret it unlocks, if any.
    pub fn observe(&mut self, gesture: &Gesture, at_ms: u64) -> Option<&'static str> {
        let fired = match gesture {
            Gesture::KeyDown(key) => self.konami.press(key).then_some(KONAMI_SECRET),
            Gesture::KeyPress(ch) => self.keyword.push(*ch, at_ms).then_some(KEYWORD_SECRET),
            Gesture::Click(Target::Countdown) => self.countdown.click(at_ms).then_some(COUNTDOWN_SECRET),
            Gesture::Click(Target::Footer) => self.footer.click(at_ms).then_some(FOOTER_SECRET),
            Gesture::Click(Target::HeroTitle) => self.title.click(at_ms).then_some(TITLE_BURST_SECRET),
            Gesture::Click(Target::WaxSeal) => Some(WAX_SEAL_SECRET),
            Gesture::Click(Target::HiddenHeart) => Some(HIDDEN_HEART_SECRET),
            Gesture::Click(Target::LetterName) => Some(LETTER_NAME_SECRET),
            Gesture::DoubleClick(Target::HeroTitle) => Some(TITLE_DOUBLE_CLICK_SECRET),
            Gesture::DoubleClick(_) => None,
        };
        if let Some(secret_id) = fired {
            tracing::debug!(?gesture, secret_id, "Gesture recognized");
        }
        fired
    }
}
