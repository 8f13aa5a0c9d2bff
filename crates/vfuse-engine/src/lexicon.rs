//! Fixed class-to-audio confirmation lexicon.
//!
//! Classes without an entry can never be confirmed by audio.

/// Audio evidence that can confirm one visual class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Visual class name
    pub class_name: &'static str,
    /// Lowercase substrings matched against speech text
    pub speech_keywords: &'static [&'static str],
    /// Event types or description fragments matched against audio events
    pub event_markers: &'static [&'static str],
}

/// Every confirmable class.
pub const CONFIRMATION_LEXICON: &[LexiconEntry] = &[
    LexiconEntry {
        class_name: "car",
        speech_keywords: &["car", "vehicle", "drive", "driving", "engine", "horn"],
        event_markers: &["low_frequency", "engine"],
    },
    LexiconEntry {
        class_name: "person",
        speech_keywords: &["person", "people", "someone", "man", "woman", "he", "she"],
        event_markers: &[],
    },
    LexiconEntry {
        class_name: "cell phone",
        speech_keywords: &["phone", "call", "calling", "mobile", "hello"],
        event_markers: &[],
    },
    LexiconEntry {
        class_name: "dog",
        speech_keywords: &["dog", "puppy", "bark", "woof", "pet"],
        event_markers: &[],
    },
    LexiconEntry {
        class_name: "cat",
        speech_keywords: &["cat", "kitten", "meow", "kitty"],
        event_markers: &[],
    },
    LexiconEntry {
        class_name: "door",
        speech_keywords: &["door", "knock", "enter", "open", "close"],
        event_markers: &["loud_event", "impact"],
    },
    LexiconEntry {
        class_name: "tv",
        speech_keywords: &["tv", "television", "watch", "show", "channel"],
        event_markers: &[],
    },
];

/// Look up the entry for a class.
pub fn lookup(class_name: &str) -> Option<&'static LexiconEntry> {
    CONFIRMATION_LEXICON
        .iter()
        .find(|entry| entry.class_name == class_name)
}

impl LexiconEntry {
    /// Case-insensitive substring match against speech text.
    pub fn matches_speech(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.speech_keywords.iter().any(|kw| text.contains(kw))
    }

    /// Match an audio event by its type label or description.
    pub fn matches_event(&self, event_type: &str, description: &str) -> bool {
        let description = description.to_lowercase();
        self.event_markers
            .iter()
            .any(|marker| event_type == *marker || description.contains(marker))
    }
}
