//! Advisory spam keyword detection for message bodies.

use serde::{Deserialize, Serialize};

/// Phrases that commonly appear in unsolicited messages.
pub const DEFAULT_SPAM_KEYWORDS: [&str; 7] = [
    "free money",
    "click here",
    "guaranteed",
    "act now",
    "limited time",
    "make money",
    "work from home",
];

/// Default number of keyword hits tolerated before flagging.
pub const DEFAULT_MAX_KEYWORD_HITS: usize = 2;

/// Shown alongside a flagged message.
pub const SPAM_WARNING: &str =
    "Your message may be flagged as spam. Please use professional language.";

/// Outcome of a spam check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamCheck {
    /// True when more keywords matched than tolerated.
    pub flagged: bool,
    /// Matched keywords in list order.
    pub matched: Vec<Box<str>>,
}

impl SpamCheck {
    /// Warning text when flagged.
    #[must_use]
    pub const fn warning(&self) -> Option<&'static str> {
        if self.flagged { Some(SPAM_WARNING) } else { None }
    }
}

/// Case-insensitive substring matcher over a keyword list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpamDetector {
    keywords: Vec<Box<str>>,
    max_hits: usize,
}

impl SpamDetector {
    /// Build from keywords (lowercased) and a tolerated hit count.
    pub fn new<I, S>(keywords: I, max_hits: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().to_lowercase().into_boxed_str())
                .collect(),
            max_hits,
        }
    }

    /// Check `message`; flagged when distinct hits exceed the tolerance.
    #[must_use]
    pub fn check(&self, message: &str) -> SpamCheck {
        let haystack = message.to_lowercase();
        let matched: Vec<Box<str>> = self
            .keywords
            .iter()
            .filter(|keyword| !keyword.is_empty() && haystack.contains(keyword.as_ref()))
            .cloned()
            .collect();
        SpamCheck {
            flagged: matched.len() > self.max_hits,
            matched,
        }
    }
}

impl Default for SpamDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SPAM_KEYWORDS, DEFAULT_MAX_KEYWORD_HITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_only_above_tolerance() {
        let detector = SpamDetector::default();

        let two = detector.check("Click HERE for free money");
        assert!(!two.flagged);
        assert_eq!(two.matched.len(), 2);
        assert_eq!(two.warning(), None);

        let three = detector.check("Click here for FREE money, guaranteed!");
        assert!(three.flagged);
        assert_eq!(three.warning(), Some(SPAM_WARNING));
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let check = SpamDetector::default().check("act now act now act now");
        assert_eq!(check.matched, vec![Box::from("act now")]);
        assert!(!check.flagged);
    }

    #[test]
    fn custom_keywords_are_lowercased() {
        let detector = SpamDetector::new(["CRYPTO"], 0);
        assert!(detector.check("buy crypto").flagged);
        assert!(!detector.check("hello").flagged);
    }
}
