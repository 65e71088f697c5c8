//! Quote search filters.
//!
//! `.quote gnome /foo/` searches for quotes naming `gnome` whose text
//! contains (or matches the regex) `foo`.

use regex::Regex;

/// Byte offsets of the first and last `/`, when they differ.
pub fn search_delimiters(args: &str) -> Option<(usize, usize)> {
    let start = args.find('/')?;
    let end = args.rfind('/')?;
    (start < end).then_some((start, end))
}

/// True when `args` contains a well-formed `/…/` pair.
pub fn has_search_pair(args: &str) -> bool {
    search_delimiters(args).is_some()
}

/// Text half of a search. A quote matches when its text contains the
/// literal, or when the literal is a valid regex that matches.
#[derive(Debug, Clone)]
pub struct TextFilter {
    literal: String,
    regex: Option<Regex>,
}

impl TextFilter {
    pub fn new(literal: impl Into<String>) -> Self {
        let literal = literal.into();
        let regex = Regex::new(&literal).ok();
        Self { literal, regex }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn matches(&self, text: &str) -> bool {
        text.contains(&self.literal) || self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// A parsed retrieval request.
#[derive(Debug, Clone)]
pub struct QuoteFilter {
    pub network: String,
    /// Exact nick, compared case-insensitively by the store.
    pub nick: Option<String>,
    pub text: Option<TextFilter>,
}

impl QuoteFilter {
    pub fn parse(network: &str, args: &str) -> Self {
        let (nick, text) = match search_delimiters(args) {
            Some((start, end)) => {
                let inner = &args[start + 1..end];
                let text = (!inner.is_empty()).then(|| TextFilter::new(inner));
                (&args[..start], text)
            }
            None => (args, None),
        };

        let nick = nick.trim();
        Self {
            network: network.to_string(),
            nick: (!nick.is_empty()).then(|| nick.to_string()),
            text,
        }
    }

    pub fn matches_text(&self, text: &str) -> bool {
        self.text.as_ref().is_none_or(|f| f.matches(text))
    }
}
