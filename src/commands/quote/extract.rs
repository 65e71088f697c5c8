//! Nick extraction from pasted transcripts.
//!
//! Pasted lines look like `[12:34] <@Gnome> some text <bar> reply`. Nicks
//! are recognised by their decoration: any token whose first character is
//! not a letter or digit is a "meta word" and probably a nick.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static RE_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[? ?\d{1,2}:\d{2}\]?$").unwrap());

/// A quote ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuote {
    pub nicknames: BTreeSet<String>,
    pub text: String,
}

/// Split on single spaces. Runs of spaces yield empty tokens; trailing
/// empty tokens are dropped. Input without any space is returned whole,
/// so `""` gives `[""]`.
pub fn split_args(args: &str) -> Vec<&str> {
    if !args.contains(' ') {
        return vec![args];
    }
    let mut tokens: Vec<&str> = args.split(' ').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Non-blank and not starting with a letter or digit.
pub fn is_meta_word(word: &str) -> bool {
    if word.trim().is_empty() {
        return false;
    }
    word.chars().next().is_some_and(|c| !c.is_alphanumeric())
}

/// Index of the first meta word.
pub fn find_quote_start(tokens: &[&str]) -> Option<usize> {
    tokens.iter().position(|t| is_meta_word(t))
}

fn is_decoration(c: char) -> bool {
    matches!(c, '<' | '@' | '+' | '>' | ' ')
}

/// Strip nick decoration (`<`, `>`, `@`, `+`, space) from both ends and
/// lower-case.
pub fn normalize_nick(token: &str) -> String {
    token.trim_matches(is_decoration).to_lowercase()
}

/// `12:34`, `9:34`, `[12:34]`, `[ 9:34]`.
pub fn looks_like_timestamp(s: &str) -> bool {
    RE_TIMESTAMP.is_match(s)
}

/// Normalized nicks of every decorated token.
///
/// Some clients render `< nick>`, which splits into `<` and `nick>`; a
/// one-character token is therefore glued to its successor before it is
/// examined.
pub fn find_nick_candidates(tokens: &[&str]) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();

    for (i, token) in tokens.iter().enumerate() {
        let joined;
        let word = match tokens.get(i + 1) {
            Some(next) if token.chars().count() == 1 => {
                joined = format!("{}{}", token, next);
                joined.as_str()
            }
            _ => *token,
        };

        if !is_meta_word(word) {
            continue;
        }

        let nick = normalize_nick(word);
        if !nick.is_empty() && !looks_like_timestamp(&nick) {
            candidates.insert(nick);
        }
    }

    candidates
}

/// Work out who said what. `None` when no token looks like a nick.
///
/// Plain words ahead of the first nick (`.quote foo <bar> hi`) are taken as
/// extra nicks verbatim and cut from the stored text.
pub fn parse_quote(args: &str, tokens: &[&str]) -> Option<ParsedQuote> {
    let start = find_quote_start(tokens)?;
    let mut nicknames = find_nick_candidates(tokens);

    let text = if start > 0 {
        nicknames.extend(
            tokens[..start]
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string()),
        );
        tokens[start..].join(" ").trim().to_string()
    } else {
        args.to_string()
    };

    Some(ParsedQuote { nicknames, text })
}
