//! Message source prefix.
//!
//! A prefix is either a server name or a `nick!user@host` mask.

use std::fmt;

/// Origin of a message.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name, e.g. `irc.example.net`.
    ServerName(String),
    /// User mask: (nickname, username, hostname).
    Nickname(String, String, String),
}

impl Prefix {
    /// Lenient parse. A dot before any `!` or `@` marks a server name.
    pub fn new_from_str(s: &str) -> Self {
        let (name_part, rest) = match s.find(['!', '@']) {
            Some(idx) => (&s[..idx], Some(&s[idx..])),
            None => (s, None),
        };

        let Some(rest) = rest else {
            if name_part.contains('.') {
                return Prefix::ServerName(name_part.to_string());
            }
            return Prefix::Nickname(name_part.to_string(), String::new(), String::new());
        };

        let (user, host) = if let Some(after_bang) = rest.strip_prefix('!') {
            match after_bang.split_once('@') {
                Some((u, h)) => (u, h),
                None => (after_bang, ""),
            }
        } else {
            ("", rest.trim_start_matches('@'))
        };

        Prefix::Nickname(name_part.to_string(), user.to_string(), host.to_string())
    }

    /// Build a user prefix.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Nickname, if this is a non-empty user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// Username, if present.
    pub fn user(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(_, user, _) if !user.is_empty() => Some(user),
            _ => None,
        }
    }

    /// Hostname (or server name).
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::ServerName(name) => Some(name),
            Prefix::Nickname(_, _, host) if !host.is_empty() => Some(host),
            _ => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{}", user)?;
                }
                if !host.is_empty() {
                    write!(f, "@{}", host)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_mask() {
        let p = Prefix::new_from_str("Gnome!gnome@example.org");
        assert_eq!(p.nick(), Some("Gnome"));
        assert_eq!(p.user(), Some("gnome"));
        assert_eq!(p.host(), Some("example.org"));
        assert_eq!(p.to_string(), "Gnome!gnome@example.org");
    }

    #[test]
    fn parses_server_name() {
        let p = Prefix::new_from_str("irc.example.net");
        assert_eq!(p, Prefix::ServerName("irc.example.net".into()));
        assert_eq!(p.nick(), None);
    }

    #[test]
    fn parses_bare_nick_and_host_only() {
        assert_eq!(Prefix::new_from_str("gnome").nick(), Some("gnome"));
        let p = Prefix::new_from_str("gnome@host.example");
        assert_eq!(p.nick(), Some("gnome"));
        assert_eq!(p.user(), None);
        assert_eq!(p.host(), Some("host.example"));
    }
}
