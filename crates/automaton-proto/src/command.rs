//! Typed IRC commands.
//!
//! Only the commands a bot sends or reacts to are typed; everything else
//! round-trips through [`Command::Raw`] or [`Command::Response`].

use std::fmt::{self, Write as _};

use crate::error::MessageParseError;

/// RPL_WELCOME: registration completed.
pub const RPL_WELCOME: u16 = 1;

/// ERR_NICKNAMEINUSE: requested nick is taken.
pub const ERR_NICKNAMEINUSE: u16 = 433;

/// An IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `NICK <nickname>`
    NICK(String),
    /// `USER <user> <mode> * <realname>`
    USER(String, String, String),
    /// `JOIN <channel> [key]`
    JOIN(String, Option<String>),
    /// `PING <token> [server]`
    PING(String, Option<String>),
    /// `PONG <token> [server]`
    PONG(String, Option<String>),
    /// `PRIVMSG <target> <text>`
    PRIVMSG(String, String),
    /// `NOTICE <target> <text>`
    NOTICE(String, String),
    /// `QUIT [reason]`
    QUIT(Option<String>),
    /// Numeric reply with its parameters.
    Response(u16, Vec<String>),
    /// Anything else, verbatim.
    Raw(String, Vec<String>),
}

impl Command {
    /// Build a typed command from a name and parameter list.
    pub fn new(name: &str, args: &[&str]) -> Result<Self, MessageParseError> {
        let arg = |i: usize| args.get(i).map(|s| s.to_string());
        let need = |command: &'static str, expected: usize| {
            if args.len() < expected {
                Err(MessageParseError::MissingParams { command, expected })
            } else {
                Ok(())
            }
        };

        if name.len() == 3 && name.chars().all(|c| c.is_ascii_digit()) {
            let code = name
                .parse::<u16>()
                .map_err(|_| MessageParseError::InvalidCommand)?;
            return Ok(Command::Response(
                code,
                args.iter().map(|s| s.to_string()).collect(),
            ));
        }

        let upper = name.to_ascii_uppercase();
        let cmd = match upper.as_str() {
            "NICK" => {
                need("NICK", 1)?;
                Command::NICK(args[0].to_string())
            }
            "USER" => {
                need("USER", 4)?;
                Command::USER(args[0].to_string(), args[1].to_string(), args[3].to_string())
            }
            "JOIN" => {
                need("JOIN", 1)?;
                Command::JOIN(args[0].to_string(), arg(1))
            }
            "PING" => {
                need("PING", 1)?;
                Command::PING(args[0].to_string(), arg(1))
            }
            "PONG" => {
                need("PONG", 1)?;
                Command::PONG(args[0].to_string(), arg(1))
            }
            "PRIVMSG" => {
                need("PRIVMSG", 2)?;
                Command::PRIVMSG(args[0].to_string(), args[1].to_string())
            }
            "NOTICE" => {
                need("NOTICE", 2)?;
                Command::NOTICE(args[0].to_string(), args[1].to_string())
            }
            "QUIT" => Command::QUIT(arg(0)),
            _ => Command::Raw(upper, args.iter().map(|s| s.to_string()).collect()),
        };
        Ok(cmd)
    }

    /// Numeric code if this is a numeric reply.
    pub fn response_code(&self) -> Option<u16> {
        match self {
            Command::Response(code, _) => Some(*code),
            _ => None,
        }
    }
}

/// Write `name` followed by its params. The last param is sent as trailing
/// (with `:`) when it is empty, contains a space, or starts with `:`.
fn write_cmd(f: &mut fmt::Formatter<'_>, name: &str, args: &[&str]) -> fmt::Result {
    f.write_str(name)?;
    let Some((last, middle)) = args.split_last() else {
        return Ok(());
    };
    for arg in middle {
        f.write_char(' ')?;
        f.write_str(arg)?;
    }
    f.write_char(' ')?;
    if last.is_empty() || last.contains(' ') || last.starts_with(':') {
        f.write_char(':')?;
    }
    f.write_str(last)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(n) => write_cmd(f, "NICK", &[n]),
            Command::USER(u, m, r) => {
                // realname is always trailing
                write!(f, "USER {} {} * :{}", u, m, r)
            }
            Command::JOIN(c, Some(k)) => write_cmd(f, "JOIN", &[c, k]),
            Command::JOIN(c, None) => write_cmd(f, "JOIN", &[c]),
            Command::PING(t, Some(s)) => write_cmd(f, "PING", &[t, s]),
            Command::PING(t, None) => write_cmd(f, "PING", &[t]),
            Command::PONG(t, Some(s)) => write_cmd(f, "PONG", &[t, s]),
            Command::PONG(t, None) => write_cmd(f, "PONG", &[t]),
            Command::PRIVMSG(t, m) => write_cmd(f, "PRIVMSG", &[t, m]),
            Command::NOTICE(t, m) => write_cmd(f, "NOTICE", &[t, m]),
            Command::QUIT(Some(r)) => write_cmd(f, "QUIT", &[r]),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::Response(code, args) => {
                let code = format!("{:03}", code);
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_cmd(f, &code, &args)
            }
            Command::Raw(name, args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_cmd(f, name, &args)
            }
        }
    }
}
