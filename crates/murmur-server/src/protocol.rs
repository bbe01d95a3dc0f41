//! Wire protocol. Every frame is plain text; clients send raw lines and the
//! server answers with the frames below.

use std::fmt;

/// Text frames the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerText<'a> {
    /// First handshake prompt.
    PasswordPrompt,

    /// Second handshake prompt, after a correct password.
    NamePrompt,

    /// Sent to everyone else when a client is admitted.
    Joined { name: &'a str, users: &'a str },

    /// Presence list: private on admission, broadcast on departure.
    ConnectedUsers { users: &'a str },

    /// A relayed chat line.
    Chat { name: &'a str, text: &'a str },
}

pub const PASSWORD_PROMPT: &str = "Enter the password: ";
pub const NAME_PROMPT: &str = "Enter a temporary username: ";

impl fmt::Display for ServerText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordPrompt => f.write_str(PASSWORD_PROMPT),
            Self::NamePrompt => f.write_str(NAME_PROMPT),
            Self::Joined { name, users } => {
                write!(f, "{name} has joined. Connected Users: {users}")
            }
            Self::ConnectedUsers { users } => write!(f, "Connected Users: {users}"),
            Self::Chat { name, text } => write!(f, "{name}: {text}"),
        }
    }
}

/// Join names into the comma-separated form used in presence frames.
pub fn user_list<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name.as_ref());
    }
    out
}
