//! Per-connection login: password, then name.
//!
//! ```text
//! AwaitingPassword --correct--> AwaitingName --non-empty--> Admitted
//!        |                           |
//!        +--empty/wrong--> Rejected <+--empty
//! ```
//!
//! The transition function is pure; [`Handshake::negotiate`] drives it over
//! a [`Connection`]. Nothing here touches the registry: admission happens
//! in [`crate::session::Session::admit`] once a name comes back.

use murmur_common::{ConnectionError, DisplayName};

use crate::connection::Connection;
use crate::protocol::ServerText;

/// Why a handshake ended in [`HandshakeState::Rejected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("password not provided")]
    MissingPassword,

    #[error("incorrect password")]
    WrongPassword,

    #[error("username not provided")]
    MissingName,
}

#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    #[error("handshake rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("connection lost during handshake: {0}")]
    Connection(#[from] ConnectionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    AwaitingPassword,
    AwaitingName,
    Admitted(DisplayName),
    Rejected(Rejection),
}

impl HandshakeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Admitted(_) | Self::Rejected(_))
    }
}

pub struct Handshake<'a> {
    password: &'a str,
    state: HandshakeState,
}

impl<'a> Handshake<'a> {
    pub fn new(password: &'a str) -> Self {
        Self {
            password,
            state: HandshakeState::AwaitingPassword,
        }
    }

    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    /// Feed one client response. Terminal states absorb further input.
    pub fn advance(&mut self, response: &str) -> &HandshakeState {
        self.state = match &self.state {
            HandshakeState::AwaitingPassword => {
                let answer = response.trim();
                if answer.is_empty() {
                    HandshakeState::Rejected(Rejection::MissingPassword)
                } else if answer != self.password {
                    HandshakeState::Rejected(Rejection::WrongPassword)
                } else {
                    HandshakeState::AwaitingName
                }
            }
            HandshakeState::AwaitingName => match DisplayName::parse(response) {
                Some(name) => HandshakeState::Admitted(name),
                None => HandshakeState::Rejected(Rejection::MissingName),
            },
            terminal => terminal.clone(),
        };
        &self.state
    }

    /// Prompt and read until the handshake reaches a terminal state.
    ///
    /// Any I/O error aborts immediately; there are no retries.
    pub async fn negotiate(
        mut self,
        connection: &dyn Connection,
    ) -> Result<DisplayName, HandshakeError> {
        loop {
            let prompt = match &self.state {
                HandshakeState::AwaitingPassword => ServerText::PasswordPrompt,
                HandshakeState::AwaitingName => ServerText::NamePrompt,
                HandshakeState::Admitted(name) => return Ok(name.clone()),
                HandshakeState::Rejected(reason) => return Err((*reason).into()),
            };
            connection.send(&prompt.to_string()).await?;
            let response = connection.receive().await?;
            self.advance(&response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockConnection;

    #[test]
    fn correct_password_then_name() {
        let mut hs = Handshake::new("hunter2");
        assert_eq!(hs.advance("hunter2"), &HandshakeState::AwaitingName);
        let state = hs.advance("  alice  ").clone();
        match state {
            HandshakeState::Admitted(name) => assert_eq!(name.as_str(), "alice"),
            other => panic!("expected Admitted, got {other:?}"),
        }
        assert!(hs.state().is_terminal());
    }

    #[test]
    fn password_is_trimmed() {
        let mut hs = Handshake::new("hunter2");
        assert_eq!(hs.advance(" hunter2\n"), &HandshakeState::AwaitingName);
    }

    #[test]
    fn wrong_password_rejects() {
        let mut hs = Handshake::new("hunter2");
        assert_eq!(
            hs.advance("wrong"),
            &HandshakeState::Rejected(Rejection::WrongPassword)
        );
    }

    #[test]
    fn blank_password_rejects() {
        let mut hs = Handshake::new("hunter2");
        assert_eq!(
            hs.advance("   "),
            &HandshakeState::Rejected(Rejection::MissingPassword)
        );
    }

    #[test]
    fn blank_name_rejects() {
        let mut hs = Handshake::new("hunter2");
        hs.advance("hunter2");
        assert_eq!(
            hs.advance("\t \n"),
            &HandshakeState::Rejected(Rejection::MissingName)
        );
    }

    #[test]
    fn terminal_states_absorb_input() {
        let mut hs = Handshake::new("hunter2");
        hs.advance("wrong");
        assert_eq!(
            hs.advance("hunter2"),
            &HandshakeState::Rejected(Rejection::WrongPassword)
        );
    }

    #[tokio::test]
    async fn negotiate_admits_and_sends_prompts() {
        let conn = MockConnection::scripted(&["hunter2", "alice"]);
        let name = Handshake::new("hunter2")
            .negotiate(conn.as_ref())
            .await
            .unwrap();

        assert_eq!(name.as_str(), "alice");
        assert_eq!(
            conn.sent(),
            ["Enter the password: ", "Enter a temporary username: "]
        );
    }

    #[tokio::test]
    async fn negotiate_wrong_password_skips_name_prompt() {
        let conn = MockConnection::scripted(&["wrong", "alice"]);
        let err = Handshake::new("hunter2")
            .negotiate(conn.as_ref())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HandshakeError::Rejected(Rejection::WrongPassword)
        ));
        assert_eq!(conn.sent(), ["Enter the password: "]);
    }

    #[tokio::test]
    async fn negotiate_blank_name() {
        let conn = MockConnection::scripted(&["hunter2", ""]);
        let err = Handshake::new("hunter2")
            .negotiate(conn.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, HandshakeError::Rejected(Rejection::MissingName)));
    }

    #[tokio::test]
    async fn disconnect_mid_handshake_is_connection_error() {
        let conn = MockConnection::scripted(&["hunter2"]);
        let err = Handshake::new("hunter2")
            .negotiate(conn.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HandshakeError::Connection(ConnectionError::Closed)
        ));
    }

    #[tokio::test]
    async fn write_failure_aborts() {
        let conn = MockConnection::scripted(&["hunter2", "alice"]);
        conn.break_writes();
        let err = Handshake::new("hunter2")
            .negotiate(conn.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HandshakeError::Connection(ConnectionError::Transport(_))
        ));
    }
}
