//! Authentication context and credential resolution.
//!
//! Credentials come from explicit parameters first, then interactive
//! prompts. A context with no username at all means the command-line
//! utilities authenticate from the ambient AutoSys environment; the
//! REST backend refuses to start without explicit credentials.

use std::fmt;
use std::io::{self, Write};

use crate::error::RetrieveError;

/// Resolved authentication parameters for a single invocation.
///
/// Immutable once constructed and passed explicitly to every transport;
/// there is no ambient credential state.
#[derive(Clone, Default)]
pub struct AuthContext {
    pub username: Option<String>,
    pub password: Option<String>,
    pub instance: Option<String>,
    pub server: Option<String>,
    pub trust_all_certificates: bool,
}

impl AuthContext {
    /// True when explicit credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some()
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The password must never reach debug or log output.
        f.debug_struct("AuthContext")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("instance", &self.instance)
            .field("server", &self.server)
            .field("trust_all_certificates", &self.trust_all_certificates)
            .finish()
    }
}

/// Resolve a full authentication context from partial parameters.
///
/// Prompts interactively for the missing pieces:
/// - username given without a password: secure prompt, echo disabled
/// - username and password given without an instance: plain prompt
///
/// Failure to obtain a terminal for the secure prompt is a fatal
/// configuration error, not something to retry. With no username at all
/// nothing is prompted for.
pub fn resolve(
    username: Option<String>,
    password: Option<String>,
    instance: Option<String>,
    server: Option<String>,
    trust_all_certificates: bool,
) -> Result<AuthContext, RetrieveError> {
    let mut password = password;
    let mut instance = instance;

    if let Some(ref user) = username {
        if password.is_none() {
            let entered = rpassword::prompt_password(format!("Enter password for {}: ", user))
                .map_err(|e| {
                    RetrieveError::Configuration(format!(
                        "no terminal available for secure password prompt: {}",
                        e
                    ))
                })?;
            password = Some(entered);
        }
        if instance.is_none() {
            instance = Some(prompt_line("Enter AutoSys instance name: ")?);
        }
    }

    Ok(AuthContext {
        username,
        password,
        instance,
        server,
        trust_all_certificates,
    })
}

/// Prompt on stderr and read one echoing line from stdin.
fn prompt_line(prompt: &str) -> Result<String, RetrieveError> {
    eprint!("{}", prompt);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_passes_complete_parameters_through() {
        let auth = resolve(
            Some("ops".to_string()),
            Some("secret".to_string()),
            Some("ACE".to_string()),
            Some("sched01".to_string()),
            false,
        )
        .unwrap();

        assert_eq!(auth.username.as_deref(), Some("ops"));
        assert_eq!(auth.password.as_deref(), Some("secret"));
        assert_eq!(auth.instance.as_deref(), Some("ACE"));
        assert_eq!(auth.server.as_deref(), Some("sched01"));
        assert!(!auth.trust_all_certificates);
    }

    #[test]
    fn test_resolve_without_username_prompts_for_nothing() {
        let auth = resolve(None, None, None, None, false).unwrap();

        assert!(!auth.has_credentials());
        assert!(auth.password.is_none());
        assert!(auth.instance.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let auth = AuthContext {
            username: Some("ops".to_string()),
            password: Some("secret".to_string()),
            instance: None,
            server: None,
            trust_all_certificates: false,
        };

        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
