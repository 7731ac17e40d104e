//! Account CLI commands
//!
//! Logging in from command-line credentials, registration and password
//! changes.

use tracing::debug;
use zeroize::Zeroizing;

use super::input::{prompt_new_password, prompt_password};
use crate::auth::AuthGate;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Session;
use crate::storage::Storage;

/// Identity given through `--user` / `--password` or the environment
pub struct Credentials {
    username: Option<String>,
    password: Option<Zeroizing<String>>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password: password.map(Zeroizing::new),
        }
    }

    /// Authenticate, prompting for the password if none was given
    pub fn login(&self, storage: &Storage) -> LedgerResult<Session> {
        let username = self.username.as_deref().ok_or_else(|| {
            LedgerError::Validation("No user given. Pass --user or set LEDGER_USER.".into())
        })?;

        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt_password(&format!("Password for {}: ", username))?,
        };

        let session = AuthGate::new(storage).authenticate(username, &password)?;
        debug!(session = %session, "authenticated");
        Ok(session)
    }

    /// The password to set on a new account, prompting if none was given
    fn new_password(&self) -> LedgerResult<Zeroizing<String>> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => prompt_new_password(),
        }
    }
}

/// Register a new account awaiting approval
pub fn handle_register(storage: &Storage, credentials: &Credentials, username: &str) -> LedgerResult<()> {
    let password = credentials.new_password()?;
    let user = AuthGate::new(storage).register(username, &password)?;

    println!("Registered account '{}'.", user.username);
    println!("An administrator must approve it before you can log in.");
    Ok(())
}

/// Show who the credentials belong to
pub fn handle_whoami(session: &Session) -> LedgerResult<()> {
    println!("{}", session);
    Ok(())
}

/// Change a password; admins may name another account
pub fn handle_passwd(
    storage: &Storage,
    session: &Session,
    target: Option<&str>,
    new_password: Option<String>,
) -> LedgerResult<()> {
    let target = target.unwrap_or(&session.username);
    let new_password = match new_password {
        Some(password) => Zeroizing::new(password),
        None => prompt_new_password()?,
    };

    AuthGate::new(storage).set_password(session, target, &new_password)?;
    println!("Password changed for '{}'.", target);
    Ok(())
}
