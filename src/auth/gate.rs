//! Registration, login and account approval over the `users` table

use tracing::{info, warn};

use super::password::{hash_password, verify_password};
use crate::audit::{EntityType, UserView};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Role, Session, User};
use crate::storage::Storage;

/// Username of the account created on first initialization
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Documented default password of the bootstrap admin. Rotate it.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

/// Identity and approval operations
pub struct AuthGate<'a> {
    storage: &'a Storage,
}

impl<'a> AuthGate<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a pending account
    ///
    /// Usernames are case-sensitive; `Kasun` and `kasun` are different users.
    pub fn register(&self, username: &str, password: &str) -> LedgerResult<User> {
        validate_username(username)?;
        validate_password(password)?;

        if self.find(username)?.is_some() {
            return Err(LedgerError::DuplicateUser(username.to_string()));
        }

        let user = User::pending(username, hash_password(password)?);

        // The lookup above skips hashing for obvious duplicates; this is the
        // check that holds under concurrent registrations.
        let written = self
            .storage
            .tables
            .append_unique(user.clone(), |existing: &User, new: &User| {
                existing.username == new.username
            })?;
        if !written {
            return Err(LedgerError::DuplicateUser(username.to_string()));
        }

        self.storage
            .log_create(EntityType::User, username, username, &UserView::from(&user));
        info!(username, "registered account awaiting approval");

        Ok(user)
    }

    /// Log in, distinguishing unknown users, wrong passwords and pending accounts
    pub fn authenticate(&self, username: &str, password: &str) -> LedgerResult<Session> {
        let user = self
            .find(username)?
            .ok_or_else(|| LedgerError::user_not_found(username))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(LedgerError::WrongCredential(username.to_string()));
        }

        if !user.approved {
            return Err(LedgerError::PendingApproval(username.to_string()));
        }

        Ok(user.session())
    }

    /// Approve a pending account (Admin only)
    ///
    /// Returns whether anything changed; approving an approved account is a
    /// no-op.
    pub fn approve(&self, acting: &Session, target: &str) -> LedgerResult<bool> {
        require_admin(acting.role, "approve accounts")?;

        let change = self.storage.tables.rewrite::<User, _, _>(|rows| {
            let user = rows
                .iter_mut()
                .find(|u| u.username == target)
                .ok_or_else(|| LedgerError::user_not_found(target))?;

            if user.approved {
                return Ok((None, false));
            }

            let before = user.clone();
            user.approved = true;
            Ok((Some((before, user.clone())), true))
        })?;

        match change {
            Some((before, after)) => {
                self.storage.log_update(
                    EntityType::User,
                    target,
                    &acting.username,
                    &UserView::from(&before),
                    &UserView::from(&after),
                    Some("approved".to_string()),
                );
                info!(target, by = %acting.username, "account approved");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete an account (Admin only)
    ///
    /// The bootstrap admin can never be deleted, whoever asks.
    pub fn revoke(&self, acting: &Session, target: &str) -> LedgerResult<User> {
        if target == BOOTSTRAP_ADMIN_USERNAME {
            return Err(LedgerError::ProtectedAccount(target.to_string()));
        }
        require_admin(acting.role, "delete accounts")?;

        let removed = self.storage.tables.rewrite::<User, _, _>(|rows| {
            let position = rows
                .iter()
                .position(|u| u.username == target)
                .ok_or_else(|| LedgerError::user_not_found(target))?;
            Ok((rows.remove(position), true))
        })?;

        self.storage.log_delete(
            EntityType::User,
            target,
            &acting.username,
            &UserView::from(&removed),
        );
        info!(target, by = %acting.username, "account revoked");

        Ok(removed)
    }

    /// Replace a password
    ///
    /// Admins may rotate anyone's password; other users only their own.
    pub fn set_password(&self, acting: &Session, target: &str, new_password: &str) -> LedgerResult<()> {
        if !acting.is_admin() && acting.username != target {
            return Err(LedgerError::Forbidden(
                "you can only change your own password".to_string(),
            ));
        }
        validate_password(new_password)?;

        let hash = hash_password(new_password)?;
        let user = self.storage.tables.rewrite::<User, _, _>(|rows| {
            let user = rows
                .iter_mut()
                .find(|u| u.username == target)
                .ok_or_else(|| LedgerError::user_not_found(target))?;
            user.password_hash = hash;
            Ok((user.clone(), true))
        })?;

        let view = UserView::from(&user);
        self.storage.log_update(
            EntityType::User,
            target,
            &acting.username,
            &view,
            &view,
            Some("password changed".to_string()),
        );
        info!(target, by = %acting.username, "password changed");

        Ok(())
    }

    /// All accounts, in registration order (Admin only)
    pub fn list_users(&self, acting_role: Role) -> LedgerResult<Vec<User>> {
        require_admin(acting_role, "list accounts")?;
        self.storage.tables.load::<User>()
    }

    /// Accounts awaiting approval (Admin only)
    pub fn list_pending(&self, acting_role: Role) -> LedgerResult<Vec<User>> {
        Ok(self
            .list_users(acting_role)?
            .into_iter()
            .filter(|u| !u.approved)
            .collect())
    }

    /// Look up an account by exact username
    pub fn find(&self, username: &str) -> LedgerResult<Option<User>> {
        Ok(self
            .storage
            .tables
            .load::<User>()?
            .into_iter()
            .find(|u| u.username == username))
    }

    /// Create the default admin if no admin account exists
    ///
    /// A non-admin row squatting on the reserved name is replaced. Returns
    /// whether an account was written.
    pub fn bootstrap_admin(&self) -> LedgerResult<bool> {
        let users = self.storage.tables.load::<User>()?;
        if users.iter().any(|u| u.role.is_admin()) {
            return Ok(false);
        }

        let admin = User::admin(
            BOOTSTRAP_ADMIN_USERNAME,
            hash_password(BOOTSTRAP_ADMIN_PASSWORD)?,
        );

        let created = self.storage.tables.rewrite::<User, _, _>(|rows| {
            if rows.iter().any(|u| u.role.is_admin()) {
                return Ok((false, false));
            }
            rows.retain(|u| u.username != BOOTSTRAP_ADMIN_USERNAME);
            rows.push(admin.clone());
            Ok((true, true))
        })?;

        if created {
            self.storage.log_create(
                EntityType::User,
                BOOTSTRAP_ADMIN_USERNAME,
                "system",
                &UserView::from(&admin),
            );
            warn!(
                username = BOOTSTRAP_ADMIN_USERNAME,
                "created bootstrap admin with the default password; rotate it now with `ledger passwd {}`",
                BOOTSTRAP_ADMIN_USERNAME
            );
        }

        Ok(created)
    }
}

fn require_admin(role: Role, action: &str) -> LedgerResult<()> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(LedgerError::Forbidden(format!("only an admin can {}", action)))
    }
}

fn validate_username(username: &str) -> LedgerResult<()> {
    if username.is_empty() {
        return Err(LedgerError::Validation("Username cannot be empty".into()));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(LedgerError::Validation(
            "Username cannot contain whitespace".into(),
        ));
    }
    if username.chars().count() > 50 {
        return Err(LedgerError::Validation(
            "Username too long (max 50 characters)".into(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> LedgerResult<()> {
    if password.is_empty() {
        return Err(LedgerError::Validation("Password cannot be empty".into()));
    }
    Ok(())
}
