//! Users, password hashing and login sessions
//!
//! Passwords are stored as Argon2id PHC strings. Session tokens are random
//! UUIDs handed to the client once; only their SHA-256 digest is stored.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::{format_datetime, get_enum, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewSession, NewUser, Role, User, UserUpdate};

const USER_COLUMNS: &str = "id, phone, username, name, role, created_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        phone: row.get(1)?,
        username: row.get(2)?,
        name: row.get(3)?,
        role: get_enum(row, 4)?,
        created_at: parse_datetime(&created_at),
    })
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Password(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash string
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

impl Database {
    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let password_hash = hash_password(&user.password)?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO users (phone, username, name, password_hash, role)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user.phone,
                user.username,
                user.name,
                password_hash,
                user.role.as_str(),
            ],
        )
        .map_err(|e| Error::from_constraint(e, "User with that username or phone"))?;
        let id = conn.last_insert_rowid();
        info!(username = %user.username, role = %user.role, "Created user");
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY username",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_admins(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = 'admin'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Merge a partial update. A new password is re-hashed.
    pub fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User> {
        let current = self
            .get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))?;

        let role = update.role.unwrap_or(current.role);
        if current.role == Role::Admin && role != Role::Admin && self.count_admins()? <= 1 {
            return Err(Error::Conflict("Cannot demote the last admin".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET phone = ?, username = ?, name = ?, role = ? WHERE id = ?",
            params![
                update.phone.clone().unwrap_or(current.phone),
                update.username.clone().unwrap_or(current.username),
                update.name.clone().unwrap_or(current.name),
                role.as_str(),
                id,
            ],
        )
        .map_err(|e| Error::from_constraint(e, "User with that username or phone"))?;

        if let Some(password) = &update.password {
            conn.execute(
                "UPDATE users SET password_hash = ? WHERE id = ?",
                params![hash_password(password)?, id],
            )?;
            // Existing sessions die with the old password
            conn.execute("DELETE FROM sessions WHERE user_id = ?", params![id])?;
        }

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    /// Delete a user and their sessions. The last admin cannot be removed.
    pub fn delete_user(&self, id: i64) -> Result<()> {
        let user = self
            .get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))?;
        if user.role == Role::Admin && self.count_admins()? <= 1 {
            return Err(Error::Conflict("Cannot delete the last admin".to_string()));
        }

        let conn = self.conn()?;
        conn.execute("DELETE FROM users WHERE id = ?", params![id])?;
        info!(username = %user.username, "Deleted user");
        Ok(())
    }

    /// Verify credentials. `login` matches either username or phone.
    pub fn authenticate(&self, login: &str, password: &str) -> Result<User> {
        let conn = self.conn()?;
        let found: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?1 OR phone = ?1",
                params![login],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let invalid = || Error::Unauthorized("Invalid credentials".to_string());
        let (id, stored) = found.ok_or_else(invalid)?;
        if !verify_password(password, &stored) {
            debug!(login = %login, "Password mismatch");
            return Err(invalid());
        }
        self.get_user(id)?.ok_or_else(invalid)
    }

    /// Start a session for a user, valid for `ttl_hours`
    pub fn create_session(&self, user_id: i64, ttl_hours: i64) -> Result<NewSession> {
        let user = self
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))?;

        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?, ?, ?)",
            params![token_digest(&token), user_id, format_datetime(expires_at)],
        )?;

        Ok(NewSession {
            token,
            user,
            expires_at,
        })
    }

    /// Resolve a session token to its user; expired or unknown tokens give `None`
    pub fn session_user(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                r#"
                SELECT u.id, u.phone, u.username, u.name, u.role, u.created_at
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token_hash = ? AND s.expires_at > ?
                "#,
                params![token_digest(token), format_datetime(Utc::now())],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![token_digest(token)],
        )?;
        Ok(())
    }

    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?",
            params![format_datetime(Utc::now())],
        )?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }
}
