//! Demo login acceptor.
//!
//! There is no real authentication: any non-empty username and password pair is
//! accepted and turned into a [`User`]. This is not a security boundary.

use crate::domain::error::{CountryscopeError, Result};
use crate::domain::session::User;

const AVATAR_BASE: &str = "https://ui-avatars.com/api/";

/// Username and password as typed into the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoCredentials {
    pub username: String,
    pub password: String,
}

impl DemoCredentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Validates the pair and builds the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`CountryscopeError::Validation`] when either field is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use countryscope::domain::DemoCredentials;
    ///
    /// let user = DemoCredentials::new("ada", "secret").accept()?;
    /// assert_eq!(user.name, "ada");
    /// assert!(DemoCredentials::new("ada", "").accept().is_err());
    /// # Ok::<(), countryscope::CountryscopeError>(())
    /// ```
    pub fn accept(&self) -> Result<User> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(CountryscopeError::Validation(
                "Please enter both username and password".to_string(),
            ));
        }

        Ok(User {
            name: self.username.clone(),
            avatar: avatar_url(&self.username),
        })
    }
}

/// Generated avatar reference for a display name.
#[must_use]
pub fn avatar_url(name: &str) -> String {
    format!("{AVATAR_BASE}?name={name}&background=random")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_any_non_empty_pair() {
        let user = DemoCredentials::new("grace", "hopper").accept().unwrap();
        assert_eq!(user.name, "grace");
        assert_eq!(
            user.avatar,
            "https://ui-avatars.com/api/?name=grace&background=random"
        );
    }

    #[test]
    fn rejects_missing_fields_with_inline_message() {
        for creds in [
            DemoCredentials::new("", "pw"),
            DemoCredentials::new("user", ""),
            DemoCredentials::default(),
        ] {
            let err = creds.accept().unwrap_err();
            assert_eq!(err.to_string(), "Please enter both username and password");
        }
    }
}
