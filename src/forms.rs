//! Client-side form validation
//!
//! Forms are checked before any request is made. A failed check is an
//! [`Error::Validation`] carrying the message shown to the user.

use crate::error::{Error, Result};
use crate::model::{Credentials, EmailCreate};

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// # Errors
    ///
    /// Fails when either field is blank.
    pub fn validate(&self) -> Result<Credentials> {
        require(&self.email, "Email")?;
        require(&self.password, "Password")?;
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// # Errors
    ///
    /// Fails when a field is blank or the passwords differ.
    pub fn validate(&self) -> Result<Credentials> {
        require(&self.email, "Email")?;
        require(&self.password, "Password")?;
        if self.password != self.confirm_password {
            return Err(Error::Validation("Passwords do not match".into()));
        }
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeForm {
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
}

impl ComposeForm {
    #[must_use]
    pub fn new(
        recipient_email: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            recipient_email: recipient_email.into(),
            subject: subject.into(),
            content: content.into(),
        }
    }

    /// # Errors
    ///
    /// Fails when a field is blank or the recipient has no `@`.
    pub fn validate(&self) -> Result<EmailCreate> {
        require(&self.recipient_email, "Recipient")?;
        if !self.recipient_email.contains('@') {
            return Err(Error::Validation(format!(
                "Invalid recipient address '{}'",
                self.recipient_email.trim()
            )));
        }
        require(&self.subject, "Subject")?;
        require(&self.content, "Message")?;
        Ok(EmailCreate {
            recipient_email: self.recipient_email.trim().to_string(),
            subject: self.subject.clone(),
            content: self.content.clone(),
        })
    }
}
