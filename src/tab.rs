//! Mailbox tabs
//!
//! Provides a strongly-typed enum for the mailbox views instead of raw
//! strings. Each tab decides which server collection the visible list
//! is built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A mailbox view.
///
/// # Examples
///
/// ```
/// use antispam_client::Tab;
///
/// let tab: Tab = "Spam".parse().unwrap();
/// assert_eq!(tab, Tab::Spam);
/// assert_eq!(tab.as_str(), "spam");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Received mail.
    #[default]
    Inbox,
    /// Mail sent by the current user.
    Sent,
    /// Received mail the server classified as spam.
    Spam,
    /// Received mail whose subject looks urgent.
    Important,
}

impl Tab {
    /// Every tab, in display order.
    pub const ALL: [Self; 4] = [Self::Inbox, Self::Sent, Self::Spam, Self::Important];

    /// The lowercase tab name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Sent => "sent",
            Self::Spam => "spam",
            Self::Important => "important",
        }
    }

    /// Heading shown above the list.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Inbox => "Received Emails",
            Self::Sent => "Sent Emails",
            Self::Spam => "Spam Emails",
            Self::Important => "Important Emails",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inbox" | "received" => Ok(Self::Inbox),
            "sent" => Ok(Self::Sent),
            "spam" => Ok(Self::Spam),
            "important" => Ok(Self::Important),
            other => Err(format!(
                "unknown tab '{other}' (expected inbox, sent, spam or important)"
            )),
        }
    }
}
