//! List filters
//!
//! [`Filters`] is the filter slice of the store. [`ActiveFilters`] is
//! the chip set the user edits: at most one [`FilterOption`] per
//! [`FilterKind`], where adding a second option of the same kind
//! replaces the first.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive creation-time bounds. A missing bound is open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// True when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `at` falls within the range, bounds included.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// Which classification the list is narrowed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpamStatus {
    #[default]
    All,
    Spam,
    Legitimate,
}

/// Filter criteria held by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub date_range: DateRange,
    /// Whether spam details (badge and confidence) are shown next to
    /// each message.
    pub show_spam: bool,
    pub spam_status: SpamStatus,
    /// Case-insensitive substring of the sender address.
    pub sender: Option<String>,
}

impl Filters {
    /// Overwrite the fields the patch sets, keep the rest.
    #[must_use]
    pub fn merged(mut self, patch: FiltersPatch) -> Self {
        if let Some(range) = patch.date_range {
            self.date_range = range;
        }
        if let Some(show) = patch.show_spam {
            self.show_spam = show;
        }
        if let Some(status) = patch.spam_status {
            self.spam_status = status;
        }
        if let Some(sender) = patch.sender {
            self.sender = sender;
        }
        self
    }
}

/// Partial update for [`Filters`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltersPatch {
    pub date_range: Option<DateRange>,
    pub show_spam: Option<bool>,
    pub spam_status: Option<SpamStatus>,
    pub sender: Option<Option<String>>,
}

impl FiltersPatch {
    #[must_use]
    pub const fn date_range(range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            show_spam: None,
            spam_status: None,
            sender: None,
        }
    }

    #[must_use]
    pub const fn show_spam(show: bool) -> Self {
        Self {
            date_range: None,
            show_spam: Some(show),
            spam_status: None,
            sender: None,
        }
    }
}

/// The kind of a filter chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Spam,
    Date,
    Sender,
}

impl FilterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Date => "date",
            Self::Sender => "sender",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SPAM_OPTIONS: [(&str, &str); 3] = [
    ("all", "All emails"),
    ("spam", "Spam only"),
    ("legitimate", "Legitimate only"),
];

const DATE_OPTIONS: [(&str, &str); 4] = [
    ("all", "All time"),
    ("today", "Today"),
    ("week", "This week"),
    ("month", "This month"),
];

/// A single filter chip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterOption {
    pub kind: FilterKind,
    pub value: String,
    pub label: String,
}

impl FilterOption {
    /// Build a chip, validating `value` for the fixed-choice kinds.
    ///
    /// # Errors
    ///
    /// Returns a message naming the accepted values when `value` is not
    /// one of them.
    pub fn new(kind: FilterKind, value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let label = match kind {
            FilterKind::Spam => lookup_label(&SPAM_OPTIONS, kind, &value)?,
            FilterKind::Date => lookup_label(&DATE_OPTIONS, kind, &value)?,
            FilterKind::Sender => {
                if value.trim().is_empty() {
                    return Err("sender filter needs a value".to_string());
                }
                format!("From: {value}")
            }
        };
        Ok(Self { kind, value, label })
    }

    /// `all` clears its kind instead of adding a chip.
    fn is_clear(&self) -> bool {
        self.kind != FilterKind::Sender && self.value == "all"
    }
}

fn lookup_label(table: &[(&str, &str)], kind: FilterKind, value: &str) -> Result<String, String> {
    table
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| (*label).to_string())
        .ok_or_else(|| {
            let accepted: Vec<&str> = table.iter().map(|(v, _)| *v).collect();
            format!(
                "invalid {kind} filter '{value}' (expected one of: {})",
                accepted.join(", ")
            )
        })
}

impl FromStr for FilterOption {
    type Err = String;

    /// Parse `kind=value`, e.g. `date=week` or `sender=alice@x.test`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected kind=value, got '{s}'"))?;
        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "spam" => FilterKind::Spam,
            "date" => FilterKind::Date,
            "sender" => FilterKind::Sender,
            other => return Err(format!("unknown filter kind '{other}'")),
        };
        Self::new(kind, value.trim())
    }
}

/// The active chip set: at most one option per kind.
///
/// The set only owns the filter kinds it has touched. A date range
/// merged into the store directly survives until a date chip is added
/// or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    options: Vec<FilterOption>,
    /// Kinds changed since the last [`ActiveFilters::take_patch`].
    dirty: Vec<FilterKind>,
}

impl ActiveFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chip. Replaces any chip of the same kind in place; an
    /// `all` value removes the kind instead.
    pub fn add(&mut self, option: FilterOption) {
        self.touch(option.kind);
        if option.is_clear() {
            self.options.retain(|o| o.kind != option.kind);
            return;
        }
        match self.options.iter_mut().find(|o| o.kind == option.kind) {
            Some(slot) => *slot = option,
            None => self.options.push(option),
        }
    }

    /// Remove a chip if it is currently active.
    pub fn remove(&mut self, option: &FilterOption) {
        let before = self.options.len();
        self.options
            .retain(|o| !(o.kind == option.kind && o.value == option.value));
        if self.options.len() != before {
            self.touch(option.kind);
        }
    }

    pub fn remove_kind(&mut self, kind: FilterKind) {
        if self.get(kind).is_some() {
            self.touch(kind);
            self.options.retain(|o| o.kind != kind);
        }
    }

    pub fn clear(&mut self) {
        let kinds: Vec<FilterKind> = self.options.iter().map(|o| o.kind).collect();
        for kind in kinds {
            self.touch(kind);
        }
        self.options.clear();
    }

    #[must_use]
    pub fn get(&self, kind: FilterKind) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.kind == kind)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterOption> {
        self.options.iter()
    }

    /// The store patch for the kinds changed since the last call.
    ///
    /// A changed kind with a chip is set from it; a changed kind whose
    /// chip was removed is reset. Untouched kinds stay `None` so values
    /// set outside the chip set are kept. Relative dates are resolved
    /// against `now`.
    pub fn take_patch(&mut self, now: DateTime<Utc>) -> FiltersPatch {
        let mut patch = FiltersPatch::default();
        for kind in std::mem::take(&mut self.dirty) {
            let value = self.get(kind).map(|o| o.value.as_str());
            match kind {
                FilterKind::Spam => {
                    patch.spam_status = Some(match value {
                        Some("spam") => SpamStatus::Spam,
                        Some("legitimate") => SpamStatus::Legitimate,
                        _ => SpamStatus::All,
                    });
                }
                FilterKind::Date => {
                    patch.date_range =
                        Some(value.map_or_else(DateRange::default, |v| date_preset(v, now)));
                }
                FilterKind::Sender => {
                    patch.sender = Some(value.map(ToString::to_string));
                }
            }
        }
        patch
    }

    fn touch(&mut self, kind: FilterKind) {
        if !self.dirty.contains(&kind) {
            self.dirty.push(kind);
        }
    }
}

/// Resolve a date chip value to a range ending now.
///
/// `today` starts at midnight UTC; `week` and `month` are rolling
/// 7- and 30-day windows.
fn date_preset(value: &str, now: DateTime<Utc>) -> DateRange {
    let start = match value {
        "today" => now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc()),
        "week" => Some(now - Duration::days(7)),
        "month" => Some(now - Duration::days(30)),
        _ => None,
    };
    DateRange::new(start, None)
}
