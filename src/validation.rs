//! Key policies applied to every scanned key
//!
//! A policy answers one question per key: is it acceptable, and under what
//! name should it be stored. Both policies store the key exactly as it was
//! written; the strict policy only narrows which keys get through.

use smallvec::SmallVec;

/// Allow-lists are usually a handful of names and stay inline
pub type AllowedKeys = SmallVec<[String; 4]>;

/// Compares two strings ignoring case, without locale or global state
///
/// Uses Unicode lower-case mapping so allow-list entries outside ASCII still
/// compare sensibly, even though scanned keys are always ASCII.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    if left.is_ascii() && right.is_ascii() {
        return left.eq_ignore_ascii_case(right);
    }
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Allow-list matching configuration for [`KeyPolicy::Strict`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictKeys {
    allowed: AllowedKeys,
    case_sensitive: bool,
}

impl StrictKeys {
    /// Builds an allow-list; an empty list accepts nothing
    pub fn new<I, S>(allowed: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            case_sensitive,
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns true if `key` matches some allow-list entry
    pub fn contains(&self, key: &str) -> bool {
        if self.case_sensitive {
            self.allowed.iter().any(|allowed| allowed == key)
        } else {
            self.allowed
                .iter()
                .any(|allowed| eq_ignore_case(allowed, key))
        }
    }
}

impl Default for StrictKeys {
    /// Empty allow-list, case-sensitive
    fn default() -> Self {
        Self {
            allowed: AllowedKeys::new(),
            case_sensitive: true,
        }
    }
}

/// Decides whether a scanned key is stored and under which name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Every key is accepted as written
    #[default]
    Permissive,
    /// Only allow-listed keys are accepted; casing of the input is kept
    Strict(StrictKeys),
}

impl KeyPolicy {
    /// Shorthand for a strict policy
    pub fn strict<I, S>(allowed: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPolicy::Strict(StrictKeys::new(allowed, case_sensitive))
    }

    /// Returns the canonical key when `raw_key` is accepted
    pub fn validate<'k>(&self, raw_key: &'k str) -> Option<&'k str> {
        match self {
            KeyPolicy::Permissive => Some(raw_key),
            KeyPolicy::Strict(keys) => keys.contains(raw_key).then_some(raw_key),
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, KeyPolicy::Strict(_))
    }
}
