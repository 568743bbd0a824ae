//! Flag values and the token → flag mapping builder.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Insertion-ordered mapping from flag name to its recorded values.
///
/// Every key maps to a non-empty list.
pub type FlagMap = IndexMap<String, Vec<FlagValue>>;

/// One recorded value of a flag.
///
/// A flag that had no following token to use as its value, or a bare word
/// recorded as a flag of its own, holds [`FlagValue::Present`]. As text it
/// reads `"true"`, so `str::parse::<bool>` accepts it.
///
/// # Examples
///
/// ```
/// use command_args_core::FlagValue;
///
/// assert_eq!(FlagValue::from("5").as_str(), "5");
/// assert_eq!(FlagValue::Present.as_str(), "true");
/// assert!(FlagValue::Present.is_present());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagValue {
    /// A value taken from the input.
    Text(String),
    /// The `true` sentinel.
    Present,
}

impl FlagValue {
    /// Returns the value as text.
    pub fn as_str(&self) -> &str {
        match self {
            FlagValue::Text(text) => text,
            FlagValue::Present => "true",
        }
    }

    /// Returns `true` for the [`FlagValue::Present`] sentinel.
    pub fn is_present(&self) -> bool {
        matches!(self, FlagValue::Present)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FlagValue {
    fn from(text: &str) -> Self {
        FlagValue::Text(text.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(text: String) -> Self {
        FlagValue::Text(text)
    }
}

impl From<&String> for FlagValue {
    fn from(text: &String) -> Self {
        FlagValue::Text(text.clone())
    }
}

impl Serialize for FlagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlagValue::Text(text) => serializer.serialize_str(text),
            FlagValue::Present => serializer.serialize_bool(true),
        }
    }
}

impl<'de> Deserialize<'de> for FlagValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Number(f64),
            Text(String),
        }

        // Unquoted numbers are rejected: YAML has already normalised them
        // (`1.10` → `1.1`, `0x10` → `16`), so their original text is lost.
        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(FlagValue::Present),
            Raw::Flag(false) => Err(serde::de::Error::custom(
                "`false` is not a flag value; omit the flag instead",
            )),
            Raw::Number(_) => Err(serde::de::Error::custom(
                "numeric flag values must be quoted strings",
            )),
            Raw::Text(text) => Ok(FlagValue::Text(text)),
        }
    }
}

/// One or many values to store under a flag.
///
/// Lets [`ParsedArguments::set`](crate::ParsedArguments::set) take either
/// a single value or a list.
///
/// # Examples
///
/// ```
/// use command_args_core::{FlagValue, FlagValues};
///
/// let one: FlagValues = "x".into();
/// let many: FlagValues = vec!["a", "b"].into();
/// assert_eq!(one.into_vec(), vec![FlagValue::from("x")]);
/// assert_eq!(many.into_vec().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagValues(Vec<FlagValue>);

impl FlagValues {
    /// Unwraps the list.
    pub fn into_vec(self) -> Vec<FlagValue> {
        self.0
    }
}

/// Accepts a single value as well as a list.
impl<'de> Deserialize<'de> for FlagValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged, expecting = "a quoted string, `true`, or a list of them")]
        enum OneOrMany {
            One(FlagValue),
            Many(Vec<FlagValue>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(value) => Self(vec![value]),
            OneOrMany::Many(values) => Self(values),
        })
    }
}

impl From<FlagValue> for FlagValues {
    fn from(value: FlagValue) -> Self {
        Self(vec![value])
    }
}

impl From<&str> for FlagValues {
    fn from(value: &str) -> Self {
        Self(vec![value.into()])
    }
}

impl From<String> for FlagValues {
    fn from(value: String) -> Self {
        Self(vec![value.into()])
    }
}

impl<T: Into<FlagValue>> From<Vec<T>> for FlagValues {
    fn from(values: Vec<T>) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FlagValue>, const N: usize> From<[T; N]> for FlagValues {
    fn from(values: [T; N]) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }
}

/// Builds the flag mapping for a token sequence.
///
/// A token starting with `-` names a flag (all leading dashes stripped)
/// and takes the token after it as its value, or [`FlagValue::Present`]
/// when it is the last token. Any other token is recorded as a flag of its
/// own with the value [`FlagValue::Present`].
///
/// The scan always moves one token at a time, so a token consumed as a
/// value is also recorded as its own flag on the next step.
///
/// # Examples
///
/// ```
/// use command_args_core::{FlagValue, build_flags};
///
/// let flags = build_flags(&["-level", "5", "-v"]);
/// assert_eq!(flags["level"], vec![FlagValue::from("5")]);
/// assert_eq!(flags["5"], vec![FlagValue::Present]);
/// assert_eq!(flags["v"], vec![FlagValue::Present]);
/// ```
pub fn build_flags<S: AsRef<str>>(tokens: &[S]) -> FlagMap {
    let mut flags = FlagMap::new();
    for (index, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let (name, value) = if token.starts_with('-') {
            let value = tokens
                .get(index + 1)
                .map(|next| FlagValue::from(next.as_ref()))
                .unwrap_or(FlagValue::Present);
            (token.trim_start_matches('-'), value)
        } else {
            (token, FlagValue::Present)
        };
        flags.entry(name.to_string()).or_default().push(value);
    }
    debug!(tokens = tokens.len(), flags = flags.len(), "Built flag mapping");
    flags
}
