//! Parse profiles: YAML-described adjustments applied after parsing.
//!
//! A profile registers named context overlays, forces some flags, fills in
//! defaults for flags the user did not pass, and drops flags that should
//! never reach the consumer.
//!
//! # Example YAML
//!
//! ```yaml
//! contexts:
//!   attack: "-d 1d6 -b 2"
//! overrides:
//!   mode: fast
//! defaults:
//!   level: "1"
//!   tags: [a, b]
//!   name: null
//! ignore:
//!   - debug
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::args::ParsedArguments;
use crate::error::ArgsError;
use crate::flags::FlagValues;

/// Errors that can occur while loading or applying a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A context overlay's argument text could not be split.
    #[error("invalid context `{context}`: {source}")]
    Context {
        /// Name of the offending context.
        context: String,
        /// Underlying tokenizer error.
        source: ArgsError,
    },
}

/// Convenience alias for results with [`ProfileError`].
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Adjustments applied to freshly parsed arguments.
///
/// Every section is optional. [`apply`](ParseProfile::apply) runs them in
/// a fixed order: contexts, overrides, defaults, ignore.
///
/// # Examples
///
/// ```
/// use command_args_core::{ParseProfile, ParsedArguments};
///
/// let profile = ParseProfile::from_yaml(r#"
/// defaults:
///   level: "1"
/// ignore: [debug]
/// "#)?;
///
/// let mut args: ParsedArguments = ParsedArguments::parse("-debug -name Bob")?;
/// profile.apply(&mut args)?;
/// assert_eq!(args.last("level").as_deref(), Some("1"));
/// assert!(!args.contains("debug"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseProfile {
    /// Context name → argument text parsed into that context's overlay.
    pub contexts: IndexMap<String, String>,
    /// Flags set unconditionally.
    pub overrides: IndexMap<String, FlagValues>,
    /// Flags set only when absent; `null` entries are skipped.
    pub defaults: IndexMap<String, Option<FlagValues>>,
    /// Flags removed from the baseline and every overlay.
    pub ignore: Vec<String>,
}

impl ParseProfile {
    /// Loads a profile from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ProfileError::Io) if the file cannot be read, or
    /// [`Yaml`](ProfileError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let profile = serde_yaml::from_reader(reader)?;
        Ok(profile)
    }

    /// Parses a profile from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Yaml`](ProfileError::Yaml) if parsing fails.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Saves the profile as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ProfileError::Io) if the file cannot be written, or
    /// [`Yaml`](ProfileError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Applies the profile to `args`.
    ///
    /// # Errors
    ///
    /// Returns [`Context`](ProfileError::Context) if a context's argument
    /// text has an unterminated quote. `args` is left untouched in that
    /// case.
    pub fn apply(&self, args: &mut ParsedArguments) -> Result<()> {
        let overlays = self
            .contexts
            .iter()
            .map(|(context, text)| {
                ParsedArguments::parse(text)
                    .map(|overlay| (context.clone(), overlay))
                    .map_err(|source| ProfileError::Context {
                        context: context.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for (context, overlay) in overlays {
            args.add_context(context, overlay);
        }
        args.update(self.overrides.iter().map(|(k, v)| (k.as_str(), v.clone())));
        args.update_if_absent(self.defaults.iter().map(|(k, v)| (k.as_str(), v.clone())));
        for name in &self.ignore {
            args.ignore(name);
        }

        debug!(
            contexts = self.contexts.len(),
            overrides = self.overrides.len(),
            defaults = self.defaults.len(),
            ignored = self.ignore.len(),
            "Applied parse profile"
        );
        Ok(())
    }
}
