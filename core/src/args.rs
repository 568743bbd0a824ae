//! Layered, multi-valued argument store.
//!
//! [`ParsedArguments`] keeps three pieces of state:
//!
//! - the **active view** every accessor reads,
//! - the **baseline**, which direct mutations ([`set`](ParsedArguments::set),
//!   [`delete`](ParsedArguments::delete), [`update`](ParsedArguments::update))
//!   keep in lock-step with the active view, and
//! - named **context overlays**, each a nested [`ParsedArguments`].
//!
//! Activating a context rebuilds the active view as the baseline with the
//! overlay's values appended per flag. Deactivating it rebuilds the view
//! from the baseline alone, so overlays never leak into the baseline.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{ArgsError, Result};
use crate::flags::{FlagMap, FlagValue, FlagValues, build_flags};
use crate::split::{quote, split};

/// Parsed flag data with typed access and context overlays.
///
/// `C` is the context identifier type. Any `Eq + Hash` key works; the
/// default is `String`.
///
/// # Examples
///
/// ```
/// use command_args_core::ParsedArguments;
///
/// let mut args: ParsedArguments = ParsedArguments::parse(r#"-name "Bob the Bold" -level 5"#)?;
/// assert_eq!(args.last("name").as_deref(), Some("Bob the Bold"));
/// assert_eq!(args.last_or("level", 1, str::parse::<i64>)?, 5);
///
/// args.add_context("attack".to_string(), ParsedArguments::parse("-level 2")?);
/// args.set_context(Some(&"attack".to_string()));
/// assert_eq!(args.get("level"), vec!["5", "2"]);
///
/// args.set_context(None);
/// assert_eq!(args.get("level"), vec!["5"]);
/// # Ok::<(), command_args_core::ArgsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParsedArguments<C = String> {
    current: FlagMap,
    baseline: FlagMap,
    contexts: HashMap<C, ParsedArguments<C>>,
}

impl<C> Default for ParsedArguments<C> {
    fn default() -> Self {
        Self {
            current: FlagMap::new(),
            baseline: FlagMap::new(),
            contexts: HashMap::new(),
        }
    }
}

impl<C: Eq + Hash> ParsedArguments<C> {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `input` into words and builds flags from them.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::UnterminatedQuote`] if a quote is never closed.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, split)
    }

    /// Like [`parse`](Self::parse), with a caller-provided splitter.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::ParsedArguments;
    ///
    /// let args: ParsedArguments = ParsedArguments::parse_with("-a,1", |s| {
    ///     Ok(s.split(',').map(String::from).collect())
    /// })?;
    /// assert_eq!(args.get("a"), vec!["1"]);
    /// # Ok::<(), command_args_core::ArgsError>(())
    /// ```
    pub fn parse_with<F>(input: &str, splitter: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<Vec<String>>,
    {
        let tokens = splitter(input)?;
        Ok(Self::from_tokens(&tokens))
    }

    /// Builds flags from an already tokenized sequence.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self::from_flags(build_flags(tokens))
    }

    /// Wraps a prepared flag mapping. The baseline starts as a copy of it.
    pub fn from_flags(mut flags: FlagMap) -> Self {
        flags.retain(|_, values| !values.is_empty());
        Self {
            baseline: flags.clone(),
            current: flags,
            contexts: HashMap::new(),
        }
    }

    /// Builds an instance by [`set`](Self::set)ting every entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::ParsedArguments;
    ///
    /// let args: ParsedArguments = ParsedArguments::from_map([("name", "Bob"), ("class", "wizard")]);
    /// assert_eq!(args.last("class").as_deref(), Some("wizard"));
    /// ```
    pub fn from_map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<FlagValues>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut args = Self::new();
        args.update(entries);
        args
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Raw values of `name` in the active view.
    pub fn values(&self, name: &str) -> &[FlagValue] {
        self.current.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every value of `name` as text, oldest first. Empty when absent.
    pub fn get(&self, name: &str) -> Vec<String> {
        self.values(name)
            .iter()
            .map(|v| v.as_str().to_string())
            .collect()
    }

    /// Every value of `name` passed through `coerce`. Empty when absent, in
    /// which case `coerce` is never called.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::InvalidArgument`] for the first value `coerce`
    /// rejects.
    pub fn get_as<T, E, F>(&self, name: &str, coerce: F) -> Result<Vec<T>>
    where
        E: fmt::Display,
        F: FnMut(&str) -> std::result::Result<T, E>,
    {
        self.get_or(name, Vec::new(), coerce)
    }

    /// Like [`get_as`](Self::get_as), returning `default` unmodified when
    /// `name` has no values.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::InvalidArgument`] for the first value `coerce`
    /// rejects.
    pub fn get_or<T, E, F>(&self, name: &str, default: Vec<T>, mut coerce: F) -> Result<Vec<T>>
    where
        E: fmt::Display,
        F: FnMut(&str) -> std::result::Result<T, E>,
    {
        let values = self.values(name);
        if values.is_empty() {
            return Ok(default);
        }
        values
            .iter()
            .map(|value| coerce_value(name, value, &mut coerce))
            .collect()
    }

    /// The most recently recorded value of `name` as text.
    pub fn last(&self, name: &str) -> Option<String> {
        self.values(name).last().map(|v| v.as_str().to_string())
    }

    /// The most recently recorded value of `name` passed through `coerce`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::InvalidArgument`] if `coerce` rejects the value.
    pub fn last_as<T, E, F>(&self, name: &str, mut coerce: F) -> Result<Option<T>>
    where
        E: fmt::Display,
        F: FnMut(&str) -> std::result::Result<T, E>,
    {
        self.values(name)
            .last()
            .map(|value| coerce_value(name, value, &mut coerce))
            .transpose()
    }

    /// Like [`last_as`](Self::last_as), returning `default` unmodified when
    /// `name` has no values.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::InvalidArgument`] if `coerce` rejects the value.
    pub fn last_or<T, E, F>(&self, name: &str, default: T, coerce: F) -> Result<T>
    where
        E: fmt::Display,
        F: FnMut(&str) -> std::result::Result<T, E>,
    {
        Ok(self.last_as(name, coerce)?.unwrap_or(default))
    }

    /// All values of `name` joined by `connector`, or `None` if that comes
    /// out empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::ParsedArguments;
    ///
    /// let args: ParsedArguments = ParsedArguments::from_map([("tag", vec!["a", "b"])]);
    /// assert_eq!(args.join("tag", ", ").as_deref(), Some("a, b"));
    /// assert_eq!(args.join("missing", ", "), None);
    /// ```
    pub fn join(&self, name: &str, connector: &str) -> Option<String> {
        let joined = self.get(name).join(connector);
        (!joined.is_empty()).then_some(joined)
    }

    /// Like [`join`](Self::join), falling back to `default`.
    pub fn join_or(&self, name: &str, connector: &str, default: &str) -> String {
        self.join(name, connector)
            .unwrap_or_else(|| default.to_string())
    }

    /// Returns `true` if `name` has at least one value in the active view.
    pub fn contains(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }

    /// Number of flags in the active view.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns `true` if the active view has no flags.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Flag names in the active view, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.current.keys().map(String::as_str)
    }

    /// `(name, values)` pairs of the active view, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FlagValue])> {
        self.current
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    // -----------------------------------------------------------------------
    // Direct mutation
    // -----------------------------------------------------------------------

    /// Replaces the values of `name` in the active view and the baseline.
    ///
    /// Setting an empty list removes the flag.
    pub fn set(&mut self, name: impl Into<String>, values: impl Into<FlagValues>) {
        let name = name.into();
        let values = values.into().into_vec();
        if values.is_empty() {
            self.delete(&name);
            return;
        }
        self.baseline.insert(name.clone(), values.clone());
        self.current.insert(name, values);
    }

    /// Removes `name` from the active view and the baseline. Context
    /// overlays keep their values; see [`ignore`](Self::ignore).
    pub fn delete(&mut self, name: &str) {
        self.current.shift_remove(name);
        self.baseline.shift_remove(name);
    }

    /// Removes `name` everywhere: active view, baseline and every overlay.
    pub fn ignore(&mut self, name: &str) {
        self.delete(name);
        for overlay in self.contexts.values_mut() {
            overlay.delete(name);
        }
    }

    /// [`set`](Self::set)s every entry.
    pub fn update<K, V, I>(&mut self, entries: I)
    where
        K: Into<String>,
        V: Into<FlagValues>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, values) in entries {
            self.set(name, values);
        }
    }

    /// [`set`](Self::set)s entries whose name is absent from the active
    /// view. `None` entries are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::ParsedArguments;
    ///
    /// let mut args: ParsedArguments = ParsedArguments::parse("-level 5")?;
    /// args.update_if_absent([("level", Some("1")), ("name", Some("Bob")), ("class", None)]);
    /// assert_eq!(args.get("level"), vec!["5"]);
    /// assert_eq!(args.get("name"), vec!["Bob"]);
    /// assert!(!args.contains("class"));
    /// # Ok::<(), command_args_core::ArgsError>(())
    /// ```
    pub fn update_if_absent<K, V, I>(&mut self, entries: I)
    where
        K: Into<String>,
        V: Into<FlagValues>,
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        for (name, values) in entries {
            let name = name.into();
            if self.contains(&name) {
                continue;
            }
            if let Some(values) = values {
                self.set(name, values);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Contexts
    // -----------------------------------------------------------------------

    /// Registers `overlay` under `context`, replacing any earlier one. The
    /// active view is unchanged until [`set_context`](Self::set_context).
    pub fn add_context(&mut self, context: C, overlay: ParsedArguments<C>) {
        self.contexts.insert(context, overlay);
    }

    /// The overlay registered under `context`, if any.
    pub fn context(&self, context: &C) -> Option<&ParsedArguments<C>> {
        self.contexts.get(context)
    }

    /// Rebuilds the active view from the baseline.
    ///
    /// With `Some(context)`, the overlay's values are appended after the
    /// baseline's for each flag. A context without a registered overlay
    /// behaves like an empty one. With `None`, the active view becomes
    /// exactly the baseline.
    pub fn set_context(&mut self, context: Option<&C>) {
        let mut view = self.baseline.clone();
        if let Some(context) = context {
            match self.contexts.get(context) {
                Some(overlay) => {
                    for (name, values) in &overlay.current {
                        view.entry(name.clone())
                            .or_default()
                            .extend(values.iter().cloned());
                    }
                    debug!(flags = overlay.len(), "Activated context overlay");
                }
                None => debug!("Activated context with no overlay"),
            }
        }
        self.current = view;
    }
}

fn coerce_value<T, E, F>(name: &str, value: &FlagValue, coerce: &mut F) -> Result<T>
where
    E: fmt::Display,
    F: FnMut(&str) -> std::result::Result<T, E>,
{
    coerce(value.as_str()).map_err(|err| ArgsError::InvalidArgument {
        name: name.to_string(),
        value: value.as_str().to_string(),
        reason: err.to_string(),
    })
}

/// Renders the active view as a command line, e.g.
/// `-name "Bob the Bold" -level 5 -verbose`.
///
/// A bare `Present` entry whose name is also some flag's value is the echo
/// the flag builder records for that value, and is not rendered again. The
/// output is meant for reading; flags built from bare words or dash-leading
/// values do not parse back to the same mapping.
impl<C> fmt::Display for ParsedArguments<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut echoes: HashMap<&str, usize> = HashMap::new();
        for value in self.current.values().flatten() {
            match value {
                FlagValue::Text(text) if !text.starts_with('-') => {
                    *echoes.entry(text.as_str()).or_default() += 1;
                }
                _ => {}
            }
        }

        let mut first = true;
        for (name, values) in &self.current {
            for value in values {
                if value.is_present() && take_echo(&mut echoes, name) {
                    continue;
                }
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                write!(f, "-{}", quote(name))?;
                if let FlagValue::Text(text) = value {
                    write!(f, " {}", quote(text))?;
                }
            }
        }
        Ok(())
    }
}

fn take_echo(echoes: &mut HashMap<&str, usize>, name: &str) -> bool {
    match echoes.get_mut(name) {
        Some(count) if *count > 0 => {
            *count -= 1;
            true
        }
        _ => false,
    }
}

impl<C> Serialize for ParsedArguments<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.current.serialize(serializer)
    }
}
