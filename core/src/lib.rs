//! Quote-aware command tokenizer and layered argument store.
//!
//! This crate turns free-form command text such as
//! `-name "Bob the Bold" -level 5` into structured flag data:
//!
//! - [`split`] / [`next_word`] — a shell-like tokenizer over a
//!   [`StringView`] cursor. It understands many Unicode quote pairs (see
//!   [`quotes::QUOTE_PAIRS`]) and backslash escapes, and never treats an
//!   apostrophe as a quote.
//! - [`build_flags`] — turns words into an insertion-ordered [`FlagMap`]
//!   of multi-valued flags.
//! - [`ParsedArguments`] — typed, defaulted access over that mapping, plus
//!   named context overlays that can be activated and dropped without
//!   losing the original parse.
//! - [`ParseProfile`] — YAML-described defaults, overrides, ignores and
//!   contexts applied after parsing.
//!
//! Values are untyped until read: accessors such as
//! [`ParsedArguments::last_as`] take a coercion function, and a value it
//! rejects becomes an [`ArgsError::InvalidArgument`].
//!
//! # Example
//!
//! ```
//! use command_args_core::*;
//!
//! let mut args: ParsedArguments = ParsedArguments::parse(r#"-name "Bob the Bold" -level 5 -d 6"#)?;
//! assert_eq!(args.last("name").as_deref(), Some("Bob the Bold"));
//! assert_eq!(args.last_as("level", str::parse::<u32>)?, Some(5));
//!
//! args.add_context("crit".to_string(), ParsedArguments::parse("-d 6")?);
//! args.set_context(Some(&"crit".to_string()));
//! assert_eq!(args.get_as("d", str::parse::<u32>)?, vec![6, 6]);
//!
//! args.set_context(None);
//! assert_eq!(args.get_as("d", str::parse::<u32>)?, vec![6]);
//! # Ok::<(), ArgsError>(())
//! ```

mod args;
mod error;
mod flags;
mod profile;
pub mod quotes;
mod split;
mod view;

pub use args::ParsedArguments;
pub use error::{ArgsError, Result};
pub use flags::{FlagMap, FlagValue, FlagValues, build_flags};
pub use profile::{ParseProfile, ProfileError};
pub use split::{join_quoted, next_word, quote, split};
pub use view::StringView;
