//! Host-side driving of the target extension
//!
//! The real host (iptables) owns argument tokenization and the rule table.
//! This module reproduces the part of that contract the extension depends
//! on, so rules can be built from a command line and reloaded from save
//! output:
//!
//! - [`tokens`]: getopt-style tokenizer over the extension's option table
//! - [`rule`]: apply every token, then run the final check
//!
//! # Example
//!
//! ```
//! use xt_gwmeta::host::{build_rule, reload_saved};
//! use xt_gwmeta::target::save;
//!
//! let desc = build_rule(&["--gwmeta-gwmask", "0x2", "--gwmeta-gwmask=0x20"]).unwrap();
//! let saved = save(&desc);
//! assert_eq!(saved, "--gwmeta-gwmask 0x22");
//! assert_eq!(reload_saved(&saved).unwrap(), desc);
//! ```

pub mod rule;
pub mod tokens;

pub use rule::{apply_all, build_rule, build_rule_with, reload_saved};
pub use tokens::{parse_tokens, split_save_line, DirectiveToken};
