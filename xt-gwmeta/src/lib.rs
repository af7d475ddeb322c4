//! xt-gwmeta: control-plane logic for the GWMETA target extension
//!
//! GWMETA is an iptables/ip6tables target that ORs a 32-bit mask into a
//! packet-scoped gateway tag, or toggles the gateway's session fast path for
//! a flow. This crate implements the user-space half of the extension:
//! turning `-j GWMETA` directives into the fixed binary record the packet
//! engine consumes, and turning that record back into directive text.
//!
//! # Architecture
//!
//! ```text
//! iptables -j GWMETA --gwmeta-gwmask 0x2
//!        |
//!        v
//!   host::tokens ---> target::directive ---> target::validate
//!                            |                       |
//!                            v                       v
//!                     RuleDescriptor ------> RawTargetInfo (engine)
//!                            |
//!                            v
//!                     target::render (iptables -L / iptables-save)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use xt_gwmeta::host::build_rule;
//! use xt_gwmeta::target::{print, save, TARGET_INFO_SIZE};
//!
//! let desc = build_rule(&["--gwmeta-gwmask", "0x0000002"]).unwrap();
//! assert_eq!(print(&desc), "GWMETA --gwmeta-gwmask:0x2");
//! assert_eq!(save(&desc), "--gwmeta-gwmask 0x2");
//! assert_eq!(desc.encode().len(), TARGET_INFO_SIZE);
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration types and loading
//! - [`error`]: Error types
//! - [`host`]: Command-line tokenizing and rule building
//! - [`target`]: Descriptor, directives, validation, rendering, registration

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod host;
pub mod target;

// Re-export commonly used types at the crate root
pub use config::{Config, LogConfig, RenderConfig};
pub use error::{ConfigError, DescriptorError, GwmetaError, ParseError, ValidationError};
pub use host::{build_rule, reload_saved, DirectiveToken};
pub use target::{
    init, Directive, Family, GwmetaTarget, Registration, RenderMode, RuleDescriptor,
    TargetExtension, TargetMode,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
