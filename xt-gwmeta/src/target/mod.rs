//! GWMETA target extension
//!
//! This module provides:
//! - The rule descriptor and its engine-facing binary layout
//! - Directive parsing (`--gwmeta-gwmask`, `--dis-pp`, `--en-pp`)
//! - The final check run once per rule
//! - Listing and save rendering
//! - Registration with the host
//!
//! # Lifecycle
//!
//! ```text
//! Empty -> (parse)* -> Configured | Empty -> (final_check) -> Valid | Rejected
//! ```
//!
//! The host owns the descriptor throughout; every operation here is a plain
//! synchronous function over a borrowed descriptor.
//!
//! # Example
//!
//! ```
//! use xt_gwmeta::target::{apply, finalize, print, save, Directive, RuleDescriptor};
//!
//! let mut desc = RuleDescriptor::new();
//! apply(&mut desc, Directive::GwMask, Some("0x01")).unwrap();
//! apply(&mut desc, Directive::GwMask, Some("0x20")).unwrap();
//! finalize(&desc).unwrap();
//!
//! assert_eq!(print(&desc), "GWMETA --gwmeta-gwmask:0x21");
//! assert_eq!(save(&desc), "--gwmeta-gwmask 0x21");
//! ```

pub mod descriptor;
pub mod directive;
pub mod registration;
pub mod render;
pub mod validate;

/// Name the target is selected by (`-j GWMETA`).
pub const TARGET_NAME: &str = "GWMETA";

// Re-exports
pub use descriptor::{
    xt_align, RawTargetInfo, RuleDescriptor, TargetMode, TARGET_INFO_SIZE, XT_GW_DIS_PP,
    XT_GW_EN_PP, XT_GW_META, XT_GW_UNSET,
};
pub use directive::{apply, apply_option, help, parse_mask, Directive, OptionSpec, OPTIONS};
pub use registration::{
    init, Family, GwmetaTarget, Registration, TargetExtension, TargetRegistration,
    XTABLES_VERSION,
};
pub use render::{print, render, save, save_tokens, save_with_target, RenderMode};
pub use validate::finalize;
