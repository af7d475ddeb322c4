//! Directive parsing for the GWMETA target.
//!
//! The host hands over one recognized option at a time together with its
//! value (if any); [`apply`] folds it into the rule's [`RuleDescriptor`].
//!
//! | Option | Value | Effect |
//! |---|---|---|
//! | `--gwmeta-gwmask` | 32-bit hex | OR the mask into the packet tag |
//! | `--dis-pp` | none | disable the session fast path |
//! | `--en-pp` | none | enable the session fast path |
//!
//! Repeating `--gwmeta-gwmask` accumulates masks. Any other option replaces
//! the active action outright, so `--gwmeta-gwmask 0x1 --dis-pp` yields a
//! plain `--dis-pp` rule.

use std::fmt;
use std::num::NonZeroU32;

use tracing::{debug, warn};

use super::descriptor::{RuleDescriptor, TargetMode};
use crate::error::ParseError;

/// Long option name of the mask directive.
pub const OPT_GWMASK: &str = "gwmeta-gwmask";

/// Long option name of the disable-session directive.
pub const OPT_DIS_PP: &str = "dis-pp";

/// Long option name of the enable-session directive.
pub const OPT_EN_PP: &str = "en-pp";

/// One of the directives the GWMETA target understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `--gwmeta-gwmask <hex>`
    GwMask,
    /// `--dis-pp`
    DisableSession,
    /// `--en-pp`
    EnableSession,
}

impl Directive {
    /// All directives, in option-table order.
    pub const ALL: [Self; 3] = [Self::GwMask, Self::DisableSession, Self::EnableSession];

    /// Resolve a long option name given without the leading `--`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Unrecognized` if the option is not ours.
    pub fn from_option(name: &str) -> Result<Self, ParseError> {
        match name {
            OPT_GWMASK => Ok(Self::GwMask),
            OPT_DIS_PP => Ok(Self::DisableSession),
            OPT_EN_PP => Ok(Self::EnableSession),
            _ => Err(ParseError::unrecognized(name)),
        }
    }

    /// Long option name without the leading `--`.
    #[must_use]
    pub const fn option_name(&self) -> &'static str {
        match self {
            Self::GwMask => OPT_GWMASK,
            Self::DisableSession => OPT_DIS_PP,
            Self::EnableSession => OPT_EN_PP,
        }
    }

    /// Whether the directive consumes a value.
    #[must_use]
    pub const fn takes_value(&self) -> bool {
        matches!(self, Self::GwMask)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.option_name())
    }
}

/// Entry of the extension's long-option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name without the leading `--`.
    pub name: &'static str,
    /// Whether the option requires a value.
    pub has_arg: bool,
    /// Directive the option maps to.
    pub directive: Directive,
}

/// Long options contributed to the host's command line.
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: OPT_GWMASK,
        has_arg: true,
        directive: Directive::GwMask,
    },
    OptionSpec {
        name: OPT_DIS_PP,
        has_arg: false,
        directive: Directive::DisableSession,
    },
    OptionSpec {
        name: OPT_EN_PP,
        has_arg: false,
        directive: Directive::EnableSession,
    },
];

const HELP: &str = "\
GWMETA options:
  --gwmeta-gwmask value    OR a 32-bit hexadecimal mask into the packet tag
  --dis-pp                 disable the session fast path for the flow
  --en-pp                  enable the session fast path for the flow
";

/// Usage text shown by the host's `-j GWMETA --help`.
#[must_use]
pub const fn help() -> &'static str {
    HELP
}

/// Parse a mask value the way the command line accepts it.
///
/// Accepts an optional `+` sign and an optional `0x`/`0X` prefix around
/// hexadecimal digits, after trimming surrounding whitespace.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` when the text is not hexadecimal,
/// is zero or negative, or does not fit in 32 bits.
pub fn parse_mask(raw: &str) -> Result<NonZeroU32, ParseError> {
    let invalid =
        |reason: &str| ParseError::invalid_value(Directive::GwMask.to_string(), raw, reason);

    let text = raw.trim();
    if text.starts_with('-') {
        return Err(invalid("mask must be positive"));
    }
    let text = text.strip_prefix('+').unwrap_or(text);
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("not a hexadecimal number"));
    }

    let value = u32::from_str_radix(digits, 16).map_err(|_| invalid("mask exceeds 32 bits"))?;
    NonZeroU32::new(value).ok_or_else(|| invalid("mask must be non-zero"))
}

/// Apply one directive to `descriptor`.
///
/// `value` is the option argument as the host tokenized it. Flag
/// directives ignore it.
///
/// # Errors
///
/// - `ParseError::MissingArgument` if `--gwmeta-gwmask` has no value
/// - `ParseError::InvalidValue` if the mask is rejected by [`parse_mask`]
///
/// The descriptor is left untouched on error.
pub fn apply(
    descriptor: &mut RuleDescriptor,
    directive: Directive,
    value: Option<&str>,
) -> Result<(), ParseError> {
    let mode = match directive {
        Directive::GwMask => {
            let raw = value.ok_or_else(|| ParseError::missing_argument(directive.to_string()))?;
            let mask = parse_mask(raw)?;
            match descriptor.mode() {
                Some(TargetMode::MaskTag { mask: current }) => TargetMode::MaskTag {
                    mask: current | mask,
                },
                _ => TargetMode::MaskTag { mask },
            }
        }
        Directive::DisableSession => TargetMode::DisableSession,
        Directive::EnableSession => TargetMode::EnableSession,
    };

    if let Some(previous) = descriptor.set_mode(mode) {
        if !previous.same_kind(&mode) {
            warn!(
                "GWMETA {} replaces previously configured {}",
                directive, previous
            );
        }
    }
    debug!("GWMETA applied {}: now {}", directive, mode);

    Ok(())
}

/// Resolve `option` and apply it in one step.
///
/// # Errors
///
/// Returns `ParseError::Unrecognized` for options this extension does not
/// own, otherwise the errors of [`apply`].
pub fn apply_option(
    descriptor: &mut RuleDescriptor,
    option: &str,
    value: Option<&str>,
) -> Result<(), ParseError> {
    let name = option.strip_prefix("--").unwrap_or(option);
    let directive = Directive::from_option(name).map_err(|_| ParseError::unrecognized(option))?;
    apply(descriptor, directive, value)
}
