//! Text rendering of a rule descriptor.
//!
//! Two forms exist:
//!
//! - **print** (`iptables -L`): target name plus the active action, e.g.
//!   `GWMETA --gwmeta-gwmask:0x22`
//! - **save** (`iptables-save`): exactly the directive tokens that rebuild
//!   the descriptor, e.g. `--gwmeta-gwmask 0x22`
//!
//! Masks are always rendered as unpadded uppercase hex with a `0x` prefix,
//! which [`parse_mask`](super::directive::parse_mask) accepts back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::descriptor::{RuleDescriptor, TargetMode};
use super::directive::Directive;
use super::TARGET_NAME;

/// Which of the two text forms to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Human-readable listing form.
    #[default]
    Print,
    /// Reload-safe save form.
    Save,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "print" | "list" => Ok(Self::Print),
            "save" => Ok(Self::Save),
            _ => Err(format!("unknown render mode: {s}")),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print => write!(f, "print"),
            Self::Save => write!(f, "save"),
        }
    }
}

/// Render the listing form.
///
/// An empty descriptor renders as the bare target name.
///
/// # Example
///
/// ```
/// use xt_gwmeta::target::descriptor::{RuleDescriptor, TargetMode};
/// use xt_gwmeta::target::render::print;
///
/// let desc = RuleDescriptor::with_mode(TargetMode::DisableSession);
/// assert_eq!(print(&desc), "GWMETA --dis-pp");
/// ```
#[must_use]
pub fn print(descriptor: &RuleDescriptor) -> String {
    match descriptor.mode() {
        None => TARGET_NAME.to_string(),
        Some(TargetMode::MaskTag { mask }) => {
            format!("{TARGET_NAME} {}:0x{:X}", Directive::GwMask, mask.get())
        }
        Some(TargetMode::DisableSession) => format!("{TARGET_NAME} {}", Directive::DisableSession),
        Some(TargetMode::EnableSession) => format!("{TARGET_NAME} {}", Directive::EnableSession),
    }
}

/// Render the save form as separate tokens.
///
/// An empty descriptor yields no tokens.
#[must_use]
pub fn save_tokens(descriptor: &RuleDescriptor) -> Vec<String> {
    match descriptor.mode() {
        None => Vec::new(),
        Some(TargetMode::MaskTag { mask }) => {
            vec![Directive::GwMask.to_string(), format!("0x{:X}", mask.get())]
        }
        Some(TargetMode::DisableSession) => vec![Directive::DisableSession.to_string()],
        Some(TargetMode::EnableSession) => vec![Directive::EnableSession.to_string()],
    }
}

/// Render the save form.
///
/// The target name itself is not included; the host emits `-j GWMETA`
/// before the extension's tokens.
///
/// # Example
///
/// ```
/// use std::num::NonZeroU32;
/// use xt_gwmeta::target::descriptor::{RuleDescriptor, TargetMode};
/// use xt_gwmeta::target::render::save;
///
/// let desc = RuleDescriptor::with_mode(TargetMode::MaskTag {
///     mask: NonZeroU32::new(0xabc).unwrap(),
/// });
/// assert_eq!(save(&desc), "--gwmeta-gwmask 0xABC");
/// ```
#[must_use]
pub fn save(descriptor: &RuleDescriptor) -> String {
    save_tokens(descriptor).join(" ")
}

/// Render a full `-j GWMETA ...` rule fragment.
#[must_use]
pub fn save_with_target(descriptor: &RuleDescriptor) -> String {
    let tokens = save(descriptor);
    if tokens.is_empty() {
        format!("-j {TARGET_NAME}")
    } else {
        format!("-j {TARGET_NAME} {tokens}")
    }
}

/// Render in the requested form.
#[must_use]
pub fn render(descriptor: &RuleDescriptor, mode: RenderMode) -> String {
    match mode {
        RenderMode::Print => print(descriptor),
        RenderMode::Save => save(descriptor),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::target::directive::apply;

    fn mask(value: u32) -> RuleDescriptor {
        RuleDescriptor::with_mode(TargetMode::MaskTag {
            mask: NonZeroU32::new(value).unwrap(),
        })
    }

    #[test]
    fn test_print_forms() {
        assert_eq!(print(&mask(0x22)), "GWMETA --gwmeta-gwmask:0x22");
        assert_eq!(print(&mask(0xdead_beef)), "GWMETA --gwmeta-gwmask:0xDEADBEEF");
        assert_eq!(
            print(&RuleDescriptor::with_mode(TargetMode::DisableSession)),
            "GWMETA --dis-pp"
        );
        assert_eq!(
            print(&RuleDescriptor::with_mode(TargetMode::EnableSession)),
            "GWMETA --en-pp"
        );
    }

    #[test]
    fn test_save_forms() {
        assert_eq!(save(&mask(0x2)), "--gwmeta-gwmask 0x2");
        assert_eq!(save_tokens(&mask(0xff)), vec!["--gwmeta-gwmask", "0xFF"]);
        assert_eq!(
            save(&RuleDescriptor::with_mode(TargetMode::DisableSession)),
            "--dis-pp"
        );
        assert_eq!(
            save(&RuleDescriptor::with_mode(TargetMode::EnableSession)),
            "--en-pp"
        );
    }

    #[test]
    fn test_empty_descriptor_renders_name_only() {
        let desc = RuleDescriptor::new();
        assert_eq!(print(&desc), "GWMETA");
        assert_eq!(save(&desc), "");
        assert!(save_tokens(&desc).is_empty());
        assert_eq!(save_with_target(&desc), "-j GWMETA");
    }

    #[test]
    fn test_save_with_target() {
        assert_eq!(save_with_target(&mask(0x22)), "-j GWMETA --gwmeta-gwmask 0x22");
    }

    #[test]
    fn test_print_after_disable_hides_mask() {
        let mut desc = RuleDescriptor::new();
        apply(&mut desc, Directive::GwMask, Some("0x10")).unwrap();
        apply(&mut desc, Directive::DisableSession, None).unwrap();

        let text = print(&desc);
        assert_eq!(text, "GWMETA --dis-pp");
        assert!(!text.contains("0x"));
    }

    #[test]
    fn test_render_dispatch() {
        let desc = mask(0x5);
        assert_eq!(render(&desc, RenderMode::Print), print(&desc));
        assert_eq!(render(&desc, RenderMode::Save), save(&desc));
    }

    #[test]
    fn test_render_mode_parse() {
        assert_eq!("save".parse::<RenderMode>(), Ok(RenderMode::Save));
        assert_eq!("LIST".parse::<RenderMode>(), Ok(RenderMode::Print));
        assert!("dump".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::default(), RenderMode::Print);
    }

    #[test]
    fn test_render_mode_serde() {
        assert_eq!(serde_json::to_string(&RenderMode::Save).unwrap(), "\"save\"");
        let mode: RenderMode = serde_json::from_str("\"print\"").unwrap();
        assert_eq!(mode, RenderMode::Print);
    }
}
