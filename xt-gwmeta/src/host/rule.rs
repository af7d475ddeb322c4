//! Building a rule descriptor from directive tokens.

use tracing::debug;

use super::tokens::{parse_tokens, split_save_line, DirectiveToken};
use crate::error::{ParseError, Result};
use crate::target::{apply, GwmetaTarget, RuleDescriptor, TargetExtension};

/// Apply `tokens` to `descriptor` in order.
///
/// Stops at the first failing token; the caller discards the descriptor in
/// that case.
///
/// # Errors
///
/// Returns the `ParseError` of the first token that fails to apply.
pub fn apply_all(
    descriptor: &mut RuleDescriptor,
    tokens: &[DirectiveToken],
) -> std::result::Result<(), ParseError> {
    for token in tokens {
        apply(descriptor, token.directive, token.value.as_deref())?;
    }
    Ok(())
}

/// Build and check a descriptor through `extension`, the way the host does
/// for one rule definition.
///
/// Nothing is returned unless every token applied and the final check
/// passed.
///
/// # Errors
///
/// Returns `GwmetaError::Parse` for tokenizing or parsing failures and
/// `GwmetaError::Validation` if the final check rejects the rule.
pub fn build_rule_with<S: AsRef<str>>(
    extension: &dyn TargetExtension,
    args: &[S],
) -> Result<RuleDescriptor> {
    let tokens = parse_tokens(args)?;
    let mut descriptor = RuleDescriptor::new();

    for token in &tokens {
        extension.parse(
            &mut descriptor,
            token.directive.option_name(),
            token.value.as_deref(),
        )?;
    }
    extension.final_check(&descriptor)?;

    debug!("Built rule from {} directive(s)", tokens.len());
    Ok(descriptor)
}

/// Build and check a GWMETA descriptor from command-line words.
///
/// # Errors
///
/// See [`build_rule_with`].
pub fn build_rule<S: AsRef<str>>(args: &[S]) -> Result<RuleDescriptor> {
    build_rule_with(&GwmetaTarget, args)
}

/// Rebuild a descriptor from one line of save output.
///
/// # Errors
///
/// See [`build_rule_with`]. Reloading the save form of an empty descriptor
/// fails the final check.
pub fn reload_saved(line: &str) -> Result<RuleDescriptor> {
    build_rule(&split_save_line(line))
}
