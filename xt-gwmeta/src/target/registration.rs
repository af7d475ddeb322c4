//! Registration of the GWMETA target with the host.
//!
//! The host calls [`init`] once at load time and keeps the returned
//! [`Registration`] for the life of the process. The registration carries one
//! entry per address family; both entries share the same descriptor shape and
//! the same [`TargetExtension`] implementation.
//!
//! # Example
//!
//! ```
//! use xt_gwmeta::target::registration::{init, Family};
//! use xt_gwmeta::target::RuleDescriptor;
//!
//! let registration = init();
//! let v6 = registration.for_family(Family::Ipv6).unwrap();
//! assert_eq!(v6.name, "GWMETA");
//!
//! let mut desc = RuleDescriptor::new();
//! v6.extension.parse(&mut desc, "--en-pp", None).unwrap();
//! v6.extension.final_check(&desc).unwrap();
//! assert_eq!(v6.extension.save(&desc), "--en-pp");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::descriptor::{RuleDescriptor, TARGET_INFO_SIZE};
use super::directive::{self, OptionSpec, OPTIONS};
use super::{render, validate, TARGET_NAME};
use crate::error::{ParseError, ValidationError};

/// Library version string the host checks extensions against.
pub const XTABLES_VERSION: &str = "libxtables.so.12";

/// `NFPROTO_IPV4` from `linux/netfilter.h`.
pub const NFPROTO_IPV4: u8 = 2;

/// `NFPROTO_IPV6` from `linux/netfilter.h`.
pub const NFPROTO_IPV6: u8 = 10;

/// Address family a registration entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// `iptables`
    Ipv4,
    /// `ip6tables`
    Ipv6,
}

impl Family {
    /// Both families, in registration order.
    pub const ALL: [Self; 2] = [Self::Ipv4, Self::Ipv6];

    /// Netfilter protocol number.
    #[must_use]
    pub const fn nfproto(&self) -> u8 {
        match self {
            Self::Ipv4 => NFPROTO_IPV4,
            Self::Ipv6 => NFPROTO_IPV6,
        }
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ipv4" | "inet" | "4" => Ok(Self::Ipv4),
            "ipv6" | "inet6" | "6" => Ok(Self::Ipv6),
            _ => Err(format!("unknown address family: {s}")),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "ipv4"),
            Self::Ipv6 => write!(f, "ipv6"),
        }
    }
}

/// Operations the host invokes on a target extension.
pub trait TargetExtension: fmt::Debug + Send + Sync {
    /// Apply one option owned by this extension.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Unrecognized` for options owned by someone else.
    fn parse(
        &self,
        descriptor: &mut RuleDescriptor,
        option: &str,
        value: Option<&str>,
    ) -> Result<(), ParseError>;

    /// Check the descriptor once all options have been parsed.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the rule must not be installed.
    fn final_check(&self, descriptor: &RuleDescriptor) -> Result<(), ValidationError>;

    /// Listing form of the descriptor.
    fn print(&self, descriptor: &RuleDescriptor) -> String;

    /// Save form of the descriptor.
    fn save(&self, descriptor: &RuleDescriptor) -> String;
}

/// The GWMETA target.
#[derive(Debug, Clone, Copy, Default)]
pub struct GwmetaTarget;

impl TargetExtension for GwmetaTarget {
    fn parse(
        &self,
        descriptor: &mut RuleDescriptor,
        option: &str,
        value: Option<&str>,
    ) -> Result<(), ParseError> {
        directive::apply_option(descriptor, option, value)
    }

    fn final_check(&self, descriptor: &RuleDescriptor) -> Result<(), ValidationError> {
        validate::finalize(descriptor)
    }

    fn print(&self, descriptor: &RuleDescriptor) -> String {
        render::print(descriptor)
    }

    fn save(&self, descriptor: &RuleDescriptor) -> String {
        render::save(descriptor)
    }
}

static GWMETA: GwmetaTarget = GwmetaTarget;

/// One entry of the host's target table.
#[derive(Debug, Clone, Copy)]
pub struct TargetRegistration {
    /// Target name used with `-j`.
    pub name: &'static str,
    /// Host library version this entry was built for.
    pub version: &'static str,
    /// Address family the entry applies to.
    pub family: Family,
    /// Size of the payload handed to the engine.
    pub size: usize,
    /// Portion of the payload compared when matching rules for deletion.
    pub userspace_size: usize,
    /// Usage text.
    pub help: &'static str,
    /// Long options contributed to the host's command line.
    pub options: &'static [OptionSpec],
    /// Operations invoked by the host.
    pub extension: &'static dyn TargetExtension,
}

impl TargetRegistration {
    fn gwmeta(family: Family) -> Self {
        Self {
            name: TARGET_NAME,
            version: XTABLES_VERSION,
            family,
            size: TARGET_INFO_SIZE,
            userspace_size: TARGET_INFO_SIZE,
            help: directive::help(),
            options: OPTIONS,
            extension: &GWMETA,
        }
    }
}

/// Immutable set of registration entries returned by [`init`].
#[derive(Debug, Clone)]
pub struct Registration {
    targets: Vec<TargetRegistration>,
}

impl Registration {
    /// All entries, one per family.
    #[must_use]
    pub fn targets(&self) -> &[TargetRegistration] {
        &self.targets
    }

    /// Entry for `family`.
    #[must_use]
    pub fn for_family(&self, family: Family) -> Option<&TargetRegistration> {
        self.targets.iter().find(|t| t.family == family)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Build the registration table for the GWMETA target.
#[must_use]
pub fn init() -> Registration {
    let targets: Vec<_> = Family::ALL
        .into_iter()
        .map(TargetRegistration::gwmeta)
        .collect();

    info!(
        "Registered target {} for {} families (payload {} bytes)",
        TARGET_NAME,
        targets.len(),
        TARGET_INFO_SIZE
    );

    Registration { targets }
}
