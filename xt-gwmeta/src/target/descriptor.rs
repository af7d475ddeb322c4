//! Rule descriptor and its engine-facing binary layout.
//!
//! The descriptor is what one `-j GWMETA` rule hands to the packet engine.
//! In Rust it is modelled as a sum type ([`TargetMode`]); the engine sees a
//! fixed `#[repr(C)]` record ([`RawTargetInfo`]) with a kind code and a mask:
//!
//! ```text
//! xt_gw_skb_rule_info (8 bytes, XT_ALIGN'ed):
//! +--------+--------+--------+--------+--------+--------+--------+--------+
//! |            kind (u32)             |           gwmask (u32)            |
//! +--------+--------+--------+--------+--------+--------+--------+--------+
//! ```
//!
//! Both fields are native-endian, as the kernel reads them straight out of
//! the rule blob.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroU32;
//! use xt_gwmeta::target::descriptor::{RuleDescriptor, TargetMode, TARGET_INFO_SIZE};
//!
//! let desc = RuleDescriptor::with_mode(TargetMode::MaskTag {
//!     mask: NonZeroU32::new(0x22).unwrap(),
//! });
//! let bytes = desc.encode();
//! assert_eq!(bytes.len(), TARGET_INFO_SIZE);
//!
//! let decoded = RuleDescriptor::decode(&bytes).unwrap();
//! assert_eq!(decoded, desc);
//! ```

use std::fmt;
use std::mem::size_of;
use std::num::NonZeroU32;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::DescriptorError;

/// Kind code of a zeroed, never-configured record.
pub const XT_GW_UNSET: u32 = 0;

/// Kind code for the mask-tagging action.
pub const XT_GW_META: u32 = 1;

/// Kind code for disabling the session (`--dis-pp`).
pub const XT_GW_DIS_PP: u32 = 2;

/// Kind code for enabling the session (`--en-pp`).
pub const XT_GW_EN_PP: u32 = 3;

/// Alignment of target payloads inside an xtables rule blob.
///
/// Matches `__alignof__(struct _xt_align)` on 64-bit kernels.
pub const XT_ALIGNMENT: usize = 8;

/// Round `size` up to the xtables payload alignment.
#[must_use]
pub const fn xt_align(size: usize) -> usize {
    (size + XT_ALIGNMENT - 1) & !(XT_ALIGNMENT - 1)
}

/// Size of the engine-facing record, padded to `XT_ALIGNMENT`.
///
/// Changing this value changes the wire contract with the engine.
pub const TARGET_INFO_SIZE: usize = xt_align(size_of::<RawTargetInfo>());

/// Engine-facing record (`struct xt_gw_skb_rule_info`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
pub struct RawTargetInfo {
    /// One of the `XT_GW_*` kind codes.
    pub kind: u32,
    /// Mask OR-ed into the packet tag; zero unless `kind == XT_GW_META`.
    pub gwmask: u32,
}

/// The action a GWMETA rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetMode {
    /// OR `mask` into the packet's gateway metadata.
    MaskTag {
        /// Accumulated mask, never zero.
        mask: NonZeroU32,
    },
    /// Take the flow out of the session fast path.
    DisableSession,
    /// Put the flow back on the session fast path.
    EnableSession,
}

impl TargetMode {
    /// Kind code used for this mode in [`RawTargetInfo`].
    #[must_use]
    pub const fn kind_code(&self) -> u32 {
        match self {
            Self::MaskTag { .. } => XT_GW_META,
            Self::DisableSession => XT_GW_DIS_PP,
            Self::EnableSession => XT_GW_EN_PP,
        }
    }

    /// Mask carried by this mode, if any.
    #[must_use]
    pub const fn mask(&self) -> Option<u32> {
        match self {
            Self::MaskTag { mask } => Some(mask.get()),
            Self::DisableSession | Self::EnableSession => None,
        }
    }

    /// Check if `other` is the same kind of action, ignoring payload.
    #[must_use]
    pub const fn same_kind(&self, other: &Self) -> bool {
        self.kind_code() == other.kind_code()
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaskTag { mask } => write!(f, "mask-tag(0x{:X})", mask.get()),
            Self::DisableSession => write!(f, "disable-session"),
            Self::EnableSession => write!(f, "enable-session"),
        }
    }
}

/// Per-rule state built up by the directive parser.
///
/// Starts empty; `configured` flips to true the first time a directive is
/// applied and is never persisted in the binary record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleDescriptor {
    mode: Option<TargetMode>,
    configured: bool,
}

impl RuleDescriptor {
    /// Create an empty, unconfigured descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: None,
            configured: false,
        }
    }

    /// Create a configured descriptor holding `mode`.
    #[must_use]
    pub const fn with_mode(mode: TargetMode) -> Self {
        Self {
            mode: Some(mode),
            configured: true,
        }
    }

    /// Active action, `None` while empty.
    #[must_use]
    pub const fn mode(&self) -> Option<TargetMode> {
        self.mode
    }

    /// Accumulated mask when the active action is `MaskTag`.
    #[must_use]
    pub fn mask(&self) -> Option<u32> {
        self.mode.and_then(|m| m.mask())
    }

    /// Whether any directive has been applied.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.configured
    }

    /// Replace the active action and mark the descriptor configured.
    ///
    /// Returns the action that was replaced, if any.
    pub(crate) fn set_mode(&mut self, mode: TargetMode) -> Option<TargetMode> {
        self.configured = true;
        self.mode.replace(mode)
    }

    /// Build the engine-facing record.
    #[must_use]
    pub fn to_raw(&self) -> RawTargetInfo {
        match self.mode {
            None => RawTargetInfo::default(),
            Some(mode) => RawTargetInfo {
                kind: mode.kind_code(),
                gwmask: mode.mask().unwrap_or(0),
            },
        }
    }

    /// Encode into a `TARGET_INFO_SIZE` byte buffer.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let raw = self.to_raw();
        let mut buf = vec![0u8; TARGET_INFO_SIZE];
        buf[..size_of::<RawTargetInfo>()].copy_from_slice(raw.as_bytes());
        buf
    }

    /// Rebuild a descriptor from an engine-facing record.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError::UnknownKind` for kind codes outside
    /// `XT_GW_UNSET..=XT_GW_EN_PP` and `DescriptorError::ZeroMask` for a
    /// mask record with an empty mask.
    pub fn from_raw(raw: &RawTargetInfo) -> Result<Self, DescriptorError> {
        let mode = match raw.kind {
            XT_GW_UNSET => return Ok(Self::new()),
            XT_GW_META => TargetMode::MaskTag {
                mask: NonZeroU32::new(raw.gwmask).ok_or(DescriptorError::ZeroMask)?,
            },
            XT_GW_DIS_PP => TargetMode::DisableSession,
            XT_GW_EN_PP => TargetMode::EnableSession,
            other => return Err(DescriptorError::UnknownKind(other)),
        };
        Ok(Self::with_mode(mode))
    }

    /// Decode a descriptor from the start of `bytes`.
    ///
    /// Trailing alignment padding is ignored.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError::Truncated` if `bytes` is shorter than the
    /// record, or any error from [`RuleDescriptor::from_raw`].
    pub fn decode(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let (raw, _padding) =
            RawTargetInfo::read_from_prefix(bytes).map_err(|_| DescriptorError::Truncated {
                expected: size_of::<RawTargetInfo>(),
                actual: bytes.len(),
            })?;
        Self::from_raw(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(value: u32) -> TargetMode {
        TargetMode::MaskTag {
            mask: NonZeroU32::new(value).unwrap(),
        }
    }

    #[test]
    fn test_layout_contract() {
        assert_eq!(size_of::<RawTargetInfo>(), 8);
        assert_eq!(TARGET_INFO_SIZE, 8);
        assert_eq!(TARGET_INFO_SIZE % XT_ALIGNMENT, 0);
    }

    #[test]
    fn test_xt_align() {
        assert_eq!(xt_align(0), 0);
        assert_eq!(xt_align(1), 8);
        assert_eq!(xt_align(8), 8);
        assert_eq!(xt_align(12), 16);
    }

    #[test]
    fn test_empty_descriptor() {
        let desc = RuleDescriptor::new();
        assert!(!desc.is_configured());
        assert_eq!(desc.mode(), None);
        assert_eq!(desc.mask(), None);
        assert_eq!(desc.to_raw(), RawTargetInfo::default());
        assert_eq!(desc, RuleDescriptor::default());
    }

    #[test]
    fn test_to_raw() {
        let raw = RuleDescriptor::with_mode(mask(0x22)).to_raw();
        assert_eq!(raw.kind, XT_GW_META);
        assert_eq!(raw.gwmask, 0x22);

        let raw = RuleDescriptor::with_mode(TargetMode::DisableSession).to_raw();
        assert_eq!(raw.kind, XT_GW_DIS_PP);
        assert_eq!(raw.gwmask, 0);

        let raw = RuleDescriptor::with_mode(TargetMode::EnableSession).to_raw();
        assert_eq!(raw.kind, XT_GW_EN_PP);
        assert_eq!(raw.gwmask, 0);
    }

    #[test]
    fn test_encode_is_native_endian() {
        let bytes = RuleDescriptor::with_mode(mask(0x0102_0304)).encode();
        assert_eq!(&bytes[..4], &XT_GW_META.to_ne_bytes());
        assert_eq!(&bytes[4..8], &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn test_decode_each_mode() {
        for mode in [
            mask(1),
            mask(u32::MAX),
            TargetMode::DisableSession,
            TargetMode::EnableSession,
        ] {
            let desc = RuleDescriptor::with_mode(mode);
            assert_eq!(RuleDescriptor::decode(&desc.encode()).unwrap(), desc);
        }
    }

    #[test]
    fn test_decode_zeroed_record_is_empty() {
        let desc = RuleDescriptor::decode(&[0u8; TARGET_INFO_SIZE]).unwrap();
        assert!(!desc.is_configured());
        assert_eq!(desc.mode(), None);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            RuleDescriptor::decode(&[1, 0, 0]),
            Err(DescriptorError::Truncated {
                expected: 8,
                actual: 3
            })
        );

        let raw = RawTargetInfo {
            kind: 7,
            gwmask: 0,
        };
        assert_eq!(
            RuleDescriptor::decode(raw.as_bytes()),
            Err(DescriptorError::UnknownKind(7))
        );

        let raw = RawTargetInfo {
            kind: XT_GW_META,
            gwmask: 0,
        };
        assert_eq!(
            RuleDescriptor::decode(raw.as_bytes()),
            Err(DescriptorError::ZeroMask)
        );
    }

    #[test]
    fn test_set_mode_returns_previous() {
        let mut desc = RuleDescriptor::new();
        assert_eq!(desc.set_mode(mask(1)), None);
        assert!(desc.is_configured());
        assert_eq!(desc.set_mode(TargetMode::DisableSession), Some(mask(1)));
        assert_eq!(desc.mode(), Some(TargetMode::DisableSession));
    }

    #[test]
    fn test_same_kind() {
        assert!(mask(1).same_kind(&mask(2)));
        assert!(!mask(1).same_kind(&TargetMode::EnableSession));
        assert!(!TargetMode::DisableSession.same_kind(&TargetMode::EnableSession));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(mask(0xab).to_string(), "mask-tag(0xAB)");
        assert_eq!(TargetMode::DisableSession.to_string(), "disable-session");
    }
}
