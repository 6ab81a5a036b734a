//! Encoding of the `system.posix_acl_*` extended attribute value.
//!
//! The kernel stores a POSIX ACL as a little-endian header carrying the
//! format version followed by fixed-size entries:
//!
//! ```text
//! u32 version (2)
//! repeated { u16 tag, u16 permissions, u32 qualifier }
//! ```
//!
//! Only `USER` and `GROUP` entries carry a meaningful qualifier. Every other
//! tag stores [`ACL_UNDEFINED_ID`].

use std::fmt;
use thiserror::Error;

/// Format version written by every supported kernel.
pub const ACL_XATTR_VERSION: u32 = 2;

/// Qualifier stored in entries that do not name a user or group.
pub const ACL_UNDEFINED_ID: u32 = u32::MAX;

const HEADER_LEN: usize = 4;
const ENTRY_LEN: usize = 8;

/// Tag of a single ACL entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AclTag {
    /// Permissions of the owning user.
    UserObj,
    /// Permissions of a named user.
    User,
    /// Permissions of the owning group.
    GroupObj,
    /// Permissions of a named group.
    Group,
    /// Upper bound applied to named entries and the owning group.
    Mask,
    /// Permissions of everyone else.
    Other,
}

impl AclTag {
    /// Decodes a raw tag value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0x01 => Some(Self::UserObj),
            0x02 => Some(Self::User),
            0x04 => Some(Self::GroupObj),
            0x08 => Some(Self::Group),
            0x10 => Some(Self::Mask),
            0x20 => Some(Self::Other),
            _ => None,
        }
    }

    /// Returns the raw tag value.
    #[must_use]
    pub const fn as_raw(self) -> u16 {
        match self {
            Self::UserObj => 0x01,
            Self::User => 0x02,
            Self::GroupObj => 0x04,
            Self::Group => 0x08,
            Self::Mask => 0x10,
            Self::Other => 0x20,
        }
    }

    /// Reports whether entries with this tag carry a user or group id.
    #[must_use]
    pub const fn has_qualifier(self) -> bool {
        matches!(self, Self::User | Self::Group)
    }
}

impl fmt::Display for AclTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserObj => "user_obj",
            Self::User => "user",
            Self::GroupObj => "group_obj",
            Self::Group => "group",
            Self::Mask => "mask",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A single ACL entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AclEntry {
    tag: AclTag,
    permissions: u16,
    qualifier: u32,
}

impl AclEntry {
    /// Creates an entry naming `qualifier`.
    #[must_use]
    pub const fn new(tag: AclTag, permissions: u16, qualifier: u32) -> Self {
        Self {
            tag,
            permissions,
            qualifier,
        }
    }

    /// Creates an entry for a tag without a qualifier.
    #[must_use]
    pub const fn unqualified(tag: AclTag, permissions: u16) -> Self {
        Self::new(tag, permissions, ACL_UNDEFINED_ID)
    }

    #[must_use]
    pub const fn tag(&self) -> AclTag {
        self.tag
    }

    #[must_use]
    pub const fn permissions(&self) -> u16 {
        self.permissions
    }

    #[must_use]
    pub const fn qualifier(&self) -> u32 {
        self.qualifier
    }
}

/// Error returned when an attribute value cannot be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AclDecodeError {
    /// The value is shorter than the header or not a whole number of entries.
    #[error("attribute length {length} is not a valid ACL size")]
    Truncated {
        /// Length of the rejected value in bytes.
        length: usize,
    },
    /// The header names a format version other than [`ACL_XATTR_VERSION`].
    #[error("unsupported ACL format version {version}")]
    UnsupportedVersion {
        /// Version found in the header.
        version: u32,
    },
    /// An entry carries a tag outside the POSIX set.
    #[error("unknown ACL entry tag {tag:#x}")]
    UnknownTag {
        /// Raw tag value.
        tag: u16,
    },
}

/// Error returned when shifting a qualifier would leave the 32-bit id space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{tag} qualifier {qualifier} shifted by {difference} falls outside 0..={max}", max = u32::MAX)]
pub struct QualifierOutOfRange {
    tag: AclTag,
    qualifier: u32,
    difference: i64,
}

impl QualifierOutOfRange {
    #[must_use]
    pub const fn tag(&self) -> AclTag {
        self.tag
    }

    #[must_use]
    pub const fn qualifier(&self) -> u32 {
        self.qualifier
    }

    #[must_use]
    pub const fn difference(&self) -> i64 {
        self.difference
    }
}

/// A decoded POSIX ACL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PosixAcl {
    entries: Vec<AclEntry>,
}

impl PosixAcl {
    #[must_use]
    pub fn from_entries(entries: Vec<AclEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[AclEntry] {
        &self.entries
    }

    /// Iterates over the ids named by `USER` and `GROUP` entries.
    pub fn qualifiers(&self) -> impl Iterator<Item = (AclTag, u32)> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.tag.has_qualifier())
            .map(|entry| (entry.tag, entry.qualifier))
    }

    /// Decodes an attribute value.
    pub fn decode(bytes: &[u8]) -> Result<Self, AclDecodeError> {
        let length = bytes.len();
        if length < HEADER_LEN || (length - HEADER_LEN) % ENTRY_LEN != 0 {
            return Err(AclDecodeError::Truncated { length });
        }

        let (header, body) = bytes.split_at(HEADER_LEN);
        let version = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if version != ACL_XATTR_VERSION {
            return Err(AclDecodeError::UnsupportedVersion { version });
        }

        let entries = body
            .chunks_exact(ENTRY_LEN)
            .map(|chunk| {
                let raw_tag = u16::from_le_bytes([chunk[0], chunk[1]]);
                let tag = AclTag::from_raw(raw_tag)
                    .ok_or(AclDecodeError::UnknownTag { tag: raw_tag })?;
                let permissions = u16::from_le_bytes([chunk[2], chunk[3]]);
                let qualifier = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
                Ok(AclEntry::new(tag, permissions, qualifier))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Encodes the ACL into an attribute value.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.entries.len() * ENTRY_LEN);
        bytes.extend_from_slice(&ACL_XATTR_VERSION.to_le_bytes());
        for entry in &self.entries {
            bytes.extend_from_slice(&entry.tag.as_raw().to_le_bytes());
            bytes.extend_from_slice(&entry.permissions.to_le_bytes());
            bytes.extend_from_slice(&entry.qualifier.to_le_bytes());
        }
        bytes
    }

    /// Returns a copy with every `USER` and `GROUP` qualifier moved by
    /// `difference`, or `None` when no qualifier changes.
    ///
    /// `self` is never modified. The first qualifier whose shifted value
    /// leaves `0..=u32::MAX` is reported and no copy is produced.
    pub fn shifted(&self, difference: i64) -> Result<Option<Self>, QualifierOutOfRange> {
        let mut changed = false;
        let mut entries = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            if !entry.tag.has_qualifier() {
                entries.push(*entry);
                continue;
            }

            let qualifier = shift_qualifier(entry.qualifier, difference).ok_or(
                QualifierOutOfRange {
                    tag: entry.tag,
                    qualifier: entry.qualifier,
                    difference,
                },
            )?;
            changed |= qualifier != entry.qualifier;
            entries.push(AclEntry::new(entry.tag, entry.permissions, qualifier));
        }

        Ok(changed.then(|| Self { entries }))
    }
}

fn shift_qualifier(qualifier: u32, difference: i64) -> Option<u32> {
    i64::from(qualifier)
        .checked_add(difference)
        .and_then(|shifted| u32::try_from(shifted).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PosixAcl {
        PosixAcl::from_entries(vec![
            AclEntry::unqualified(AclTag::UserObj, 0o6),
            AclEntry::new(AclTag::User, 0o4, 1001),
            AclEntry::unqualified(AclTag::GroupObj, 0o4),
            AclEntry::new(AclTag::Group, 0o5, 1002),
            AclEntry::unqualified(AclTag::Mask, 0o7),
            AclEntry::unqualified(AclTag::Other, 0o0),
        ])
    }

    #[test]
    fn decode_reads_kernel_layout() {
        let bytes = [
            0x02, 0x00, 0x00, 0x00, // version
            0x01, 0x00, 0x06, 0x00, 0xff, 0xff, 0xff, 0xff, // user_obj rw-
            0x02, 0x00, 0x04, 0x00, 0xe9, 0x03, 0x00, 0x00, // user:1001 r--
            0x20, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, // other ---
        ];
        let acl = PosixAcl::decode(&bytes).expect("decode");
        assert_eq!(
            acl.entries(),
            &[
                AclEntry::unqualified(AclTag::UserObj, 0o6),
                AclEntry::new(AclTag::User, 0o4, 1001),
                AclEntry::unqualified(AclTag::Other, 0),
            ]
        );
        assert_eq!(acl.encode(), bytes);
    }

    #[test]
    fn decode_rejects_partial_entries() {
        assert_eq!(
            PosixAcl::decode(&[0x02, 0x00]),
            Err(AclDecodeError::Truncated { length: 2 })
        );
        assert_eq!(
            PosixAcl::decode(&[0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06]),
            Err(AclDecodeError::Truncated { length: 7 })
        );
    }

    #[test]
    fn decode_rejects_foreign_version_and_tags() {
        assert_eq!(
            PosixAcl::decode(&[0x01, 0x00, 0x00, 0x00]),
            Err(AclDecodeError::UnsupportedVersion { version: 1 })
        );

        let mut bytes = ACL_XATTR_VERSION.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(
            PosixAcl::decode(&bytes),
            Err(AclDecodeError::UnknownTag { tag: 0x40 })
        );
    }

    #[test]
    fn shifted_moves_only_named_entries() {
        let acl = sample();
        let shifted = acl.shifted(1000).expect("in range").expect("changed");

        assert_eq!(
            shifted.qualifiers().collect::<Vec<_>>(),
            vec![(AclTag::User, 2001), (AclTag::Group, 2002)]
        );
        for (before, after) in acl.entries().iter().zip(shifted.entries()) {
            assert_eq!(before.tag(), after.tag());
            assert_eq!(before.permissions(), after.permissions());
            if !before.tag().has_qualifier() {
                assert_eq!(after.qualifier(), ACL_UNDEFINED_ID);
            }
        }
    }

    #[test]
    fn shifted_reports_no_change_without_named_entries() {
        let minimal = PosixAcl::from_entries(vec![
            AclEntry::unqualified(AclTag::UserObj, 0o7),
            AclEntry::unqualified(AclTag::GroupObj, 0o5),
            AclEntry::unqualified(AclTag::Other, 0o5),
        ]);
        assert_eq!(minimal.shifted(-500), Ok(None));
        assert_eq!(sample().shifted(0), Ok(None));
    }

    #[test]
    fn shifted_rejects_negative_result() {
        let error = sample().shifted(-1002).expect_err("user 1001 underflows");
        assert_eq!(error.tag(), AclTag::User);
        assert_eq!(error.qualifier(), 1001);
        assert_eq!(error.difference(), -1002);
    }

    #[test]
    fn shifted_rejects_overflow_past_u32() {
        let acl = PosixAcl::from_entries(vec![
            AclEntry::new(AclTag::User, 0o4, 10),
            AclEntry::new(AclTag::Group, 0o4, u32::MAX - 5),
        ]);
        let error = acl.shifted(6).expect_err("group overflows");
        assert_eq!(error.tag(), AclTag::Group);
        assert_eq!(error.qualifier(), u32::MAX - 5);

        let edge = acl.shifted(5).expect("upper bound is inclusive");
        assert!(edge.is_some());
    }

    #[test]
    fn shifted_to_zero_is_allowed() {
        let acl = PosixAcl::from_entries(vec![AclEntry::new(AclTag::User, 0o4, 1000)]);
        let shifted = acl.shifted(-1000).expect("zero").expect("changed");
        assert_eq!(shifted.entries()[0].qualifier(), 0);
    }
}
