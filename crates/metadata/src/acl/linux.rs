use super::{AclError, AclKind, AclRebaseOutcome, PosixAcl};
use crate::MetadataError;
use logging::trace_acl;
use rustix::io::Errno;
use std::io;
use std::path::Path;

/// Reports whether `path` carries an access ACL or, for directories, a
/// default ACL.
///
/// Only the attribute names are probed. A missing attribute or a filesystem
/// without ACL support counts as absent; any other failure is returned.
pub fn has_extended_acls(path: &Path, is_dir: bool) -> Result<bool, MetadataError> {
    if probe(path, AclKind::Access)? {
        return Ok(true);
    }
    if is_dir {
        return probe(path, AclKind::Default);
    }
    Ok(false)
}

fn probe(path: &Path, kind: AclKind) -> Result<bool, MetadataError> {
    let mut empty = [0u8; 0];
    match rustix::fs::lgetxattr(path, kind.xattr_name(), &mut empty[..]) {
        Ok(_) | Err(Errno::RANGE) => Ok(true),
        Err(Errno::NODATA | Errno::NOTSUP) => Ok(false),
        Err(errno) => Err(MetadataError::new(
            "probe ACL attribute",
            path,
            io::Error::from(errno),
        )),
    }
}

/// Reads and decodes one ACL of `path`. Returns `None` when it is not set.
pub fn read_acl(path: &Path, kind: AclKind) -> Result<Option<PosixAcl>, AclError> {
    let value = match xattr::get(path, kind.xattr_name()) {
        Ok(value) => value,
        Err(error) if is_unsupported(&error) => None,
        Err(error) => {
            return Err(AclError::Read {
                kind,
                source: MetadataError::new("read ACL attribute", path, error),
            });
        }
    };

    value
        .map(|bytes| {
            PosixAcl::decode(&bytes).map_err(|source| AclError::Malformed {
                path: path.to_path_buf(),
                kind,
                source,
            })
        })
        .transpose()
}

/// Encodes `acl` and stores it as the `kind` ACL of `path`.
pub fn write_acl(path: &Path, kind: AclKind, acl: &PosixAcl) -> Result<(), AclError> {
    xattr::set(path, kind.xattr_name(), &acl.encode()).map_err(|error| AclError::Write {
        kind,
        source: MetadataError::new("write ACL attribute", path, error),
    })
}

/// Shifts every named user and group qualifier in the ACLs of `path`.
///
/// Directories have their default ACL handled before the access ACL. Each
/// ACL is validated as a whole before anything is written, and an ACL whose
/// qualifiers are all unchanged is not written at all.
pub fn rebase_acls(
    path: &Path,
    is_dir: bool,
    difference: i64,
) -> Result<AclRebaseOutcome, AclError> {
    let mut outcome = AclRebaseOutcome::default();

    for &kind in AclKind::for_entry(is_dir) {
        let Some(acl) = read_acl(path, kind)? else {
            continue;
        };

        let shifted = acl
            .shifted(difference)
            .map_err(|source| AclError::OutOfRange {
                path: path.to_path_buf(),
                kind,
                source,
            })?;

        if let Some(shifted) = shifted {
            trace_acl!("rewriting {} ACL of {}", kind, path.display());
            write_acl(path, kind, &shifted)?;
            outcome.record_rewrite();
        }
    }

    Ok(outcome)
}

fn is_unsupported(error: &io::Error) -> bool {
    Errno::from_io_error(error) == Some(Errno::NOTSUP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::{AclEntry, AclTag};
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    fn named_acl(user: u32, group: u32) -> PosixAcl {
        PosixAcl::from_entries(vec![
            AclEntry::unqualified(AclTag::UserObj, 0o6),
            AclEntry::new(AclTag::User, 0o4, user),
            AclEntry::unqualified(AclTag::GroupObj, 0o4),
            AclEntry::new(AclTag::Group, 0o4, group),
            AclEntry::unqualified(AclTag::Mask, 0o4),
            AclEntry::unqualified(AclTag::Other, 0o0),
        ])
    }

    /// Stores `acl` on `path`, returning `false` when the filesystem
    /// refuses ACLs altogether.
    fn try_install(path: &Path, kind: AclKind, acl: &PosixAcl) -> bool {
        match write_acl(path, kind, acl) {
            Ok(()) => true,
            Err(AclError::Write { source, .. }) if is_unsupported(source.source_error()) => false,
            Err(error) => panic!("install ACL: {error}"),
        }
    }

    #[test]
    fn plain_file_has_no_extended_acls() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("plain");
        fs::write(&file, b"data").expect("write");

        assert!(!has_extended_acls(&file, false).expect("probe"));
        assert!(!has_extended_acls(temp.path(), true).expect("probe"));
        assert_eq!(read_acl(&file, AclKind::Access).expect("read"), None);
    }

    #[test]
    fn probe_does_not_follow_symlinks() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("target");
        fs::write(&target, b"data").expect("write");
        if !try_install(&target, AclKind::Access, &named_acl(1001, 1002)) {
            return;
        }
        let link = temp.path().join("link");
        symlink(&target, &link).expect("symlink");

        assert!(has_extended_acls(&target, false).expect("probe target"));
        assert!(!has_extended_acls(&link, false).expect("probe link"));
    }

    #[test]
    fn probe_reports_missing_path() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("missing");
        let error = has_extended_acls(&missing, false).expect_err("missing");
        assert_eq!(error.context(), "probe ACL attribute");
        assert_eq!(error.source_error().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn default_acl_is_only_probed_on_directories() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).expect("mkdir");
        if !try_install(&dir, AclKind::Default, &named_acl(1001, 1002)) {
            return;
        }

        assert!(has_extended_acls(&dir, true).expect("probe as directory"));
        assert!(!has_extended_acls(&dir, false).expect("probe as file"));
    }

    #[test]
    fn rebase_shifts_named_qualifiers() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("file");
        fs::write(&file, b"data").expect("write");
        if !try_install(&file, AclKind::Access, &named_acl(1001, 1002)) {
            return;
        }

        let outcome = rebase_acls(&file, false, 1000).expect("rebase");
        assert_eq!(outcome.rewritten(), 1);

        let stored = read_acl(&file, AclKind::Access)
            .expect("read")
            .expect("acl present");
        assert_eq!(
            stored.qualifiers().collect::<Vec<_>>(),
            vec![(AclTag::User, 2001), (AclTag::Group, 2002)]
        );
    }

    #[test]
    fn rebase_handles_default_and_access_on_directories() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).expect("mkdir");
        if !try_install(&dir, AclKind::Default, &named_acl(500, 600)) {
            return;
        }
        assert!(try_install(&dir, AclKind::Access, &named_acl(700, 800)));

        let outcome = rebase_acls(&dir, true, -100).expect("rebase");
        assert_eq!(outcome.rewritten(), 2);

        let default = read_acl(&dir, AclKind::Default).expect("read").expect("default");
        let access = read_acl(&dir, AclKind::Access).expect("read").expect("access");
        assert_eq!(
            default.qualifiers().collect::<Vec<_>>(),
            vec![(AclTag::User, 400), (AclTag::Group, 500)]
        );
        assert_eq!(
            access.qualifiers().collect::<Vec<_>>(),
            vec![(AclTag::User, 600), (AclTag::Group, 700)]
        );
    }

    #[test]
    fn rebase_out_of_range_leaves_acl_unchanged() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("file");
        fs::write(&file, b"data").expect("write");
        if !try_install(&file, AclKind::Access, &named_acl(5000, 10)) {
            return;
        }
        let before = read_acl(&file, AclKind::Access).expect("read").expect("acl");

        let error = rebase_acls(&file, false, -20).expect_err("group 10 underflows");
        match &error {
            AclError::OutOfRange { path, kind, source } => {
                assert_eq!(path, &file);
                assert_eq!(*kind, AclKind::Access);
                assert_eq!(source.tag(), AclTag::Group);
                assert_eq!(source.qualifier(), 10);
            }
            other => panic!("unexpected error: {other}"),
        }

        let after = read_acl(&file, AclKind::Access).expect("read").expect("acl");
        assert_eq!(before, after);
    }

    #[test]
    fn rebase_without_acls_writes_nothing() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("file");
        fs::write(&file, b"data").expect("write");

        let outcome = rebase_acls(&file, false, 1000).expect("rebase");
        assert!(!outcome.changed());
    }
}
