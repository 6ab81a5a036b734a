use crate::ops::MetadataOps;
use metadata::acl::{AclEntry, AclTag};
use metadata::{AclError, AclKind, AclRebaseOutcome, MetadataError, PosixAcl};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Probe {
        path: PathBuf,
        is_dir: bool,
    },
    Chown {
        path: PathBuf,
        uid: u32,
        gid: u32,
        follow_symlinks: bool,
    },
    RestoreMode {
        path: PathBuf,
        mode: u32,
    },
    RebaseAcls {
        path: PathBuf,
        is_dir: bool,
        difference: i64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AclFailure {
    Range,
    Write,
    Read,
}

/// Records every primitive call and fails on request.
#[derive(Debug, Default)]
pub(crate) struct RecordingOps {
    calls: Vec<Call>,
    acls_on: HashSet<PathBuf>,
    failing_probe: Option<PathBuf>,
    failing_chown: Option<PathBuf>,
    failing_acl: Option<(PathBuf, AclFailure)>,
}

impl RecordingOps {
    pub(crate) fn with_acls_on(mut self, path: &str) -> Self {
        self.acls_on.insert(PathBuf::from(path));
        self
    }

    pub(crate) fn failing_probe_on(mut self, path: &str) -> Self {
        self.failing_probe = Some(PathBuf::from(path));
        self
    }

    pub(crate) fn failing_chown_on(mut self, path: &str) -> Self {
        self.failing_chown = Some(PathBuf::from(path));
        self
    }

    pub(crate) fn failing_acl_on(mut self, path: &str, failure: AclFailure) -> Self {
        self.failing_acl = Some((PathBuf::from(path), failure));
        self
    }

    pub(crate) fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub(crate) fn probe_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Probe { .. }))
            .count()
    }

    /// Paths passed to `change_owner`, in call order.
    pub(crate) fn chowned(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Chown { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn is_read_only(&self) -> bool {
        self.calls
            .iter()
            .all(|call| matches!(call, Call::Probe { .. }))
    }
}

fn injected(context: &'static str, path: &Path) -> MetadataError {
    MetadataError::new(
        context,
        path,
        io::Error::from(io::ErrorKind::PermissionDenied),
    )
}

impl MetadataOps for RecordingOps {
    fn has_extended_acls(&mut self, path: &Path, is_dir: bool) -> Result<bool, MetadataError> {
        self.calls.push(Call::Probe {
            path: path.to_path_buf(),
            is_dir,
        });
        if self.failing_probe.as_deref() == Some(path) {
            return Err(injected("probe ACL attribute", path));
        }
        Ok(self.acls_on.contains(path))
    }

    fn change_owner(
        &mut self,
        path: &Path,
        uid: u32,
        gid: u32,
        follow_symlinks: bool,
    ) -> Result<(), MetadataError> {
        self.calls.push(Call::Chown {
            path: path.to_path_buf(),
            uid,
            gid,
            follow_symlinks,
        });
        if self.failing_chown.as_deref() == Some(path) {
            return Err(injected("change ownership", path));
        }
        Ok(())
    }

    fn restore_mode(&mut self, path: &Path, mode: u32) -> Result<(), MetadataError> {
        self.calls.push(Call::RestoreMode {
            path: path.to_path_buf(),
            mode,
        });
        Ok(())
    }

    fn rebase_acls(
        &mut self,
        path: &Path,
        is_dir: bool,
        difference: i64,
    ) -> Result<AclRebaseOutcome, AclError> {
        self.calls.push(Call::RebaseAcls {
            path: path.to_path_buf(),
            is_dir,
            difference,
        });

        match &self.failing_acl {
            Some((failing, failure)) if failing == path => Err(match failure {
                AclFailure::Range => AclError::OutOfRange {
                    path: path.to_path_buf(),
                    kind: AclKind::Access,
                    source: PosixAcl::from_entries(vec![AclEntry::new(AclTag::User, 4, 0)])
                        .shifted(-1)
                        .expect_err("underflow"),
                },
                AclFailure::Write => AclError::Write {
                    kind: AclKind::Access,
                    source: injected("write ACL attribute", path),
                },
                AclFailure::Read => AclError::Read {
                    kind: AclKind::Default,
                    source: injected("read ACL attribute", path),
                },
            }),
            _ if self.acls_on.contains(path) => Ok(AclRebaseOutcome::with_rewritten(1)),
            _ => Ok(AclRebaseOutcome::default()),
        }
    }
}
