use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::vec;

use logging::trace_walk;

use crate::entry::WalkEntry;
use crate::error::{WalkError, WalkStage};

/// Options for a [`Walker`].
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    include_root: bool,
    same_file_system: bool,
}

impl WalkBuilder {
    /// Walks `root`, yielding the root itself and staying on its filesystem.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_root: true,
            same_file_system: true,
        }
    }

    /// Whether the root is yielded before its descendants.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Whether entries on another device are skipped together with
    /// everything below them.
    #[must_use]
    pub const fn same_file_system(mut self, enabled: bool) -> Self {
        self.same_file_system = enabled;
        self
    }

    /// Inspects the root and, when it is a directory, lists it.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::start(self)
    }
}

/// Depth-first, pre-order walk over one tree.
#[derive(Debug)]
pub struct Walker {
    pending_root: Option<WalkEntry>,
    frames: Vec<Frame>,
    device: Option<u64>,
    skipped_mounts: u64,
    failed: bool,
}

/// An open directory: its path and the names not yet visited.
#[derive(Debug)]
struct Frame {
    directory: PathBuf,
    names: vec::IntoIter<OsString>,
    depth: usize,
}

impl Frame {
    fn open(directory: PathBuf, depth: usize) -> Result<Self, WalkError> {
        let listing = match fs::read_dir(&directory) {
            Ok(listing) => listing,
            Err(error) => return Err(WalkError::new(WalkStage::OpenDirectory, directory, error)),
        };
        let names = listing
            .map(|dirent| dirent.map(|dirent| dirent.file_name()))
            .collect::<Result<Vec<_>, _>>();
        let mut names = match names {
            Ok(names) => names,
            Err(error) => return Err(WalkError::new(WalkStage::ListDirectory, directory, error)),
        };
        names.sort_unstable();
        trace_walk!(
            "listed {} entries in {}",
            names.len(),
            directory.display()
        );
        Ok(Self {
            directory,
            names: names.into_iter(),
            depth,
        })
    }
}

impl Walker {
    fn start(options: WalkBuilder) -> Result<Self, WalkError> {
        let WalkBuilder {
            root,
            include_root,
            same_file_system,
        } = options;
        let metadata = match fs::symlink_metadata(&root) {
            Ok(metadata) => metadata,
            Err(error) => return Err(WalkError::new(WalkStage::Root, root, error)),
        };

        let device = same_file_system.then(|| device_of(&metadata));
        let mut frames = Vec::new();
        if metadata.is_dir() {
            frames.push(Frame::open(root.clone(), 0)?);
        }
        let pending_root = include_root.then(|| WalkEntry {
            path: root,
            metadata,
            depth: 0,
            is_root: true,
        });

        Ok(Self {
            pending_root,
            frames,
            device,
            skipped_mounts: 0,
            failed: false,
        })
    }

    /// Entries left out so far because they live on another device.
    #[must_use]
    pub const fn skipped_mounts(&self) -> u64 {
        self.skipped_mounts
    }

    fn on_other_device(&self, metadata: &fs::Metadata) -> bool {
        self.device
            .is_some_and(|device| device != device_of(metadata))
    }

    fn advance(&mut self) -> Result<Option<WalkEntry>, WalkError> {
        loop {
            let Some(frame) = self.frames.last_mut() else {
                return Ok(None);
            };
            let Some(name) = frame.names.next() else {
                self.frames.pop();
                continue;
            };

            let path = frame.directory.join(name);
            let depth = frame.depth + 1;
            let metadata = match fs::symlink_metadata(&path) {
                Ok(metadata) => metadata,
                Err(error) => return Err(WalkError::new(WalkStage::Inspect, path, error)),
            };

            if self.on_other_device(&metadata) {
                trace_walk!("not crossing into {}", path.display());
                self.skipped_mounts += 1;
                continue;
            }
            if metadata.is_dir() {
                self.frames.push(Frame::open(path.clone(), depth)?);
            }
            return Ok(Some(WalkEntry {
                path,
                metadata,
                depth,
                is_root: false,
            }));
        }
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(root) = self.pending_root.take() {
            return Some(Ok(root));
        }
        match self.advance() {
            Ok(entry) => entry.map(Ok),
            Err(error) => {
                self.failed = true;
                self.frames.clear();
                Some(Err(error))
            }
        }
    }
}

#[cfg(unix)]
fn device_of(metadata: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.dev()
}

#[cfg(not(unix))]
fn device_of(_metadata: &fs::Metadata) -> u64 {
    0
}

