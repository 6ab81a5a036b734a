/// Settings of one rebase run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebaseOptions {
    destination_base: u32,
    rebase_acls: bool,
    dry_run: bool,
    force: bool,
}

impl RebaseOptions {
    /// Creates options targeting `destination_base` with every flag off.
    #[must_use]
    pub const fn new(destination_base: u32) -> Self {
        Self {
            destination_base,
            rebase_acls: false,
            dry_run: false,
            force: false,
        }
    }

    /// Detects and shifts POSIX ACL qualifiers as well.
    #[must_use]
    pub const fn rebase_acls(mut self, enabled: bool) -> Self {
        self.rebase_acls = enabled;
        self
    }

    /// Scans and analyses only.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Proceeds with overlapping ranges without asking.
    #[must_use]
    pub const fn force(mut self, enabled: bool) -> Self {
        self.force = enabled;
        self
    }

    #[must_use]
    pub const fn destination_base(&self) -> u32 {
        self.destination_base
    }

    #[must_use]
    pub const fn acls_enabled(&self) -> bool {
        self.rebase_acls
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub const fn is_forced(&self) -> bool {
        self.force
    }
}
