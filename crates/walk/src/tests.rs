use super::*;
use std::fs;
use std::path::Path;
use test_support::{TmpfsMount, TreeFixture, running_as_root};

/// `(depth, path relative to the root)` for every entry, in walk order.
fn visit(fixture: &TreeFixture, builder: WalkBuilder) -> Vec<(usize, String)> {
    builder
        .build()
        .expect("walker")
        .map(|entry| {
            let entry = entry.expect("entry");
            let relative = entry
                .path()
                .strip_prefix(fixture.root())
                .expect("inside root")
                .to_string_lossy()
                .into_owned();
            (entry.depth(), relative)
        })
        .collect()
}

fn named(items: &[(usize, &str)]) -> Vec<(usize, String)> {
    items
        .iter()
        .map(|(depth, path)| (*depth, (*path).to_owned()))
        .collect()
}

#[test]
fn directories_are_entered_right_after_they_are_yielded() {
    let fixture = TreeFixture::new().expect("fixture");
    fixture.file("srv/www/index.html", b"<p/>").expect("file");
    fixture.file("srv/log", b"").expect("file");
    fixture.dir("home").expect("dir");
    fixture.file("boot.cfg", b"").expect("file");

    let order = visit(&fixture, WalkBuilder::new(fixture.root()));
    assert_eq!(
        order,
        named(&[
            (0, ""),
            (1, "boot.cfg"),
            (1, "home"),
            (1, "srv"),
            (2, "srv/log"),
            (2, "srv/www"),
            (3, "srv/www/index.html"),
        ])
    );
}

#[test]
fn root_can_be_left_out() {
    let fixture = TreeFixture::new().expect("fixture");
    fixture.file("only", b"").expect("file");

    let order = visit(&fixture, WalkBuilder::new(fixture.root()).include_root(false));
    assert_eq!(order, named(&[(1, "only")]));
}

#[test]
fn root_entry_is_flagged() {
    let fixture = TreeFixture::new().expect("fixture");
    fixture.file("x", b"").expect("file");

    let flags: Vec<bool> = WalkBuilder::new(fixture.root())
        .build()
        .expect("walker")
        .map(|entry| entry.expect("entry").is_root())
        .collect();
    assert_eq!(flags, [true, false]);
}

#[test]
fn symlinks_are_reported_not_followed() {
    let fixture = TreeFixture::new().expect("fixture");
    fixture.file("data/blob", b"0123").expect("file");
    fixture.symlink("alias", "data").expect("symlink");
    fixture.symlink("dangling", "/no/such/target").expect("symlink");

    let entries: Vec<WalkEntry> = WalkBuilder::new(fixture.root())
        .include_root(false)
        .build()
        .expect("walker")
        .collect::<Result<_, _>>()
        .expect("entries");

    let alias = entries
        .iter()
        .find(|entry| entry.path().ends_with("alias"))
        .expect("alias listed");
    assert!(alias.metadata().file_type().is_symlink());
    assert!(entries.iter().any(|entry| entry.path().ends_with("dangling")));
    assert_eq!(entries.len(), 4);
}

#[test]
fn symlink_root_is_yielded_as_a_link() {
    let fixture = TreeFixture::new().expect("fixture");
    fixture.dir("real").expect("dir");
    fixture.file("real/inside", b"").expect("file");
    let link = fixture.symlink("link", "real").expect("symlink");

    let entries: Vec<WalkEntry> = WalkBuilder::new(&link)
        .build()
        .expect("walker")
        .collect::<Result<_, _>>()
        .expect("entries");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].metadata().file_type().is_symlink());
}

#[test]
fn file_root_yields_only_itself() {
    let fixture = TreeFixture::new().expect("fixture");
    let file = fixture.file("lone", b"1").expect("file");

    let mut walker = WalkBuilder::new(&file).build().expect("walker");
    let entry = walker.next().expect("root").expect("entry");
    let (path, metadata) = entry.into_parts();
    assert_eq!(path, file);
    assert!(metadata.is_file());
    assert!(walker.next().is_none());
}

#[test]
fn special_files_are_listed() {
    let fixture = TreeFixture::new().expect("fixture");
    fixture.fifo("pipe").expect("fifo");

    let order = visit(&fixture, WalkBuilder::new(fixture.root()).include_root(false));
    assert_eq!(order, named(&[(1, "pipe")]));
}

#[test]
fn missing_root_fails_at_build() {
    let fixture = TreeFixture::new().expect("fixture");
    let missing = fixture.path("absent");

    let error = WalkBuilder::new(&missing).build().expect_err("missing root");
    assert_eq!(error.stage(), WalkStage::Root);
    assert_eq!(error.path(), missing.as_path());
    assert_eq!(error.io_error().kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn single_device_tree_skips_nothing() {
    let fixture = TreeFixture::new().expect("fixture");
    fixture.file("a/b", b"").expect("file");

    let mut walker = WalkBuilder::new(fixture.root()).build().expect("walker");
    assert_eq!(walker.by_ref().count(), 3);
    assert_eq!(walker.skipped_mounts(), 0);
}

#[test]
fn other_filesystems_are_left_out() {
    if !running_as_root() {
        return;
    }

    let fixture = TreeFixture::new().expect("fixture");
    fixture.file("keep", b"").expect("file");
    let target = fixture.dir("mnt").expect("dir");
    let Some(_mount) = TmpfsMount::new(&target) else {
        return;
    };
    fs::write(target.join("inner"), b"x").expect("write on tmpfs");

    let mut walker = WalkBuilder::new(fixture.root()).build().expect("walker");
    let seen: Vec<_> = walker
        .by_ref()
        .map(|entry| entry.expect("entry").into_parts().0)
        .collect();
    assert_eq!(seen, [fixture.root().to_path_buf(), fixture.path("keep")]);
    assert_eq!(walker.skipped_mounts(), 1);

    let crossing = visit(
        &fixture,
        WalkBuilder::new(fixture.root())
            .include_root(false)
            .same_file_system(false),
    );
    assert_eq!(crossing, named(&[(1, "keep"), (1, "mnt"), (2, "mnt/inner")]));
}

#[cfg(unix)]
#[test]
fn unreadable_directory_stops_the_walk() {
    use std::os::unix::fs::PermissionsExt;

    if running_as_root() {
        return;
    }

    let fixture = TreeFixture::new().expect("fixture");
    let locked = fixture.dir("locked").expect("dir");
    fixture.file("zz", b"").expect("file");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

    let mut walker = WalkBuilder::new(fixture.root()).build().expect("walker");
    assert!(walker.next().expect("root").expect("entry").is_root());
    let error = walker.next().expect("item").expect_err("unreadable");
    assert_eq!(error.stage(), WalkStage::OpenDirectory);
    assert_eq!(error.path(), Path::new(&locked));
    assert!(walker.next().is_none(), "walk ends after the first error");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");
}
