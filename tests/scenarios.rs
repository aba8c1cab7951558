//! Observable behavior every strategy must share.

mod common;

use std::collections::BTreeMap;
use std::fs;

use common::{engines, request};
use stage_sync::{AbsolutePath, ErrorCategory, SyncRequest};
use test_support::{Node, SyncFixture, files, snapshot};

#[test]
fn empty_source_into_empty_destination() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture.create_destination();

        engine.sync(request(&fixture, &[])).unwrap();

        assert!(snapshot(fixture.destination()).is_empty(), "{}", engine.name());
    }
}

#[test]
fn populated_source_into_empty_destination() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture
            .write_source("one.txt", b"1")
            .write_source("two/three.txt", b"3")
            .create_destination();

        engine.sync(request(&fixture, &[])).unwrap();

        assert_eq!(
            snapshot(fixture.destination()),
            files([("one.txt", &b"1"[..]), ("two/three.txt", &b"3"[..])]),
            "{}",
            engine.name()
        );
    }
}

#[test]
fn empty_source_clears_destination() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture
            .write_destination("one.txt", b"1")
            .write_destination("two/three.txt", b"3");

        engine.sync(request(&fixture, &[])).unwrap();

        assert!(snapshot(fixture.destination()).is_empty(), "{}", engine.name());
    }
}

#[test]
fn extraneous_entries_are_removed() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture
            .write_source("one.txt", b"1")
            .write_source("two/three.txt", b"3")
            .write_destination("two/three.txt", b"stale")
            .write_destination("four/five.txt", b"5");

        engine.sync(request(&fixture, &[])).unwrap();

        assert_eq!(
            snapshot(fixture.destination()),
            files([("one.txt", &b"1"[..]), ("two/three.txt", &b"3"[..])]),
            "{}",
            engine.name()
        );
    }
}

#[test]
fn missing_destination_is_created() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture.write_source("a.txt", b"a");

        engine.sync(request(&fixture, &[])).unwrap();

        assert_eq!(snapshot(fixture.destination()), snapshot(fixture.source()));
    }
}

#[test]
fn excluded_entries_are_neither_copied_nor_deleted() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture
            .write_source("src/main.rs", b"fn main() {}")
            .write_source("node_modules/pkg/index.js", b"source copy")
            .write_destination("node_modules/local/cache.js", b"destination copy")
            .write_destination("stale.txt", b"x");

        engine
            .sync(request(&fixture, &["./node_modules/"]))
            .unwrap();

        let expected = files([
            ("src/main.rs", &b"fn main() {}"[..]),
            ("node_modules/local/cache.js", &b"destination copy"[..]),
        ]);
        assert_eq!(snapshot(fixture.destination()), expected, "{}", engine.name());
    }
}

#[test]
fn nested_exclusion_only_hides_that_path() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture
            .write_source("build/out/artifact", b"x")
            .write_source("build/keep.txt", b"k")
            .write_source("other/build/out/file", b"y");

        engine.sync(request(&fixture, &[r"build\out"])).unwrap();

        let destination = snapshot(fixture.destination());
        assert!(!destination.contains_key("build/out"), "{}", engine.name());
        assert!(destination.contains_key("build/keep.txt"));
        assert!(destination.contains_key("other/build/out/file"));
    }
}

#[test]
fn rerun_is_idempotent() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture
            .write_source("a/b/c.txt", b"c")
            .write_source("d.txt", b"d")
            .write_destination("old/e.txt", b"e");

        engine.sync(request(&fixture, &[])).unwrap();
        let first: BTreeMap<_, _> = snapshot(fixture.destination());
        engine.sync(request(&fixture, &[])).unwrap();

        assert_eq!(snapshot(fixture.destination()), first, "{}", engine.name());
        assert_eq!(first, snapshot(fixture.source()));
    }
}

#[test]
fn source_nested_in_destination_is_not_deleted() {
    for engine in engines() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("workspace");
        let source = destination.join("active");
        test_support::write_file(&source, "live.txt", b"live");
        test_support::write_file(&destination, "stale.txt", b"stale");

        engine
            .sync(SyncRequest::new(
                AbsolutePath::new(&source).unwrap(),
                AbsolutePath::new(&destination).unwrap(),
            ))
            .unwrap();

        assert_eq!(fs::read(source.join("live.txt")).unwrap(), b"live", "{}", engine.name());
        assert_eq!(fs::read(destination.join("live.txt")).unwrap(), b"live");
        assert!(!destination.join("stale.txt").exists());
    }
}

#[test]
fn missing_source_is_reported_for_every_strategy() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        fs::remove_dir(fixture.source()).unwrap();

        let error = engine.sync(request(&fixture, &[])).unwrap_err();

        assert_eq!(error.category(), ErrorCategory::SourceNotFound, "{}", engine.name());
        assert!(!fixture.destination().exists());
    }
}

#[test]
fn identical_roots_are_rejected_for_every_strategy() {
    for engine in engines() {
        let fixture = SyncFixture::new();
        let root = AbsolutePath::new(fixture.source()).unwrap();

        let error = engine
            .sync(SyncRequest::new(root.clone(), root))
            .unwrap_err();

        assert_eq!(error.category(), ErrorCategory::InvalidRequest, "{}", engine.name());
    }
}

#[cfg(unix)]
#[test]
fn symlinks_are_mirrored_as_links() {
    use std::os::unix::fs::symlink;

    for engine in engines() {
        let fixture = SyncFixture::new();
        fixture.write_source("real/file.txt", b"x");
        symlink("real", fixture.source().join("dir_link")).unwrap();
        symlink("does-not-exist", fixture.source().join("dangling")).unwrap();

        engine.sync(request(&fixture, &[])).unwrap();

        let destination = snapshot(fixture.destination());
        assert_eq!(
            destination.get("dir_link"),
            Some(&Node::Symlink("real".into())),
            "{}",
            engine.name()
        );
        assert_eq!(
            destination.get("dangling"),
            Some(&Node::Symlink("does-not-exist".into()))
        );
        assert!(!destination.contains_key("dir_link/file.txt"));
    }
}

#[test]
fn backslash_and_slash_exclusions_behave_identically() {
    for engine in engines() {
        let mut outcomes = Vec::new();
        for pattern in [r"cache\tmp", "cache/tmp"] {
            let fixture = SyncFixture::new();
            fixture
                .write_source("cache/tmp/incoming.bin", b"new")
                .write_source("cache/kept.txt", b"k")
                .write_destination("cache/tmp/local.bin", b"local")
                .write_destination("cache/stale.txt", b"s");

            engine.sync(request(&fixture, &[pattern])).unwrap();

            outcomes.push(snapshot(fixture.destination()));
        }

        assert_eq!(outcomes[0], outcomes[1], "{}", engine.name());
        assert_eq!(
            outcomes[0],
            files([
                ("cache/kept.txt", &b"k"[..]),
                ("cache/tmp/local.bin", &b"local"[..]),
            ]),
            "{}",
            engine.name()
        );
    }
}
