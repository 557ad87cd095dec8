//! End-to-end tests for the `insert` command.

mod common;
use common::prelude::*;

fn sorted_fixture() -> TestFixture {
    TestFixture::new()
        .with_patch("patches.suse/p1.patch", &patches::upstream(&sha(2), None))
        .with_patch("patches.suse/p2.patch", &patches::upstream(&sha(6), None))
        .with_series("\tpatches.suse/p1.patch\n\tpatches.suse/p2.patch\n")
}

#[test]
fn test_insert_prints_preceding_patch() {
    let fixture = sorted_fixture();

    fixture
        .command()
        .args(["insert", &sha(4)])
        .assert()
        .success()
        .stdout("patches.suse/p1.patch\n");
}

#[test]
fn test_insert_after_last_sorted_patch() {
    let fixture = sorted_fixture();

    fixture
        .command()
        .args(["insert", &sha(9), "--top", "patches.suse/p1.patch"])
        .assert()
        .success()
        .stdout("patches.suse/p2.patch\n");
}

#[test]
fn test_insert_before_sorted_patches() {
    let fixture = sorted_fixture();

    // The first sorted patch follows the patches above the sorted section.
    fixture
        .command()
        .args(["insert", &sha(0)])
        .assert()
        .success()
        .stdout("patches.kernel.org/patch-4.14.1\n");
}

#[test]
fn test_insert_into_unsorted_series() {
    let fixture = sorted_fixture()
        .with_series("\tpatches.suse/p2.patch\n\tpatches.suse/p1.patch\n");

    fixture
        .command()
        .args(["insert", &sha(4)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Subseries is not sorted."));
}

#[test]
fn test_insert_unknown_commit() {
    let fixture = sorted_fixture();

    fixture
        .command()
        .args(["insert", &sha(999)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found in git-sort index"));
}

#[test]
fn test_insert_abbreviated_revision_needs_repository() {
    let fixture = sorted_fixture();

    fixture
        .command()
        .args(["insert", "0000004", "--git-dir", "no-such-repo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("0000004"));
}

#[test]
fn test_insert_with_explicit_series() {
    let fixture = sorted_fixture().with_file(
        "other.conf",
        &series_text("\tpatches.suse/p2.patch\n"),
    );

    fixture
        .command()
        .args(["insert", &sha(9), "--series", "other.conf"])
        .assert()
        .success()
        .stdout("patches.suse/p2.patch\n");
}

#[test]
fn test_insert_prints_delta() {
    let fixture = sorted_fixture();

    fixture
        .command()
        .args(["insert", &sha(4), "--delta", "--top", "patches.suse/p1.patch"])
        .assert()
        .success()
        .stdout("1\n");

    fixture
        .command()
        .args(["insert", &sha(4), "--delta", "--top", "patches.suse/p2.patch"])
        .assert()
        .success()
        .stdout("0\n");

    // Nothing applied: counted from before the first patch of the series.
    fixture
        .command()
        .args(["insert", &sha(4), "--delta"])
        .assert()
        .success()
        .stdout("3\n");
}
