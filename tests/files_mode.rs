//! End-to-end coverage of the file-output comparison policy: the tested
//! program receives input paths as arguments, writes `.out` files next to
//! them, and the harness compares those against `.std` fixtures and cleans
//! the produced files up afterwards.

mod common;

use common::{proctor, FixtureTree};
use predicates::str::contains;

/// A stand-in tested program: copies every input file to its `.out`
/// sibling.
const COPYING_DRIVER: &str = "for f in \"$@\"; do cp \"$f\" \"${f%.in}.out\"; done";

fn driver_program(tree: &FixtureTree) -> String {
    let script = tree.write("driver.sh", COPYING_DRIVER);
    format!("sh {}", script.display())
}

#[test]
fn produced_files_are_compared_and_cleaned_up() {
    let tree = FixtureTree::new();
    let program = driver_program(&tree);
    let input = tree.write("pair-1.in", "alpha\n");
    tree.write("pair-2.in", "beta\n");
    tree.write("pair-1.std", "alpha\n");
    tree.write("pair-2.std", "beta\n");

    proctor()
        .arg("--program")
        .arg(&program)
        .arg("--files")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("** pair-1 PASSED."));

    // Cleanup removed what the driver wrote.
    assert!(!tree.path("pair-1.out").exists());
    assert!(!tree.path("pair-2.out").exists());
}

#[test]
fn keep_flag_retains_produced_files() {
    let tree = FixtureTree::new();
    let program = driver_program(&tree);
    let input = tree.write("solo.in", "alpha\n");
    tree.write("solo.std", "alpha\n");

    proctor()
        .arg("--program")
        .arg(&program)
        .arg("--files")
        .arg("--keep")
        .arg(&input)
        .assert()
        .success();

    assert!(tree.path("solo.out").exists());
    assert_eq!(std::fs::read_to_string(tree.path("solo.out")).unwrap(), "alpha\n");
}

#[test]
fn mismatching_produced_file_fails_the_test() {
    let tree = FixtureTree::new();
    let program = driver_program(&tree);
    let input = tree.write("wrong.in", "alpha\n");
    tree.write("wrong.std", "omega\n");

    proctor()
        .arg("--program")
        .arg(&program)
        .arg("--files")
        .arg(&input)
        .assert()
        .failure()
        .stdout(contains(
            "** wrong FAILED (Output(s) do not all match expected output(s).)",
        ));
}

#[test]
fn driver_stderr_becomes_the_failure_reason() {
    let tree = FixtureTree::new();
    let input = tree.write("broken.in", "alpha\n");
    tree.write("broken.std", "alpha\n");

    proctor()
        .arg("--program")
        .arg("sh -c 'echo cannot open board >&2; exit 3' driver")
        .arg("--files")
        .arg(&input)
        .assert()
        .failure()
        .stdout(contains("** broken FAILED (cannot open board)"));
}
