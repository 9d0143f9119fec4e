extern crate tempfile;
#[macro_use]
extern crate difference;

use std::process::Command;

fn stats_command(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_percolation-stats"));
    cmd.env("RUST_BACKTRACE", "1");
    cmd.current_dir(dir.path());
    cmd
}

fn check(out: std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    println!("{}", stdout);
    println!("{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.status.success());
    stdout
}

fn test_resume_with(total_trials: u64, first_trials: u64) {
    let dir = tempfile::tempdir().expect("Unable to create temp directory");
    check(stats_command(&dir).args(&["--help"]).output().expect("command failed to run"));

    let trials = format!("--trials={}", total_trials);
    let first_max_iter = format!("--max-iter={}", first_trials);
    let common_flags = &["--size=12", "--seed=137", trials.as_str()];

    println!("About to run {} trials in one go", total_trials);
    let big = check(stats_command(&dir)
                    .args(common_flags)
                    .args(&["--save-as=big-guy.yaml"])
                    .output().expect("command failed to run"));
    assert!(big.contains("mean = "));
    assert!(big.contains("95% confidence interval = "));
    // progress reports go to stderr, leaving only the results on stdout
    assert_eq!(big.lines().count(), 3);

    println!("About to run the first {} trials", first_trials);
    let first = check(stats_command(&dir)
                      .args(common_flags)
                      .args(&[first_max_iter.as_str(), "--save-as=small-guy.yaml"])
                      .output().expect("command failed to run"));
    assert!(!first.contains("mean = "));

    println!("About to resume");
    let resumed = check(stats_command(&dir)
                        .args(common_flags)
                        .args(&["--save-as=small-guy.yaml"])
                        .output().expect("command failed to run"));
    let summary = |s: &str| s.lines()
        .filter(|l| l.starts_with("mean") || l.starts_with("std") || l.starts_with("95%"))
        .map(String::from)
        .collect::<Vec<_>>();
    assert_eq!(summary(&big).len(), 3);
    assert_eq!(summary(&big), summary(&resumed));

    println!("About to stop early and then use --resume-from");
    check(stats_command(&dir)
          .args(common_flags)
          .args(&[first_max_iter.as_str(), "--save-as=middle-guy.yaml"])
          .output().expect("command failed to run"));
    let continued = check(stats_command(&dir)
                          .args(&["--resume-from=middle-guy.yaml"])
                          .output().expect("command failed to run"));
    assert_eq!(summary(&big), summary(&continued));

    let s1 = std::fs::read_to_string(dir.path().join("big-guy.yaml")).unwrap();
    let s2 = std::fs::read_to_string(dir.path().join("small-guy.yaml")).unwrap();
    println!("\n\n\nRUNNING WITH {} and {}", total_trials, first_trials);
    assert_diff!(&s1, &s2, "\n", 2); // This corresponds to save_as differing.
}

#[test]
fn test_resume_short() {
    test_resume_with(2, 1);
    test_resume_with(5, 4);
    test_resume_with(30, 1);
    test_resume_with(30, 29);
    test_resume_with(30, 15);
}
