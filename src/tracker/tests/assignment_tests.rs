//! Tests for assignment-set diffing.

use crate::tracker::domain::assignment_delta;
use rstest::rstest;

fn logins(values: &[&str]) -> Vec<String> {
    values.iter().map(|login| (*login).to_owned()).collect()
}

#[rstest]
fn delta_closes_missing_and_opens_new_assignees() {
    let delta = assignment_delta(&logins(&["alice", "bob"]), &logins(&["bob", "carol"]));
    assert_eq!(delta.to_close, logins(&["alice"]));
    assert_eq!(delta.to_open, logins(&["carol"]));
}

#[rstest]
fn delta_is_empty_for_identical_sets() {
    let delta = assignment_delta(&logins(&["alice", "bob"]), &logins(&["bob", "alice"]));
    assert!(delta.is_empty());
}

#[rstest]
fn delta_opens_everything_for_fresh_tasks() {
    let delta = assignment_delta(&[], &logins(&["alice", "bob"]));
    assert!(delta.to_close.is_empty());
    assert_eq!(delta.to_open, logins(&["alice", "bob"]));
}

#[rstest]
fn delta_closes_everything_when_report_is_empty() {
    let delta = assignment_delta(&logins(&["alice", "bob"]), &[]);
    assert_eq!(delta.to_close, logins(&["alice", "bob"]));
    assert!(delta.to_open.is_empty());
}

#[rstest]
fn delta_output_is_sorted_for_deterministic_application() {
    let delta = assignment_delta(&logins(&["zoe", "alice"]), &logins(&["mia", "bob"]));
    assert_eq!(delta.to_close, logins(&["alice", "zoe"]));
    assert_eq!(delta.to_open, logins(&["bob", "mia"]));
}
