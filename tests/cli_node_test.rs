//! Integration tests for node commands via CLI.
//!
//! - `gb node add/show/update/delete/move/list` all work
//! - Ranks within a category stay dense after every change

mod common;

use common::TestEnv;
use predicates::prelude::*;
use serde_json::Value;

fn orders(v: &Value) -> Vec<(String, u64)> {
    v["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| {
            (
                n["id"].as_str().unwrap().to_string(),
                n["order"].as_u64().unwrap(),
            )
        })
        .collect()
}

// === Node Add Tests ===

#[test]
fn test_node_add_defaults() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");

    env.gb()
        .args(["node", "add", &cat])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"New Item\""))
        .stdout(predicate::str::contains("\"order\":0"))
        .stdout(predicate::str::contains(format!("\"categoryId\":\"{}\"", cat)));
}

#[test]
fn test_node_add_appends() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");
    env.add_node(&cat, "First");

    let v = env.json(&["node", "add", &cat, "--title", "Second"]);
    assert_eq!(v["node"]["order"], 1);
    assert_eq!(v["node"]["title"], "Second");
}

#[test]
fn test_node_add_unknown_category() {
    let env = TestEnv::init();

    env.gb()
        .args(["node", "add", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entity not found"));
}

// === Node Show Tests ===

#[test]
fn test_node_show_human() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");
    let a = env.add_node(&cat, "Forces");
    let b = env.add_node(&cat, "Energy");
    env.json(&["edge", "add", &a, &b]);

    env.gb()
        .args(["node", "show", &a, "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forces"))
        .stdout(predicate::str::contains("category: Mechanics"))
        .stdout(predicate::str::contains(format!("-> {}", b)));
}

#[test]
fn test_node_show_unknown() {
    let env = TestEnv::init();

    env.gb()
        .args(["node", "show", "missing"])
        .assert()
        .failure();
}

// === Node Update Tests ===

#[test]
fn test_node_update_title_and_position() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");
    let id = env.add_node(&cat, "Old");

    env.gb()
        .args(["node", "update", &id, "--title", "New", "--x", "-10.5", "--y", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"changed\":true"));

    let v = env.json(&["node", "show", &id]);
    assert_eq!(v["node"]["title"], "New");
    assert_eq!(v["node"]["position"]["x"], -10.5);
    assert_eq!(v["node"]["position"]["y"], 4.0);

    env.json(&["node", "update", &id, "--clear-position"]);
    let v = env.json(&["node", "show", &id]);
    assert!(v["node"]["position"].is_null());
}

#[test]
fn test_node_update_requires_a_field() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");
    let id = env.add_node(&cat, "Old");

    env.gb()
        .args(["node", "update", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to update"));
}

#[test]
fn test_node_update_unknown_is_noop() {
    let env = TestEnv::init();

    env.gb()
        .args(["node", "update", "missing", "--title", "X"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"changed\":false"));
}

// === Node Delete Tests ===

#[test]
fn test_node_delete_renumbers_and_drops_edges() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");
    let a = env.add_node(&cat, "A");
    let b = env.add_node(&cat, "B");
    let c = env.add_node(&cat, "C");
    env.json(&["edge", "add", &a, &b]);
    env.json(&["edge", "add", &b, &c]);
    env.json(&["edge", "add", &a, &c]);

    env.gb().args(["node", "delete", &b]).assert().success();

    let v = env.json(&["node", "list", "--category", &cat]);
    assert_eq!(orders(&v), vec![(a.clone(), 0), (c.clone(), 1)]);

    let v = env.json(&["edge", "list"]);
    assert_eq!(v["count"], 1);
    assert_eq!(v["edges"][0]["source"], a.as_str());
    assert_eq!(v["edges"][0]["target"], c.as_str());
}

// === Node Move Tests ===

#[test]
fn test_node_move_within_category() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");
    let a = env.add_node(&cat, "A");
    let b = env.add_node(&cat, "B");
    let c = env.add_node(&cat, "C");

    env.gb().args(["node", "move", &c, &cat, "0"]).assert().success();

    let v = env.json(&["node", "list", "--category", &cat]);
    assert_eq!(orders(&v), vec![(c, 0), (a, 1), (b, 2)]);
}

#[test]
fn test_node_move_across_categories() {
    let env = TestEnv::init();
    let from = env.add_category("From");
    let to = env.add_category("To");
    let a = env.add_node(&from, "A");
    let b = env.add_node(&from, "B");
    let x = env.add_node(&to, "X");

    env.gb().args(["node", "move", &a, &to, "5"]).assert().success();

    let v = env.json(&["node", "list", "--category", &from]);
    assert_eq!(orders(&v), vec![(b, 0)]);

    let v = env.json(&["node", "list", "--category", &to]);
    assert_eq!(orders(&v), vec![(x, 0), (a.clone(), 1)]);
    assert_eq!(v["nodes"][1]["categoryId"], to.as_str());
}

#[test]
fn test_node_move_unknown_category() {
    let env = TestEnv::init();
    let cat = env.add_category("Mechanics");
    let a = env.add_node(&cat, "A");

    env.gb()
        .args(["node", "move", &a, "missing", "0"])
        .assert()
        .failure();
}

// === Node List Tests ===

#[test]
fn test_node_list_follows_category_order() {
    let env = TestEnv::init();
    let second = env.add_category("Second");
    let first = env.add_category("First");
    let b = env.add_node(&second, "B");
    let a = env.add_node(&first, "A");

    let v = env.json(&["node", "list"]);
    assert_eq!(v["count"], 2);
    assert_eq!(v["nodes"][0]["id"], a.as_str());
    assert_eq!(v["nodes"][1]["id"], b.as_str());
}

#[test]
fn test_node_list_empty_human() {
    let env = TestEnv::init();

    env.gb()
        .args(["node", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No nodes."));
}
