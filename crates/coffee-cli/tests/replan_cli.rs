//! Integration tests for `coffee replan`, grounded on `gat-cli/tests/cli.rs`'s
//! `Command::cargo_bin` + tempdir fixture style.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn base_request(prior_plan_id: u64, prior_office: u32) -> serde_json::Value {
    json!({
        "request": {
            "offices": [1],
            "horizon_start": "2026-01-01",
            "horizon_days": 1,
            "initial_inventory_kg": {"1": 0.0},
            "demand": [{
                "office_id": 1,
                "workers": [10],
                "conferences": [0]
            }],
            "is_correction_mode": true,
            "prior_plan_ref": {"plan_id": prior_plan_id}
        },
        "offices": [{
            "id": 1,
            "name": "HQ",
            "capacity_kg": 200.0,
            "daily_loss_fraction": 0.0,
            "active": true
        }],
        "distributors": [{
            "id": 1,
            "name": "Acme",
            "fixed_delivery_cost": {"1": 0.0},
            "lead_time_days": {"1": 0},
            "supply_cap_kg": [1000.0],
            "tier_thresholds_kg": [0.0],
            "tier_prices": [[10.0]]
        }],
        "prior_orders": [{
            "distributor_id": 1,
            "office_id": prior_office,
            "placement_day": 0,
            "tier": 0,
            "qty_kg": 5.0
        }],
        "correction": {}
    })
}

#[test]
fn replan_rejects_prior_plan_from_a_different_office_set() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("request.json");
    // Prior order references office 2, but the request only asks about office 1.
    fs::write(&input_path, base_request(1, 2).to_string()).unwrap();

    Command::cargo_bin("coffee")
        .unwrap()
        .args(["replan", input_path.to_str().unwrap()])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("office set does not match"));
}

#[test]
fn replan_accepts_a_matching_prior_office_set() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("request.json");
    fs::write(&input_path, base_request(1, 1).to_string()).unwrap();

    Command::cargo_bin("coffee")
        .unwrap()
        .args(["replan", input_path.to_str().unwrap()])
        .assert()
        .code(0);
}
