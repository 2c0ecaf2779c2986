use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

fn gallery() -> Command {
    Command::cargo_bin("light-gallery").expect("binary exists")
}

#[test]
fn headless_run_prints_the_animated_state() {
    let mut cmd = gallery();
    cmd.args(["--headless", "--frames", "2", "--time-step", "2.5"]);
    cmd.assert()
        .success()
        .stdout(contains("Rendered 2 headless frame(s)"))
        .stdout(contains("Last frame: 4 objects, 6 lights, 0 helper segments"))
        .stdout(contains(" - cube pos=(0.00, 0.00, 0.00) rot=(0.250, 0.500, 0.000)"))
        .stdout(contains(" - plane pos=(0.00, -0.65, 0.00)"));
}

#[test]
fn set_values_are_clamped_before_reaching_lights() {
    let mut cmd = gallery();
    cmd.args([
        "--headless",
        "--set",
        "spotIntensity=10",
        "--set",
        "ambientVisible=false",
    ]);
    cmd.assert()
        .success()
        .stdout(contains(" spotIntensity = 8.000"))
        .stdout(contains(" - spot visible=true intensity=8.000"))
        .stdout(contains(" - ambient visible=false intensity=0.300"));
}

#[test]
fn shown_helpers_are_drawn() {
    let mut cmd = gallery();
    cmd.args(["--headless", "--show-helpers"]);
    cmd.assert()
        .success()
        .stdout(contains(" helpersVisible = on"))
        .stdout(contains("6 lights, 0 helper segments").not());
}

#[test]
fn unknown_control_is_fatal() {
    let mut cmd = gallery();
    cmd.args(["--headless", "--set", "sunIntensity=1"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: invalid panel edit `sunIntensity=1`"))
        .stderr(contains("unknown control `sunIntensity`"));
}

#[test]
fn malformed_color_is_rejected() {
    let mut cmd = gallery();
    cmd.args(["--headless", "--set", "pointColor=#zzzzzz"]);
    cmd.assert()
        .failure()
        .stderr(contains("`#zzzzzz` is not a #rrggbb color"));
}
