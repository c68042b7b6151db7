//! Tests for the per-fan state machine
//!
//! Covers the user entry points (slider edits, auto toggle) and the remote
//! entry point used by reconciliation.

use super::fixtures::make_manual_control;
use crate::fan::{FanControl, FanMode};
use nbfc_types::{CommandKind, FanSpeed};

#[test]
fn test_new_control_is_manual_at_zero() {
    let control = FanControl::new("CPU Fan", 0);

    assert_eq!(control.label(), "CPU Fan");
    assert_eq!(control.fan_index(), 0);
    assert_eq!(control.mode(), FanMode::Manual(0.0));
    assert!(control.is_editable());
    assert_eq!(control.value_text(), "0%");
}

#[test]
fn test_manual_edit_emits_speed() {
    let mut control = FanControl::new("GPU Fan", 1);

    let command = control.manual_edit(42.0).unwrap();

    assert_eq!(command.kind(), CommandKind::SetFanSpeed);
    assert_eq!(command.fan(), Some(1));
    assert_eq!(command.speed(), Some(FanSpeed::Percent(42.0)));
    assert_eq!(control.value(), 42.0);
    assert_eq!(control.last_manual_value(), 42.0);
    assert_eq!(control.value_text(), "42%");
}

#[test]
fn test_manual_edit_clamps_value() {
    let mut control = FanControl::new("CPU Fan", 0);

    let command = control.manual_edit(130.0).unwrap();
    assert_eq!(command.speed(), Some(FanSpeed::Percent(100.0)));
    assert_eq!(control.value(), 100.0);

    let command = control.manual_edit(-5.0).unwrap();
    assert_eq!(command.speed(), Some(FanSpeed::Percent(0.0)));
    assert_eq!(control.last_manual_value(), 0.0);
}

#[test]
fn test_manual_edit_ignored_in_auto() {
    let mut control = make_manual_control(0, 30.0);
    control.toggle_auto(true);

    assert!(control.manual_edit(80.0).is_none());
    assert_eq!(control.value(), 30.0);
    assert_eq!(control.last_manual_value(), 30.0);
    assert!(!control.is_editable());
}

#[test]
fn test_enable_auto_emits_auto() {
    let mut control = make_manual_control(0, 55.0);

    let command = control.toggle_auto(true).unwrap();

    assert_eq!(command.fan(), Some(0));
    assert_eq!(command.speed(), Some(FanSpeed::Auto));
    assert_eq!(control.mode(), FanMode::Auto);
    assert_eq!(control.value_text(), "Auto");
}

#[test]
fn test_toggle_auto_round_trip_restores_manual_value() {
    let mut control = make_manual_control(0, 30.0);

    control.toggle_auto(true).unwrap();
    let command = control.toggle_auto(false).unwrap();

    assert_eq!(control.value(), 30.0);
    assert_eq!(control.mode(), FanMode::Manual(30.0));
    assert_eq!(command.speed(), Some(FanSpeed::Percent(30.0)));
    assert_eq!(
        nbfc_rpc::encode(&command).unwrap(),
        &b"{\"command\":\"set-fan-speed\",\"fan\":0,\"speed\":30}\n"[..]
    );
}

#[test]
fn test_toggle_to_current_mode_emits_nothing() {
    let mut control = make_manual_control(1, 20.0);
    assert!(control.toggle_auto(false).is_none());

    control.toggle_auto(true);
    assert!(control.toggle_auto(true).is_none());
}

#[test]
fn test_sync_auto_switches_mode_silently() {
    let mut control = make_manual_control(0, 35.0);

    control.sync_auto(true);
    assert!(control.is_auto());
    assert!(!control.is_editable());
    assert_eq!(control.last_manual_value(), 35.0);

    control.sync_auto(false);
    assert!(!control.is_auto());
    assert_eq!(control.value(), 35.0);
    assert_eq!(control.last_manual_value(), 35.0);
}

#[test]
fn test_sync_auto_same_mode_is_noop() {
    let mut control = make_manual_control(0, 60.0);

    control.sync_auto(false);

    assert_eq!(control.mode(), FanMode::Manual(60.0));
    assert_eq!(control.value(), 60.0);
}

#[test]
fn test_user_toggle_after_remote_auto() {
    // Service put the fan in auto; the user takes it back
    let mut control = make_manual_control(0, 45.0);
    control.sync_auto(true);

    let command = control.toggle_auto(false).unwrap();

    assert_eq!(command.speed(), Some(FanSpeed::Percent(45.0)));
    assert_eq!(control.value(), 45.0);
}
