use super::*;

static TWO_CHORD_CFG: &str = "\
0x01 = z
0x03 = ab
";

#[test]
fn sim_release_types_the_peak_chord() {
    let result = simulate(TWO_CHORD_CFG, "c:01 t:10 c:03 t:10 c:01 t:10 c:00");
    assert_eq!("out:a\nout:b\nunblank", result);
}

#[test]
fn sim_build_up_without_release_types_nothing() {
    let result = simulate(TWO_CHORD_CFG, "c:01 t:10 c:03 t:10 c:03 t:10 c:03");
    assert_eq!("", result);
}

#[test]
fn sim_two_chords_in_a_row() {
    let result = simulate(
        TWO_CHORD_CFG,
        "c:01 t:10 c:00 t:50 \
         c:01 t:10 c:03 t:10 c:00",
    );
    assert_eq!("out:z\nunblank\nout:a\nout:b\nunblank", result);
}

#[test]
fn sim_unbound_chord_types_nothing() {
    let result = simulate(TWO_CHORD_CFG, "c:07 t:10 c:00 t:10 c:01 t:10 c:00");
    assert_eq!("out:z\nunblank", result);
}

static REPEAT_CFG: &str = "0x03 = x";

#[test]
fn sim_double_tap_does_not_fire_immediately() {
    let result = simulate(REPEAT_CFG, "c:03 t:10 c:00 t:200 c:03");
    assert_eq!("out:x\nunblank", result);
}

#[test]
fn sim_hold_after_double_tap_repeats() {
    let result = simulate(
        REPEAT_CFG,
        "c:03 t:10 c:00 t:100 c:03 \
         t:300 c:03 t:250 c:03 t:50 c:03 t:10 c:00",
    );
    assert_eq!(
        "out:x
unblank
out:x
unblank
out:x
unblank
out:x
unblank",
        result
    );
}

#[test]
fn sim_hold_without_messages_does_not_repeat() {
    let result = simulate(REPEAT_CFG, "c:03 t:10 c:00 t:100 c:03 t:5000");
    assert_eq!("out:x\nunblank", result);
}

#[test]
fn sim_slow_second_tap_does_not_repeat() {
    let result = simulate(
        REPEAT_CFG,
        "c:03 t:10 c:00 t:400 c:03 t:600 c:03 t:600 c:03 t:10 c:00",
    );
    assert_eq!("out:x\nunblank\nout:x\nunblank", result);
}

#[test]
fn sim_failed_repeat_still_reports_repeating() {
    init_log();
    let mut out = SimOut::new();
    out.fail_inject_after = Some(1);
    let mut k = Chordtap::new_from_str(REPEAT_CFG, out).expect("failed to parse cfg");
    let mut clock = SimClock::new();
    let mut feed = |k: &mut Chordtap<SimOut>, after_ms: u64, code: u8| {
        clock.advance_ms(after_ms);
        k.handle_message(ChordMessage(u32::from(code)), clock.now())
    };

    assert!(!feed(&mut k, 0, 0x03).repeating);
    let released = feed(&mut k, 10, 0x00);
    assert!(!released.repeating);
    assert!(released.failure.is_none());
    assert!(feed(&mut k, 90, 0x03).repeating);

    let held = feed(&mut k, 600, 0x03);
    assert!(held.repeating);
    assert!(matches!(
        held.failure,
        Some(ActionError::Injection { byte: b'x', .. })
    ));
    assert_eq!("out:x\nunblank\nout-err:x\nunblank", k.out.outputs.join("\n"));
}
