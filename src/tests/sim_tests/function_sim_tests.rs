use super::*;

static FUNCTION_CFG: &str = "\
0x01 = Console(2)
0x03 = Exec(date > /dev/tty1)
0x07 = Console(0)
0x0f = abc
";

#[test]
fn sim_console_switch() {
    let result = simulate(FUNCTION_CFG, "c:01 t:10 c:00");
    assert_eq!("vt:2\nunblank", result);
}

#[test]
fn sim_console_zero_only_unblanks() {
    let result = simulate(FUNCTION_CFG, "c:07 t:10 c:00");
    assert_eq!("unblank", result);
}

#[test]
fn sim_exec_runs_command() {
    let result = simulate(FUNCTION_CFG, "c:03 t:10 c:00");
    assert_eq!("exec:date > /dev/tty1\nunblank", result);
}

#[test]
fn sim_failed_spawn_keeps_decoding() {
    let mut out = SimOut::new();
    out.fail_spawn = true;
    let result = simulate_with_output(FUNCTION_CFG, "c:03 t:10 c:00 t:50 c:01 t:10 c:00", out);
    assert_eq!("unblank\nvt:2\nunblank", result);
}

#[test]
fn sim_failed_injection_stops_the_text_and_keeps_decoding() {
    let mut out = SimOut::new();
    out.fail_inject_after = Some(1);
    let result = simulate_with_output(
        FUNCTION_CFG,
        "c:0f t:10 c:00 t:50 c:01 t:10 c:00",
        out,
    );
    assert_eq!("out:a\nout-err:b\nunblank\nvt:2\nunblank", result);
}
