use super::*;

static MODIFIER_CFG: &str = "\
0x03 = b
shift 0x03 = B
ctrl 0x03 = ^b
ctrl+shift 0x03 = \\e[B
";

#[test]
fn sim_modifier_selects_table() {
    let result = simulate(
        MODIFIER_CFG,
        "c:shift:03 t:10 c:shift:00 t:50 \
         c:ctrl:03 t:10 c:ctrl:00 t:50 \
         c:03 t:10 c:00",
    );
    assert_eq!("out:B\nunblank\nout:\\x02\nunblank\nout:b\nunblank", result);
}

#[test]
fn sim_ctrl_shift_does_not_fall_back_to_ctrl() {
    let result = simulate(MODIFIER_CFG, "c:ctrl+shift:03 t:10 c:ctrl+shift:00");
    assert_eq!("out:\\x1b\nout:[\nout:B\nunblank", result);
}

#[test]
fn sim_modifier_combination_without_table_is_ignored() {
    // Control and Alt together have no table.
    let result = simulate(
        MODIFIER_CFG,
        "m:1803 t:10 m:1800 t:50 \
         c:03 t:10 c:00",
    );
    assert_eq!("out:b\nunblank", result);
}

#[test]
fn sim_empty_modifier_table_types_nothing() {
    let result = simulate(MODIFIER_CFG, "c:alt:03 t:10 c:alt:00");
    assert_eq!("", result);
}
