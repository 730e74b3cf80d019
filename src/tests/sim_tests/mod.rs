use crate::tests::*;
use chordtap_state_machine::{oskbd::*, ActionError, Chordtap};

mod decode_sim_tests;
mod function_sim_tests;
mod modifier_sim_tests;

fn simulate(cfg: &str, sim: &str) -> String {
    simulate_with_output(cfg, sim, SimOut::new())
}

fn simulate_with_output(cfg: &str, sim: &str, out: SimOut) -> String {
    init_log();
    let mut k = Chordtap::new_from_str(cfg, out).expect("failed to parse cfg");
    let mut clock = SimClock::new();
    for item in sim.split_whitespace() {
        match parse_sim_item(item).expect("valid sim item") {
            SimItem::Tick(ms) => clock.advance_ms(ms),
            SimItem::Msg(msg) => {
                // Action failures show up in the recorded output.
                k.handle_message(msg, clock.now());
            }
        }
    }
    k.out.outputs.join("\n")
}
