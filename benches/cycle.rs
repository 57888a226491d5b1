use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use nudge_arm::config::ArmConfig;
use nudge_arm::control::ControlLoop;
use nudge_arm::hal::{Channel, ManualClock};
use nudge_arm::input::{ScriptedButton, ScriptedJoystick};
use nudge_arm::output::ConsoleServos;

fn bench_cycle(c: &mut Criterion) {
    // Stick held hard left: every cycle filters, classifies and integrates
    let stick = ScriptedJoystick::new(32767).with_channel(Channel::Pan, [32767, 0]);
    let mut control = ControlLoop::new(
        ArmConfig::default(),
        stick,
        ConsoleServos::new(),
        ScriptedButton::idle(),
        ManualClock::new(),
    )
    .unwrap();
    control.home();

    c.bench_function("control_cycle", |b| {
        b.iter(|| {
            control.clock_mut().advance(Duration::from_micros(500));
            black_box(control.cycle())
        })
    });
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
