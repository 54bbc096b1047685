//! Criterion benchmarks for the codec and the joystick transition function.
//!
//! The controller sends a snapshot on every change plus a 100 ms heartbeat,
//! so encode + transition must stay far below a millisecond.
//!
//! Run with:
//! ```bash
//! cargo bench --package padlink-core --bench transition_bench
//! ```

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use padlink_core::joystick::{Direction, JoystickState, PadEvent};
use padlink_core::protocol::codec::{decode_inbound, encode_outbound};
use padlink_core::protocol::messages::ControllerMessage;

fn bench_encode_joystick_update(c: &mut Criterion) {
    let msg = ControllerMessage::joystick_update(
        vec![Direction::Up, Direction::Left, Direction::Right],
        1_712_000_000_000,
    );
    c.bench_function("encode_joystick_update", |b| {
        b.iter(|| encode_outbound(black_box(&msg)).unwrap())
    });
}

fn bench_decode_status_update(c: &mut Criterion) {
    let frame = r#"{"type":"STATUS_UPDATE","status":{"games":4,"controllers":9}}"#;
    c.bench_function("decode_status_update", |b| {
        b.iter(|| decode_inbound(black_box(frame)).unwrap())
    });
}

fn bench_press_release_cycle(c: &mut Criterion) {
    c.bench_function("press_release_cycle", |b| {
        let base = Instant::now();
        b.iter(|| {
            let mut state = JoystickState::default();
            let mut now = base;
            for dir in [Direction::Up, Direction::Left, Direction::Down] {
                now += Duration::from_millis(120);
                state.apply(PadEvent::Press(dir), now);
                now += Duration::from_millis(120);
                state.apply(PadEvent::Release(dir), now);
            }
            black_box(state.active_directions())
        })
    });
}

criterion_group!(
    benches,
    bench_encode_joystick_update,
    bench_decode_status_update,
    bench_press_release_cycle
);
criterion_main!(benches);
