//! Criterion micro-benchmarks for scheduling, dispatch and simulation runs.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use reel_anim::{InterpolationWindow, SpringConfig};
use reel_bench::{instant_driver, spread_ticks};
use reel_core::{FrameRate, ScheduledEvent, TickId};
use reel_engine::{Dispatcher, EventSchedule};
use reel_incident::{simulate, RunState, SimulationEngine};

fn bench_schedule(c: &mut Criterion) {
    let ticks = spread_ticks(10_000, 100_000, 42);

    c.bench_function("schedule_take_due_10k", |b| {
        b.iter(|| {
            let mut schedule: EventSchedule<u32> = EventSchedule::new();
            for (i, &t) in ticks.iter().enumerate() {
                schedule
                    .schedule(ScheduledEvent::one_shot(TickId(t), i as u32))
                    .unwrap();
            }
            black_box(schedule.take_due(TickId(100_000)).len())
        });
    });

    let mut dispatcher: Dispatcher<u32> = Dispatcher::new(EventSchedule::new(), FrameRate::MILLIS);
    for (i, &t) in ticks.iter().enumerate() {
        dispatcher
            .schedule(ScheduledEvent::one_shot(TickId(t), i as u32))
            .unwrap();
    }
    c.bench_function("next_due_10k", |b| {
        b.iter(|| black_box(dispatcher.next_due()));
    });
}

fn bench_primitives(c: &mut Criterion) {
    let window =
        InterpolationWindow::new(&[80.0, 280.0, 500.0, 700.0], &[0.0, 600.0, 1200.0, 1800.0])
            .unwrap();
    let spring = SpringConfig::new(15.0, 80.0, 0.6).unwrap();

    c.bench_function("interpolate_4_keyframes", |b| {
        b.iter(|| black_box(window.eval(black_box(390.0))));
    });

    c.bench_function("spring_value", |b| {
        b.iter(|| {
            black_box(reel_anim::spring_value(
                black_box(17),
                FrameRate::VIDEO,
                &spring,
            ))
        });
    });
}

fn bench_simulation(c: &mut Criterion) {
    let config = instant_driver();

    c.bench_function("simulate_three_incidents", |b| {
        b.iter(|| {
            let mut sink = |_: TickId, _: &RunState| {};
            let engine = simulate(SimulationEngine::canned(), &config, &mut sink).unwrap();
            black_box(engine.state().log.len())
        });
    });
}

criterion_group!(benches, bench_schedule, bench_primitives, bench_simulation);
criterion_main!(benches);
