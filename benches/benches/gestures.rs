// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kinetic_bounds::Settings;
use kinetic_controller::GestureEngine;
use kinetic_event_state::{GestureMux, Pointer, RecognizerConfig, TouchAction, TouchEvent};
use kinetic_transform::Transform;
use kurbo::Size;

fn engine() -> GestureEngine {
    let mut settings = Settings::new(Size::new(1080.0, 1920.0), Size::new(4000.0, 3000.0));
    settings.set_rotation_enabled(true);
    let mut engine = GestureEngine::new(settings);
    engine.update_state();
    engine
}

/// Two-finger stream that spreads and twists the pointers over `moves` steps.
fn pinch_stream(moves: u32) -> Vec<TouchEvent> {
    let pair = |action, t: u64, spread: f64, twist: f64| {
        let (sin, cos) = twist.sin_cos();
        let (dx, dy) = (spread * cos, spread * sin);
        TouchEvent::new(
            action,
            t,
            [
                Pointer::new(0, (540.0 - dx, 960.0 - dy)),
                Pointer::new(1, (540.0 + dx, 960.0 + dy)),
            ],
        )
    };

    let mut events = vec![TouchEvent::down(0, (440.0, 960.0))];
    events.push(pair(TouchAction::PointerDown(1), 8, 100.0, 0.0));
    for i in 1..=moves {
        let f = f64::from(i);
        events.push(pair(TouchAction::Move, 8 + u64::from(i) * 8, 100.0 + 4.0 * f, 0.01 * f));
    }
    let last = f64::from(moves);
    let end = 16 + u64::from(moves) * 8;
    events.push(pair(TouchAction::PointerUp(1), end, 100.0 + 4.0 * last, 0.01 * last));
    events.push(TouchEvent::up(end + 8, (540.0, 960.0)));
    events
}

/// One-finger stream that ends in a fast release.
fn fling_stream() -> Vec<TouchEvent> {
    let mut events = vec![TouchEvent::down(0, (540.0, 960.0))];
    for i in 1..=8_u32 {
        let x = 540.0 - 60.0 * f64::from(i);
        events.push(TouchEvent::move_to(u64::from(i) * 8, (x, 960.0)));
    }
    events.push(TouchEvent::up(72, (0.0, 960.0)));
    events
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("kinetic_gestures");
    let pinch = pinch_stream(120);

    group.bench_function("recognize_pinch(120)", |b| {
        let config = RecognizerConfig {
            rotation_enabled: true,
            ..RecognizerConfig::default()
        };
        b.iter(|| {
            let mut mux = GestureMux::new(config);
            for event in &pinch {
                black_box(mux.on_touch(event));
            }
        });
    });

    group.bench_function("engine_pinch(120)", |b| {
        b.iter_batched(
            engine,
            |mut engine| {
                for event in &pinch {
                    engine.on_touch(event);
                }
                black_box(*engine.state())
            },
            BatchSize::SmallInput,
        );
    });

    let fling = fling_stream();
    group.bench_function("engine_fling_frames", |b| {
        b.iter_batched(
            || {
                let mut engine = engine();
                engine.set_state(Transform::new(-1000.0, -500.0, 2.0, 0.0));
                engine
            },
            |mut engine| {
                for event in &fling {
                    engine.on_touch(event);
                }
                let mut now = 100;
                while engine.on_frame(now) {
                    now += 16;
                }
                black_box(*engine.state())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_gestures);
criterion_main!(benches);
