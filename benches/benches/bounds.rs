// Copyright 2025 the Kinetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kinetic_bounds::{BoundsPolicy, Fit, Settings};
use kinetic_transform::Transform;
use kurbo::{Point, Size};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Transforms scattered in and around the valid range.
fn states(count: usize, seed: u64) -> Vec<Transform> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            Transform::new(
                rng.range(-3000.0, 1000.0),
                rng.range(-3000.0, 1000.0),
                rng.range(0.1, 12.0),
                rng.range(-180.0, 180.0),
            )
        })
        .collect()
}

fn policy(rotation: bool, fit: Fit) -> BoundsPolicy {
    let mut settings = Settings::new(Size::new(1080.0, 1920.0), Size::new(4000.0, 3000.0));
    settings.set_rotation_enabled(rotation).set_fit(fit);
    let mut policy = BoundsPolicy::new(settings);
    let mut state = Transform::IDENTITY;
    policy.update_state(&mut state);
    policy
}

fn bench_restrict(c: &mut Criterion) {
    let mut group = c.benchmark_group("kinetic_bounds");
    let input = states(256, 0x6B1E_0000_0000_0001);

    for (name, rotation, fit) in [
        ("inside", false, Fit::Inside),
        ("inside_rotated", true, Fit::Inside),
        ("outside_rotated", true, Fit::Outside),
    ] {
        let policy = policy(rotation, fit);

        group.bench_function(format!("restrict_copy({name})"), |b| {
            b.iter(|| {
                for state in &input {
                    black_box(policy.restrict_bounds_copy(black_box(state), None));
                }
            });
        });

        group.bench_function(format!("restrict_elastic({name})"), |b| {
            let prev = Transform::new(0.0, 0.0, 1.0, 0.0);
            let pivot = Some(Point::new(540.0, 960.0));
            b.iter(|| {
                for state in &input {
                    let mut state = *state;
                    policy.restrict_bounds(&mut state, Some(&prev), pivot, true, false);
                    black_box(state);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_restrict);
criterion_main!(benches);
