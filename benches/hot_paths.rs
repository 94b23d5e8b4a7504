use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marker_globe::config::GlobeConfig;
use marker_globe::engine::{Globe, GlobeOptions, LandMask};
use marker_globe::hit_test::{hit_test, Bounds};
use marker_globe::markers::default_markers;

fn bench_hit_test(c: &mut Criterion) {
    let markers = default_markers();
    let bounds = Bounds { left: 0.0, top: 0.0, width: 188.0, height: 188.0 };

    // Worst case: pointer on the globe but over no marker, so every marker is checked
    c.bench_function("hit_test_miss", |b| {
        b.iter(|| hit_test(black_box(&markers), &bounds, black_box(94.0), black_box(94.0), 0.0, 0.3))
    });

    c.bench_function("hit_test_sweep", |b| {
        b.iter(|| {
            let mut hits = 0;
            for x in (0..188).step_by(4) {
                if hit_test(&markers, &bounds, x as f64, 60.0, 2.7, 0.3).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let land = LandMask::builtin();
    let options = GlobeOptions::from_config(&GlobeConfig::default());
    let mut phi = 0.0;
    let mut globe = Globe::create(
        options,
        &land,
        Box::new(move |state| {
            phi += 0.005;
            state.phi = phi;
            state.width = 376;
            state.height = 376;
        }),
    );

    c.bench_function("render_frame_16k", |b| {
        b.iter(|| {
            let frame = globe.render().map(|f| f.markers.dot_count());
            black_box(frame)
        })
    });

    c.bench_function("create_globe_16k", |b| {
        b.iter(|| {
            let options = GlobeOptions::from_config(&GlobeConfig::default());
            black_box(Globe::create(options, &land, Box::new(|_| {})).land_dots())
        })
    });
}

criterion_group!(benches, bench_hit_test, bench_render);
criterion_main!(benches);
