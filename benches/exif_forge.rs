use criterion::{Criterion, criterion_group, criterion_main};
use exif_forge::config::{DEFAULT_FIXED_ORIGIN, DEFAULT_LANDSCAPE, DEFAULT_PORTRAIT};
use exif_forge::features::aspect_fit::{DEFAULT_AUTO_THRESHOLD, FitMode, ImageDimensions, plan_resize};
use exif_forge::features::gps::fuzz_coordinate;
use exif_forge::features::metadata_plan::build_metadata_plan;
use exif_forge::time::{civil_to_utc, resolve_civil_time};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn bench(c: &mut Criterion) {
    let dims = ImageDimensions {
        width: 3000,
        height: 2000,
    };

    c.bench_function("plan_resize", |b| {
        b.iter(|| {
            plan_resize(
                black_box(dims),
                FitMode::Auto,
                DEFAULT_LANDSCAPE,
                DEFAULT_PORTRAIT,
                DEFAULT_AUTO_THRESHOLD,
            )
        });
    });

    let mut rng = StdRng::seed_from_u64(7);
    c.bench_function("fuzz_coordinate", |b| {
        b.iter(|| fuzz_coordinate(black_box(&DEFAULT_FIXED_ORIGIN), 100.0, &mut rng));
    });

    let civil = resolve_civil_time("2020:07:22 10:15:30", "+06:30", "0").unwrap();
    let utc = civil_to_utc(&civil).unwrap();
    let resize = plan_resize(dims, FitMode::Auto, DEFAULT_LANDSCAPE, DEFAULT_PORTRAIT, DEFAULT_AUTO_THRESHOLD);
    let fuzzed = fuzz_coordinate(&DEFAULT_FIXED_ORIGIN, 100.0, &mut rng);

    c.bench_function("build_metadata_plan", |b| {
        b.iter(|| build_metadata_plan(black_box(&resize), Some(&fuzzed), &utc, &civil));
    });

    c.bench_function("build_metadata_plan.exiftool_args", |b| {
        let plan = build_metadata_plan(&resize, Some(&fuzzed), &utc, &civil);
        b.iter(|| black_box(&plan).to_exiftool_args());
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
