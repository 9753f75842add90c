use criterion::{criterion_group, criterion_main, Criterion};

use mauritius_map::rendering::raster::{paint_scene, rasterize};
use mauritius_map::{BitmapFont, Scene};

fn bench_paint(c: &mut Criterion) {
    let scene = Scene::mauritius();
    let font = BitmapFont::new();

    c.bench_function("paint_scene", |b| {
        b.iter(|| {
            let _ = paint_scene(&scene, &font).unwrap();
        })
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let scene = Scene::mauritius();
    let font = BitmapFont::new();

    // Includes PNG encoding
    c.bench_function("rasterize_png", |b| {
        b.iter(|| {
            let _ = rasterize(&scene, &font).unwrap();
        })
    });
}

criterion_group!(benches, bench_paint, bench_rasterize);
criterion_main!(benches);
