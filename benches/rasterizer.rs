use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softscene::bench::{DepthBuffer, PixelTriplet, TripletVertex};
use softscene::math::vec2::Vec2;
use softscene::math::vec3::Vec3;
use softscene::DrawMode;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn vertex(px: i32, py: i32, depth: f32) -> TripletVertex {
    TripletVertex {
        px,
        py,
        screen: Vec2::new(
            2.0 * px as f32 / BUFFER_WIDTH as f32 - 1.0,
            1.0 - 2.0 * py as f32 / BUFFER_HEIGHT as f32,
        ),
        depth,
        on_screen: true,
    }
}

fn triplet(vertices: [TripletVertex; 3]) -> PixelTriplet {
    let mut t = PixelTriplet::new(vertices, Vec3::FORWARD, Vec3::ZERO, DrawMode::Render);
    t.sort_vertical(BUFFER_HEIGHT as i32 - 1);
    t
}

fn small_triangle() -> PixelTriplet {
    triplet([vertex(100, 100, 2.0), vertex(120, 100, 2.5), vertex(110, 120, 3.0)])
}

fn medium_triangle() -> PixelTriplet {
    triplet([vertex(100, 100, 2.0), vertex(300, 100, 4.0), vertex(200, 300, 6.0)])
}

fn large_triangle() -> PixelTriplet {
    triplet([vertex(50, 50, 1.0), vertex(750, 100, 5.0), vertex(400, 550, 9.0)])
}

fn benchmark_scanline_limits(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanline_limits");

    for (name, tri) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tri, |b, tri| {
            let top = tri.vertices()[0].py;
            let bottom = tri.vertices()[2].py;
            b.iter(|| {
                let mut span = 0i64;
                for scanline in top..=bottom {
                    if let Some((left, right)) = black_box(tri).horizontal_limits(scanline) {
                        span += (right - left) as i64;
                    }
                }
                span
            });
        });
    }

    group.finish();
}

fn benchmark_depth_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth_fill");

    for (name, tri) in [("medium", medium_triangle()), ("large", large_triangle())] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tri, |b, tri| {
            let mut buffer = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            let top = tri.vertices()[0].py;
            let bottom = tri.vertices()[2].py;
            b.iter(|| {
                buffer.reset();
                for scanline in top..=bottom {
                    if let Some((left, right)) = tri.horizontal_limits(scanline) {
                        for x in left..=right {
                            let sx = 2.0 * x as f32 / BUFFER_WIDTH as f32 - 1.0;
                            let sy = 1.0 - 2.0 * scanline as f32 / BUFFER_HEIGHT as f32;
                            let depth = tri.interpolated_depth(sx, sy);
                            buffer.set(x, scanline, black_box(depth), 0);
                        }
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_scanline_limits, benchmark_depth_fill);
criterion_main!(benches);
