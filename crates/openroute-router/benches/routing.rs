//! Routing benchmarks.
//!
//! Run with: `cargo bench -p openroute-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use openroute_router::{MethodRouter, Router};

fn build_router(num_routes: usize) -> Router<usize> {
    let mut router = Router::new();

    for i in 0..num_routes / 3 {
        router
            .insert(&format!("/api/v1/resource{i}"), MethodRouter::new().get(i))
            .unwrap();
        router
            .insert(&format!("/api/v1/resource{i}/:id"), MethodRouter::new().get(i))
            .unwrap();
        router
            .insert(
                &format!("/api/v1/org/:orgId/resource{i}/:id"),
                MethodRouter::new().get(i),
            )
            .unwrap();
    }

    router
}

fn bench_static_match(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("static_match", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/resource25")));
    });
}

fn bench_param_match(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("param_match", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/resource25/12345")));
    });
}

fn bench_nested_param_match(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("nested_param_match", |b| {
        b.iter(|| {
            black_box(router.match_route(&Method::GET, "/api/v1/org/acme/resource10/12345"))
        });
    });
}

fn bench_miss(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("miss", |b| {
        b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/nonexistent/path")));
    });
}

fn bench_route_count_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_count_scaling");

    for count in [30, 300, 3000] {
        let router = build_router(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &router, |b, router| {
            b.iter(|| black_box(router.match_route(&Method::GET, "/api/v1/resource7/99")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_static_match,
    bench_param_match,
    bench_nested_param_match,
    bench_miss,
    bench_route_count_scaling,
);
criterion_main!(benches);
