use std::hint::black_box;

use bencher::PATHS;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tonkey_http::protocol::Environ;
use tonkey_web::{handler_fn, Dispatcher, Router};

fn create_router() -> Router {
    Router::new()
        .route(r"^/$", handler_fn(|_req, _captures| "home"))
        .and_then(|router| router.route(r"^/users/(\d+)$", handler_fn(|_req, _captures| "user")))
        .and_then(|router| router.route(r"^/users/(\d+)/posts/(?P<post>\d+)", handler_fn(|_req, _captures| "post")))
        .and_then(|router| router.route(r"^/static/(?P<path>.+)", handler_fn(|_req, _captures| "static")))
        .expect("patterns should compile")
}

fn benchmark_route_match(criterion: &mut Criterion) {
    let router = create_router();
    let mut group = criterion.benchmark_group("route_match");

    for path in PATHS {
        group.bench_with_input(BenchmarkId::from_parameter(path), path, |b, path| {
            b.iter(|| black_box(router.at(black_box(path)).is_matched()));
        });
    }

    group.finish();
}

fn benchmark_dispatch(criterion: &mut Criterion) {
    let dispatcher = Dispatcher::new(create_router());
    let mut group = criterion.benchmark_group("dispatch");

    for path in PATHS {
        let environ = Environ::builder().path(path).query_string("a=1&b=2").build();
        group.bench_with_input(BenchmarkId::from_parameter(path), &environ, |b, environ| {
            b.iter(|| {
                let response = dispatcher.dispatch(environ).expect("handlers should not fail");
                black_box(response.into_chunks().count())
            });
        });
    }

    group.finish();
}

criterion_group!(router, benchmark_route_match, benchmark_dispatch);
criterion_main!(router);
