use criterion::{criterion_group, criterion_main, Criterion};
use ctlroute::{
    BuildConfig, ControllerMeta, ControllerRegistry, MethodDescriptor, MethodMeta, RouteBuilder,
    RouteDeclaration, Router,
};
use http::Method;
use std::hint::black_box;

fn example_registry(controllers: usize) -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    for i in 0..controllers {
        let name = format!("Zoo{i}");
        registry.register(
            ControllerMeta::new(&name)
                .rest(true)
                .with_route(
                    RouteDeclaration::path(format!("/zoo{i}"))
                        .with_methods([Method::GET, Method::POST]),
                )
                .with_method(MethodMeta::new(MethodDescriptor::new("index", &name)))
                .with_method(MethodMeta::new(
                    MethodDescriptor::new("animal", &name)
                        .with_param("id", false, false)
                        .with_param("format", true, false),
                ))
                .with_method(MethodMeta::new(
                    MethodDescriptor::new("habitat", &name)
                        .with_param("category", false, false)
                        .with_param("id", false, false)
                        .with_param("section", false, false),
                ))
                .with_method(MethodMeta::new(
                    MethodDescriptor::new("files", &name)
                        .with_param("bucket", false, false)
                        .with_param("parts", false, true),
                ))
                .with_method(
                    MethodMeta::new(MethodDescriptor::new("toy", &name).with_param("toy_id", false, false))
                        .with_route(
                            RouteDeclaration::path("/animals/toys/{toy_id}")
                                .with_methods([Method::GET, Method::PUT, Method::DELETE]),
                        ),
                ),
        );
    }
    registry
}

fn bench_table_build(c: &mut Criterion) {
    let registry = example_registry(64);
    let builder = RouteBuilder::new(BuildConfig {
        workers: 4,
        ..BuildConfig::default()
    });

    c.bench_function("build_all_64_controllers", |b| {
        b.iter(|| black_box(builder.build_all(&registry)))
    });
    c.bench_function("build_all_parallel_64_controllers", |b| {
        b.iter(|| black_box(builder.build_all_parallel(&registry)))
    });
}

fn bench_route_match(c: &mut Criterion) {
    let registry = example_registry(16);
    let Ok(build) = RouteBuilder::default().build_all(&registry) else {
        return;
    };
    let Ok(router) = Router::new(&build.table) else {
        return;
    };
    c.bench_function("route_match", |b| {
        let test_paths = [
            (Method::GET, "/zoo3/animal/123"),
            (Method::GET, "/zoo7/animal/123/json"),
            (Method::POST, "/zoo15/habitat/cats/88/5"),
            (Method::PUT, "/zoo9/animals/toys/456"),
            (Method::GET, "/zoo12/files/docs/2024/06/report.pdf"),
        ];
        b.iter(|| {
            for (method, path) in test_paths.iter() {
                black_box(router.route(method, path));
            }
        })
    });
}

criterion_group!(benches, bench_table_build, bench_route_match);
criterion_main!(benches);
