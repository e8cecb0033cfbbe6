#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use ctlroute::{
    BuildConfig, ControllerMeta, ControllerRegistry, MethodDescriptor, MethodMeta, ParamSlot,
    RouteBuildError, RouteBuilder, RouteDeclaration, RouteTarget,
};
use http::Method;

fn method(name: &str, owner: &str) -> MethodDescriptor {
    MethodDescriptor::new(name, owner)
}

fn builder() -> RouteBuilder {
    RouteBuilder::new(BuildConfig::default())
}

#[test]
fn test_synthesized_show_route() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Users").with_method(
            MethodMeta::new(
                method("show", "Users")
                    .with_param("id", false, false)
                    .with_param("format", true, false),
            )
            .with_route(RouteDeclaration::default()),
        ),
    );
    let routes = builder().build_controller(&registry, "Users").unwrap();

    assert_eq!(routes.table.paths(), vec!["/show/(.+?)/(.*?)"]);
    let entry = routes.table.entry("/show/(.+?)/(.*?)", &Method::GET).unwrap();
    assert_eq!(entry.controller, "Users");
    assert_eq!(entry.action, "show");
    assert_eq!(entry.parameters, vec![ParamSlot::Index(0), ParamSlot::Optional(1)]);
    assert!(!entry.cache);
    assert!(routes.overwrites.is_empty());
    assert!(!routes.is_rest());
}

#[test]
fn test_default_action_under_prefix() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Home")
            .with_route(RouteDeclaration::path("/home"))
            .with_method(MethodMeta::new(method("index", "Home")).with_route(RouteDeclaration::default())),
    );
    let routes = builder().build_controller(&registry, "Home").unwrap();
    assert_eq!(routes.table.paths(), vec!["/home/(?:index/)?"]);
}

#[test]
fn test_rest_enrollment_fans_out_verbs() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("\\controllers\\Items")
            .rest(true)
            .with_route(RouteDeclaration::default().with_methods([Method::GET, Method::POST]))
            .with_method(MethodMeta::new(method("list", "Items")))
            .with_method(MethodMeta::new(method("initialize", "Items")))
            .with_method(MethodMeta::new(method("_helper", "Items")))
            .with_method(MethodMeta::new(method("forward", "Items")))
            .with_method(MethodMeta::new(method("render", "Controller"))),
    );
    let routes = builder()
        .build_controller(&registry, "\\controllers\\Items")
        .unwrap();

    assert!(routes.is_rest());
    assert_eq!(routes.controller, "controllers\\Items");
    assert_eq!(routes.table.paths(), vec!["/list/"]);
    match routes.table.get("/list/").unwrap() {
        RouteTarget::Verbs(verbs) => {
            let names: Vec<&str> = verbs.iter().map(|(m, _)| m.as_str()).collect();
            assert_eq!(names, vec!["GET", "POST"]);
            assert!(verbs.iter().all(|(_, e)| e.action == "list"));
        }
        other => panic!("expected verb map, got {other:?}"),
    }
}

#[test]
fn test_rest_without_main_route_enrolls_nothing() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Api")
            .rest(true)
            .with_method(MethodMeta::new(method("list", "Api"))),
    );
    let routes = builder().build_controller(&registry, "Api").unwrap();
    assert!(routes.table.is_empty());
    assert!(routes.is_rest());
}

#[test]
fn test_method_declaration_wins_over_rest() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Api")
            .rest(true)
            .with_route(RouteDeclaration::path("/api").with_methods([Method::GET]))
            .with_method(
                MethodMeta::new(method("list", "Api"))
                    .with_route(RouteDeclaration::path("/all").with_methods([Method::PUT])),
            ),
    );
    let routes = builder().build_controller(&registry, "Api").unwrap();
    assert_eq!(routes.table.paths(), vec!["/api/all/"]);
    assert!(routes.table.entry("/api/all/", &Method::PUT).is_some());
    assert!(routes.table.entry("/api/all/", &Method::GET).is_none());
}

#[test]
fn test_later_route_wins_collision() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Pages")
            .with_method(MethodMeta::new(method("first", "Pages")).with_route(RouteDeclaration::path("foo/")))
            .with_method(MethodMeta::new(method("second", "Pages")).with_route(RouteDeclaration::path("/foo"))),
    );
    let routes = builder().build_controller(&registry, "Pages").unwrap();

    assert_eq!(routes.table.len(), 1);
    assert_eq!(routes.table.entry("/foo/", &Method::GET).unwrap().action, "second");
    assert_eq!(routes.overwrites.len(), 1);
    assert_eq!(routes.overwrites[0].previous, "Pages::first");
    assert_eq!(routes.overwrites[0].replacement, "Pages::second");
}

#[test]
fn test_unknown_parameter_fails_controller() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Users").with_method(
            MethodMeta::new(method("show", "Users").with_param("id", false, false))
                .with_route(RouteDeclaration::path("/show/{uid}")),
        ),
    );
    let err = builder().build_controller(&registry, "Users").unwrap_err();
    assert_eq!(
        err,
        RouteBuildError::UnknownParameter {
            controller: "Users".to_string(),
            method: "show".to_string(),
            token: "{uid}".to_string(),
        }
    );
    assert_eq!(err.to_string(), "{uid} is not a parameter of the method Users::show");
    assert!(builder().build_all(&registry).is_err());
}

#[test]
fn test_name_and_cache_fields() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Users")
            .with_route(RouteDeclaration::path("users"))
            .with_method(
                MethodMeta::new(method("profile", "Users")).with_route(
                    RouteDeclaration::path("/me")
                        .with_name("users.profile")
                        .with_cache(Some(300)),
                ),
            ),
    );
    let routes = builder().build_controller(&registry, "Users").unwrap();
    let entry = routes.table.entry("/users/me/", &Method::GET).unwrap();
    assert_eq!(entry.name.as_deref(), Some("users.profile"));
    assert!(entry.cache);
    assert_eq!(entry.duration, Some(300));
}

#[test]
fn test_several_declarations_per_method() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Users").with_method(
            MethodMeta::new(method("show", "Users").with_param("id", false, false))
                .with_route(RouteDeclaration::path("/show/{id}").with_methods([Method::GET]))
                .with_route(RouteDeclaration::path("/u/{id}")),
        ),
    );
    let routes = builder().build_controller(&registry, "Users").unwrap();
    assert_eq!(routes.table.paths(), vec!["/show/(.+?)/", "/u/(.+?)/"]);
}

#[test]
fn test_cross_controller_overwrite_follows_declaration_order() {
    let registry = ControllerRegistry::new()
        .with_controller(
            ControllerMeta::new("A").with_method(MethodMeta::new(method("a", "A")).with_route(RouteDeclaration::path("/x"))),
        )
        .with_controller(
            ControllerMeta::new("B").with_method(MethodMeta::new(method("b", "B")).with_route(RouteDeclaration::path("/x"))),
        );
    let build = builder().build_all(&registry).unwrap();
    assert_eq!(build.table.entry("/x/", &Method::GET).unwrap().controller, "B");
    assert_eq!(build.overwrites.len(), 1);
    assert!(build.rest_controllers.is_empty());
}

fn many_controllers(count: usize) -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    for i in 0..count {
        let name = format!("C{i}");
        registry.register(
            ControllerMeta::new(&name)
                .rest(i % 2 == 0)
                .with_route(RouteDeclaration::path(format!("/c{}", i % 5)))
                .with_method(MethodMeta::new(method("index", &name)))
                .with_method(MethodMeta::new(method("show", &name).with_param("id", false, false)))
                .with_method(
                    MethodMeta::new(method("shared", &name)).with_route(RouteDeclaration::path("/shared")),
                ),
        );
    }
    registry
}

#[test]
fn test_parallel_build_matches_sequential() {
    let registry = many_controllers(23);
    let config = BuildConfig {
        workers: 3,
        ..BuildConfig::default()
    };
    let builder = RouteBuilder::new(config);
    let sequential = builder.build_all(&registry).unwrap();
    let parallel = builder.build_all_parallel(&registry).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(
        sequential.table.to_json_pretty().unwrap(),
        parallel.table.to_json_pretty().unwrap()
    );
    assert_eq!(sequential.table.entry("/c2/shared/", &Method::GET).unwrap().controller, "C22");
}

#[test]
fn test_parallel_build_reports_first_error_in_order() {
    let mut registry = many_controllers(6);
    registry.register(
        ControllerMeta::new("Broken").with_method(
            MethodMeta::new(method("show", "Broken")).with_route(RouteDeclaration::path("/{missing}")),
        ),
    );
    let err = builder().build_all_parallel(&registry).unwrap_err();
    assert!(matches!(err, RouteBuildError::UnknownParameter { ref controller, .. } if controller == "Broken"));
}

#[test]
fn test_table_serializes_plan_slots() {
    let registry = ControllerRegistry::new().with_controller(
        ControllerMeta::new("Files").with_method(
            MethodMeta::new(
                method("get", "Files")
                    .with_param("root", false, false)
                    .with_param("parts", false, true),
            )
            .with_route(RouteDeclaration::default().with_methods([Method::GET])),
        ),
    );
    let build = builder().build_all(&registry).unwrap();
    let json: serde_json::Value = serde_json::from_str(&build.table.to_json_pretty().unwrap()).unwrap();
    assert_eq!(
        json["/get/(.+?)/(.*?)"]["GET"]["parameters"],
        serde_json::json!([0, "*"])
    );
}
