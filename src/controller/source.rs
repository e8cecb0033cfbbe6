use super::types::{MethodDescriptor, RouteDeclaration};
use crate::config::BuildConfig;

/// Supplies controller metadata to the route builder.
///
/// Implementations may use hand-registered tables, generated code or a
/// manifest file; the builder only relies on these queries being
/// deterministic and free of side effects.
pub trait MetadataSource {
    /// Controller identifiers in declaration order. Whole-application builds
    /// merge fragments in this order, which decides which route wins a
    /// path+verb collision between controllers.
    fn controllers(&self) -> Vec<String>;

    /// Public methods of `controller`, lifecycle hooks excluded.
    fn list_public_methods(&self, controller: &str) -> Vec<MethodDescriptor>;

    /// The class-level ("main") route declaration, if any.
    fn class_route(&self, controller: &str) -> Option<RouteDeclaration>;

    /// Route declarations attached to one method. `None` means undecorated.
    fn method_routes(&self, controller: &str, method: &str) -> Option<Vec<RouteDeclaration>>;

    /// Whether undecorated public methods are auto-enrolled as routes.
    fn is_rest_capable(&self, controller: &str) -> bool;
}

/// A method together with the route declarations attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMeta {
    pub descriptor: MethodDescriptor,
    pub routes: Option<Vec<RouteDeclaration>>,
}

impl MethodMeta {
    pub fn new(descriptor: MethodDescriptor) -> Self {
        MethodMeta {
            descriptor,
            routes: None,
        }
    }

    pub fn with_route(mut self, route: RouteDeclaration) -> Self {
        self.routes.get_or_insert_with(Vec::new).push(route);
        self
    }
}

/// Everything the builder needs to know about one controller type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerMeta {
    pub name: String,
    pub route: Option<RouteDeclaration>,
    pub rest: bool,
    pub methods: Vec<MethodMeta>,
}

impl ControllerMeta {
    pub fn new(name: impl Into<String>) -> Self {
        ControllerMeta {
            name: name.into(),
            route: None,
            rest: false,
            methods: Vec::new(),
        }
    }

    pub fn with_route(mut self, route: RouteDeclaration) -> Self {
        self.route = Some(route);
        self
    }

    pub fn rest(mut self, rest: bool) -> Self {
        self.rest = rest;
        self
    }

    pub fn with_method(mut self, method: MethodMeta) -> Self {
        self.methods.push(method);
        self
    }
}

/// [`MetadataSource`] backed by manually registered descriptor tables.
///
/// Registration order is declaration order. Registering a controller name a
/// second time replaces the earlier table in place.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    controllers: Vec<ControllerMeta>,
    excluded_methods: Vec<String>,
}

impl ControllerRegistry {
    /// Empty registry using the default lifecycle exclusion list.
    pub fn new() -> Self {
        Self::with_config(&BuildConfig::default())
    }

    pub fn with_config(config: &BuildConfig) -> Self {
        ControllerRegistry {
            controllers: Vec::new(),
            excluded_methods: config.excluded_methods.clone(),
        }
    }

    pub fn register(&mut self, controller: ControllerMeta) {
        match self.controllers.iter_mut().find(|c| c.name == controller.name) {
            Some(existing) => *existing = controller,
            None => self.controllers.push(controller),
        }
    }

    pub fn with_controller(mut self, controller: ControllerMeta) -> Self {
        self.register(controller);
        self
    }

    #[must_use]
    pub fn get(&self, controller: &str) -> Option<&ControllerMeta> {
        self.controllers.iter().find(|c| c.name == controller)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    fn is_excluded(&self, method: &str) -> bool {
        self.excluded_methods.iter().any(|m| m == method)
    }
}

impl MetadataSource for ControllerRegistry {
    fn controllers(&self) -> Vec<String> {
        self.controllers.iter().map(|c| c.name.clone()).collect()
    }

    fn list_public_methods(&self, controller: &str) -> Vec<MethodDescriptor> {
        self.get(controller)
            .map(|c| {
                c.methods
                    .iter()
                    .filter(|m| !self.is_excluded(&m.descriptor.name))
                    .map(|m| m.descriptor.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn class_route(&self, controller: &str) -> Option<RouteDeclaration> {
        self.get(controller)?.route.clone()
    }

    fn method_routes(&self, controller: &str, method: &str) -> Option<Vec<RouteDeclaration>> {
        self.get(controller)?
            .methods
            .iter()
            .find(|m| m.descriptor.name == method)?
            .routes
            .clone()
    }

    fn is_rest_capable(&self, controller: &str) -> bool {
        self.get(controller).map(|c| c.rest).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> ControllerMeta {
        ControllerMeta::new("Users")
            .with_method(MethodMeta::new(MethodDescriptor::new("initialize", "Users")))
            .with_method(MethodMeta::new(
                MethodDescriptor::new("show", "Users").with_param("id", false, false),
            ))
            .with_method(
                MethodMeta::new(MethodDescriptor::new("edit", "Users"))
                    .with_route(RouteDeclaration::path("/edit")),
            )
    }

    #[test]
    fn test_lifecycle_methods_are_not_listed() {
        let registry = ControllerRegistry::new().with_controller(users());
        let names: Vec<_> = registry
            .list_public_methods("Users")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["show", "edit"]);
    }

    #[test]
    fn test_custom_exclusion_list() {
        let config = BuildConfig {
            excluded_methods: vec!["show".to_string()],
            ..BuildConfig::default()
        };
        let registry = ControllerRegistry::with_config(&config).with_controller(users());
        let names: Vec<_> = registry
            .list_public_methods("Users")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["initialize", "edit"]);
    }

    #[test]
    fn test_method_routes_lookup() {
        let registry = ControllerRegistry::new().with_controller(users());
        assert!(registry.method_routes("Users", "show").is_none());
        assert_eq!(
            registry.method_routes("Users", "edit"),
            Some(vec![RouteDeclaration::path("/edit")])
        );
        assert!(registry.method_routes("Nope", "edit").is_none());
        assert!(!registry.is_rest_capable("Nope"));
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = ControllerRegistry::new();
        registry.register(ControllerMeta::new("A"));
        registry.register(ControllerMeta::new("B"));
        registry.register(ControllerMeta::new("A").rest(true));
        assert_eq!(registry.controllers(), vec!["A", "B"]);
        assert!(registry.is_rest_capable("A"));
    }
}
