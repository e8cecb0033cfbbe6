use http::Method;

/// A single parameter of a routable controller method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    /// Position in the method's parameter list
    pub index: usize,
    pub optional: bool,
    pub variadic: bool,
}

impl ParameterDescriptor {
    /// A required, non-variadic parameter at `index`.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        ParameterDescriptor {
            name: name.into(),
            index,
            optional: false,
            variadic: false,
        }
    }

    pub fn with_flags(mut self, optional: bool, variadic: bool) -> Self {
        self.optional = optional;
        self.variadic = variadic;
        self
    }
}

/// A public method of a controller type, as seen by the route builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
    /// Type that declares the method (may be a base controller)
    pub owner: String,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        MethodDescriptor {
            name: name.into(),
            parameters: Vec::new(),
            owner: owner.into(),
        }
    }

    /// Append a parameter; its index is its position in the list.
    pub fn with_param(mut self, name: impl Into<String>, optional: bool, variadic: bool) -> Self {
        let index = self.parameters.len();
        self.parameters
            .push(ParameterDescriptor::new(name, index).with_flags(optional, variadic));
        self
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Parameters declared after the first variadic one. They can never be
    /// reached from a URL.
    #[must_use]
    pub fn unreachable_parameters(&self) -> &[ParameterDescriptor] {
        match self.parameters.iter().position(|p| p.variadic) {
            Some(pos) => &self.parameters[pos + 1..],
            None => &[],
        }
    }
}

/// Route metadata attached to a controller type or one of its methods.
///
/// All fields are optional: a declaration with no `path` gets a synthesized
/// one, and a declaration with no `methods` falls back to the class verbs or
/// becomes verb-agnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDeclaration {
    pub path: Option<String>,
    pub methods: Option<Vec<Method>>,
    pub name: Option<String>,
    pub cache: Option<bool>,
    /// Cache lifetime in seconds
    pub duration: Option<u64>,
}

impl RouteDeclaration {
    pub fn path(path: impl Into<String>) -> Self {
        RouteDeclaration {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_cache(mut self, duration: Option<u64>) -> Self {
        self.cache = Some(true);
        self.duration = duration;
        self
    }

    /// Declared verbs, treating an empty list as "none declared".
    #[must_use]
    pub fn verbs(&self) -> Option<&[Method]> {
        self.methods.as_deref().filter(|m| !m.is_empty())
    }
}
