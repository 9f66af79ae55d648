/// A single entry in the route registry.
///
/// `path` is a pattern: segments prefixed with `:` are named parameters
/// that match exactly one non-empty concrete segment. Patterns are unique
/// within a registry and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    /// Stable route key used by `build` and by command targets.
    pub name: String,
    /// Identifier of the view component the route renders.
    pub view: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub requires_auth: bool,
    pub roles: Vec<String>,
    /// Route key of the parent, for nested navigation listings.
    pub parent: Option<String>,
    /// Hidden routes are resolvable but excluded from navigation listings.
    pub hidden: bool,
}

impl RouteDescriptor {
    pub fn new(path: &str, name: &str, view: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            view: view.to_string(),
            icon: None,
            description: None,
            requires_auth: false,
            roles: Vec::new(),
            parent: None,
            hidden: false,
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Number of `:name` segments in this route's pattern.
    pub fn param_count(&self) -> usize {
        self.path
            .split('/')
            .filter(|segment| segment.starts_with(':'))
            .count()
    }
}
