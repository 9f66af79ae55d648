use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::routes::descriptor::RouteDescriptor;

/// Sentinel path returned by [`RouteTable::build`] for unresolvable keys.
pub const NOT_FOUND_PATH: &str = "/404";

/// Stable route keys for the dashboard surface.
pub mod keys {
    pub const DASHBOARD: &str = "DASHBOARD";
    pub const LOADS: &str = "LOADS";
    pub const LOAD_CREATE: &str = "LOAD_CREATE";
    pub const LOAD_DETAILS: &str = "LOAD_DETAILS";
    pub const DRIVERS: &str = "DRIVERS";
    pub const DRIVER_DETAILS: &str = "DRIVER_DETAILS";
    pub const NEGOTIATIONS: &str = "NEGOTIATIONS";
    pub const NEGOTIATION_DETAILS: &str = "NEGOTIATION_DETAILS";
    pub const ANALYTICS: &str = "ANALYTICS";
    pub const SETTINGS: &str = "SETTINGS";
    pub const MOBILE_DASHBOARD: &str = "MOBILE_DASHBOARD";
    pub const MOBILE_LOADS: &str = "MOBILE_LOADS";
    pub const MOBILE_DRIVERS: &str = "MOBILE_DRIVERS";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
}

/// Immutable registry mapping path patterns to view descriptors.
///
/// Built once at startup; lookups never mutate it. Registry order is
/// meaningful: listings preserve it, and `resolve` breaks pattern overlap
/// by preferring the pattern with fewer parameter segments (so
/// `/loads/create` wins over `/loads/:id`).
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    /// The fixed dashboard route registry.
    pub fn new() -> Self {
        use keys::*;

        let routes = vec![
            RouteDescriptor::new("/", DASHBOARD, "dashboard")
                .icon("gauge")
                .description("Operational overview"),
            RouteDescriptor::new("/loads", LOADS, "load-board")
                .icon("package")
                .description("Active and available loads"),
            RouteDescriptor::new("/loads/create", LOAD_CREATE, "load-create")
                .icon("plus")
                .description("Post a new load")
                .requires_auth()
                .roles(&["dispatcher"])
                .parent(LOADS),
            RouteDescriptor::new("/loads/:id", LOAD_DETAILS, "load-details")
                .parent(LOADS)
                .hidden(),
            RouteDescriptor::new("/drivers", DRIVERS, "driver-roster")
                .icon("users")
                .description("Driver roster and status"),
            RouteDescriptor::new("/drivers/:id", DRIVER_DETAILS, "driver-details")
                .parent(DRIVERS)
                .hidden(),
            RouteDescriptor::new("/negotiations", NEGOTIATIONS, "negotiation-board")
                .icon("handshake")
                .description("Rate negotiations"),
            RouteDescriptor::new("/negotiations/:id", NEGOTIATION_DETAILS, "negotiation-details")
                .parent(NEGOTIATIONS)
                .hidden(),
            RouteDescriptor::new("/analytics", ANALYTICS, "analytics")
                .icon("chart")
                .description("Fleet analytics")
                .requires_auth(),
            RouteDescriptor::new("/settings", SETTINGS, "settings")
                .icon("gear")
                .description("Workspace settings")
                .requires_auth(),
            RouteDescriptor::new("/m", MOBILE_DASHBOARD, "mobile-dashboard").hidden(),
            RouteDescriptor::new("/m/loads", MOBILE_LOADS, "mobile-load-board")
                .parent(MOBILE_DASHBOARD)
                .hidden(),
            RouteDescriptor::new("/m/drivers", MOBILE_DRIVERS, "mobile-driver-roster")
                .parent(MOBILE_DASHBOARD)
                .hidden(),
            RouteDescriptor::new("/404", NOT_FOUND, "not-found").hidden(),
            RouteDescriptor::new("/unauthorized", UNAUTHORIZED, "unauthorized").hidden(),
        ];

        // The fixed registry is known to be duplicate-free.
        Self { routes }
    }

    /// Build a registry from caller-supplied routes (for tests and
    /// embedders). Path patterns must be unique.
    pub fn with_routes(routes: Vec<RouteDescriptor>) -> CoreResult<Self> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|other| other.path == route.path) {
                return Err(CoreError::InvalidInput(format!(
                    "duplicate route pattern: {}",
                    route.path
                )));
            }
        }
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Resolve a concrete path to its route.
    ///
    /// Among overlapping matches, the pattern with the fewest parameter
    /// segments wins; ties fall back to registry order.
    pub fn resolve(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|route| pattern_matches(&route.path, path))
            .min_by_key(|route| route.param_count())
    }

    /// True iff exactly one registered pattern full-matches `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.routes
            .iter()
            .filter(|route| pattern_matches(&route.path, path))
            .count()
            == 1
    }

    /// Routes with no parent and not hidden, in registry order.
    pub fn list_top_level(&self) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|route| route.parent.is_none() && !route.hidden)
            .collect()
    }

    /// Children of `parent_key`, in registry order.
    pub fn list_children(&self, parent_key: &str) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|route| route.parent.as_deref() == Some(parent_key))
            .collect()
    }

    /// Build a concrete path for `route_key`, substituting `:name`
    /// segments from `params`.
    ///
    /// Returns [`NOT_FOUND_PATH`] for an unknown key or a missing
    /// parameter; never errors.
    pub fn build(&self, route_key: &str, params: &HashMap<String, String>) -> String {
        let Some(route) = self.routes.iter().find(|route| route.name == route_key) else {
            return NOT_FOUND_PATH.to_string();
        };

        let mut segments = Vec::new();
        for segment in route.path.split('/') {
            if let Some(name) = segment.strip_prefix(':') {
                match params.get(name) {
                    Some(value) => segments.push(value.as_str()),
                    None => return NOT_FOUND_PATH.to_string(),
                }
            } else {
                segments.push(segment);
            }
        }
        let built = segments.join("/");
        if built.is_empty() {
            "/".to_string()
        } else {
            built
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Full-string pattern match, segment by segment. A `:name` segment
/// matches exactly one non-empty concrete segment; the match is anchored
/// at both ends so `/loads` never matches `/loads/42`.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return false;
    }

    pattern_segments
        .iter()
        .zip(path_segments.iter())
        .all(|(pattern_segment, path_segment)| {
            if pattern_segment.starts_with(':') {
                !path_segment.is_empty()
            } else {
                pattern_segment == path_segment
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolve_root() {
        let table = RouteTable::new();
        let route = table.resolve("/").expect("resolve /");
        assert_eq!(route.name, keys::DASHBOARD);
    }

    #[test]
    fn resolve_parameterized_route() {
        let table = RouteTable::new();
        let route = table.resolve("/loads/42").expect("resolve");
        assert_eq!(route.name, keys::LOAD_DETAILS);
    }

    #[test]
    fn literal_segment_beats_parameter() {
        let table = RouteTable::new();
        let route = table.resolve("/loads/create").expect("resolve");
        assert_eq!(route.name, keys::LOAD_CREATE);
    }

    #[test]
    fn no_prefix_matches() {
        let table = RouteTable::new();
        assert!(table.matches("/loads"));
        assert!(!table.matches("/loads/anything/extra"));
        assert!(table.resolve("/loads/anything/extra").is_none());
    }

    #[test]
    fn unknown_path_does_not_resolve() {
        let table = RouteTable::new();
        assert!(table.resolve("/garage").is_none());
        assert!(!table.matches("/garage"));
    }

    #[test]
    fn empty_parameter_segment_does_not_match() {
        let table = RouteTable::new();
        assert!(table.resolve("/drivers/").is_none());
    }

    #[test]
    fn build_substitutes_parameters() {
        let table = RouteTable::new();
        assert_eq!(
            table.build(keys::LOAD_DETAILS, &params(&[("id", "42")])),
            "/loads/42"
        );
    }

    #[test]
    fn build_unknown_key_returns_sentinel() {
        let table = RouteTable::new();
        assert_eq!(table.build("NONEXISTENT_KEY", &HashMap::new()), NOT_FOUND_PATH);
    }

    #[test]
    fn build_missing_parameter_returns_sentinel() {
        let table = RouteTable::new();
        assert_eq!(table.build(keys::LOAD_DETAILS, &HashMap::new()), NOT_FOUND_PATH);
    }

    #[test]
    fn build_without_parameters() {
        let table = RouteTable::new();
        assert_eq!(table.build(keys::DRIVERS, &HashMap::new()), "/drivers");
        assert_eq!(table.build(keys::DASHBOARD, &HashMap::new()), "/");
    }

    #[test]
    fn build_then_resolve_round_trips() {
        let table = RouteTable::new();
        let values = params(&[("id", "17")]);
        for route in table.routes() {
            let path = table.build(&route.name, &values);
            if path == NOT_FOUND_PATH && route.name != keys::NOT_FOUND {
                panic!("failed to build {}", route.name);
            }
            let resolved = table.resolve(&path).expect("resolve built path");
            assert_eq!(resolved.name, route.name, "round-trip for {}", route.path);
        }
    }

    #[test]
    fn top_level_listing_is_visible_parentless_routes_in_order() {
        let table = RouteTable::new();
        let names: Vec<&str> = table
            .list_top_level()
            .iter()
            .map(|route| route.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                keys::DASHBOARD,
                keys::LOADS,
                keys::DRIVERS,
                keys::NEGOTIATIONS,
                keys::ANALYTICS,
                keys::SETTINGS,
            ]
        );
    }

    #[test]
    fn children_listing_preserves_registry_order() {
        let table = RouteTable::new();
        let names: Vec<&str> = table
            .list_children(keys::LOADS)
            .iter()
            .map(|route| route.name.as_str())
            .collect();
        assert_eq!(names, vec![keys::LOAD_CREATE, keys::LOAD_DETAILS]);
    }

    #[test]
    fn with_routes_rejects_duplicate_patterns() {
        let routes = vec![
            RouteDescriptor::new("/a", "A", "a"),
            RouteDescriptor::new("/a", "B", "b"),
        ];
        assert!(RouteTable::with_routes(routes).is_err());
    }
}
