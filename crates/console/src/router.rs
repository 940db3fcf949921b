//! Route table and guarded navigation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use counterdesk_auth::{Role, RouteAccess};

use crate::guard::{NavigationDecision, SessionView, authorize_navigation};

/// Gate/record redirects followed for one navigation before giving up.
pub const MAX_REDIRECTS: usize = 8;

/// Every navigable view of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteName {
    Home,
    Dashboard,
    Products,
    Users,
    SaleReports,
    Cashier,
    Login,
    Unauthorized,
}

impl RouteName {
    pub const ALL: [RouteName; 8] = [
        RouteName::Home,
        RouteName::Dashboard,
        RouteName::Products,
        RouteName::Users,
        RouteName::SaleReports,
        RouteName::Cashier,
        RouteName::Login,
        RouteName::Unauthorized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::Dashboard => "dashboard",
            RouteName::Products => "products",
            RouteName::Users => "users",
            RouteName::SaleReports => "sale_reports",
            RouteName::Cashier => "cashier",
            RouteName::Login => "login",
            RouteName::Unauthorized => "unauthorized",
        }
    }

    /// Human label shown in navigation.
    pub fn label(&self) -> &'static str {
        match self {
            RouteName::Home => "Home",
            RouteName::Dashboard => "Dashboard",
            RouteName::Products => "Products",
            RouteName::Users => "Users",
            RouteName::SaleReports => "Sale Reports",
            RouteName::Cashier => "Cashier",
            RouteName::Login => "Login",
            RouteName::Unauthorized => "Unauthorized",
        }
    }
}

impl core::fmt::Display for RouteName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the route tree.
///
/// Paths are absolute. Unnamed records are layouts: they carry access
/// requirements for their children but cannot be navigated to directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub name: Option<RouteName>,
    pub path: &'static str,
    pub access: RouteAccess,
    /// Navigating here immediately continues to another route.
    pub redirect: Option<RouteName>,
    /// Listed in the sidebar.
    pub sidebar: bool,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(name: RouteName, path: &'static str) -> Self {
        Self {
            name: Some(name),
            path,
            access: RouteAccess::public(),
            redirect: None,
            sidebar: false,
            children: Vec::new(),
        }
    }

    pub fn layout(path: &'static str, access: RouteAccess, children: Vec<RouteRecord>) -> Self {
        Self {
            name: None,
            path,
            access,
            redirect: None,
            sidebar: false,
            children,
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.access.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    pub fn redirect_to(mut self, to: RouteName) -> Self {
        self.redirect = Some(to);
        self
    }

    pub fn in_sidebar(mut self) -> Self {
        self.sidebar = true;
        self
    }
}

/// The console's route table.
pub fn table() -> Vec<RouteRecord> {
    vec![
        RouteRecord::layout(
            "/",
            RouteAccess::authenticated(),
            vec![
                RouteRecord::new(RouteName::Home, "/").redirect_to(RouteName::Dashboard),
                RouteRecord::new(RouteName::Dashboard, "/dashboard").in_sidebar(),
                RouteRecord::new(RouteName::Products, "/products")
                    .with_roles([Role::ADMIN, Role::STOCK_CLERK])
                    .in_sidebar(),
                RouteRecord::new(RouteName::Users, "/users")
                    .with_roles([Role::ADMIN])
                    .in_sidebar(),
                RouteRecord::new(RouteName::SaleReports, "/sale-reports")
                    .with_roles([Role::ADMIN])
                    .in_sidebar(),
                RouteRecord::new(RouteName::Cashier, "/cashier")
                    .with_roles([Role::CASHIER, Role::ADMIN])
                    .in_sidebar(),
            ],
        ),
        RouteRecord::new(RouteName::Login, "/login"),
        RouteRecord::new(RouteName::Unauthorized, "/unauthorized"),
    ]
}

/// A named route with its access requirements accumulated over every matched
/// ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: RouteName,
    pub path: &'static str,
    pub access: RouteAccess,
    pub redirect: Option<RouteName>,
    pub sidebar: bool,
}

/// Result of a committed navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub from: Option<RouteName>,
    pub requested: RouteName,
    pub landed: RouteName,
}

impl NavigationOutcome {
    pub fn was_redirected(&self) -> bool {
        self.requested != self.landed
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    NotFound(String),

    #[error("navigation to '{requested}' exceeded the redirect limit")]
    RedirectLoop { requested: RouteName },
}

/// Route table plus the current location.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<RouteRecord>,
    current: Option<RouteName>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_routes(table())
    }

    pub fn with_routes(routes: Vec<RouteRecord>) -> Self {
        Self {
            routes,
            current: None,
        }
    }

    /// The committed location, `None` before the first navigation.
    pub fn current(&self) -> Option<RouteName> {
        self.current
    }

    pub fn resolve(&self, name: RouteName) -> Option<ResolvedRoute> {
        find(&self.routes, &RouteAccess::public(), &|record: &RouteRecord| {
            record.name == Some(name)
        })
    }

    /// Resolve a location path. Query string, fragment and a trailing slash are ignored.
    pub fn resolve_path(&self, path: &str) -> Option<ResolvedRoute> {
        let path = normalize_path(path);
        find(&self.routes, &RouteAccess::public(), &|record: &RouteRecord| {
            record.name.is_some() && record.path == path
        })
    }

    /// Navigate to `to`, consulting the gate.
    ///
    /// Record redirects are applied before the gate, as are gate redirects
    /// themselves, until a route is allowed.
    pub fn push<V>(&mut self, to: RouteName, session: &V) -> Result<NavigationOutcome, NavigationError>
    where
        V: SessionView + ?Sized,
    {
        let mut target = to;
        for _ in 0..=MAX_REDIRECTS {
            let route = self
                .resolve(target)
                .ok_or_else(|| NavigationError::NotFound(target.to_string()))?;

            if let Some(next) = route.redirect {
                target = next;
                continue;
            }

            match authorize_navigation(&route, session) {
                NavigationDecision::Allow => {
                    let outcome = NavigationOutcome {
                        from: self.current,
                        requested: to,
                        landed: target,
                    };
                    self.current = Some(target);
                    tracing::debug!(
                        from = ?outcome.from,
                        requested = %to,
                        landed = %target,
                        "navigation committed"
                    );
                    return Ok(outcome);
                }
                NavigationDecision::Redirect(next) => target = next,
            }
        }

        tracing::warn!(requested = %to, "navigation abandoned after too many redirects");
        Err(NavigationError::RedirectLoop { requested: to })
    }

    pub fn push_path<V>(&mut self, path: &str, session: &V) -> Result<NavigationOutcome, NavigationError>
    where
        V: SessionView + ?Sized,
    {
        let route = self
            .resolve_path(path)
            .ok_or_else(|| NavigationError::NotFound(path.to_string()))?;
        self.push(route.name, session)
    }

    /// Sidebar entries the session may open, in table order.
    pub fn sidebar<V>(&self, session: &V) -> Vec<ResolvedRoute>
    where
        V: SessionView + ?Sized,
    {
        let mut entries = Vec::new();
        collect_sidebar(&self.routes, &RouteAccess::public(), &mut entries);
        entries.retain(|route| authorize_navigation(route, session) == NavigationDecision::Allow);
        entries
    }
}

fn find(
    records: &[RouteRecord],
    inherited: &RouteAccess,
    matches: &dyn Fn(&RouteRecord) -> bool,
) -> Option<ResolvedRoute> {
    for record in records {
        let access = inherited.nest(&record.access);
        if matches(record) {
            if let Some(name) = record.name {
                return Some(ResolvedRoute {
                    name,
                    path: record.path,
                    access,
                    redirect: record.redirect,
                    sidebar: record.sidebar,
                });
            }
        }
        if let Some(found) = find(&record.children, &access, matches) {
            return Some(found);
        }
    }
    None
}

fn collect_sidebar(records: &[RouteRecord], inherited: &RouteAccess, out: &mut Vec<ResolvedRoute>) {
    for record in records {
        let access = inherited.nest(&record.access);
        if let (Some(name), true) = (record.name, record.sidebar) {
            out.push(ResolvedRoute {
                name,
                path: record.path,
                access: access.clone(),
                redirect: record.redirect,
                sidebar: true,
            });
        }
        collect_sidebar(&record.children, &access, out);
    }
}

fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
