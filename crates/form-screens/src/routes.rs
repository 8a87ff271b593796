use std::fmt;

/// Screens reachable through the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Employee,
    Auth,
    SignIn,
    SignUp,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Employee, Route::Auth, Route::SignIn, Route::SignUp];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Employee => "/",
            Route::Auth => "/auth",
            Route::SignIn => "/auth/signin",
            Route::SignUp => "/auth/signup",
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Employee => "Employee Form",
            Route::Auth => "Authentication",
            Route::SignIn => "Sign In",
            Route::SignUp => "Sign Up",
        }
    }

    /// Short name typed in the shell.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Employee => "employee",
            Route::Auth => "auth",
            Route::SignIn => "signin",
            Route::SignUp => "signup",
        }
    }

    /// Looks a route up by short name (case and spaces ignored) or by path.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(route) = Route::parse(name) {
            return Some(route);
        }
        let normalized = name.trim().to_lowercase().replace(' ', "");
        Route::ALL
            .into_iter()
            .find(|route| route.name() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Bottom tabs of the app layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Employee,
    Auth,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Employee, Tab::Auth];

    pub fn title(&self) -> &'static str {
        self.route().title()
    }

    pub fn route(&self) -> Route {
        match self {
            Tab::Employee => Route::Employee,
            Tab::Auth => Route::Auth,
        }
    }

    /// The tab whose root screen is `route`, if any.
    pub fn for_route(route: Route) -> Option<Tab> {
        Tab::ALL.into_iter().find(|tab| tab.route() == route)
    }
}
