use std::fmt;

/// Pages of the employee application, addressed by location hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Something able to move the application to another page
pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Navigator that switches pages by rewriting `window.location`'s hash
#[derive(Debug, Clone, Copy, Default)]
pub struct HashNavigator;

impl Navigator for HashNavigator {
    fn navigate(&self, route: Route) {
        let Some(window) = web_sys::window() else {
            log::error!("No window available to navigate to {}", route);
            return;
        };
        let location = window.location();
        let result = match route {
            Route::Login => location.set_hash(""),
            _ => location.set_hash(route.path()),
        };
        if let Err(e) = result {
            log::error!("Failed to navigate to {}: {:?}", route, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/");
        assert_eq!(Route::Bills.path(), "#employee/bills");
        assert_eq!(Route::NewBill.path(), "#employee/bill/new");
        assert_eq!(Route::Dashboard.to_string(), "#admin/dashboard");
    }
}
