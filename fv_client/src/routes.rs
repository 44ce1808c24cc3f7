use std::fmt;

/// Errors that can occur during route parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Shared-file route missing its share identifier.
    MissingShareId,
    /// Unrecognized route.
    UnknownRoute(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingShareId => {
                write!(f, "Shared file route requires an id (e.g. '/files/shared/abc123')")
            }
            Self::UnknownRoute(path) => write!(f, "Unknown route '{}'", path),
        }
    }
}

impl std::error::Error for RouteError {}

/// Client-side navigation target.
///
/// Mirrors the route surface of the application: every screen the UI can
/// show corresponds to exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: login form
    Login,
    /// `/register`: registration form
    Register,
    /// `/mfa/enable`: MFA opt-in screen
    MfaEnable,
    /// `/mfa/verify`: QR + six-digit code entry
    MfaVerify,
    /// `/home`: file table
    Home,
    /// `/users`: admin roster (gated)
    Users,
    /// `/files/shared/:shareId`: shared file viewer
    SharedFile(String),
}

impl Route {
    /// Parse a path string into a route.
    ///
    /// # Examples
    ///
    /// ```
    /// use fv_client::routes::Route;
    ///
    /// assert_eq!(Route::parse("/"), Ok(Route::Login));
    /// assert_eq!(Route::parse("/mfa/verify"), Ok(Route::MfaVerify));
    /// assert_eq!(
    ///     Route::parse("/files/shared/abc123"),
    ///     Ok(Route::SharedFile("abc123".to_string()))
    /// );
    /// ```
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let trimmed = input.trim();
        let path = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);

        match path {
            "/" | "" => return Ok(Self::Login),
            "/register" => return Ok(Self::Register),
            "/mfa/enable" => return Ok(Self::MfaEnable),
            "/mfa/verify" => return Ok(Self::MfaVerify),
            "/home" => return Ok(Self::Home),
            "/users" => return Ok(Self::Users),
            "/files/shared" => return Err(RouteError::MissingShareId),
            _ => {}
        }

        if let Some(share_id) = path.strip_prefix("/files/shared/") {
            if share_id.is_empty() || share_id.contains('/') {
                return Err(RouteError::MissingShareId);
            }
            return Ok(Self::SharedFile(share_id.to_string()));
        }

        Err(RouteError::UnknownRoute(trimmed.to_string()))
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/".to_string(),
            Self::Register => "/register".to_string(),
            Self::MfaEnable => "/mfa/enable".to_string(),
            Self::MfaVerify => "/mfa/verify".to_string(),
            Self::Home => "/home".to_string(),
            Self::Users => "/users".to_string(),
            Self::SharedFile(share_id) => format!("/files/shared/{share_id}"),
        }
    }

    /// Whether this route is restricted to administrators
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Users)
    }

    /// Apply the admin gate: non-admins asking for a gated route are
    /// redirected to the home screen.
    pub fn resolve(self, is_admin: bool) -> Self {
        if self.requires_admin() && !is_admin {
            Self::Home
        } else {
            self
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Build the full shareable link displayed after a share succeeds
pub fn share_link(origin: &str, share_id: &str) -> String {
    format!("{}/files/shared/{}", origin.trim_end_matches('/'), share_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Fixed routes ===

    #[test]
    fn test_parse_login() {
        assert_eq!(Route::parse("/"), Ok(Route::Login));
    }

    #[test]
    fn test_parse_register() {
        assert_eq!(Route::parse("/register"), Ok(Route::Register));
    }

    #[test]
    fn test_parse_mfa_routes() {
        assert_eq!(Route::parse("/mfa/enable"), Ok(Route::MfaEnable));
        assert_eq!(Route::parse("/mfa/verify"), Ok(Route::MfaVerify));
    }

    #[test]
    fn test_parse_home_and_users() {
        assert_eq!(Route::parse("/home"), Ok(Route::Home));
        assert_eq!(Route::parse("/users"), Ok(Route::Users));
    }

    // === Shared-file route ===

    #[test]
    fn test_parse_shared_file() {
        assert_eq!(
            Route::parse("/files/shared/abc123"),
            Ok(Route::SharedFile("abc123".to_string()))
        );
    }

    #[test]
    fn test_parse_shared_file_without_id() {
        assert_eq!(Route::parse("/files/shared/"), Err(RouteError::MissingShareId));
        assert_eq!(Route::parse("/files/shared"), Err(RouteError::MissingShareId));
    }

    #[test]
    fn test_parse_shared_file_with_nested_path() {
        let result = Route::parse("/files/shared/a/b");
        assert_eq!(result, Err(RouteError::MissingShareId));
    }

    // === Normalization ===

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(Route::parse("  /home  "), Ok(Route::Home));
    }

    #[test]
    fn test_parse_with_trailing_slash() {
        assert_eq!(Route::parse("/register/"), Ok(Route::Register));
        assert_eq!(Route::parse("/mfa/enable/"), Ok(Route::MfaEnable));
    }

    // === Errors ===

    #[test]
    fn test_parse_unknown_route() {
        let result = Route::parse("/nope");
        assert_eq!(result, Err(RouteError::UnknownRoute("/nope".to_string())));
    }

    #[test]
    fn test_parse_relative_path_rejected() {
        assert!(matches!(Route::parse("home"), Err(RouteError::UnknownRoute(_))));
    }

    // === Round trip ===

    #[test]
    fn test_path_round_trip() {
        let routes = [
            Route::Login,
            Route::Register,
            Route::MfaEnable,
            Route::MfaVerify,
            Route::Home,
            Route::Users,
            Route::SharedFile("xyz".to_string()),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Ok(route.clone()));
        }
    }

    // === Admin gate ===

    #[test]
    fn test_users_route_requires_admin() {
        assert!(Route::Users.requires_admin());
        assert!(!Route::Home.requires_admin());
    }

    #[test]
    fn test_resolve_redirects_non_admin_to_home() {
        assert_eq!(Route::Users.resolve(false), Route::Home);
        assert_eq!(Route::Users.resolve(true), Route::Users);
        assert_eq!(Route::Home.resolve(false), Route::Home);
    }

    // === Share links ===

    #[test]
    fn test_share_link() {
        assert_eq!(
            share_link("http://localhost:5173", "abc123"),
            "http://localhost:5173/files/shared/abc123"
        );
        assert_eq!(
            share_link("http://localhost:5173/", "abc123"),
            "http://localhost:5173/files/shared/abc123"
        );
    }
}
