/// Client-side interpretation of the browser path. Only the landing page is
/// public; everything else needs a credential to render unblurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Dashboard,
    Invoices,
    InvoiceDetail(String),
    Other(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/" => Route::Home,
            "/dashboard" => Route::Dashboard,
            "/invoices" => Route::Invoices,
            _ => match trimmed.strip_prefix("/invoices/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Route::InvoiceDetail(id.to_string())
                }
                _ => Route::Other(trimmed.to_string()),
            },
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Home)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Invoices => "/invoices".to_string(),
            Route::InvoiceDetail(id) => format!("/invoices/{}", id),
            Route::Other(path) => path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_parse_to_their_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/dashboard"), Route::Dashboard);
        assert_eq!(Route::parse("/invoices"), Route::Invoices);
        assert_eq!(Route::parse("/invoices/"), Route::Invoices);
        assert_eq!(
            Route::parse("/invoices/42"),
            Route::InvoiceDetail("42".into())
        );
    }

    #[test]
    fn unknown_paths_stay_protected() {
        let route = Route::parse("/reports/2024");
        assert_eq!(route, Route::Other("/reports/2024".into()));
        assert!(route.is_protected());
    }

    #[test]
    fn only_the_landing_page_is_public() {
        assert!(!Route::parse("/").is_protected());
        assert!(Route::parse("/dashboard").is_protected());
        assert!(Route::parse("/invoices/abc").is_protected());
    }

    #[test]
    fn routes_print_back_to_paths() {
        for path in ["/", "/dashboard", "/invoices", "/invoices/7"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }
}
