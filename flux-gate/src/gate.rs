use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{FormField, InvoiceForm, InvoicePayload};
use crate::route::Route;

/// An invoice as listed by the server; rendered newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub quantity: i32,
    pub payment_method: String,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: f64,
    pub price: f64,
    pub sum: f64,
    pub created_at: DateTime<Utc>,
}

/// Where the gate stands for the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    UnauthenticatedPublic,
    UnauthenticatedProtected,
    Authenticated,
}

/// The sign-in control of whichever form is showing: disabled with a busy
/// label while a submission is in flight, and the last rejection message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInControl {
    pub busy: bool,
    pub error: Option<String>,
}

/// Everything that can happen to the gate, from the shell's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Initial load: the stored credential read back from client storage.
    PageLoaded {
        path: String,
        stored_credential: Option<String>,
    },
    /// Back/forward navigation. Re-runs the gate decision for the new path
    /// without asking the server about the credential again.
    Navigated { path: String },
    SignInSubmitted { email: String, password: String },
    SignInSucceeded { token: String },
    SignInFailed { message: Option<String> },
    LogoutRequested,
    InvoicesLoaded { invoices: Vec<InvoiceSummary> },
    InvoiceFormOpened { today: NaiveDate },
    InvoiceFormCancelled,
    InvoiceFieldChanged { field: FormField, value: String },
    InvoiceSubmitted,
    InvoiceSaved,
    InvoiceRejected { message: Option<String> },
}

/// Outside actions the shell must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StoreCredential { token: String },
    ClearCredential,
    Navigate { path: String },
    SendSignIn { email: String, password: String },
    FetchInvoices,
    SubmitInvoice { payload: InvoicePayload },
}

/// What the shell should draw. Every protected view also exposes a logout
/// action; the two unauthenticated views carry the sign-in control.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    /// Landing page with an inline sign-in form.
    PublicLanding { sign_in: &'a SignInControl },
    /// Protected content blurred behind a sign-in overlay.
    SignInOverlay { sign_in: &'a SignInControl },
    Dashboard,
    InvoiceList {
        invoices: &'a [InvoiceSummary],
        form: Option<&'a InvoiceForm>,
    },
    InvoiceDetail { id: &'a str },
    ProtectedPlaceholder,
}

const GENERIC_SIGN_IN_ERROR: &str = "email or password is incorrect";
const GENERIC_SAVE_ERROR: &str = "error creating invoice";

pub struct AuthGate {
    credential: Option<String>,
    route: Route,
    sign_in: SignInControl,
    invoices: Vec<InvoiceSummary>,
    form: Option<InvoiceForm>,
    /// Protected path requested before sign-in; the post-sign-in destination.
    intended: Option<Route>,
}

impl AuthGate {
    pub fn new() -> Self {
        Self {
            credential: None,
            route: Route::Home,
            sign_in: SignInControl::default(),
            invoices: Vec::new(),
            form: None,
            intended: None,
        }
    }

    pub fn state(&self) -> AuthState {
        if self.credential.is_some() {
            AuthState::Authenticated
        } else if self.route.is_protected() {
            AuthState::UnauthenticatedProtected
        } else {
            AuthState::UnauthenticatedPublic
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::PageLoaded {
                path,
                stored_credential,
            } => {
                self.credential = stored_credential.filter(|token| !token.is_empty());
                self.enter(Route::parse(&path))
            }
            Event::Navigated { path } => self.enter(Route::parse(&path)),

            Event::SignInSubmitted { email, password } => {
                if self.state() == AuthState::Authenticated || self.sign_in.busy {
                    return Vec::new();
                }
                self.sign_in.busy = true;
                self.sign_in.error = None;
                vec![Effect::SendSignIn { email, password }]
            }
            Event::SignInSucceeded { token } => {
                self.sign_in = SignInControl::default();
                self.credential = Some(token.clone());
                let destination = self.intended.take().unwrap_or(Route::Dashboard);
                let mut effects = vec![
                    Effect::StoreCredential { token },
                    Effect::Navigate {
                        path: destination.path(),
                    },
                ];
                effects.extend(self.enter(destination));
                effects
            }
            Event::SignInFailed { message } => {
                self.sign_in.busy = false;
                self.sign_in.error =
                    Some(message.unwrap_or_else(|| GENERIC_SIGN_IN_ERROR.to_string()));
                Vec::new()
            }

            Event::LogoutRequested => {
                self.credential = None;
                self.invoices.clear();
                self.form = None;
                self.intended = None;
                let mut effects = vec![Effect::ClearCredential];
                effects.push(Effect::Navigate {
                    path: Route::Home.path(),
                });
                self.route = Route::Home;
                effects
            }

            Event::InvoicesLoaded { invoices } => {
                self.invoices = invoices;
                Vec::new()
            }
            Event::InvoiceFormOpened { today } => {
                if self.state() == AuthState::Authenticated && self.form.is_none() {
                    self.form = Some(InvoiceForm::new(today));
                }
                Vec::new()
            }
            Event::InvoiceFormCancelled => {
                self.form = None;
                Vec::new()
            }
            Event::InvoiceFieldChanged { field, value } => {
                if let Some(form) = &mut self.form {
                    form.set(field, value);
                }
                Vec::new()
            }
            Event::InvoiceSubmitted => match &mut self.form {
                Some(form) if !form.busy => {
                    form.busy = true;
                    form.error = None;
                    vec![Effect::SubmitInvoice {
                        payload: form.payload(),
                    }]
                }
                _ => Vec::new(),
            },
            Event::InvoiceSaved => {
                self.form = None;
                vec![Effect::FetchInvoices]
            }
            Event::InvoiceRejected { message } => {
                if let Some(form) = &mut self.form {
                    form.busy = false;
                    form.error = Some(message.unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string()));
                }
                Vec::new()
            }
        }
    }

    /// Runs the load decision for a route: remember where an unauthenticated
    /// visitor wanted to go, and refresh the list when entering the invoices
    /// page signed in.
    fn enter(&mut self, route: Route) -> Vec<Effect> {
        self.route = route;
        match self.state() {
            AuthState::Authenticated if self.route == Route::Invoices => {
                vec![Effect::FetchInvoices]
            }
            AuthState::UnauthenticatedProtected => {
                self.intended = Some(self.route.clone());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn view(&self) -> View<'_> {
        match self.state() {
            AuthState::UnauthenticatedPublic => View::PublicLanding {
                sign_in: &self.sign_in,
            },
            AuthState::UnauthenticatedProtected => View::SignInOverlay {
                sign_in: &self.sign_in,
            },
            AuthState::Authenticated => match &self.route {
                Route::Home | Route::Dashboard => View::Dashboard,
                Route::Invoices => View::InvoiceList {
                    invoices: &self.invoices,
                    form: self.form.as_ref(),
                },
                Route::InvoiceDetail(id) => View::InvoiceDetail { id },
                Route::Other(_) => View::ProtectedPlaceholder,
            },
        }
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(path: &str, credential: Option<&str>) -> AuthGate {
        let mut gate = AuthGate::new();
        gate.handle(Event::PageLoaded {
            path: path.into(),
            stored_credential: credential.map(String::from),
        });
        gate
    }

    #[test]
    fn stored_credential_authenticates_without_reprompting() {
        let gate = loaded("/dashboard", Some("token-123"));
        assert_eq!(gate.state(), AuthState::Authenticated);
        assert_eq!(gate.view(), View::Dashboard);
    }

    #[test]
    fn protected_path_without_credential_shows_the_overlay() {
        let gate = loaded("/invoices", None);
        assert_eq!(gate.state(), AuthState::UnauthenticatedProtected);
        assert!(matches!(gate.view(), View::SignInOverlay { .. }));
    }

    #[test]
    fn landing_page_without_credential_is_public() {
        let gate = loaded("/", None);
        assert_eq!(gate.state(), AuthState::UnauthenticatedPublic);
        assert!(matches!(gate.view(), View::PublicLanding { .. }));
    }

    #[test]
    fn empty_stored_credential_counts_as_absent() {
        let gate = loaded("/dashboard", Some(""));
        assert_eq!(gate.state(), AuthState::UnauthenticatedProtected);
    }

    #[test]
    fn submitting_sign_in_disables_the_control_and_sends_once() {
        let mut gate = loaded("/", None);
        let effects = gate.handle(Event::SignInSubmitted {
            email: "dev@fluxfinance.test".into(),
            password: "hunter2!".into(),
        });
        assert_eq!(
            effects,
            vec![Effect::SendSignIn {
                email: "dev@fluxfinance.test".into(),
                password: "hunter2!".into(),
            }]
        );
        assert!(matches!(
            gate.view(),
            View::PublicLanding {
                sign_in: SignInControl { busy: true, .. }
            }
        ));

        // A second click while in flight does nothing.
        let effects = gate.handle(Event::SignInSubmitted {
            email: "dev@fluxfinance.test".into(),
            password: "hunter2!".into(),
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn rejection_shows_the_server_message_and_reenables() {
        let mut gate = loaded("/", None);
        gate.handle(Event::SignInSubmitted {
            email: "a".into(),
            password: "b".into(),
        });
        gate.handle(Event::SignInFailed {
            message: Some("account locked".into()),
        });

        match gate.view() {
            View::PublicLanding { sign_in } => {
                assert!(!sign_in.busy);
                assert_eq!(sign_in.error.as_deref(), Some("account locked"));
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert_eq!(gate.state(), AuthState::UnauthenticatedPublic);
    }

    #[test]
    fn rejection_without_message_falls_back_to_the_generic_one() {
        let mut gate = loaded("/", None);
        gate.handle(Event::SignInSubmitted {
            email: "a".into(),
            password: "b".into(),
        });
        gate.handle(Event::SignInFailed { message: None });
        match gate.view() {
            View::PublicLanding { sign_in } => {
                assert_eq!(sign_in.error.as_deref(), Some("email or password is incorrect"));
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn success_stores_the_token_and_navigates_to_the_intended_path() {
        let mut gate = loaded("/invoices", None);
        gate.handle(Event::SignInSubmitted {
            email: "a".into(),
            password: "b".into(),
        });
        let effects = gate.handle(Event::SignInSucceeded {
            token: "token-123".into(),
        });

        assert_eq!(
            effects,
            vec![
                Effect::StoreCredential {
                    token: "token-123".into()
                },
                Effect::Navigate {
                    path: "/invoices".into()
                },
                Effect::FetchInvoices,
            ]
        );
        assert_eq!(gate.state(), AuthState::Authenticated);
    }

    #[test]
    fn success_from_the_landing_page_goes_to_the_dashboard() {
        let mut gate = loaded("/", None);
        gate.handle(Event::SignInSubmitted {
            email: "a".into(),
            password: "b".into(),
        });
        let effects = gate.handle(Event::SignInSucceeded {
            token: "token-123".into(),
        });
        assert!(effects.contains(&Effect::Navigate {
            path: "/dashboard".into()
        }));
        assert_eq!(gate.view(), View::Dashboard);
    }

    #[test]
    fn logout_clears_the_credential_and_returns_to_the_landing_page() {
        let mut gate = loaded("/dashboard", Some("token-123"));
        let effects = gate.handle(Event::LogoutRequested);
        assert_eq!(
            effects,
            vec![
                Effect::ClearCredential,
                Effect::Navigate { path: "/".into() }
            ]
        );
        assert_eq!(gate.state(), AuthState::UnauthenticatedPublic);

        // The next protected load prompts again.
        gate.handle(Event::Navigated {
            path: "/dashboard".into(),
        });
        assert_eq!(gate.state(), AuthState::UnauthenticatedProtected);
    }

    #[test]
    fn back_forward_navigation_reuses_the_stored_credential() {
        let mut gate = loaded("/dashboard", Some("token-123"));
        let effects = gate.handle(Event::Navigated {
            path: "/invoices".into(),
        });
        // Only the list fetch; no credential re-check against the server.
        assert_eq!(effects, vec![Effect::FetchInvoices]);
        assert_eq!(gate.state(), AuthState::Authenticated);

        gate.handle(Event::Navigated { path: "/".into() });
        assert_eq!(gate.state(), AuthState::Authenticated);
    }

    #[test]
    fn unknown_protected_paths_render_the_placeholder_when_signed_in() {
        let gate = loaded("/reports/2024", Some("token-123"));
        assert_eq!(gate.view(), View::ProtectedPlaceholder);
    }

    #[test]
    fn invoice_detail_id_comes_from_the_path() {
        let gate = loaded("/invoices/42", Some("token-123"));
        assert_eq!(gate.view(), View::InvoiceDetail { id: "42" });
    }

    #[test]
    fn form_opens_prefilled_and_submits_busy() {
        let mut gate = loaded("/invoices", Some("token-123"));
        gate.handle(Event::InvoiceFormOpened {
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        });
        gate.handle(Event::InvoiceFieldChanged {
            field: FormField::Description,
            value: "Office supplies".into(),
        });
        gate.handle(Event::InvoiceFieldChanged {
            field: FormField::Quantity,
            value: "2".into(),
        });

        let effects = gate.handle(Event::InvoiceSubmitted);
        match &effects[..] {
            [Effect::SubmitInvoice { payload }] => {
                assert_eq!(payload.date, "2024-01-15");
                assert_eq!(payload.quantity, Some(2));
            }
            other => panic!("unexpected effects {other:?}"),
        }

        // Submit control disabled while in flight.
        assert!(gate.handle(Event::InvoiceSubmitted).is_empty());
    }

    #[test]
    fn rejected_save_keeps_the_form_open_with_the_message() {
        let mut gate = loaded("/invoices", Some("token-123"));
        gate.handle(Event::InvoiceFormOpened {
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        });
        gate.handle(Event::InvoiceSubmitted);
        gate.handle(Event::InvoiceRejected {
            message: Some("quantity must be a positive integer".into()),
        });

        match gate.view() {
            View::InvoiceList { form: Some(form), .. } => {
                assert!(!form.busy);
                assert_eq!(
                    form.error.as_deref(),
                    Some("quantity must be a positive integer")
                );
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn saved_invoice_closes_the_form_and_refreshes_the_list() {
        let mut gate = loaded("/invoices", Some("token-123"));
        gate.handle(Event::InvoiceFormOpened {
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        });
        gate.handle(Event::InvoiceSubmitted);
        let effects = gate.handle(Event::InvoiceSaved);
        assert_eq!(effects, vec![Effect::FetchInvoices]);
        assert!(matches!(
            gate.view(),
            View::InvoiceList { form: None, .. }
        ));
    }

    #[test]
    fn form_cannot_open_unauthenticated() {
        let mut gate = loaded("/invoices", None);
        gate.handle(Event::InvoiceFormOpened {
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        });
        assert!(matches!(gate.view(), View::SignInOverlay { .. }));
    }
}
