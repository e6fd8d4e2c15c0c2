//! The client-side authentication gate of FluxFinance, kept as a pure state
//! machine: every browser-ish happening is an [`Event`], every outside action
//! the shell must perform is an [`Effect`], and [`AuthGate::handle`] is the
//! only transition function. The rendering shell (DOM, TUI, tests) feeds
//! events in, executes effects, and draws whatever [`AuthGate::view`] says.
//!
//! The gate trusts a stored credential client-side until logout; only the
//! server decides whether API calls made with it succeed.

mod form;
mod gate;
mod route;

pub use form::{FormField, InvoiceForm, InvoicePayload, preview_sum, round2};
pub use gate::{AuthGate, AuthState, Effect, Event, InvoiceSummary, SignInControl, View};
pub use route::Route;
