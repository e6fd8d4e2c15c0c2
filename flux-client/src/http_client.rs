use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::FluxClientError;
use crate::{Invoice, NewInvoice, SignedIn};

#[derive(Clone)]
pub struct FluxClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    token: String,
    user_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct InvoiceCreatedResponse {
    invoice: Invoice,
}

#[derive(Debug, Deserialize)]
struct InvoiceListResponse {
    invoices: Vec<Invoice>,
}

impl FluxClient {
    pub fn new(endpoint: &str) -> Result<Self, FluxClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attaches a previously issued bearer token, e.g. one persisted by the
    /// CLI between invocations.
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, FluxClientError> {
        match &self.token {
            Some(token) if !token.is_empty() => Ok(request.bearer_auth(token)),
            _ => Err(FluxClientError::Unauthorized),
        }
    }

    /// Signs in and keeps the issued token for subsequent invoice calls.
    pub async fn sign_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, FluxClientError> {
        let response = self
            .client
            .post(format!("{}/api/sign-in", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FluxClientError::from_http_response(response).await);
        }

        let body: SignInResponse = response.json().await?;
        self.token = Some(body.token.clone());
        Ok(SignedIn {
            token: body.token,
            user_id: body.user_id,
        })
    }

    pub async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, FluxClientError> {
        let request = self
            .client
            .post(format!("{}/api/invoices", self.base_url))
            .json(invoice);
        let response = self.authorized(request)?.send().await?;

        if !response.status().is_success() {
            return Err(FluxClientError::from_http_response(response).await);
        }

        let body: InvoiceCreatedResponse = response.json().await?;
        Ok(body.invoice)
    }

    /// All invoices, newest first, as the server orders them.
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, FluxClientError> {
        let request = self.client.get(format!("{}/api/invoices", self.base_url));
        let response = self.authorized(request)?.send().await?;

        if !response.status().is_success() {
            return Err(FluxClientError::from_http_response(response).await);
        }

        let body: InvoiceListResponse = response.json().await?;
        Ok(body.invoices)
    }
}
