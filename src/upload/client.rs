use crate::settings::Settings;
use crate::upload::types::{
    interpret_response, RegistrationError, RegistrationForm, RegistrationReceipt,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

/// Anything able to deliver a registration form and report how it went.
#[async_trait]
pub trait RegistrationTransport: Send + Sync {
    async fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationReceipt, RegistrationError>;
}

#[derive(Clone)]
pub struct RegistrationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RegistrationClient {
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn multipart(form: RegistrationForm) -> Result<Form, RegistrationError> {
        let mut body = Form::new();
        for (name, value) in form.text_parts() {
            body = body.text(name, value.to_string());
        }

        let photo = Part::bytes(form.photo.bytes)
            .file_name(form.photo.file_name)
            .mime_str(&form.photo.mime_type)
            .map_err(|e| RegistrationError::Transport(format!("invalid photo type: {}", e)))?;

        Ok(body.part("file", photo))
    }
}

#[async_trait]
impl RegistrationTransport for RegistrationClient {
    async fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        tracing::info!(
            endpoint = %self.endpoint,
            file = %form.photo.file_name,
            "sending registration"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(Self::multipart(form)?)
            .send()
            .await
            .map_err(|e| RegistrationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| RegistrationError::Decode(e.to_string()))?;
        tracing::debug!(%status, %body, "registration response");

        interpret_response(status, &body)
    }
}
