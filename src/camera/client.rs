use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::camera::Endpoints;
use crate::onvif::SoapRequest;

pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

/// Status and body of one SOAP exchange.
#[derive(Debug, Clone)]
pub struct SoapResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Posts SOAP envelopes to the camera's service endpoints. One request per
/// call, no retries.
#[derive(Clone)]
pub struct CameraClient {
    endpoints: Endpoints,
    http_client: Client,
}

impl CameraClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoints,
            http_client,
        })
    }

    pub async fn send_soap_request(&self, request: &SoapRequest) -> Result<SoapResponse, reqwest::Error> {
        let url = self.endpoints.url(request.service());
        let envelope = request.envelope();

        tracing::debug!("Sending {} to {}", request.name(), url);
        tracing::trace!("SOAP request: {}", envelope);

        let response = self
            .http_client
            .post(url)
            .header("Content-Type", SOAP_CONTENT_TYPE)
            .header("SOAPAction", request.soap_action_header())
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Camera returned error status {} for {}", status, request.name());
        }

        tracing::trace!("Received SOAP response from camera: {}", body);

        Ok(SoapResponse { status, body })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}
