//! The ONVIF check suite.
//!
//! Each check posts one fixed request, prints what it finds and returns
//! the extracted data or the reason it failed. Checks never abort the
//! suite; a failure only shows up in the [`SuiteReport`].

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use reqwest::StatusCode;

use crate::camera::{CameraClient, Endpoints};
use crate::config::TesterConfig;
use crate::error::CheckError;
use crate::onvif::soap::body_action;
use crate::onvif::{
    DeviceInformation, DeviceService, MediaService, MediaUri, ProfileSummary, ServiceAddresses,
    SoapFault, SoapRequest, XmlDocument,
};

const RULE_WIDTH: usize = 50;

pub struct OnvifTester {
    client: CameraClient,
    profile_token: String,
    discover_profile: bool,
}

impl OnvifTester {
    pub fn new(address: &str, port: u16) -> Result<Self, reqwest::Error> {
        let config = TesterConfig {
            port,
            ..TesterConfig::default()
        };
        Self::with_config(address, &config)
    }

    pub fn with_config(address: &str, config: &TesterConfig) -> Result<Self, reqwest::Error> {
        let endpoints = Endpoints::new(address, config.port);
        Ok(Self {
            client: CameraClient::new(endpoints, config.timeout())?,
            profile_token: config.profile_token.clone(),
            discover_profile: config.discover_profile,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.client.endpoints()
    }

    pub async fn test_device_information(&self) -> Result<DeviceInformation, CheckError> {
        println!("Testing GetDeviceInformation...");
        let request = SoapRequest::GetDeviceInformation;
        let result = self
            .exchange(&request)
            .await
            .map(|doc| DeviceService::parse_device_information(&doc));
        finish(&request, result, |info| print!("{}", info))
    }

    pub async fn test_get_capabilities(&self) -> Result<ServiceAddresses, CheckError> {
        println!("\nTesting GetCapabilities...");
        let request = SoapRequest::GetCapabilities;
        let result = self
            .exchange(&request)
            .await
            .map(|doc| DeviceService::parse_capabilities(&doc));
        finish(&request, result, |addrs| print!("{}", addrs))
    }

    pub async fn test_get_profiles(&self) -> Result<Vec<ProfileSummary>, CheckError> {
        println!("\nTesting GetProfiles...");
        let request = SoapRequest::GetProfiles;
        let result = self
            .exchange(&request)
            .await
            .map(|doc| MediaService::parse_profiles(&doc));
        finish(&request, result, |profiles| {
            for profile in profiles {
                print!("{}", profile);
            }
        })
    }

    /// GetStreamUri with the configured profile token (`Profile_1` unless overridden).
    pub async fn test_get_stream_uri(&self) -> Result<MediaUri, CheckError> {
        self.test_get_stream_uri_for(&self.profile_token).await
    }

    pub async fn test_get_stream_uri_for(&self, profile_token: &str) -> Result<MediaUri, CheckError> {
        println!("\nTesting GetStreamUri...");
        let request = SoapRequest::GetStreamUri {
            profile_token: profile_token.to_string(),
        };
        let result = self
            .exchange(&request)
            .await
            .map(|doc| MediaService::parse_stream_uri(&doc));
        finish(&request, result, |uri| print!("{}", uri))
    }

    /// Runs the four checks in order and prints the summary.
    pub async fn run_suite(&self) -> SuiteReport {
        println!("ONVIF Test Suite for ESP32-CAM at {}", self.endpoints().base);
        println!("{}", "=".repeat(RULE_WIDTH));

        let mut report = SuiteReport::default();

        let device_info = guarded(self.test_device_information()).await;
        report.record("GetDeviceInformation", device_info);

        let capabilities = guarded(self.test_get_capabilities()).await;
        report.record("GetCapabilities", capabilities);

        let profiles = guarded(self.test_get_profiles()).await;
        let profile_token = self.stream_profile_token(&profiles);
        report.record("GetProfiles", profiles);

        let stream_uri = guarded(self.test_get_stream_uri_for(&profile_token)).await;
        report.record("GetStreamUri", stream_uri);

        print!("\n{}", report);
        report
    }

    /// True iff all four checks passed.
    pub async fn run_all_tests(&self) -> bool {
        self.run_suite().await.all_passed()
    }

    fn stream_profile_token(&self, profiles: &Result<Vec<ProfileSummary>, CheckError>) -> String {
        if !self.discover_profile {
            return self.profile_token.clone();
        }

        let discovered = profiles
            .as_ref()
            .ok()
            .and_then(|profiles| profiles.iter().find_map(|p| p.token.clone()));

        match discovered {
            Some(token) => {
                tracing::info!("Using discovered profile token {}", token);
                token
            }
            None => {
                tracing::warn!(
                    "No profile token discovered, falling back to {}",
                    self.profile_token
                );
                self.profile_token.clone()
            }
        }
    }

    async fn exchange(&self, request: &SoapRequest) -> Result<XmlDocument, CheckError> {
        let response = self.client.send_soap_request(request).await?;
        println!("Status Code: {}", response.status.as_u16());

        if response.status != StatusCode::OK {
            let fault = XmlDocument::parse(&response.body)
                .ok()
                .and_then(|doc| SoapFault::from_document(&doc));
            return Err(CheckError::HttpStatus {
                status: response.status,
                body: response.body,
                fault,
            });
        }

        println!("✓ {} successful", request.name());
        let document = XmlDocument::parse(&response.body)?;

        // The firmware answers unsupported calls with a fault and status 200.
        if let Some(fault) = SoapFault::from_document(&document) {
            tracing::warn!("{} reply carries a SOAP fault: {}", request.name(), fault);
        } else if let Some(action) = body_action(&document) {
            tracing::debug!("{} answered with {}", request.name(), action);
        }

        Ok(document)
    }
}

fn finish<T>(
    request: &SoapRequest,
    result: Result<T, CheckError>,
    show: impl FnOnce(&T),
) -> Result<T, CheckError> {
    match &result {
        Ok(value) => show(value),
        Err(CheckError::HttpStatus { body, fault, .. }) => {
            println!("✗ {} failed: {}", request.name(), body);
            if let Some(fault) = fault {
                tracing::info!("{} fault: {}", request.name(), fault);
            }
        }
        Err(e) => println!("✗ {} error: {}", request.name(), e),
    }
    result
}

async fn guarded<T, F>(check: F) -> Result<T, CheckError>
where
    F: Future<Output = Result<T, CheckError>>,
{
    match AssertUnwindSafe(check).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            println!("Test failed with exception: {}", message);
            Err(CheckError::Panicked(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Outcome of a single check within a suite run.
#[derive(Debug)]
pub struct CheckRecord {
    pub name: &'static str,
    pub outcome: Result<(), CheckError>,
}

impl CheckRecord {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub checks: Vec<CheckRecord>,
}

impl SuiteReport {
    fn record<T>(&mut self, name: &'static str, result: Result<T, CheckError>) {
        self.checks.push(CheckRecord {
            name,
            outcome: result.map(|_| ()),
        });
    }

    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed()).count()
    }

    pub fn total(&self) -> usize {
        self.checks.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &CheckError)> {
        self.checks
            .iter()
            .filter_map(|c| c.outcome.as_ref().err().map(|e| (c.name, e)))
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "Test Results: {}/{} tests passed", self.passed(), self.total())?;
        if self.all_passed() {
            writeln!(f, "✓ All ONVIF tests passed! The ESP32-CAM is ONVIF Profile S compliant.")
        } else {
            writeln!(f, "✗ Some ONVIF tests failed. Check the implementation.")
        }
    }
}
