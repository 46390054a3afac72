use std::fmt;

use crate::onvif::xml::{QName, XmlDocument};
use crate::onvif::{DEVICE_NS, MEDIA_NS, SOAP_ENV_NS};

/// Which service endpoint of the camera a request is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Device,
    Media,
    Imaging,
}

impl Service {
    pub fn path(self) -> &'static str {
        match self {
            Service::Device => "/onvif/device_service",
            Service::Media => "/onvif/media_service",
            Service::Imaging => "/onvif/imaging_service",
        }
    }
}

/// The ONVIF requests the tester sends. Every envelope is a fixed template;
/// only the GetStreamUri profile token varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapRequest {
    GetDeviceInformation,
    GetCapabilities,
    GetProfiles,
    GetStreamUri { profile_token: String },
}

impl SoapRequest {
    pub fn name(&self) -> &'static str {
        match self {
            SoapRequest::GetDeviceInformation => "GetDeviceInformation",
            SoapRequest::GetCapabilities => "GetCapabilities",
            SoapRequest::GetProfiles => "GetProfiles",
            SoapRequest::GetStreamUri { .. } => "GetStreamUri",
        }
    }

    pub fn service(&self) -> Service {
        match self {
            SoapRequest::GetDeviceInformation | SoapRequest::GetCapabilities => Service::Device,
            SoapRequest::GetProfiles | SoapRequest::GetStreamUri { .. } => Service::Media,
        }
    }

    /// The operation URI, e.g. `http://www.onvif.org/ver10/device/wsdl/GetCapabilities`.
    pub fn action(&self) -> String {
        let namespace = match self {
            SoapRequest::GetDeviceInformation | SoapRequest::GetCapabilities => DEVICE_NS,
            SoapRequest::GetProfiles | SoapRequest::GetStreamUri { .. } => MEDIA_NS,
        };
        format!("{}/{}", namespace, self.name())
    }

    /// Value for the `SOAPAction` header, quoted as devices expect it.
    pub fn soap_action_header(&self) -> String {
        format!("\"{}\"", self.action())
    }

    pub fn envelope(&self) -> String {
        match self {
            SoapRequest::GetDeviceInformation => r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:tds="http://www.onvif.org/ver10/device/wsdl">
    <soap:Body>
        <tds:GetDeviceInformation/>
    </soap:Body>
</soap:Envelope>"#
                .to_string(),
            SoapRequest::GetCapabilities => r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:tds="http://www.onvif.org/ver10/device/wsdl">
    <soap:Body>
        <tds:GetCapabilities/>
    </soap:Body>
</soap:Envelope>"#
                .to_string(),
            SoapRequest::GetProfiles => r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:trt="http://www.onvif.org/ver10/media/wsdl">
    <soap:Body>
        <trt:GetProfiles/>
    </soap:Body>
</soap:Envelope>"#
                .to_string(),
            // The tt prefix stays undeclared; firmware under test accepts this exact body.
            SoapRequest::GetStreamUri { profile_token } => format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:trt="http://www.onvif.org/ver10/media/wsdl">
    <soap:Body>
        <trt:GetStreamUri>
            <trt:StreamSetup>
                <tt:Stream>RTP-Unicast</tt:Stream>
                <tt:Transport>
                    <tt:Protocol>RTSP</tt:Protocol>
                </tt:Transport>
            </trt:StreamSetup>
            <trt:ProfileToken>{}</trt:ProfileToken>
        </trt:GetStreamUri>
    </soap:Body>
</soap:Envelope>"#,
                profile_token
            ),
        }
    }
}

/// A SOAP 1.2 `Fault` carried in a reply body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub code: Option<String>,
    pub reason: Option<String>,
}

impl SoapFault {
    const FAULT: QName<'static> = QName::new(SOAP_ENV_NS, "Fault");
    const CODE_VALUE: [QName<'static>; 2] = [
        QName::new(SOAP_ENV_NS, "Code"),
        QName::new(SOAP_ENV_NS, "Value"),
    ];
    const REASON_TEXT: [QName<'static>; 2] = [
        QName::new(SOAP_ENV_NS, "Reason"),
        QName::new(SOAP_ENV_NS, "Text"),
    ];

    pub fn from_document(document: &XmlDocument) -> Option<Self> {
        let fault = document.root().find(Self::FAULT)?;
        let text = |path: &[QName<'_>]| fault.find_path(path).map(|e| e.text().to_string());

        Some(SoapFault {
            code: text(&Self::CODE_VALUE),
            reason: text(&Self::REASON_TEXT),
        })
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.reason) {
            (Some(code), Some(reason)) => write!(f, "{} ({})", reason, code),
            (None, Some(reason)) => write!(f, "{}", reason),
            (Some(code), None) => write!(f, "{}", code),
            (None, None) => write!(f, "unspecified fault"),
        }
    }
}

/// Local name of the first element inside the SOAP `Body`, e.g. `GetProfilesResponse`.
pub fn body_action(document: &XmlDocument) -> Option<&str> {
    document
        .root()
        .find(QName::new(SOAP_ENV_NS, "Body"))?
        .children()
        .next()
        .map(|e| e.local_name())
}
