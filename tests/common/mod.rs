//! In-process mock camera that answers ONVIF calls the way the ESP32-CAM
//! firmware does: every reply is a SOAP 1.2 envelope, unsupported actions
//! get a fault with status 200.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub soap_action: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct MockCamera {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockCamera {
    /// A camera answering all four checks like the firmware does.
    pub fn esp32() -> Self {
        Self::default()
            .ok("GetDeviceInformation", device_information_reply("ESP32-CAM", "ESP32-CAM-RTSP-ONVIF", "2.0"))
            .ok("GetCapabilities", capabilities_reply("127.0.0.1:8080"))
            .ok(
                "GetProfiles",
                profiles_reply(&[profile("Profile_1", "Profile_1")]),
            )
            .ok("GetStreamUri", stream_uri_reply("rtsp://127.0.0.1:554/mjpeg/1"))
    }

    pub fn ok(self, action: &str, body: String) -> Self {
        self.reply(action, StatusCode::OK, body)
    }

    pub fn reply(self, action: &str, status: StatusCode, body: impl Into<String>) -> Self {
        self.replies.lock().unwrap().insert(
            action.to_string(),
            Reply {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Starts serving on an ephemeral localhost port.
    pub async fn serve(self) -> SocketAddr {
        let app = Router::new()
            .route("/onvif/device_service", post(handle_service))
            .route("/onvif/media_service", post(handle_service))
            .route("/onvif/imaging_service", post(handle_service))
            .layer(TraceLayer::new_for_http())
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }
}

async fn handle_service(
    State(camera): State<MockCamera>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let soap_action = header("SOAPAction");

    camera.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        soap_action: soap_action.clone(),
        content_type: header("Content-Type"),
        body,
    });

    let action = soap_action
        .as_deref()
        .map(|a| a.trim_matches('"'))
        .and_then(|a| a.rsplit('/').next())
        .unwrap_or_default()
        .to_string();

    let reply = camera.replies.lock().unwrap().get(&action).cloned();
    match reply {
        Some(reply) => (reply.status, reply.body).into_response(),
        None => (StatusCode::OK, fault_reply("soap:Client", "Unsupported action")).into_response(),
    }
}

/// Port that refuses connections.
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

pub fn envelope(action: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:tds="http://www.onvif.org/ver10/device/wsdl" xmlns:trt="http://www.onvif.org/ver10/media/wsdl" xmlns:tt="http://www.onvif.org/ver10/schema">
    <soap:Body>
        <{action}>{body}</{action}>
    </soap:Body>
</soap:Envelope>"#
    )
}

pub fn device_information_reply(manufacturer: &str, model: &str, firmware: &str) -> String {
    envelope(
        "tds:GetDeviceInformationResponse",
        &format!(
            r#"
            <tds:Manufacturer>{manufacturer}</tds:Manufacturer>
            <tds:Model>{model}</tds:Model>
            <tds:FirmwareVersion>{firmware}</tds:FirmwareVersion>
            <tds:SerialNumber>ESP32CAM</tds:SerialNumber>
            <tds:HardwareId>ESP32-CAM</tds:HardwareId>"#
        ),
    )
}

pub fn capabilities_reply(host: &str) -> String {
    envelope(
        "tds:GetCapabilitiesResponse",
        &format!(
            r#"
            <tds:Capabilities>
                <tt:Device>
                    <tt:XAddr>http://{host}/onvif/device_service</tt:XAddr>
                </tt:Device>
                <tt:Media>
                    <tt:XAddr>http://{host}/onvif/media_service</tt:XAddr>
                    <tt:StreamingCapabilities>
                        <tt:RTP_RTSP_TCP>true</tt:RTP_RTSP_TCP>
                    </tt:StreamingCapabilities>
                </tt:Media>
                <tt:Imaging>
                    <tt:XAddr>http://{host}/onvif/imaging_service</tt:XAddr>
                </tt:Imaging>
            </tds:Capabilities>"#
        ),
    )
}

pub fn profile(token: &str, name: &str) -> String {
    format!(
        r#"
            <trt:Profiles token="{token}" fixed="true">
                <tt:Name>{name}</tt:Name>
                <tt:VideoEncoderConfiguration token="VideoEncoderConfig_1">
                    <tt:Name>VideoEncoderConfig_1</tt:Name>
                    <tt:Encoding>JPEG</tt:Encoding>
                </tt:VideoEncoderConfiguration>
            </trt:Profiles>"#
    )
}

pub fn profiles_reply(profiles: &[String]) -> String {
    envelope("trt:GetProfilesResponse", &profiles.concat())
}

pub fn stream_uri_reply(uri: &str) -> String {
    envelope(
        "trt:GetStreamUriResponse",
        &format!(
            r#"
            <trt:MediaUri>
                <tt:Uri>{uri}</tt:Uri>
                <tt:InvalidAfterConnect>false</tt:InvalidAfterConnect>
                <tt:InvalidAfterReboot>false</tt:InvalidAfterReboot>
                <tt:Timeout>PT60S</tt:Timeout>
            </trt:MediaUri>"#
        ),
    )
}

pub fn fault_reply(code: &str, reason: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
    <soap:Body>
        <soap:Fault>
            <soap:Code>
                <soap:Value>{code}</soap:Value>
            </soap:Code>
            <soap:Reason>
                <soap:Text>{reason}</soap:Text>
            </soap:Reason>
        </soap:Fault>
    </soap:Body>
</soap:Envelope>"#
    )
}
