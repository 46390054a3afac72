use crate::onvif::types::{MediaUri, ProfileSummary};
use crate::onvif::xml::{QName, XmlDocument};
use crate::onvif::{MEDIA_NS, SCHEMA_NS};

const PROFILES: QName<'static> = QName::new(MEDIA_NS, "Profiles");
const NAME: QName<'static> = QName::new(SCHEMA_NS, "Name");
const URI: QName<'static> = QName::new(SCHEMA_NS, "Uri");
const TIMEOUT: QName<'static> = QName::new(SCHEMA_NS, "Timeout");

/// Field extraction for media service replies.
pub struct MediaService;

impl MediaService {
    /// Every `Profiles` element in document order. An empty token attribute
    /// counts as missing.
    pub fn parse_profiles(document: &XmlDocument) -> Vec<ProfileSummary> {
        document
            .root()
            .find_all(PROFILES)
            .map(|profile| ProfileSummary {
                token: profile
                    .attribute("token")
                    .filter(|token| !token.is_empty())
                    .map(str::to_string),
                name: profile.find_text(NAME).map(str::to_string),
            })
            .collect()
    }

    pub fn parse_stream_uri(document: &XmlDocument) -> MediaUri {
        MediaUri {
            uri: document.root().find_text(URI).map(str::to_string),
            timeout: document.root().find_text(TIMEOUT).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles_reply(profiles: &str) -> XmlDocument {
        XmlDocument::parse(&format!(
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:trt="http://www.onvif.org/ver10/media/wsdl" xmlns:tt="http://www.onvif.org/ver10/schema">
    <soap:Body><trt:GetProfilesResponse>{}</trt:GetProfilesResponse></soap:Body>
</soap:Envelope>"#,
            profiles
        ))
        .unwrap()
    }

    #[test]
    fn test_no_profiles() {
        assert!(MediaService::parse_profiles(&profiles_reply("")).is_empty());
    }

    #[test]
    fn test_profile_name_is_first_nested_name() {
        let doc = profiles_reply(
            r#"<trt:Profiles token="Profile_1" fixed="true">
                <tt:Name>Profile_1</tt:Name>
                <tt:VideoSourceConfiguration token="VideoSourceConfig_1">
                    <tt:Name>VideoSourceConfig_1</tt:Name>
                </tt:VideoSourceConfiguration>
            </trt:Profiles>"#,
        );

        assert_eq!(
            MediaService::parse_profiles(&doc),
            vec![ProfileSummary {
                token: Some("Profile_1".to_string()),
                name: Some("Profile_1".to_string()),
            }]
        );
    }

    #[test]
    fn test_many_profiles_in_order() {
        let doc = profiles_reply(
            r#"<trt:Profiles token="main"><tt:Name>Main</tt:Name></trt:Profiles>
               <trt:Profiles token=""><tt:Name>Untokened</tt:Name></trt:Profiles>
               <trt:Profiles token="sub"/>"#,
        );

        let profiles = MediaService::parse_profiles(&doc);
        let summary: Vec<_> = profiles
            .iter()
            .map(|p| (p.token.as_deref(), p.name.as_deref()))
            .collect();
        assert_eq!(
            summary,
            [
                (Some("main"), Some("Main")),
                (None, Some("Untokened")),
                (Some("sub"), None),
            ]
        );
    }

    #[test]
    fn test_parse_stream_uri() {
        let doc = XmlDocument::parse(
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:trt="http://www.onvif.org/ver10/media/wsdl" xmlns:tt="http://www.onvif.org/ver10/schema">
    <soap:Body>
        <trt:GetStreamUriResponse>
            <trt:MediaUri>
                <tt:Uri>rtsp://192.168.1.100:554/mjpeg/1</tt:Uri>
                <tt:InvalidAfterConnect>false</tt:InvalidAfterConnect>
                <tt:Timeout>PT60S</tt:Timeout>
            </trt:MediaUri>
        </trt:GetStreamUriResponse>
    </soap:Body>
</soap:Envelope>"#,
        )
        .unwrap();

        let uri = MediaService::parse_stream_uri(&doc);
        assert_eq!(uri.uri.as_deref(), Some("rtsp://192.168.1.100:554/mjpeg/1"));
        assert_eq!(uri.timeout.as_deref(), Some("PT60S"));
    }
}
