pub mod device;
pub mod media;
pub mod soap;
pub mod types;
pub mod xml;

pub const SOAP_ENV_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const DEVICE_NS: &str = "http://www.onvif.org/ver10/device/wsdl";
pub const MEDIA_NS: &str = "http://www.onvif.org/ver10/media/wsdl";
pub const SCHEMA_NS: &str = "http://www.onvif.org/ver10/schema";

pub use device::DeviceService;
pub use media::MediaService;
pub use soap::{Service, SoapFault, SoapRequest};
pub use types::{DeviceInformation, MediaUri, ProfileSummary, ServiceAddresses};
pub use xml::{Element, QName, XmlDocument};
