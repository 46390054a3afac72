use crate::onvif::types::{DeviceInformation, ServiceAddresses};
use crate::onvif::xml::{QName, XmlDocument};
use crate::onvif::{DEVICE_NS, SCHEMA_NS};

/// Field extraction for device service replies.
pub struct DeviceService;

impl DeviceService {
    pub fn parse_device_information(document: &XmlDocument) -> DeviceInformation {
        let field = |local| {
            document
                .root()
                .find_text(QName::new(DEVICE_NS, local))
                .map(str::to_string)
        };

        DeviceInformation {
            manufacturer: field("Manufacturer"),
            model: field("Model"),
            firmware_version: field("FirmwareVersion"),
            serial_number: field("SerialNumber"),
            hardware_id: field("HardwareId"),
        }
    }

    pub fn parse_capabilities(document: &XmlDocument) -> ServiceAddresses {
        let xaddr = |category| {
            document
                .root()
                .find_path(&[
                    QName::new(SCHEMA_NS, category),
                    QName::new(SCHEMA_NS, "XAddr"),
                ])
                .map(|e| e.text().to_string())
        };

        ServiceAddresses {
            device: xaddr("Device"),
            media: xaddr("Media"),
            imaging: xaddr("Imaging"),
        }
    }
}
