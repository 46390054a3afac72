use crate::onvif::Service;

/// Service URLs of the camera under test, derived once from `http://{ip}:{port}`.
/// Nothing is validated; a bad host only shows up as transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base: String,
    pub device: String,
    pub media: String,
    pub imaging: String,
}

impl Endpoints {
    pub fn new(address: &str, port: u16) -> Self {
        let base = format!("http://{}:{}", address, port);
        Self {
            device: format!("{}{}", base, Service::Device.path()),
            media: format!("{}{}", base, Service::Media.path()),
            imaging: format!("{}{}", base, Service::Imaging.path()),
            base,
        }
    }

    pub fn url(&self, service: Service) -> &str {
        match service {
            Service::Device => &self.device,
            Service::Media => &self.media,
            Service::Imaging => &self.imaging,
        }
    }
}
