use std::fmt;

/// Fields of a GetDeviceInformation reply. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInformation {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub firmware_version: Option<String>,
    pub serial_number: Option<String>,
    pub hardware_id: Option<String>,
}

/// Service XAddrs advertised by GetCapabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAddresses {
    pub device: Option<String>,
    pub media: Option<String>,
    pub imaging: Option<String>,
}

/// One media profile from GetProfiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    pub token: Option<String>,
    pub name: Option<String>,
}

/// The MediaUri of a GetStreamUri reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUri {
    pub uri: Option<String>,
    pub timeout: Option<String>,
}

fn write_field(f: &mut fmt::Formatter<'_>, label: &str, value: &Option<String>) -> fmt::Result {
    match value {
        Some(value) => writeln!(f, "  {}: {}", label, value),
        None => Ok(()),
    }
}

impl fmt::Display for DeviceInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_field(f, "Manufacturer", &self.manufacturer)?;
        write_field(f, "Model", &self.model)?;
        write_field(f, "Firmware", &self.firmware_version)?;
        write_field(f, "Serial Number", &self.serial_number)?;
        write_field(f, "Hardware ID", &self.hardware_id)
    }
}

impl fmt::Display for ServiceAddresses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_field(f, "Device Service", &self.device)?;
        write_field(f, "Media Service", &self.media)?;
        write_field(f, "Imaging Service", &self.imaging)
    }
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_field(f, "Profile Token", &self.token)?;
        write_field(f, "Profile Name", &self.name)
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_field(f, "Stream URI", &self.uri)?;
        write_field(f, "Timeout", &self.timeout)
    }
}
