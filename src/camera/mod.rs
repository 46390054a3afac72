pub mod client;
pub mod endpoints;

pub use client::{CameraClient, SoapResponse};
pub use endpoints::Endpoints;
