//! Exercises the ONVIF device and media services of an IP camera and
//! reports which of the basic Profile S calls it answers correctly.

pub mod camera;
pub mod config;
pub mod error;
pub mod onvif;
pub mod tester;

pub use config::TesterConfig;
pub use error::{CheckError, XmlError};
pub use tester::{OnvifTester, SuiteReport};
