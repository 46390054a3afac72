use quick_xml::events::attributes::AttrError;
use reqwest::StatusCode;
use thiserror::Error;

use crate::onvif::soap::SoapFault;

/// Reasons a response body could not be turned into an element tree.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML parsing error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("unbound namespace prefix: {0}")]
    UnboundPrefix(String),

    #[error("document has no root element")]
    NoRootElement,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("closing tag </{0}> has no matching start tag")]
    UnmatchedEnd(String),

    #[error("element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("text content outside the root element")]
    TextOutsideRoot,
}

/// Why a single ONVIF check did not pass.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("device returned {status}: {body}")]
    HttpStatus {
        status: StatusCode,
        body: String,
        fault: Option<SoapFault>,
    },

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("check panicked: {0}")]
    Panicked(String),
}

impl CheckError {
    /// The HTTP status of the reply, when the device answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CheckError::HttpStatus { status, .. } => Some(*status),
            CheckError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
