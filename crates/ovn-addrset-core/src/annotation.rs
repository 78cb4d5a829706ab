//! Pod network annotation decoding
//!
//! The controller stores the network assigned to each pod as a JSON
//! annotation of the form:
//!
//! ```json
//! {"ip_address": "10.244.1.5/24", "mac_address": "0a:58:0a:f4:01:05"}
//! ```
//!
//! [`OvnAnnotation::parse`] is the typed, error-returning decoder.
//! [`extract_ip`] and [`extract_mac`] wrap it for callers that only want the
//! value and treat any decode failure as "no value" (the failure is logged).

use std::collections::HashMap;
use tracing::error;

use crate::error::{Error, Result};

/// Key holding the `ip/mask` assignment
pub const IP_ADDRESS_KEY: &str = "ip_address";

/// Key holding the MAC assignment
pub const MAC_ADDRESS_KEY: &str = "mac_address";

/// Decoded pod network annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OvnAnnotation {
    /// Raw `ip_address` value (`ip/mask`)
    pub ip_address: Option<String>,
    /// Raw `mac_address` value
    pub mac_address: Option<String>,
}

impl OvnAnnotation {
    /// Parse an annotation string
    ///
    /// The annotation must be a JSON object whose values are all strings.
    pub fn parse(annotation: &str) -> Result<Self> {
        let mut fields: HashMap<String, String> = serde_json::from_str(annotation)?;
        Ok(Self {
            ip_address: fields.remove(IP_ADDRESS_KEY),
            mac_address: fields.remove(MAC_ADDRESS_KEY),
        })
    }

    /// IP part of `ip_address`
    ///
    /// The value must split on `/` into exactly two parts.
    pub fn ip(&self) -> Result<&str> {
        let value = self.ip_address.as_deref().unwrap_or_default();
        let mut parts = value.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ip), Some(_mask), None) => Ok(ip),
            _ => Err(Error::annotation(format!(
                "ip_address {:?} is not of the form ip/mask",
                value
            ))),
        }
    }

    /// MAC address, verbatim
    pub fn mac(&self) -> &str {
        self.mac_address.as_deref().unwrap_or_default()
    }
}

/// IP address from an annotation, or an empty string
pub fn extract_ip(annotation: &str) -> String {
    if annotation.is_empty() {
        return String::new();
    }

    let parsed = match OvnAnnotation::parse(annotation) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Error in json unmarshaling ovn annotation ({})", e);
            return String::new();
        }
    };

    match parsed.ip() {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            error!("Error in splitting ip address: {}", e);
            String::new()
        }
    }
}

/// MAC address from an annotation, or an empty string
pub fn extract_mac(annotation: &str) -> String {
    if annotation.is_empty() {
        return String::new();
    }

    match OvnAnnotation::parse(annotation) {
        Ok(parsed) => parsed.mac().to_string(),
        Err(e) => {
            error!("Error in json unmarshaling ovn annotation ({})", e);
            String::new()
        }
    }
}
