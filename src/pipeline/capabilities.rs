//! Startup capability probe
//!
//! Optional integrations are resolved once here and threaded into the
//! orchestrator, instead of being read as ambient state at use sites.

use log::error;

/// Which optional capabilities this invocation can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether an address can be geocoded
    pub geocoder: bool,
}

impl Capabilities {
    /// Probe the build configuration for available capabilities
    pub fn probe() -> Self {
        Capabilities {
            geocoder: cfg!(feature = "geocoding"),
        }
    }

    /// Log what is missing, mirroring the startup package check
    pub fn report_missing(&self) {
        if !self.geocoder {
            error!("geocoding disabled: can't use an address (--address)!");
        }
    }
}
