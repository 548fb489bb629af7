//! Session configuration.
//!
//! [`SessionConfig`] is what a caller hands to [`Session::new`]; the
//! capability flags it produces are fixed for the life of the session.
//!
//! [`Session::new`]: crate::Session::new

/// Builder-style configuration for a mounted session.
///
/// # Example
///
/// ```rust
/// use anyfs_fuse::SessionConfig;
///
/// let config = SessionConfig::new().enable_init(true).enable_xtimes(false);
/// assert!(config.flags().init);
/// assert!(!config.flags().xtimes);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Call the provider's `init` hook at mount time.
    pub enable_init: bool,
    /// Ask the kernel for extended timestamps (macOS only).
    pub enable_xtimes: bool,
}

impl SessionConfig {
    /// A configuration with every capability disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the provider's `init` hook runs.
    #[must_use]
    pub fn enable_init(mut self, enable: bool) -> Self {
        self.enable_init = enable;
        self
    }

    /// Set whether extended timestamps are requested.
    #[must_use]
    pub fn enable_xtimes(mut self, enable: bool) -> Self {
        self.enable_xtimes = enable;
        self
    }

    /// The capability flags this configuration produces.
    pub fn flags(&self) -> CapabilityFlags {
        CapabilityFlags {
            init: self.enable_init,
            xtimes: self.enable_xtimes,
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// Missing fields take their default value.
    ///
    /// ```rust
    /// use anyfs_fuse::SessionConfig;
    ///
    /// let config = SessionConfig::from_json(r#"{ "enable_init": true }"#).unwrap();
    /// assert!(config.enable_init);
    /// assert!(!config.enable_xtimes);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Capabilities of a session, read-only after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapabilityFlags {
    /// The provider's `init` hook is called at mount time.
    pub init: bool,
    /// Extended timestamps are requested from the kernel.
    pub xtimes: bool,
}
