//! Dialect descriptions and the capabilities they advertise.
//!
//! Each dialect reports which statement styles it supports (raw, prepared) and
//! whether it can page results natively. Front ends use this to pick a code path
//! and to list what is available.

/// Support status for a specific dialect capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    /// The capability is fully supported and implemented.
    Supported,
    /// The capability is not supported by the dialect.
    NotSupported,
    /// The capability is planned for future implementation.
    Planned,
}

impl SupportStatus {
    /// Returns `true` if the capability is fully supported and implemented.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, SupportStatus::Supported)
    }

    /// Returns `true` if the capability is supported or planned.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self, SupportStatus::NotSupported)
    }

    /// Returns the string representation of this support status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SupportStatus::Supported => "Supported",
            SupportStatus::NotSupported => "Not Supported",
            SupportStatus::Planned => "Planned",
        }
    }
}

/// Capabilities advertised by a dialect.
#[derive(Debug, Clone, Copy)]
pub struct DialectCapabilities {
    /// Raw statements with inline literals.
    pub basic: SupportStatus,
    /// Prepared statements with bound parameters.
    pub prepared: SupportStatus,
    /// Native LIMIT/OFFSET style paging.
    pub limit_offset: SupportStatus,
}

impl DialectCapabilities {
    /// Returns `true` if at least one statement style is fully supported.
    #[must_use]
    pub fn has_statement_support(&self) -> bool {
        self.basic.is_supported() || self.prepared.is_supported()
    }
}

/// Description of a registered dialect.
#[derive(Debug, Clone)]
pub struct DialectInfo {
    /// Short name used for lookup (e.g. `"Informix"`).
    pub short_name: &'static str,
    /// Descriptive name for display purposes.
    pub long_name: &'static str,
    /// Capabilities of the dialect.
    pub capabilities: DialectCapabilities,
}

impl DialectInfo {
    /// Creates a dialect description.
    #[must_use]
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        basic: SupportStatus,
        prepared: SupportStatus,
        limit_offset: SupportStatus,
    ) -> Self {
        Self {
            short_name,
            long_name,
            capabilities: DialectCapabilities {
                basic,
                prepared,
                limit_offset,
            },
        }
    }
}
