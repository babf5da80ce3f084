//! Platform detection
//!
//! Identifies the host operating system and answers the one question the
//! execution strategy cares about: can executables be resolved directly, or
//! does a command have to go through the platform shell?

use std::fmt;
use tracing::{debug, instrument};

/// Platform types supported by scriptrunner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux and other Unix-like systems
    Linux,
    /// macOS
    MacOS,
    /// Native Windows
    Windows,
}

impl Platform {
    /// Detect the current platform environment
    #[instrument]
    pub fn detect() -> Self {
        let platform = if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else {
            // Fallback to Linux for unknown Unix-like systems
            Platform::Linux
        };
        debug!("Detected platform: {}", platform);
        platform
    }

    /// Get the platform name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
        }
    }

    /// Whether direct PATH resolution is unreliable on this platform.
    ///
    /// On Windows, shell builtins and `.cmd`/`.bat` shims (npm, yarn, ...) can
    /// only be started through `cmd.exe`.
    pub fn is_shell_dependent(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Program and leading arguments of the platform command interpreter
    pub fn shell(self) -> (&'static str, &'static str) {
        match self {
            Platform::Windows => ("cmd", "/C"),
            Platform::Linux | Platform::MacOS => ("sh", "-c"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
