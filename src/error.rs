// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Load(LoadError),
    Switch(SwitchError),
}

/// Errors raised while resolving and instantiating a view module.
///
/// None of these are fatal to the host: loading continues with the
/// remaining modules and the failed one is simply reported unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No registered module matches the requested name.
    ModuleUnavailable(String),

    /// The module was built against a different host API version.
    VersionMismatch {
        module: String,
        module_version: u32,
        host_version: u32,
    },

    /// The registry already holds the maximum number of views.
    RegistryFull(String),
}

/// Errors raised by a view switch. Both variants leave the previously
/// active view untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// The requested target does not resolve to any loaded view.
    InvalidTarget,

    /// The target view refused entry (e.g. a required resource such as a
    /// connected camera is unavailable). Carries the view's denial reason.
    EntryDenied(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::ModuleUnavailable(name) => {
                write!(f, "view module '{}' is unavailable", name)
            }
            LoadError::VersionMismatch {
                module,
                module_version,
                host_version,
            } => write!(
                f,
                "view module '{}' is compiled for another host version (module {} != host {})",
                module, module_version, host_version
            ),
            LoadError::RegistryFull(name) => {
                write!(f, "cannot load view module '{}': registry is full", name)
            }
        }
    }
}

impl fmt::Display for SwitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchError::InvalidTarget => write!(f, "switch target is not a loaded view"),
            SwitchError::EntryDenied(reason) => write!(f, "view denied entry: {}", reason),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Load(e) => write!(f, "Load Error: {}", e),
            Error::Switch(e) => write!(f, "Switch Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Error::Load(err)
    }
}

impl From<SwitchError> for Error {
    fn from(err: SwitchError) -> Self {
        Error::Switch(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
