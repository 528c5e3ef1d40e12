//! Process-wide configuration.
//!
//! Two read-mostly records control the library: [`EnvConfig`] (failure policy
//! and worker count) and [`FmtConfig`] (consumed by formatters built on top of
//! the element accessors). Both live behind `RwLock`s so reads are safe from
//! any thread; writes are meant to happen at program start.
//!
//! # Example
//! ```rust
//! use strided_tensor::config::{self, EnvConfig};
//!
//! let previous = config::env();
//! config::set_env(EnvConfig { num_cpu: 2, ..previous });
//! assert_eq!(config::env().num_cpu, 2);
//! config::set_env(previous);
//! ```

use std::sync::{PoisonError, RwLock};

use crate::{Result, TensorError};

/// Environment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvConfig {
    /// Panic on failure instead of returning the error.
    pub interactive: bool,
    /// Number of workers used by the kernels. `0` selects automatically.
    pub num_cpu: usize,
}

impl EnvConfig {
    /// The configuration in effect before any call to [`set_env`].
    pub const DEFAULT: Self = Self {
        interactive: false,
        num_cpu: 0,
    };
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Formatting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FmtConfig {
    /// Maximum number of elements shown per axis before eliding.
    pub excerpt: usize,
    /// Number of decimals shown for floating-point elements.
    pub precision: usize,
    /// Render `u8` elements as ASCII characters.
    pub btoa: bool,
}

impl FmtConfig {
    /// The configuration in effect before any call to [`set_fmt`].
    pub const DEFAULT: Self = Self {
        excerpt: 6,
        precision: 4,
        btoa: false,
    };
}

impl Default for FmtConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static ENV: RwLock<EnvConfig> = RwLock::new(EnvConfig::DEFAULT);
static FMT: RwLock<FmtConfig> = RwLock::new(FmtConfig::DEFAULT);

/// Returns the current environment configuration.
pub fn env() -> EnvConfig {
    *ENV.read().unwrap_or_else(PoisonError::into_inner)
}

/// Replaces the environment configuration.
pub fn set_env(config: EnvConfig) {
    *ENV.write().unwrap_or_else(PoisonError::into_inner) = config;
}

/// Returns the current formatting configuration.
pub fn fmt() -> FmtConfig {
    *FMT.read().unwrap_or_else(PoisonError::into_inner)
}

/// Replaces the formatting configuration.
pub fn set_fmt(config: FmtConfig) {
    *FMT.write().unwrap_or_else(PoisonError::into_inner) = config;
}

/// Applies the failure policy to `err`.
///
/// In interactive mode the failure is unrecoverable and this panics;
/// otherwise the error is handed back to the caller.
///
/// # Panics
/// Panics when [`EnvConfig::interactive`] is set.
#[track_caller]
pub fn raise<T>(err: TensorError) -> Result<T> {
    if env().interactive {
        tracing::error!(error = %err, "tensor operation failed in interactive mode");
        panic!("strided-tensor: {err}");
    }
    tracing::debug!(error = %err, "tensor operation failed");
    Err(err)
}

/// Routes the error of `result`, if any, through [`raise`].
#[track_caller]
pub(crate) fn check<T>(result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => raise(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(EnvConfig::default(), EnvConfig::DEFAULT);
        assert!(!EnvConfig::DEFAULT.interactive);
        assert_eq!(EnvConfig::DEFAULT.num_cpu, 0);

        let fmt = FmtConfig::default();
        assert_eq!(fmt.excerpt, 6);
        assert_eq!(fmt.precision, 4);
        assert!(!fmt.btoa);
    }

    #[test]
    fn test_raise_returns_error_when_not_interactive() {
        // Unit tests never flip the global policy, so raise() must hand back the error.
        let res: Result<()> = raise(TensorError::BadStep);
        assert_eq!(res, Err(TensorError::BadStep));
    }

    /// Records the level of every event it sees.
    struct Levels(std::sync::Arc<std::sync::Mutex<Vec<tracing::Level>>>);

    impl tracing::Subscriber for Levels {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }

        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

        fn event(&self, event: &tracing::Event<'_>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }

        fn enter(&self, _: &tracing::span::Id) {}

        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn test_recoverable_failure_logs_at_debug() {
        let levels = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        tracing::subscriber::with_default(Levels(levels.clone()), || {
            let res: Result<()> = raise(TensorError::AxisBounds);
            assert_eq!(res, Err(TensorError::AxisBounds));
        });
        assert_eq!(*levels.lock().unwrap(), vec![tracing::Level::DEBUG]);
    }

    #[test]
    fn test_check_passes_ok_through() {
        assert_eq!(check(Ok::<_, TensorError>(3)), Ok(3));
        assert_eq!(
            check::<u8>(Err(TensorError::AxisBounds)),
            Err(TensorError::AxisBounds)
        );
    }
}
