//! Tests that change the process-wide configuration.
//!
//! Each test holds `LOCK` for its whole body and restores the previous
//! configuration before releasing it, so the other tests in this binary never
//! observe a foreign setting.

use std::panic;
use std::sync::{Mutex, MutexGuard, PoisonError};

use strided_tensor::config::{self, EnvConfig, FmtConfig};
use strided_tensor::threading::worker_count;
use strided_tensor::{Tensor, TensorError};

static LOCK: Mutex<()> = Mutex::new(());

/// Applies `env` until dropped, then restores the previous configuration.
struct EnvGuard {
    previous: EnvConfig,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn set(env: EnvConfig) -> Self {
        let lock = LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = config::env();
        config::set_env(env);
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        config::set_env(self.previous);
    }
}

#[test]
fn test_integer_sum_for_each_worker_setting() {
    for num_cpu in [1, 4, 0] {
        let _guard = EnvGuard::set(EnvConfig {
            num_cpu,
            ..EnvConfig::DEFAULT
        });
        let s = Tensor::<i64>::range(0, 100, 1).unwrap().sum().unwrap();
        assert_eq!(s.scalar(), Ok(4950), "num_cpu = {num_cpu}");
    }
}

#[test]
fn test_num_cpu_caps_workers() {
    let _guard = EnvGuard::set(EnvConfig {
        num_cpu: 4,
        ..EnvConfig::DEFAULT
    });
    assert_eq!(worker_count(100), 4);
    assert_eq!(worker_count(3), 3);
}

#[test]
fn test_pointwise_ops_agree_across_worker_settings() {
    let mut results = Vec::new();
    for num_cpu in [1, 2, 0] {
        let _guard = EnvGuard::set(EnvConfig {
            num_cpu,
            ..EnvConfig::DEFAULT
        });
        let t = Tensor::<f64>::range(0, 20_000, 1).unwrap();
        let mapped = t.sqrt().add(&1.5).unwrap().ravel();
        results.push(mapped);
    }
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], results[2]);
}

#[test]
fn test_interactive_mode_panics() {
    let _guard = EnvGuard::set(EnvConfig {
        interactive: true,
        ..EnvConfig::DEFAULT
    });
    let outcome = panic::catch_unwind(|| Tensor::<i32>::zeros(&[0]));
    assert!(outcome.is_err());

    let outcome = panic::catch_unwind(|| {
        Tensor::<i32>::range(0, 4, 1).and_then(|t| t.permute(&[1]))
    });
    assert!(outcome.is_err());

    // successful operations are unaffected
    let ok = panic::catch_unwind(|| Tensor::<i32>::ones(&[2]).map(|t| t.numel()));
    assert_eq!(ok.ok(), Some(Ok(2)));
}

#[test]
fn test_non_interactive_mode_returns_errors() {
    let _guard = EnvGuard::set(EnvConfig::DEFAULT);
    assert_eq!(
        Tensor::<i32>::zeros(&[0]).unwrap_err(),
        TensorError::BadShape
    );
}

#[test]
fn test_fmt_config_round_trip() {
    let _lock = LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = config::fmt();
    assert_eq!(previous, FmtConfig::DEFAULT);

    let custom = FmtConfig {
        excerpt: 3,
        precision: 2,
        btoa: true,
    };
    config::set_fmt(custom);
    assert_eq!(config::fmt(), custom);
    config::set_fmt(previous);
    assert_eq!(config::fmt(), FmtConfig::DEFAULT);
}
