//! Trial configuration and thread availability policy.
//!
//! Thread availability is set via the `MEMORD_THREADS` environment
//! variable:
//! - unset, or any value other than the ones below (default): threads are
//!   available and the provers run their full trial loops.
//! - `off` / `0` / `false` / `disabled`: single-threaded target. Both
//!   provers degrade to a trivial pass so the surrounding suite remains
//!   usable where spawning is unsupported.

use std::sync::OnceLock;

/// Reference trial count per prover invocation.
pub const DEFAULT_TRIALS: u32 = 100;

/// Reference reader-thread count for the publication prover.
pub const DEFAULT_PUBLISH_READERS: usize = 8;

/// Default spin-wait iteration cap. Several seconds of polling, far above
/// any scheduler-starvation window, so it never fires on a healthy
/// implementation, while a lost store still fails loudly instead of
/// hanging CI.
pub const DEFAULT_SPIN_CAP: u64 = 1 << 32;

/// Whether the provers may spawn OS threads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ThreadPolicy {
    /// Resolve from `MEMORD_THREADS` once per process.
    #[default]
    Auto,
    /// Spawn threads unconditionally.
    Enabled,
    /// Single-threaded target: provers return without running any trial.
    Disabled,
}

/// Knobs for one prover invocation.
///
/// The defaults are the reference behavior: 100 trials, 2 writers + 2
/// readers for the total-order prover, 8 readers for the publication
/// prover. The constants trade detection probability against running time;
/// tuning them is fine as long as the shape (multiple independent
/// writers/readers, many repeated trials) survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
    /// Trials per prover call. A single pass proves nothing.
    pub trials: u32,
    /// Reader threads spawned by the publication prover.
    pub publish_readers: usize,
    /// Spin-wait iteration cap. `None` restores unbounded spinning.
    pub spin_cap: Option<u64>,
    pub threads: ThreadPolicy,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            publish_readers: DEFAULT_PUBLISH_READERS,
            spin_cap: Some(DEFAULT_SPIN_CAP),
            threads: ThreadPolicy::Auto,
        }
    }
}

impl TrialConfig {
    /// Reduced trial count for smoke runs and in-tree unit tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            trials: 16,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    #[must_use]
    pub fn with_publish_readers(mut self, readers: usize) -> Self {
        self.publish_readers = readers;
        self
    }

    #[must_use]
    pub fn with_spin_cap(mut self, cap: Option<u64>) -> Self {
        self.spin_cap = cap;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, policy: ThreadPolicy) -> Self {
        self.threads = policy;
        self
    }

    /// `true` if the provers should spawn threads under this config.
    #[must_use]
    pub fn threads_enabled(&self) -> bool {
        match self.threads {
            ThreadPolicy::Enabled => true,
            ThreadPolicy::Disabled => false,
            ThreadPolicy::Auto => threads_available(),
        }
    }
}

/// Resolve `MEMORD_THREADS` once per process.
pub fn threads_available() -> bool {
    static RESOLVED: OnceLock<bool> = OnceLock::new();
    *RESOLVED.get_or_init(|| match std::env::var("MEMORD_THREADS") {
        Ok(raw) => parse_threads_env(&raw),
        Err(_) => true,
    })
}

fn parse_threads_env(raw: &str) -> bool {
    !matches!(
        raw.to_ascii_lowercase().as_str(),
        "off" | "0" | "false" | "disabled"
    )
}
