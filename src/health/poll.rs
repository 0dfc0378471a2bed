//! Poll loop: single-shot, readiness and liveness modes.
//!
//! # State Transitions
//! ```text
//! SingleShot:  check → done
//! Readiness:   check ─fail→ sleep(interval) → check ... ─pass→ done (Ok)
//! Liveness:    check ─pass→ sleep(interval) → check ... ─fail→ done (Err)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: one attempt in flight, sleeping between attempts
//! - Timeouts are per attempt, never cumulative across retries
//! - Shutdown is observed during the pause; a cancelled readiness run reports
//!   its last failure, a cancelled liveness run reports success

use std::time::Duration;

use async_trait::async_trait;
use tokio::time;

use crate::config::PollMode;
use crate::health::engine::{Dialer, Prober};
use crate::health::error::ProbeResult;
use crate::lifecycle::ShutdownSignal;
use crate::net::HostInterface;

/// A repeatable check.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> ProbeResult;
}

/// A prober bound to the interfaces enumerated at startup.
pub struct InterfaceProbe<D> {
    prober: Prober<D>,
    interfaces: Vec<HostInterface>,
}

impl<D: Dialer> InterfaceProbe<D> {
    pub fn new(prober: Prober<D>, interfaces: Vec<HostInterface>) -> Self {
        Self { prober, interfaces }
    }
}

#[async_trait]
impl<D: Dialer> Probe for InterfaceProbe<D> {
    async fn probe(&self) -> ProbeResult {
        self.prober.check_interfaces(&self.interfaces).await
    }
}

/// Run `probe` according to `mode`.
pub async fn run<P: Probe + ?Sized>(probe: &P, mode: PollMode, mut shutdown: ShutdownSignal) -> ProbeResult {
    match mode {
        PollMode::SingleShot => probe.probe().await,
        PollMode::Readiness(interval) => readiness(probe, interval, &mut shutdown).await,
        PollMode::Liveness(interval) => liveness(probe, interval, &mut shutdown).await,
    }
}

async fn readiness<P: Probe + ?Sized>(probe: &P, interval: Duration, shutdown: &mut ShutdownSignal) -> ProbeResult {
    tracing::info!(interval = ?interval, "Readiness mode: waiting for a passing check");

    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match probe.probe().await {
            Ok(()) => {
                tracing::info!(attempt, "Check passed");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(attempt, code = e.code(), error = %e, "Check failed, retrying");
                if !pause(interval, shutdown).await {
                    tracing::info!(attempt, "Shutdown before the service became ready");
                    return Err(e);
                }
            }
        }
    }
}

async fn liveness<P: Probe + ?Sized>(probe: &P, interval: Duration, shutdown: &mut ShutdownSignal) -> ProbeResult {
    tracing::info!(interval = ?interval, "Liveness mode: checking until a failure");

    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match probe.probe().await {
            Ok(()) => {
                tracing::debug!(attempt, "Check passed");
                if !pause(interval, shutdown).await {
                    tracing::info!(attempt, "Shutdown while the service was live");
                    return Ok(());
                }
            }
            Err(e) => {
                tracing::warn!(attempt, code = e.code(), error = %e, "Check failed");
                return Err(e);
            }
        }
    }
}

/// Sleep for `interval`. Returns false if shutdown was triggered first.
async fn pause(interval: Duration, shutdown: &mut ShutdownSignal) -> bool {
    tokio::select! {
        biased;
        _ = shutdown.recv() => false,
        _ = time::sleep(interval) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::error::ProbeError;
    use crate::lifecycle::Shutdown;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    const INTERVAL: Duration = Duration::from_secs(5);

    /// Replays a fixed pass/fail script, repeating the last entry forever.
    struct Scripted {
        script: Vec<bool>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(script: &[bool]) -> Self {
            Self {
                script: script.to_vec(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for Scripted {
        async fn probe(&self) -> ProbeResult {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let pass = self.script.get(n).or(self.script.last()).copied().unwrap_or(false);
            if pass {
                Ok(())
            } else {
                Err(ProbeError::Connection(format!("attempt {} refused", n + 1)))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn single_shot_runs_exactly_once() {
        let shutdown = Shutdown::new();
        let probe = Scripted::new(&[false, true]);

        let err = run(&probe, PollMode::SingleShot, shutdown.subscribe()).await.unwrap_err();
        assert_eq!(err.code(), 4);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_retries_until_success() {
        let shutdown = Shutdown::new();
        let probe = Scripted::new(&[false, false, true]);
        let start = Instant::now();

        run(&probe, PollMode::Readiness(INTERVAL), shutdown.subscribe()).await.unwrap();

        assert_eq!(probe.calls(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= INTERVAL * 2 && elapsed < INTERVAL * 3, "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn liveness_returns_first_failure() {
        let shutdown = Shutdown::new();
        let probe = Scripted::new(&[true, true, false]);
        let start = Instant::now();

        let err = run(&probe, PollMode::Liveness(INTERVAL), shutdown.subscribe()).await.unwrap_err();

        assert_eq!(probe.calls(), 3);
        assert_eq!(err.to_string(), "failure to make TCP connection: attempt 3 refused");
        let elapsed = start.elapsed();
        assert!(elapsed >= INTERVAL * 2 && elapsed < INTERVAL * 3, "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_success_on_first_attempt_does_not_sleep() {
        let shutdown = Shutdown::new();
        let probe = Scripted::new(&[true]);
        let start = Instant::now();

        run(&probe, PollMode::Readiness(INTERVAL), shutdown.subscribe()).await.unwrap();
        assert_eq!(probe.calls(), 1);
        assert!(start.elapsed() < INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_readiness_reports_last_failure() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        shutdown.trigger();
        let probe = Scripted::new(&[false]);

        let err = run(&probe, PollMode::Readiness(INTERVAL), signal).await.unwrap_err();
        assert_eq!(probe.calls(), 1);
        assert_eq!(err.code(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_liveness_reports_success() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        shutdown.trigger();
        let probe = Scripted::new(&[true]);

        run(&probe, PollMode::Liveness(INTERVAL), signal).await.unwrap();
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_during_pause_stops_the_loop() {
        let shutdown = std::sync::Arc::new(Shutdown::new());
        let signal = shutdown.subscribe();
        let probe = Scripted::new(&[false]);

        let trigger = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                time::sleep(INTERVAL * 3 + Duration::from_secs(1)).await;
                shutdown.trigger();
            })
        };

        run(&probe, PollMode::Readiness(INTERVAL), signal).await.unwrap_err();
        trigger.await.unwrap();
        assert_eq!(probe.calls(), 4);
    }
}
