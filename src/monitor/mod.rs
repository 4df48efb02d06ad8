//! Monitor loop driving periodic probes and alert dispatch.

mod status;

pub use status::{HostStatus, StatusTracker, Transition};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::alert::{AlertDispatcher, AlertEvent};
use crate::config::MonitorConfig;
use crate::probe::{ProbeError, Prober};

/// Sequential sampling loop over a single host.
///
/// One probe per tick, a fixed sleep between ticks (measured from the end of
/// one tick to the start of the next), and alert dispatch on every confirmed
/// transition. All monitor state lives here; nothing is shared with the
/// notifier tasks beyond cloned events.
pub struct MonitorLoop {
    config: MonitorConfig,
    prober: Box<dyn Prober>,
    dispatcher: AlertDispatcher,
    tracker: StatusTracker,
}

impl MonitorLoop {
    pub fn new(config: MonitorConfig, prober: Box<dyn Prober>, dispatcher: AlertDispatcher) -> Self {
        let tracker = StatusTracker::new(config.max_failures);
        Self {
            config,
            prober,
            dispatcher,
            tracker,
        }
    }

    /// Run until a stop signal arrives.
    ///
    /// Stop is cooperative: it is checked at the sleep point between ticks,
    /// so an in-flight probe always completes and no partial sample is
    /// recorded on shutdown.
    pub async fn run(mut self, mut stop_rx: broadcast::Receiver<()>) {
        tracing::info!(
            "Starting monitor for host {} in container {}",
            self.config.host,
            self.config.container_id
        );
        tracing::info!(
            "Settings: interval={:?}, probe timeout={:?}, max failures={}",
            self.config.ping_interval,
            self.config.probe_timeout,
            self.config.max_failures
        );

        loop {
            let delay = self.tick().await;

            tokio::select! {
                _ = stop_rx.recv() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::info!("Monitoring stopped");
    }

    /// Run one sample and return how long to sleep before the next.
    async fn tick(&mut self) -> std::time::Duration {
        match self
            .prober
            .probe(&self.config.host, self.config.probe_timeout)
            .await
        {
            Ok(success) => {
                self.observe(success);
                self.config.ping_interval
            }
            Err(ProbeError::Internal(e)) => {
                // Not a reachability verdict; skip the sample and back off.
                tracing::error!("Unexpected error during monitoring: {}", e);
                self.config.error_backoff
            }
            Err(e) => {
                // Environment trouble counts as a failed sample.
                tracing::warn!("Probe error for {}: {}", self.config.host, e);
                self.observe(false);
                self.config.ping_interval
            }
        }
    }

    fn observe(&mut self, success: bool) {
        if let Some(transition) = self.tracker.record(success) {
            let event = self.build_event(transition);

            match transition {
                Transition::Down => tracing::error!(
                    "Host {} down after {} consecutive failures",
                    event.host,
                    event.consecutive_failures
                ),
                Transition::Up => tracing::info!("Host {} recovered", event.host),
            }

            self.dispatcher.dispatch(&event);
        }

        if self.tracker.total_samples() % self.config.summary_interval == 0 {
            tracing::info!(
                "Status: {} - success rate: {:.1}% ({} pings)",
                self.config.host,
                self.tracker.success_rate(),
                self.tracker.total_samples()
            );
        }
    }

    fn build_event(&self, transition: Transition) -> AlertEvent {
        AlertEvent {
            status: transition,
            host: self.config.host.clone(),
            container_id: self.config.container_id.clone(),
            timestamp: Utc::now(),
            consecutive_failures: self.tracker.consecutive_failures(),
            total_samples: self.tracker.total_samples(),
            failed_samples: self.tracker.failed_samples(),
            success_rate: self.tracker.success_rate(),
        }
    }
}
