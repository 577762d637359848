use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use super::cpu::{CoreSample, compute_core_usage, synthetic_cores};
use super::memory::normalize;
use super::process::rank_processes;
use super::snapshot::SystemSnapshot;
use super::source::CounterSource;
use super::summary::summarize;
use crate::error::{SnapshotError, SourceError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingOptions {
    /// Gap between the two per-core tick reads.
    pub interval: Duration,
    /// Deadline for each individual query against the source.
    pub timeout: Duration,
    /// Maximum number of processes kept by the ranker.
    pub process_limit: usize,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        SamplingOptions {
            interval: Duration::from_millis(1000),
            timeout: Duration::from_millis(5000),
            process_limit: 50,
        }
    }
}

/// Assembles a [`SystemSnapshot`] by querying every sampler concurrently.
/// Holds no per-cycle state, so one collector can serve concurrent requests.
pub struct Collector<S> {
    source: Arc<S>,
    options: SamplingOptions,
}

impl<S> Clone for Collector<S> {
    fn clone(&self) -> Self {
        Collector {
            source: Arc::clone(&self.source),
            options: self.options,
        }
    }
}

impl<S: CounterSource> Collector<S> {
    pub fn new(source: S, options: SamplingOptions) -> Self {
        Collector {
            source: Arc::new(source),
            options,
        }
    }

    pub fn options(&self) -> &SamplingOptions {
        &self.options
    }

    /// Run one sampling cycle. Any sampler failure other than the per-core
    /// reading fails the whole snapshot; there is no partial result.
    pub async fn collect(&self) -> Result<SystemSnapshot, SnapshotError> {
        let span = tracing::debug_span!("collector.collect");
        async {
            tracing::debug!("sampling");
            let (label, (cores, cores_synthetic), memory, rows, load) = tokio::join!(
                self.query("cpu label", |s| s.cpu_label()),
                self.sample_cores(),
                self.query("memory", |s| s.memory()),
                self.process_rows(),
                self.query("load", |s| s.load()),
            );

            let assembled = label.and_then(|label| {
                Ok(SystemSnapshot {
                    cpu_usage_label: label,
                    summary: summarize(&cores),
                    cores,
                    cores_synthetic,
                    memory: normalize(&memory?),
                    processes: rank_processes(&rows?, self.options.process_limit),
                    load: load?,
                })
            });

            match &assembled {
                Ok(snapshot) => tracing::debug!(
                    cores = snapshot.cores.len(),
                    processes = snapshot.processes.len(),
                    synthetic = snapshot.cores_synthetic,
                    "assembled"
                ),
                Err(err) => tracing::warn!(sampler = err.sampler(), error = %err, "sampling failed"),
            }
            assembled
        }
        .instrument(span)
        .await
    }

    /// Per-core utilization plus whether it is synthetic.
    async fn sample_cores(&self) -> (Vec<CoreSample>, bool) {
        match self.read_core_window().await {
            Ok(cores) => (cores, false),
            Err(err) => {
                tracing::warn!(error = %err, "per-core counters unavailable, serving synthetic cores");
                (synthetic_cores(), true)
            }
        }
    }

    async fn read_core_window(&self) -> Result<Vec<CoreSample>, SnapshotError> {
        let before = self.query("cpu cores", |s| s.core_ticks()).await?;
        tokio::time::sleep(self.options.interval).await;
        let after = self.query("cpu cores", |s| s.core_ticks()).await?;
        Ok(compute_core_usage(&before, &after))
    }

    /// The process table query is async; dropping it at the deadline stops
    /// the child program instead of leaving it running.
    async fn process_rows(&self) -> Result<Vec<String>, SnapshotError> {
        let sampler = "processes";
        self.within_deadline(sampler, async {
            self.source
                .process_rows()
                .await
                .map_err(|source| SnapshotError::Sampler { sampler, source })
        })
        .await
    }

    /// Run one blocking source query on the blocking pool under the deadline.
    async fn query<T, F>(&self, sampler: &'static str, read: F) -> Result<T, SnapshotError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, SourceError> + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        self.within_deadline(sampler, async move {
            match tokio::task::spawn_blocking(move || read(&*source)).await {
                Ok(result) => result.map_err(|source| SnapshotError::Sampler { sampler, source }),
                Err(_) => Err(SnapshotError::Join { sampler }),
            }
        })
        .await
    }

    async fn within_deadline<T>(
        &self,
        sampler: &'static str,
        work: impl Future<Output = Result<T, SnapshotError>>,
    ) -> Result<T, SnapshotError> {
        tokio::time::timeout(self.options.timeout, work)
            .await
            .unwrap_or_else(|_| {
                Err(SnapshotError::Timeout {
                    sampler,
                    after: self.options.timeout,
                })
            })
    }
}
