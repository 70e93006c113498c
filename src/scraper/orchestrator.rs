//! Runs detail scrapes in fixed-size chunks.
//!
//! Every stub in a chunk is scraped in its own task; the chunk is awaited
//! as a whole before the next one starts, which caps the number of live
//! browser contexts at the chunk width. Task outcomes are kept as values,
//! so a panicking or failing scrape still yields one [`MatchDetail`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{error, info};

use crate::domain::{MatchDetail, MatchStub};
use crate::scraper::DetailScraper;

pub const DEFAULT_CONCURRENCY: usize = 15;

/// Where a full scrape run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Listing,
    Chunking,
    /// Zero-based index of the chunk being scraped
    ChunkInFlight(usize),
    Aggregating,
    Done,
}

/// Snapshot reported after each chunk settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
    pub elapsed: Duration,
    /// Extrapolated from the average time per match so far
    pub remaining: Duration,
}

impl Progress {
    fn measure(completed: usize, total: usize, failed: usize, elapsed: Duration) -> Self {
        let remaining = if completed == 0 || completed >= total {
            Duration::ZERO
        } else {
            elapsed.mul_f64((total - completed) as f64 / completed as f64)
        };
        Self {
            completed,
            total,
            failed,
            elapsed,
            remaining,
        }
    }
}

/// Receives phase changes and progress during a run.
pub trait RunObserver: Send + Sync {
    fn phase(&self, _phase: RunPhase) {}
    fn progress(&self, _progress: &Progress) {}
}

pub struct Orchestrator {
    scraper: DetailScraper,
    width: usize,
    observer: Option<Arc<dyn RunObserver>>,
}

impl Orchestrator {
    pub fn new(scraper: DetailScraper, width: usize) -> Self {
        Self {
            scraper,
            width: width.max(1),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Scrape every stub, `width` at a time. Always returns exactly one
    /// detail per stub, in no guaranteed order.
    pub async fn run(&self, stubs: Vec<MatchStub>) -> Vec<MatchDetail> {
        let total = stubs.len();
        let chunks = total.div_ceil(self.width);
        let started = Instant::now();
        let mut results: Vec<MatchDetail> = Vec::with_capacity(total);

        for (index, chunk) in stubs.chunks(self.width).enumerate() {
            if let Some(observer) = &self.observer {
                observer.phase(RunPhase::ChunkInFlight(index));
            }

            let tasks: Vec<_> = chunk
                .iter()
                .cloned()
                .map(|stub| {
                    let scraper = self.scraper.clone();
                    let handle = tokio::spawn({
                        let stub = stub.clone();
                        async move { scraper.scrape(stub).await }
                    });
                    (stub, handle)
                })
                .collect();

            let settled = join_all(tasks.into_iter().map(|(stub, handle)| async move {
                match handle.await {
                    Ok(detail) => detail,
                    Err(e) => {
                        error!(id = %stub.id, "Detail task failed: {}", e);
                        MatchDetail::failed(stub, format!("Detail task failed: {}", e))
                    }
                }
            }))
            .await;
            results.extend(settled);

            let failed = results.iter().filter(|d| d.is_failed()).count();
            let progress = Progress::measure(results.len(), total, failed, started.elapsed());
            info!(
                chunk = index + 1,
                chunks,
                completed = progress.completed,
                total,
                failed,
                elapsed_secs = progress.elapsed.as_secs(),
                remaining_secs = progress.remaining.as_secs(),
                "Chunk settled"
            );
            if let Some(observer) = &self.observer {
                observer.progress(&progress);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::app::{MatchdayError, Result};
    use crate::heuristics::CrestConfig;
    use crate::scraper::{DetailConfig, DetailParser, LoadedPage, PageLoader};

    const PAGE: &str = r#"<html><body><div class="match-detail">
        <p>12/06/2025 - 15:00</p><p>Stade Municipal</p>
        <p>Arbitre Centre : DUPONT J.</p></div></body></html>"#;

    /// Times out on URLs containing `slow`, panics on `panic`, and tracks
    /// how many loads run at once.
    #[derive(Default)]
    struct FakeLoader {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PageLoader for FakeLoader {
        async fn load(&self, url: &str, _ready: &[String]) -> Result<LoadedPage> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("panic") {
                panic!("browser crashed");
            }
            if url.contains("slow") {
                return Err(MatchdayError::Timeout {
                    url: url.to_string(),
                    secs: 30,
                });
            }
            Ok(LoadedPage {
                requested_url: url.to_string(),
                final_url: url.to_string(),
                html: PAGE.to_string(),
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        phases: Mutex<Vec<RunPhase>>,
        progress: Mutex<Vec<Progress>>,
    }

    impl RunObserver for Recorder {
        fn phase(&self, phase: RunPhase) {
            self.phases.lock().unwrap().push(phase);
        }
        fn progress(&self, progress: &Progress) {
            self.progress.lock().unwrap().push(*progress);
        }
    }

    fn stubs(n: usize, slow_every: usize) -> Vec<MatchStub> {
        (0..n)
            .map(|i| {
                let kind = if slow_every > 0 && i % slow_every == 0 {
                    "slow"
                } else {
                    "ok"
                };
                MatchStub::new(
                    format!("m{}", i),
                    format!("https://club.example/match/{}-{}/", kind, i),
                )
            })
            .collect()
    }

    fn orchestrator(loader: Arc<FakeLoader>, width: usize) -> Orchestrator {
        let parser =
            DetailParser::new(&DetailConfig::default(), &CrestConfig::default(), "AFP 18").unwrap();
        Orchestrator::new(DetailScraper::new(loader, parser, Vec::new()), width)
    }

    #[tokio::test]
    async fn test_chunk_with_timeouts_keeps_every_match() {
        let loader = Arc::new(FakeLoader::default());
        // 15 stubs, every fifth one times out: 3 failures.
        let results = orchestrator(loader, 15).run(stubs(15, 5)).await;

        assert_eq!(results.len(), 15);
        let failed: Vec<_> = results.iter().filter(|d| d.is_failed()).collect();
        assert_eq!(failed.len(), 3);
        for detail in &failed {
            assert!(detail.details.is_none());
            assert!(detail.staff.is_none());
            assert!(detail.stub.detail_url.contains("slow"));
        }
        for detail in results.iter().filter(|d| !d.is_failed()) {
            assert_eq!(detail.details.as_ref().unwrap().stadium, "Stade Municipal");
            assert_eq!(detail.staff.as_ref().unwrap().referee, "DUPONT J.");
        }
    }

    #[tokio::test]
    async fn test_cardinality_and_width_bound() {
        let loader = Arc::new(FakeLoader::default());
        let recorder = Arc::new(Recorder::default());
        let results = orchestrator(loader.clone(), 4)
            .with_observer(recorder.clone())
            .run(stubs(10, 3))
            .await;

        assert_eq!(results.len(), 10);
        let ids: HashSet<_> = results.iter().map(|d| d.stub.id.clone()).collect();
        assert_eq!(ids.len(), 10);
        assert!(loader.peak.load(Ordering::SeqCst) <= 4);

        let phases = recorder.phases.lock().unwrap().clone();
        assert_eq!(
            phases,
            vec![
                RunPhase::ChunkInFlight(0),
                RunPhase::ChunkInFlight(1),
                RunPhase::ChunkInFlight(2)
            ]
        );
        let progress = recorder.progress.lock().unwrap().clone();
        assert_eq!(
            progress.iter().map(|p| p.completed).collect::<Vec<_>>(),
            vec![4, 8, 10]
        );
        assert_eq!(progress.last().unwrap().remaining, Duration::ZERO);
        assert_eq!(progress.last().unwrap().failed, 4);
    }

    #[tokio::test]
    async fn test_panicking_task_becomes_placeholder() {
        let loader = Arc::new(FakeLoader::default());
        let mut input = stubs(3, 0);
        input[1].detail_url = "https://club.example/match/panic/".into();

        let results = orchestrator(loader, 3).run(input).await;
        assert_eq!(results.len(), 3);
        let crashed = results.iter().find(|d| d.stub.id == "m1").unwrap();
        assert!(crashed.is_failed());
        assert!(crashed.details.is_none());
        assert!(crashed.staff.is_none());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let loader = Arc::new(FakeLoader::default());
        assert!(orchestrator(loader, 15).run(Vec::new()).await.is_empty());
    }

    #[test]
    fn test_progress_extrapolation() {
        let p = Progress::measure(5, 20, 0, Duration::from_secs(10));
        assert_eq!(p.remaining, Duration::from_secs(30));
        assert_eq!(Progress::measure(0, 20, 0, Duration::ZERO).remaining, Duration::ZERO);
    }
}
