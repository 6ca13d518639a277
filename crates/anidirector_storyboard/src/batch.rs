//! Batch concept-image generation.
//!
//! A run walks the scenes that still lack a concept image, one at a time in
//! narrative order. Each success is checkpointed before the next request is
//! issued, so an interrupted run loses at most the scene in flight. A failed
//! scene is left imageless and the run moves on.
//!
//! Progress is reported through a [`BatchObserver`]:
//!
//! ```text
//! Started { total }
//!   SceneStarted { index, total, scene_id }
//!   SceneCompleted { .. } | SceneFailed { .. }
//!   ...
//! Finished(report)
//! ```

use crate::Studio;
use anidirector_core::{Act, ImageMode, Scene};
use anidirector_error::{AniDirectorResult, NotFoundError, NotFoundErrorKind};
use anidirector_interface::{ImageQuality, MediaGenerator};

/// Which scenes a run covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
pub enum SceneFilter {
    /// Every scene
    #[default]
    #[display("all scenes")]
    All,
    /// Scenes in one act
    #[display("{}", _0)]
    Act(Act),
}

impl SceneFilter {
    /// Whether the scene falls inside the filter.
    pub fn matches(&self, scene: &Scene) -> bool {
        match self {
            SceneFilter::All => true,
            SceneFilter::Act(act) => scene.act() == act,
        }
    }
}

/// Run-level state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    /// No run in progress. A run with nothing to do never leaves this phase.
    Idle,
    /// Working on item `current` (1-based) of `total`
    Running {
        /// Item in progress
        current: usize,
        /// Items in the run
        total: usize,
    },
    /// Every item has been attempted. This is the last phase a run reports;
    /// the studio is idle again once the call returns.
    Completed {
        /// Items that produced an image
        succeeded: usize,
        /// Items that failed
        failed: usize,
    },
}

/// Per-scene state within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SceneStatus {
    /// Waiting its turn
    Pending,
    /// Request in flight
    Generating,
    /// Image stored
    Done,
    /// Left imageless
    Failed,
}

/// A scene the run could not produce an image for.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SceneFailure {
    /// Scene id
    scene_id: u32,
    /// Error text
    message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct BatchReport {
    /// Scenes in the work list
    total: usize,
    /// Scenes that received an image, in order
    succeeded: Vec<u32>,
    /// Scenes that failed, in order
    failed: Vec<SceneFailure>,
    /// Successful scenes whose checkpoint write failed
    checkpoint_failures: usize,
}

impl BatchReport {
    /// True when no scene needed an image.
    pub fn is_nothing_to_do(&self) -> bool {
        self.total == 0
    }

    /// Ids of the failed scenes.
    pub fn failed_ids(&self) -> Vec<u32> {
        self.failed.iter().map(|f| f.scene_id).collect()
    }
}

/// Progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// The work list is known
    Started {
        /// Items in the run
        total: usize,
    },
    /// A scene was marked generating
    SceneStarted {
        /// Zero-based position in the work list
        index: usize,
        /// Items in the run
        total: usize,
        /// Scene id
        scene_id: u32,
    },
    /// A scene received its image
    SceneCompleted {
        /// Zero-based position in the work list
        index: usize,
        /// Scene id
        scene_id: u32,
    },
    /// A scene failed and was left imageless
    SceneFailed {
        /// Zero-based position in the work list
        index: usize,
        /// Scene id
        scene_id: u32,
        /// Error text
        message: String,
    },
    /// The run is over
    Finished(BatchReport),
}

impl BatchEvent {
    /// Run phase after this event; scene-level events leave it unchanged.
    pub fn phase(&self) -> Option<BatchPhase> {
        match self {
            BatchEvent::Started { total: 0 } => Some(BatchPhase::Idle),
            BatchEvent::Started { total } => Some(BatchPhase::Running {
                current: 0,
                total: *total,
            }),
            BatchEvent::SceneStarted { index, total, .. } => Some(BatchPhase::Running {
                current: index + 1,
                total: *total,
            }),
            BatchEvent::SceneCompleted { .. } | BatchEvent::SceneFailed { .. } => None,
            BatchEvent::Finished(report) if report.is_nothing_to_do() => Some(BatchPhase::Idle),
            BatchEvent::Finished(report) => Some(BatchPhase::Completed {
                succeeded: report.succeeded.len(),
                failed: report.failed.len(),
            }),
        }
    }

    /// The scene this event moves, and its new status.
    pub fn scene_status(&self) -> Option<(u32, SceneStatus)> {
        match self {
            BatchEvent::SceneStarted { scene_id, .. } => Some((*scene_id, SceneStatus::Generating)),
            BatchEvent::SceneCompleted { scene_id, .. } => Some((*scene_id, SceneStatus::Done)),
            BatchEvent::SceneFailed { scene_id, .. } => Some((*scene_id, SceneStatus::Failed)),
            BatchEvent::Started { .. } | BatchEvent::Finished(_) => None,
        }
    }
}

/// Receives progress notifications during a run.
pub trait BatchObserver: Send + Sync {
    /// Called once per event, in order.
    fn on_event(&self, event: &BatchEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn on_event(&self, _event: &BatchEvent) {}
}

struct BatchRun<'a> {
    observer: &'a dyn BatchObserver,
    report: BatchReport,
}

impl<'a> BatchRun<'a> {
    fn start(total: usize, observer: &'a dyn BatchObserver) -> Self {
        observer.on_event(&BatchEvent::Started { total });
        Self {
            observer,
            report: BatchReport {
                total,
                ..Default::default()
            },
        }
    }

    fn scene_started(&self, index: usize, scene_id: u32) {
        self.observer.on_event(&BatchEvent::SceneStarted {
            index,
            total: self.report.total,
            scene_id,
        });
    }

    fn scene_completed(&mut self, index: usize, scene_id: u32, checkpointed: bool) {
        self.report.succeeded.push(scene_id);
        if !checkpointed {
            self.report.checkpoint_failures += 1;
        }
        self.observer
            .on_event(&BatchEvent::SceneCompleted { index, scene_id });
    }

    fn scene_failed(&mut self, index: usize, scene_id: u32, message: String) {
        self.report.failed.push(SceneFailure {
            scene_id,
            message: message.clone(),
        });
        self.observer.on_event(&BatchEvent::SceneFailed {
            index,
            scene_id,
            message,
        });
    }

    fn finish(self) -> BatchReport {
        self.observer
            .on_event(&BatchEvent::Finished(self.report.clone()));
        self.report
    }
}

impl<G: MediaGenerator> Studio<G> {
    /// Generate a concept image for every scene in `filter` that lacks one.
    ///
    /// Per-scene failures never abort the run; they are collected in the
    /// report. An empty work list is a no-op report, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when the active project has no storyboard.
    #[tracing::instrument(skip(self, observer))]
    pub async fn generate_concept_images(
        &mut self,
        filter: SceneFilter,
        quality: ImageQuality,
        observer: &dyn BatchObserver,
    ) -> AniDirectorResult<BatchReport> {
        let storyboard = self
            .active
            .storyboard
            .as_ref()
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Storyboard))?;
        let work: Vec<u32> = storyboard
            .scenes()
            .iter()
            .filter(|s| filter.matches(s) && s.image(ImageMode::Concept).is_none())
            .map(|s| *s.id())
            .collect();

        let total = work.len();
        let mut run = BatchRun::start(total, observer);
        if work.is_empty() {
            tracing::info!("Every scene in range already has a concept image");
            return Ok(run.finish());
        }
        tracing::info!(total, filter = %filter, "Starting concept image run");

        for (index, scene_id) in work.into_iter().enumerate() {
            run.scene_started(index, scene_id);
            tracing::debug!(scene_id, current = index + 1, total, "Generating scene");

            let outcome = match self.begin_scene_generation(scene_id, ImageMode::Concept, quality) {
                Ok(request) => {
                    let result = self.request_image(&request).await;
                    self.finish_scene_generation(scene_id, ImageMode::Concept, &result);
                    result.map_err(|e| e.to_string())
                }
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(_) => {
                    let checkpointed = self.checkpoint().await.is_some();
                    run.scene_completed(index, scene_id, checkpointed);
                }
                Err(message) => {
                    tracing::error!(scene_id, error = %message, "Scene image failed, continuing");
                    run.scene_failed(index, scene_id, message);
                }
            }

            if index + 1 < total {
                tokio::time::sleep(self.settings.inter_call_delay()).await;
            }
        }

        let report = run.finish();
        tracing::info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            checkpoint_failures = report.checkpoint_failures,
            "Concept image run complete"
        );
        Ok(report)
    }
}
