//! Test doubles for the storyboard crate.
//!
//! A scripted generator, deterministic clocks, and a store whose writes can
//! be switched off.

#![allow(dead_code)]

use anidirector_core::{
    Act, Character, Clock, GenerationSettings, ImageRef, Scene, StoryConfig, StoryIdea,
    StoryboardData,
};
use anidirector_error::{
    AniDirectorResult, GenerationError, GenerationErrorKind, GenerationResult, PersistenceError,
    PersistenceErrorKind,
};
use anidirector_interface::{ImageRequest, MediaGenerator};
use anidirector_storage::{Collection, InMemoryStore, RecordStore};
use anidirector_storyboard::Studio;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock that advances one second per reading.
#[derive(Debug)]
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut now = self.0.lock().unwrap();
        *now += Duration::seconds(1);
        *now
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 29, 16, 0, 0).unwrap()
}

/// Settings with no pacing or retry delay.
pub fn zero_delay_settings() -> GenerationSettings {
    GenerationSettings::builder()
        .inter_call_delay_ms(0u64)
        .transient_retry_delay_ms(0u64)
        .build()
        .unwrap()
}

/// The prompt a planned scene sends in concept mode.
pub fn scene_prompt(id: u32) -> String {
    format!("scene {id}")
}

/// Three scenes whose last two share id 2.
pub fn plan_with_repeated_id() -> StoryboardData {
    let scenes = [(1u32, "a"), (2, "b"), (2, "c")]
        .into_iter()
        .map(|(id, prompt)| {
            Scene::builder()
                .id(id)
                .act(Act::One)
                .visual_description(prompt)
                .build()
                .unwrap()
        })
        .collect();
    StoryboardData::new(scenes, "")
}

/// `count` scenes split across three acts, all featuring Tico.
pub fn plan(count: u32) -> StoryboardData {
    let scenes = (1..=count)
        .map(|id| {
            let act = match id {
                n if n <= count / 3 => Act::One,
                n if n <= 2 * count / 3 => Act::Two,
                _ => Act::Three,
            };
            Scene::builder()
                .id(id)
                .act(act)
                .duration(0u32)
                .start_offset(99u32)
                .visual_description(scene_prompt(id))
                .camera_angle("Wide shot")
                .involved_character_names(vec!["Tico".to_string()])
                .build()
                .unwrap()
        })
        .collect();
    StoryboardData::new(scenes, "Pixar-like, warm dusk light")
}

/// Mark some scenes of a plan as already illustrated.
pub fn with_existing_images(mut plan: StoryboardData, ids: &[u32]) -> StoryboardData {
    for id in ids {
        let scene = plan.scene_mut(*id).unwrap();
        scene.complete_generation(
            anidirector_core::ImageMode::Concept,
            ImageRef::from(format!("data:image/png;base64,existing{id}")),
        );
    }
    plan
}

pub fn story_config() -> StoryConfig {
    StoryConfig {
        title: "Rail Run".to_string(),
        protagonist_name: "Tico".to_string(),
        protagonist_description: "small grey mouse".to_string(),
        rescue_target_name: "Mimi".to_string(),
        rescue_target_description: "white kitten".to_string(),
        danger_threat: "runaway train".to_string(),
        danger_tool: "rusty lever".to_string(),
        danger_location: "mountain pass".to_string(),
        setting: "Night rail yard".to_string(),
        ..Default::default()
    }
}

pub fn character(id: &str, name: &str, description: &str) -> Character {
    Character::new(
        id,
        name,
        description,
        Some(ImageRef::from_base64("image/png", &format!("{name}Portrait"))),
    )
}

/// A generator driven by a script.
///
/// Images succeed unless the prompt is listed in `failing_prompts`, or a
/// queued failure is pending. After `stall_after` successful images every
/// further image request never completes.
#[derive(Default)]
pub struct MockGenerator {
    idea: StoryIdea,
    plan: StoryboardData,
    failing_prompts: HashMap<String, GenerationErrorKind>,
    queued_failures: Mutex<VecDeque<GenerationErrorKind>>,
    stall_after: Option<usize>,
    image_requests: Mutex<Vec<ImageRequest>>,
    images_returned: AtomicUsize,
    plan_calls: AtomicUsize,
    idea_calls: AtomicUsize,
}

impl MockGenerator {
    pub fn new(plan: StoryboardData) -> Self {
        Self {
            plan,
            ..Default::default()
        }
    }

    pub fn with_idea(mut self, idea: StoryIdea) -> Self {
        self.idea = idea;
        self
    }

    /// Fail every image request whose prompt is `prompt`.
    pub fn failing_on(mut self, prompt: impl Into<String>, kind: GenerationErrorKind) -> Self {
        self.failing_prompts.insert(prompt.into(), kind);
        self
    }

    /// Fail the next calls, of any kind, in order.
    pub fn failing_first(self, kinds: Vec<GenerationErrorKind>) -> Self {
        *self.queued_failures.lock().unwrap() = kinds.into();
        self
    }

    /// Queue failures for the next calls on a generator already in use.
    pub fn queue_failures(&self, kinds: Vec<GenerationErrorKind>) {
        self.queued_failures.lock().unwrap().extend(kinds);
    }

    pub fn stalling_after(mut self, images: usize) -> Self {
        self.stall_after = Some(images);
        self
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().unwrap().clone()
    }

    pub fn requested_prompts(&self) -> Vec<String> {
        self.image_requests()
            .iter()
            .map(|r| r.prompt().clone())
            .collect()
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn idea_calls(&self) -> usize {
        self.idea_calls.load(Ordering::SeqCst)
    }

    fn queued_failure(&self) -> GenerationResult<()> {
        match self.queued_failures.lock().unwrap().pop_front() {
            Some(kind) => Err(GenerationError::new(kind)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaGenerator for MockGenerator {
    async fn generate_idea(&self) -> GenerationResult<StoryIdea> {
        self.idea_calls.fetch_add(1, Ordering::SeqCst);
        self.queued_failure()?;
        Ok(self.idea.clone())
    }

    async fn generate_storyboard_plan(
        &self,
        _config: &StoryConfig,
    ) -> GenerationResult<StoryboardData> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        self.queued_failure()?;
        Ok(self.plan.clone())
    }

    async fn generate_character_design(
        &self,
        name: &str,
        _description: &str,
    ) -> GenerationResult<ImageRef> {
        self.queued_failure()?;
        Ok(ImageRef::from_base64("image/png", &format!("{name}Design")))
    }

    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<ImageRef> {
        self.image_requests.lock().unwrap().push(request.clone());
        if let Some(limit) = self.stall_after
            && self.images_returned.load(Ordering::SeqCst) >= limit
        {
            std::future::pending::<()>().await;
        }
        self.queued_failure()?;
        if let Some(kind) = self.failing_prompts.get(request.prompt()) {
            return Err(GenerationError::new(kind.clone()));
        }
        let n = self.images_returned.fetch_add(1, Ordering::SeqCst);
        Ok(ImageRef::from_base64("image/png", &format!("generated{n}")))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An in-memory store whose writes fail while `fail_writes` is set.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> AniDirectorResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::new(PersistenceErrorKind::Unavailable(
                "store offline".to_string(),
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn get_all(&self, collection: Collection) -> AniDirectorResult<Vec<Value>> {
        self.inner.get_all(collection).await
    }

    async fn upsert(&self, collection: Collection, record: Value) -> AniDirectorResult<()> {
        self.check()?;
        self.inner.upsert(collection, record).await
    }

    async fn replace_all(
        &self,
        collection: Collection,
        records: Vec<Value>,
    ) -> AniDirectorResult<()> {
        self.check()?;
        self.inner.replace_all(collection, records).await
    }

    async fn clear(&self, collection: Collection) -> AniDirectorResult<()> {
        self.check()?;
        self.inner.clear(collection).await
    }
}

/// Open a studio over `store` with a fixed clock and no delays.
pub async fn open_studio(
    store: Arc<dyn RecordStore>,
    generator: MockGenerator,
) -> Studio<MockGenerator> {
    Studio::open(
        store,
        generator,
        Arc::new(FixedClock(epoch())),
        zero_delay_settings(),
    )
    .await
    .unwrap()
}

/// Open a studio with the sample config and the generator's plan applied.
pub async fn planned_studio(
    store: Arc<dyn RecordStore>,
    generator: MockGenerator,
) -> Studio<MockGenerator> {
    let mut studio = open_studio(store, generator).await;
    studio.update_config(story_config());
    studio.generate_story_plan().await.unwrap();
    studio
}
