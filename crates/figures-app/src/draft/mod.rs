//! Server side state of open character forms: work titles being edited and
//! attachments going through simulated uploads.
use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use figures_dal::character::{Character, CharacterFields, WorkList};
use figures_types::{
    config::{UploadConfig, UploadPolicy},
    ResourceKind,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{interval, interval_at, sleep_until, Instant, MissedTickBehavior},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::{EventMessage, EventType, Events};

pub mod rest_api;

const PROGRESS_STEP: u8 = 10;
const MIN_TICK: Duration = Duration::from_millis(1);

pub type DraftResult<T> = std::result::Result<T, DraftError>;

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Draft {0}")]
    DraftNotFound(Uuid),
    #[error("File {0}")]
    FileNotFound(Uuid),
    #[error(transparent)]
    Catalogue(#[from] figures_dal::Error),
}

fn accepted_extensions(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Text => &["txt", "pdf", "doc", "docx"],
        ResourceKind::Audio => &["mp3", "wav", "ogg"],
    }
}

fn has_accepted_extension(kind: ResourceKind, name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            accepted_extensions(kind)
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadStatus {
    /// Resource already stored with the edited character.
    Existing,
    Uploading,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub status: UploadStatus,
    pub progress: u8,
}

impl FileEntry {
    fn existing(name: &str) -> Self {
        FileEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size: None,
            status: UploadStatus::Existing,
            progress: 100,
        }
    }

    fn uploading(spec: FileSpec) -> Self {
        FileEntry {
            id: Uuid::new_v4(),
            name: spec.name,
            size: Some(spec.size),
            status: UploadStatus::Uploading,
            progress: 0,
        }
    }
}

/// Dropping an upload cancels its simulation task.
#[derive(Debug)]
struct Upload {
    entry: FileEntry,
    task: Option<JoinHandle<()>>,
}

impl Drop for Upload {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FileSpec {
    #[garde(length(chars, min = 1, max = 255))]
    pub name: String,
    #[garde(skip)]
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(transparent)]
pub struct FileBatch(#[garde(length(min = 1, max = 100), dive)] pub Vec<FileSpec>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    TooManyFiles,
    TooLarge,
    UnsupportedType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub name: String,
    pub kind: ResourceKind,
    pub reason: RejectReason,
    pub policy: UploadPolicy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub accepted: Vec<FileEntry>,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<CharacterFields>,
    pub works: Vec<String>,
    pub text_files: Vec<FileEntry>,
    pub audio_files: Vec<FileEntry>,
    pub text_policy: UploadPolicy,
    pub audio_policy: UploadPolicy,
}

/// What a draft contributes to the saved character.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub character_id: Option<String>,
    pub works: Vec<String>,
    pub text_resources: Vec<String>,
    pub audio_resources: Vec<String>,
}

#[derive(Debug)]
struct Draft {
    id: Uuid,
    character_id: Option<String>,
    fields: Option<CharacterFields>,
    works: WorkList,
    text: Vec<Upload>,
    audio: Vec<Upload>,
    /// Last client action on the draft.
    touched: Instant,
}

impl Draft {
    fn new(character: Option<&Character>) -> Self {
        let existing = |names: &[String]| {
            names
                .iter()
                .map(|n| Upload {
                    entry: FileEntry::existing(n),
                    task: None,
                })
                .collect()
        };
        match character {
            Some(c) => Draft {
                id: Uuid::new_v4(),
                character_id: Some(c.id.clone()),
                fields: Some(CharacterFields::from(c)),
                works: WorkList::new(c.works.clone()),
                text: existing(&c.text_resources),
                audio: existing(&c.audio_resources),
                touched: Instant::now(),
            },
            None => Draft {
                id: Uuid::new_v4(),
                character_id: None,
                fields: None,
                works: WorkList::default(),
                text: Vec::new(),
                audio: Vec::new(),
                touched: Instant::now(),
            },
        }
    }

    fn files(&self, kind: ResourceKind) -> &[Upload] {
        match kind {
            ResourceKind::Text => &self.text,
            ResourceKind::Audio => &self.audio,
        }
    }

    fn files_mut(&mut self, kind: ResourceKind) -> &mut Vec<Upload> {
        match kind {
            ResourceKind::Text => &mut self.text,
            ResourceKind::Audio => &mut self.audio,
        }
    }

    fn file_mut(&mut self, kind: ResourceKind, file_id: Uuid) -> Option<&mut FileEntry> {
        self.files_mut(kind)
            .iter_mut()
            .find(|u| u.entry.id == file_id)
            .map(|u| &mut u.entry)
    }

    /// Files beyond the remaining capacity are rejected, as are oversized files
    /// and unsupported types. Rejected files do not use up capacity.
    fn admit(
        &mut self,
        kind: ResourceKind,
        policy: UploadPolicy,
        batch: Vec<FileSpec>,
    ) -> (Vec<FileEntry>, Vec<Rejection>) {
        let mut remaining = policy.max_files.saturating_sub(self.files(kind).len());
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for spec in batch {
            let reason = if remaining == 0 {
                Some(RejectReason::TooManyFiles)
            } else if spec.size > policy.max_size {
                Some(RejectReason::TooLarge)
            } else if !has_accepted_extension(kind, &spec.name) {
                Some(RejectReason::UnsupportedType)
            } else {
                None
            };
            match reason {
                Some(reason) => rejected.push(Rejection {
                    name: spec.name,
                    kind,
                    reason,
                    policy,
                }),
                None => {
                    remaining -= 1;
                    let entry = FileEntry::uploading(spec);
                    accepted.push(entry.clone());
                    self.files_mut(kind).push(Upload { entry, task: None });
                }
            }
        }
        (accepted, rejected)
    }

    /// Existing names first, then finished uploads, in list order.
    fn resource_names(&self, kind: ResourceKind) -> Vec<String> {
        let with_status = |status: UploadStatus| {
            self.files(kind)
                .iter()
                .filter(move |u| u.entry.status == status)
                .map(|u| u.entry.name.clone())
        };
        with_status(UploadStatus::Existing)
            .chain(with_status(UploadStatus::Success))
            .collect()
    }

    fn view(&self, config: &UploadConfig) -> DraftView {
        let entries = |kind| {
            self.files(kind)
                .iter()
                .map(|u| u.entry.clone())
                .collect::<Vec<_>>()
        };
        DraftView {
            id: self.id,
            character_id: self.character_id.clone(),
            fields: self.fields.clone(),
            works: self.works.as_slice().to_vec(),
            text_files: entries(ResourceKind::Text),
            audio_files: entries(ResourceKind::Audio),
            text_policy: config.policy(ResourceKind::Text),
            audio_policy: config.policy(ResourceKind::Audio),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadNotice<'a> {
    draft_id: Uuid,
    file_id: Uuid,
    kind: ResourceKind,
    name: &'a str,
}

async fn remove_idle(drafts: &RwLock<HashMap<Uuid, Draft>>, ttl: Duration) -> usize {
    let mut drafts = drafts.write().await;
    let before = drafts.len();
    drafts.retain(|id, d| {
        let keep = d.touched.elapsed() < ttl;
        if !keep {
            info!("Draft {id} expired after {ttl:?} idle");
        }
        keep
    });
    before - drafts.len()
}

#[derive(Clone)]
pub struct Drafts {
    inner: Arc<RwLock<HashMap<Uuid, Draft>>>,
    config: UploadConfig,
    events: Events,
}

impl Drafts {
    pub fn new(config: UploadConfig, events: Events) -> Self {
        Drafts {
            inner: Arc::new(RwLock::new(HashMap::new())),
            config,
            events,
        }
    }

    /// Opens a blank draft or one prefilled from an existing character.
    pub async fn open(&self, character: Option<&Character>) -> DraftView {
        let draft = Draft::new(character);
        let view = draft.view(&self.config);
        debug!(
            "Opened draft {} for {:?}",
            draft.id,
            draft.character_id.as_deref()
        );
        self.inner.write().await.insert(draft.id, draft);
        view
    }

    pub async fn get(&self, id: Uuid) -> DraftResult<DraftView> {
        self.modify(id, |d| Ok(d.view(&self.config))).await
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Removes the draft, pending uploads are cancelled.
    pub async fn discard(&self, id: Uuid) -> DraftResult<()> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| debug!("Discarded draft {id}"))
            .ok_or(DraftError::DraftNotFound(id))
    }

    async fn modify<F, R>(&self, id: Uuid, f: F) -> DraftResult<R>
    where
        F: FnOnce(&mut Draft) -> DraftResult<R>,
    {
        let mut drafts = self.inner.write().await;
        let draft = drafts.get_mut(&id).ok_or(DraftError::DraftNotFound(id))?;
        draft.touched = Instant::now();
        f(draft)
    }

    /// Drops drafts idle for at least the configured time, returns how many went.
    pub async fn expire_idle(&self) -> usize {
        remove_idle(&self.inner, self.config.draft_ttl).await
    }

    /// Starts the periodic sweep of idle drafts. The task ends once the registry is dropped.
    pub fn spawn_expiry(&self) -> JoinHandle<()> {
        let inner: Weak<RwLock<HashMap<Uuid, Draft>>> = Arc::downgrade(&self.inner);
        let ttl = self.config.draft_ttl;
        let period = (ttl / 4).max(MIN_TICK);
        tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(inner) = inner.upgrade() else {
                    debug!("Draft registry gone, stopping expiry");
                    break;
                };
                remove_idle(&inner, ttl).await;
            }
        })
    }

    pub async fn add_work(&self, id: Uuid, title: &str) -> DraftResult<DraftView> {
        self.modify(id, |d| {
            d.works.add(title)?;
            Ok(d.view(&self.config))
        })
        .await
    }

    pub async fn remove_work(&self, id: Uuid, title: &str) -> DraftResult<DraftView> {
        self.modify(id, |d| {
            if !d.works.remove(title) {
                debug!("Work {title} not in draft {id}");
            }
            Ok(d.view(&self.config))
        })
        .await
    }

    /// Starts simulated uploads for admitted files and publishes a notice for
    /// every rejected one.
    pub async fn add_files(
        &self,
        id: Uuid,
        kind: ResourceKind,
        batch: Vec<FileSpec>,
    ) -> DraftResult<UploadOutcome> {
        let policy = self.config.policy(kind);
        let (accepted, rejected) = self
            .modify(id, |d| {
                let (accepted, rejected) = d.admit(kind, policy, batch);
                for entry in &accepted {
                    let task = tokio::spawn(self.clone().simulate_upload(id, kind, entry.id));
                    if let Some(upload) = d
                        .files_mut(kind)
                        .iter_mut()
                        .find(|u| u.entry.id == entry.id)
                    {
                        upload.task = Some(task);
                    }
                }
                Ok((accepted, rejected))
            })
            .await?;

        for rejection in &rejected {
            debug!(
                "Rejected {} upload {}: {:?}",
                kind, rejection.name, rejection.reason
            );
            self.events.send(EventMessage::new(
                id,
                EventType::UploadRejected,
                rejection,
            ));
        }
        Ok(UploadOutcome { accepted, rejected })
    }

    /// Removes a file entry, cancelling its upload if still running.
    pub async fn remove_file(
        &self,
        id: Uuid,
        kind: ResourceKind,
        file_id: Uuid,
    ) -> DraftResult<DraftView> {
        self.modify(id, |d| {
            let files = d.files_mut(kind);
            let pos = files
                .iter()
                .position(|u| u.entry.id == file_id)
                .ok_or(DraftError::FileNotFound(file_id))?;
            let removed = files.remove(pos);
            debug!(
                "Removed {} file {} ({:?})",
                kind, removed.entry.name, removed.entry.status
            );
            Ok(d.view(&self.config))
        })
        .await
    }

    pub async fn submission(&self, id: Uuid) -> DraftResult<Submission> {
        let drafts = self.inner.read().await;
        let draft = drafts.get(&id).ok_or(DraftError::DraftNotFound(id))?;
        Ok(Submission {
            character_id: draft.character_id.clone(),
            works: draft.works.as_slice().to_vec(),
            text_resources: draft.resource_names(ResourceKind::Text),
            audio_resources: draft.resource_names(ResourceKind::Audio),
        })
    }

    /// Closes a submitted draft.
    pub async fn close(&self, id: Uuid) {
        if self.inner.write().await.remove(&id).is_some() {
            debug!("Closed draft {id}");
        }
    }

    async fn simulate_upload(self, draft_id: Uuid, kind: ResourceKind, file_id: Uuid) {
        let tick = self.config.upload_tick.max(MIN_TICK);
        let started = Instant::now();
        let deadline = started + self.config.upload_duration;
        let mut ticks = interval_at(started + tick, tick);
        loop {
            tokio::select! {
                biased;
                _ = sleep_until(deadline) => break,
                _ = ticks.tick() => {
                    let advanced = self
                        .with_file(draft_id, kind, file_id, |f| {
                            f.progress = f.progress.saturating_add(PROGRESS_STEP).min(100);
                        })
                        .await;
                    if advanced.is_none() {
                        return;
                    }
                }
            }
        }

        let finished = self
            .with_file(draft_id, kind, file_id, |f| {
                f.status = UploadStatus::Success;
                f.progress = 100;
                f.name.clone()
            })
            .await;
        if let Some(name) = finished {
            info!("Upload of {kind} file {name} finished");
            self.events.send(EventMessage::new(
                draft_id,
                EventType::UploadFinished,
                UploadNotice {
                    draft_id,
                    file_id,
                    kind,
                    name: &name,
                },
            ));
        }
    }

    async fn with_file<F, R>(&self, id: Uuid, kind: ResourceKind, file_id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut FileEntry) -> R,
    {
        let mut drafts = self.inner.write().await;
        drafts.get_mut(&id)?.file_mut(kind, file_id).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figures_dal::seed::seed_characters;

    const MB: u64 = 1024 * 1024;

    fn files(specs: &[(&str, u64)]) -> Vec<FileSpec> {
        specs
            .iter()
            .map(|(name, size)| FileSpec {
                name: name.to_string(),
                size: *size,
            })
            .collect()
    }

    fn drafts() -> Drafts {
        Drafts::new(UploadConfig::default(), Events::new())
    }

    #[test]
    fn test_admit_capacity_and_size() {
        let seed = seed_characters();
        // Hafez has two text resources already
        let mut draft = Draft::new(Some(&seed[0]));
        let policy = UploadConfig::default().policy(ResourceKind::Text);
        let (accepted, rejected) = draft.admit(
            ResourceKind::Text,
            policy,
            files(&[
                ("a.pdf", MB),
                ("huge.pdf", 11 * MB),
                ("b.txt", 10 * MB),
                ("c.doc", 1),
                ("d.docx", 1),
            ]),
        );
        let names: Vec<_> = accepted.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.txt", "c.doc"]);
        let reasons: Vec<_> = rejected.iter().map(|r| (r.name.as_str(), r.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                ("huge.pdf", RejectReason::TooLarge),
                ("d.docx", RejectReason::TooManyFiles)
            ]
        );
        assert_eq!(draft.files(ResourceKind::Text).len(), 5);
    }

    #[test]
    fn test_admit_type() {
        let mut draft = Draft::new(None);
        let policy = UploadConfig::default().policy(ResourceKind::Audio);
        let (accepted, rejected) = draft.admit(
            ResourceKind::Audio,
            policy,
            files(&[("poem.MP3", MB), ("poem.pdf", MB), ("noext", 1)]),
        );
        assert_eq!(accepted.len(), 1);
        assert!(rejected
            .iter()
            .all(|r| r.reason == RejectReason::UnsupportedType));
    }

    #[test]
    fn test_resource_names_order() {
        let seed = seed_characters();
        let mut draft = Draft::new(Some(&seed[0]));
        let policy = UploadConfig::default().policy(ResourceKind::Text);
        let (accepted, _) = draft.admit(
            ResourceKind::Text,
            policy,
            files(&[("new.pdf", 1), ("pending.pdf", 1)]),
        );
        if let Some(f) = draft.file_mut(ResourceKind::Text, accepted[0].id) {
            f.status = UploadStatus::Success;
        }
        let existing_id = draft.text[0].entry.id;
        draft.files_mut(ResourceKind::Text).remove(0);
        draft.text.push(Upload {
            entry: FileEntry::existing("late.pdf"),
            task: None,
        });
        assert_eq!(
            draft.resource_names(ResourceKind::Text),
            vec!["تفسیر-غزلیات.pdf", "late.pdf", "new.pdf"]
        );
        assert!(draft.file_mut(ResourceKind::Text, existing_id).is_none());
        assert_eq!(
            draft.resource_names(ResourceKind::Audio),
            vec!["غزل-حافظ-1.mp3"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_completes() {
        let drafts = drafts();
        let mut notices = drafts.events.subscribe();
        let draft = drafts.open(None).await;
        let outcome = drafts
            .add_files(draft.id, ResourceKind::Text, files(&[("a.pdf", 1)]))
            .await
            .unwrap();
        assert_eq!(outcome.accepted.len(), 1);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let view = drafts.get(draft.id).await.unwrap();
        assert_eq!(view.text_files[0].status, UploadStatus::Uploading);
        assert!(view.text_files[0].progress >= 40);
        assert!(drafts.submission(draft.id).await.unwrap().text_resources.is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        let view = drafts.get(draft.id).await.unwrap();
        assert_eq!(view.text_files[0].status, UploadStatus::Success);
        assert_eq!(view.text_files[0].progress, 100);
        assert_eq!(
            drafts.submission(draft.id).await.unwrap().text_resources,
            vec!["a.pdf"]
        );
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.kind(), EventType::UploadFinished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_cancels_upload() {
        let drafts = drafts();
        let draft = drafts.open(None).await;
        let outcome = drafts
            .add_files(
                draft.id,
                ResourceKind::Audio,
                files(&[("a.mp3", 1), ("b.mp3", 1)]),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        drafts
            .remove_file(draft.id, ResourceKind::Audio, outcome.accepted[0].id)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        let submission = drafts.submission(draft.id).await.unwrap();
        assert_eq!(submission.audio_resources, vec!["b.mp3"]);

        assert!(matches!(
            drafts
                .remove_file(draft.id, ResourceKind::Audio, outcome.accepted[0].id)
                .await,
            Err(DraftError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejections_are_published() {
        let drafts = drafts();
        let mut notices = drafts.events.subscribe();
        let draft = drafts.open(None).await;
        let outcome = drafts
            .add_files(draft.id, ResourceKind::Audio, files(&[("big.mp3", 51 * MB)]))
            .await
            .unwrap();
        assert!(outcome.accepted.is_empty());
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.kind(), EventType::UploadRejected);
        assert!(notice.data().contains("tooLarge"));
    }

    #[tokio::test]
    async fn test_works_editing() {
        let drafts = drafts();
        let seed = seed_characters();
        let draft = drafts.open(Some(&seed[1])).await;
        assert_eq!(draft.works, vec!["شاهنامه"]);
        assert_eq!(draft.character_id.as_deref(), Some("2"));

        let view = drafts.add_work(draft.id, " Hajvname ").await.unwrap();
        assert_eq!(view.works, vec!["شاهنامه", "Hajvname"]);
        assert!(matches!(
            drafts.add_work(draft.id, "شاهنامه").await,
            Err(DraftError::Catalogue(figures_dal::Error::DuplicateWork(_)))
        ));
        assert!(matches!(
            drafts.add_work(draft.id, "  ").await,
            Err(DraftError::Catalogue(figures_dal::Error::EmptyWork))
        ));
        let view = drafts.remove_work(draft.id, "شاهنامه").await.unwrap();
        assert_eq!(view.works, vec!["Hajvname"]);

        drafts.discard(draft.id).await.unwrap();
        assert!(matches!(
            drafts.get(draft.id).await,
            Err(DraftError::DraftNotFound(_))
        ));
        assert_eq!(drafts.count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_drafts_expire() {
        let config = UploadConfig {
            draft_ttl: Duration::from_secs(60),
            ..Default::default()
        };
        let drafts = Drafts::new(config, Events::new());
        let sweeper = drafts.spawn_expiry();
        let idle = drafts.open(None).await;
        let busy = drafts.open(None).await;
        drafts
            .add_files(idle.id, ResourceKind::Text, files(&[("a.pdf", 1)]))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(40)).await;
        drafts.add_work(busy.id, "Divan").await.unwrap();
        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(drafts.count().await, 1);
        assert!(matches!(
            drafts.get(idle.id).await,
            Err(DraftError::DraftNotFound(_))
        ));

        // reading the draft counts as activity
        tokio::time::sleep(Duration::from_secs(15)).await;
        drafts.get(busy.id).await.unwrap();
        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(drafts.count().await, 1);

        tokio::time::sleep(Duration::from_secs(80)).await;
        assert_eq!(drafts.count().await, 0);
        assert_eq!(drafts.expire_idle().await, 0);

        drop(drafts);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(sweeper.is_finished());
    }
}
