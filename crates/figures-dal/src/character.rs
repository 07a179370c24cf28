use std::sync::Arc;

use figures_types::{FieldOfActivity, Gender, Status};
use garde::Validate;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    Batch, Error, ListingParams,
    error::Result,
    listing::{self, Snapshot},
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    pub field_of_activity: FieldOfActivity,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default)]
    pub works: Vec<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub text_resources: Vec<String>,
    #[serde(default)]
    pub audio_resources: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Character {
    /// Death date if one is recorded, blank strings count as missing.
    pub fn death_date(&self) -> Option<&str> {
        self.death_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 255;

/// Name length is checked on the trimmed value, which is what gets stored.
fn valid_name(value: &String, _ctx: &()) -> garde::Result {
    let chars = value.trim().chars().count();
    if chars < NAME_MIN_CHARS {
        Err(garde::Error::new(format!(
            "must have at least {NAME_MIN_CHARS} characters"
        )))
    } else if chars > NAME_MAX_CHARS {
        Err(garde::Error::new(format!(
            "must have at most {NAME_MAX_CHARS} characters"
        )))
    } else {
        Ok(())
    }
}

fn non_blank(value: &String, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("must not be blank"))
    } else {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacter {
    #[garde(custom(valid_name))]
    pub name: String,
    #[garde(skip)]
    pub gender: Gender,
    #[garde(length(max = 64), custom(non_blank))]
    pub birth_date: String,
    #[serde(default)]
    #[garde(inner(length(max = 64)))]
    pub death_date: Option<String>,
    #[garde(skip)]
    pub field_of_activity: FieldOfActivity,
    #[serde(default)]
    #[garde(skip)]
    pub status: Status,
    #[serde(default)]
    #[garde(inner(length(max = 10000)))]
    pub biography: Option<String>,
    #[serde(default)]
    #[garde(length(max = 1000), inner(length(min = 1, max = 255)))]
    pub works: Vec<String>,
    #[serde(default)]
    #[garde(inner(length(max = 2048)))]
    pub avatar: Option<String>,
    #[serde(default)]
    #[garde(inner(length(min = 1, max = 255)))]
    pub text_resources: Vec<String>,
    #[serde(default)]
    #[garde(inner(length(min = 1, max = 255)))]
    pub audio_resources: Vec<String>,
}

pub type UpdateCharacter = CreateCharacter;

impl From<&Character> for CreateCharacter {
    fn from(c: &Character) -> Self {
        CreateCharacter {
            name: c.name.clone(),
            gender: c.gender,
            birth_date: c.birth_date.clone(),
            death_date: c.death_date.clone(),
            field_of_activity: c.field_of_activity,
            status: c.status,
            biography: c.biography.clone(),
            works: c.works.clone(),
            avatar: c.avatar.clone(),
            text_resources: c.text_resources.clone(),
            audio_resources: c.audio_resources.clone(),
        }
    }
}

/// Scalar fields of the character form, lists are edited separately.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterFields {
    #[garde(custom(valid_name))]
    pub name: String,
    #[garde(skip)]
    pub gender: Gender,
    #[garde(length(max = 64), custom(non_blank))]
    pub birth_date: String,
    #[serde(default)]
    #[garde(inner(length(max = 64)))]
    pub death_date: Option<String>,
    #[garde(skip)]
    pub field_of_activity: FieldOfActivity,
    #[serde(default)]
    #[garde(skip)]
    pub status: Status,
    #[serde(default)]
    #[garde(inner(length(max = 10000)))]
    pub biography: Option<String>,
    #[serde(default)]
    #[garde(inner(length(max = 2048)))]
    pub avatar: Option<String>,
}

impl CharacterFields {
    pub fn into_payload(
        self,
        works: Vec<String>,
        text_resources: Vec<String>,
        audio_resources: Vec<String>,
    ) -> CreateCharacter {
        CreateCharacter {
            name: self.name,
            gender: self.gender,
            birth_date: self.birth_date,
            death_date: self.death_date,
            field_of_activity: self.field_of_activity,
            status: self.status,
            biography: self.biography,
            works,
            avatar: self.avatar,
            text_resources,
            audio_resources,
        }
    }
}

impl From<&Character> for CharacterFields {
    fn from(c: &Character) -> Self {
        CharacterFields {
            name: c.name.clone(),
            gender: c.gender,
            birth_date: c.birth_date.clone(),
            death_date: c.death_date.clone(),
            field_of_activity: c.field_of_activity,
            status: c.status,
            biography: c.biography.clone(),
            avatar: c.avatar.clone(),
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CreateCharacter {
    fn into_character(self, id: String, likes: u32, created_at: OffsetDateTime) -> Character {
        Character {
            id,
            name: self.name.trim().to_string(),
            gender: self.gender,
            birth_date: self.birth_date.trim().to_string(),
            death_date: blank_to_none(self.death_date),
            field_of_activity: self.field_of_activity,
            status: self.status,
            biography: blank_to_none(self.biography),
            works: self.works,
            likes,
            avatar: blank_to_none(self.avatar),
            text_resources: self.text_resources,
            audio_resources: self.audio_resources,
            created_at,
            updated_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Ordered list of work titles as edited in the character form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkList(Vec<String>);

impl WorkList {
    pub fn new(works: Vec<String>) -> Self {
        WorkList(works)
    }

    /// Appends trimmed title, rejecting blank titles and exact duplicates.
    pub fn add(&mut self, title: &str) -> Result<&str> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyWork);
        }
        if self.0.iter().any(|w| w == title) {
            return Err(Error::DuplicateWork(title.to_string()));
        }
        self.0.push(title.to_string());
        Ok(self.0.last().map(String::as_str).unwrap_or_default())
    }

    pub fn remove(&mut self, title: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|w| w != title);
        before != self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct CharacterRepository {
    store: Arc<RwLock<Snapshot>>,
}

impl CharacterRepository {
    /// Catalogue from loaded records, each must pass the same rules as a create payload.
    pub fn new(characters: Vec<Character>) -> Result<Self> {
        for (i, c) in characters.iter().enumerate() {
            if characters[..i].iter().any(|other| other.id == c.id) {
                return Err(Error::DuplicateId(c.id.clone()));
            }
            CreateCharacter::from(c)
                .validate()
                .map_err(|report| Error::InvalidRecord {
                    id: c.id.clone(),
                    reason: report.to_string(),
                })?;
        }
        Ok(Self {
            store: Arc::new(RwLock::new(Arc::new(characters))),
        })
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let characters: Vec<Character> = serde_json::from_str(data)?;
        Self::new(characters)
    }

    pub fn with_seed() -> Self {
        Self {
            store: Arc::new(RwLock::new(Arc::new(crate::seed::seed_characters()))),
        }
    }

    /// Read-only view of the whole collection at this moment.
    pub async fn snapshot(&self) -> Snapshot {
        self.store.read().await.clone()
    }

    pub async fn count(&self) -> u64 {
        self.store.read().await.len() as u64
    }

    pub async fn get(&self, id: &str) -> Result<Character> {
        self.store
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound(format!("Character {id}")))
    }

    pub async fn list(&self, params: ListingParams) -> Result<Batch<Character>> {
        let snapshot = self.snapshot().await;
        listing::select(&snapshot, &params)
    }

    pub async fn list_all(&self) -> Vec<Character> {
        self.snapshot().await.to_vec()
    }

    pub async fn list_by_field(&self, field: FieldOfActivity) -> Vec<Character> {
        self.snapshot()
            .await
            .iter()
            .filter(|c| c.field_of_activity == field)
            .cloned()
            .collect()
    }

    pub async fn list_by_status(&self, status: Status) -> Vec<Character> {
        self.snapshot()
            .await
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    pub async fn create(&self, payload: CreateCharacter) -> Result<Character> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = payload.into_character(id, 0, OffsetDateTime::now_utc());
        let mut store = self.store.write().await;
        Arc::make_mut(&mut *store).push(record.clone());
        debug!("Created character {}", record.id);
        Ok(record)
    }

    pub async fn update(&self, id: &str, payload: UpdateCharacter) -> Result<Character> {
        self.modify(id, |existing| {
            let (id, likes, created_at) = (existing.id.clone(), existing.likes, existing.created_at);
            *existing = payload.into_character(id, likes, created_at);
        })
        .await
    }

    pub async fn like(&self, id: &str) -> Result<Character> {
        self.modify(id, |c| {
            c.likes = c.likes.saturating_add(1);
            c.updated_at = OffsetDateTime::now_utc();
        })
        .await
    }

    pub async fn unlike(&self, id: &str) -> Result<Character> {
        self.modify(id, |c| {
            c.likes = c.likes.saturating_sub(1);
            c.updated_at = OffsetDateTime::now_utc();
        })
        .await
    }

    async fn modify<F>(&self, id: &str, f: F) -> Result<Character>
    where
        F: FnOnce(&mut Character),
    {
        let mut store = self.store.write().await;
        let pos = store
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::RecordNotFound(format!("Character {id}")))?;
        let characters = Arc::make_mut(&mut *store);
        f(&mut characters[pos]);
        debug!("Modified character {id}");
        Ok(characters[pos].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> CreateCharacter {
        CreateCharacter {
            name: name.to_string(),
            gender: Gender::Female,
            birth_date: "1150".to_string(),
            death_date: Some("  ".to_string()),
            field_of_activity: FieldOfActivity::Historian,
            status: Status::Inactive,
            biography: None,
            works: vec!["Tarikh".to_string()],
            avatar: None,
            text_resources: vec![],
            audio_resources: vec!["reading.mp3".to_string()],
        }
    }

    #[test]
    fn test_validation() {
        assert!(payload("Mahsati").validate().is_ok());
        assert!(payload("M").validate().is_err());
        assert!(payload("  ").validate().is_err());
        // stored trimmed, so surrounding spaces do not count
        assert!(payload(" x ").validate().is_err());
        assert!(payload(" xy ").validate().is_ok());
        assert!(payload(&"ش".repeat(255)).validate().is_ok());
        assert!(payload(&"ش".repeat(256)).validate().is_err());
        // two Persian letters are enough
        assert!(payload("مه").validate().is_ok());

        let mut p = payload("Mahsati");
        p.birth_date = " ".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_fields_into_payload() {
        let seed = crate::seed::seed_characters();
        let fields = CharacterFields::from(&seed[2]);
        assert!(fields.validate().is_ok());
        let payload = fields.into_payload(vec!["Nowruznama".into()], vec![], vec![]);
        assert_eq!(payload.name, seed[2].name);
        assert_eq!(payload.works, vec!["Nowruznama"]);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_missing_enum_fails_to_deserialize() {
        let json = r#"{"name":"Rabia","birthDate":"900","fieldOfActivity":"Poet"}"#;
        assert!(serde_json::from_str::<CreateCharacter>(json).is_err());
        let json = r#"{"name":"Rabia","gender":"Female","birthDate":"900","fieldOfActivity":"Poet"}"#;
        let p: CreateCharacter = serde_json::from_str(json).unwrap();
        assert_eq!(p.status, Status::Active);
        assert!(p.works.is_empty());
    }

    #[test]
    fn test_work_list() {
        let mut works = WorkList::new(vec!["Shahnameh".to_string()]);
        assert_eq!(works.add("  Golestan ").unwrap(), "Golestan");
        assert!(matches!(works.add("Shahnameh"), Err(Error::DuplicateWork(_))));
        assert!(matches!(works.add("   "), Err(Error::EmptyWork)));
        // case sensitive
        assert!(works.add("golestan").is_ok());
        assert_eq!(works.as_slice(), ["Shahnameh", "Golestan", "golestan"]);

        assert!(works.remove("Golestan"));
        assert!(!works.remove("Bustan"));
        assert_eq!(works.into_inner(), vec!["Shahnameh", "golestan"]);
    }

    #[tokio::test]
    async fn test_create_update_like() {
        let repo = CharacterRepository::with_seed();
        let created = repo.create(payload("Mahsati")).await.unwrap();
        assert_eq!(created.likes, 0);
        assert_eq!(created.death_date, None);
        assert_eq!(repo.count().await, 7);

        let liked = repo.like(&created.id).await.unwrap();
        assert_eq!(liked.likes, 1);

        let mut update = payload("Mahsati Ganjavi");
        update.status = Status::Active;
        let updated = repo.update(&created.id, update).await.unwrap();
        assert_eq!(updated.name, "Mahsati Ganjavi");
        assert_eq!(updated.likes, 1);
        assert_eq!(updated.created_at, created.created_at);

        repo.unlike(&created.id).await.unwrap();
        let unliked = repo.unlike(&created.id).await.unwrap();
        assert_eq!(unliked.likes, 0);

        assert!(matches!(
            repo.get("missing").await,
            Err(Error::RecordNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_is_isolated() {
        let repo = CharacterRepository::with_seed();
        let before = repo.snapshot().await;
        repo.like("1").await.unwrap();
        assert_eq!(before[0].likes, 245);
        assert_eq!(repo.get("1").await.unwrap().likes, 246);
    }

    #[tokio::test]
    async fn test_stored_name_is_trimmed() {
        let repo = CharacterRepository::with_seed();
        let created = repo.create(payload("  Mahsati  ")).await.unwrap();
        assert_eq!(created.name, "Mahsati");
        let all = repo.list_all().await;
        assert_eq!(all.len(), 7);
        assert_eq!(all.last().map(|c| c.name.as_str()), Some("Mahsati"));

        let fields: CharacterFields = serde_json::from_str(
            r#"{"name":" x ","gender":"Female","birthDate":"1089","fieldOfActivity":"Poet"}"#,
        )
        .unwrap();
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut characters = crate::seed::seed_characters();
        characters.push(characters[0].clone());
        assert!(matches!(
            CharacterRepository::new(characters),
            Err(Error::DuplicateId(id)) if id == "1"
        ));
    }

    #[test]
    fn test_invalid_record_rejected() {
        assert!(CharacterRepository::new(crate::seed::seed_characters()).is_ok());
        let mut characters = crate::seed::seed_characters();
        characters[3].name = " a ".to_string();
        assert!(matches!(
            CharacterRepository::new(characters),
            Err(Error::InvalidRecord { id, .. }) if id == "4"
        ));
    }
}
