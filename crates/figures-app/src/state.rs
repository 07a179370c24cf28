use std::sync::Arc;

use figures_dal::character::CharacterRepository;
use figures_types::config::{CenturyBands, UploadConfig};

use crate::{draft::Drafts, events::Events};

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, characters: CharacterRepository) -> Self {
        let events = Events::new();
        let drafts = Drafts::new(app_config.upload.clone(), events.clone());
        AppState {
            state: Arc::new(AppStateInner {
                characters,
                drafts,
                events,
                app_config,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn characters(&self) -> &CharacterRepository {
        &self.state.characters
    }

    pub fn drafts(&self) -> &Drafts {
        &self.state.drafts
    }

    pub fn events(&self) -> &Events {
        &self.state.events
    }
}

struct AppStateInner {
    characters: CharacterRepository,
    drafts: Drafts,
    events: Events,
    app_config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_page_size: u32,
    pub century_bands: CenturyBands,
    pub upload: UploadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_page_size: figures_dal::listing::DEFAULT_PAGE_SIZE as u32,
            century_bands: CenturyBands::default(),
            upload: UploadConfig::default(),
        }
    }
}
