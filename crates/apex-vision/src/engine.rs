use apex_capture::Frame;
use apex_data::{Profile, Settings};
use apex_state::OverlayState;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::context::{DebugState, EvalContext};
use crate::error::{Result, VisionError};
use crate::policy::Policy;
use crate::templates::TemplateStore;

/// Catalog and policy of the profile currently in use. Replaced as a whole.
#[derive(Debug, Clone)]
struct ActiveProfile {
    profile: Profile,
    catalog: Catalog,
    policy: Policy,
}

impl ActiveProfile {
    fn new(profile: Profile) -> Self {
        Self {
            profile,
            catalog: Catalog::for_profile(profile),
            policy: Policy::for_device(profile.device),
        }
    }
}

/// Classifies frames into overlay categories for the configured profile.
#[derive(Debug)]
pub struct Engine {
    settings: Settings,
    data_dir: Option<PathBuf>,
    store: TemplateStore,
    active: Option<ActiveProfile>,
    /// Frame size last rejected, so the warning is logged once per size
    rejected_size: Option<(u32, u32)>,
    debug: DebugState,
}

impl Engine {
    /// Load the templates for the configured language and input device.
    pub fn new(settings: Settings, data_dir: &Path) -> Result<Self> {
        let store = TemplateStore::load(data_dir, settings.language, settings.input_device)?;
        let mut engine = Self::with_store(settings, store);
        engine.data_dir = Some(data_dir.to_path_buf());
        Ok(engine)
    }

    /// Engine over templates that are already loaded. Settings changes that
    /// need other templates cannot be applied to it.
    pub fn with_store(settings: Settings, store: TemplateStore) -> Self {
        info!(
            "Classifier ready: {} template set(s), threshold {}",
            store.len(),
            settings.threshold
        );
        Self {
            debug: DebugState::from_settings(&settings),
            settings,
            data_dir: None,
            store,
            active: None,
            rejected_size: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active_profile(&self) -> Option<Profile> {
        self.active.as_ref().map(|a| a.profile)
    }

    pub fn debug_state(&self) -> &DebugState {
        &self.debug
    }

    /// Switch to new settings. A new template store is loaded first when the
    /// language or input device changed; on failure nothing is touched.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<()> {
        if self.settings.needs_reload(&settings) {
            let data_dir = self.data_dir.as_deref().ok_or(VisionError::NoTemplateDir)?;
            let store = TemplateStore::load(data_dir, settings.language, settings.input_device)?;
            self.store = store;
            self.active = None;
            info!(
                "Switched templates to {:?}/{:?}",
                settings.language, settings.input_device
            );
        }

        self.debug.reconfigure(&settings);
        self.settings = settings;
        Ok(())
    }

    /// Classify one frame.
    ///
    /// Returns `None` when the frame size has no profile or no templates are
    /// loaded for it; callers keep their banners as they are in that case.
    pub fn evaluate(&mut self, frame: &Frame<'_>) -> Option<OverlayState> {
        let (width, height) = frame.dimensions();
        let Some(profile) = Profile::resolve(width, height, self.settings.language, self.settings.input_device) else {
            if self.rejected_size != Some((width, height)) {
                warn!("{}", VisionError::UnsupportedResolution { width, height });
                self.rejected_size = Some((width, height));
            }
            self.active = None;
            return None;
        };
        self.rejected_size = None;

        if self.active_profile() != Some(profile) {
            if self.store.get(&profile).is_none() {
                warn!("No templates loaded for {}", profile);
                self.active = None;
                return None;
            }
            debug!("Activating profile {}", profile);
            self.active = Some(ActiveProfile::new(profile));
        }

        let active = self.active.as_ref()?;
        let library = self.store.get(&active.profile)?;

        self.debug.begin_frame();
        let state = {
            let mut ctx = EvalContext {
                catalog: &active.catalog,
                library,
                threshold: self.settings.threshold,
                debug: &mut self.debug,
            };
            active.policy.evaluate(&mut ctx, frame)
        };
        self.debug.finish_frame();

        Some(state)
    }
}
