use serde::{Deserialize, Serialize};

/// Overlay banners driven by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Game,
    Looting,
    Inventory,
    Map,
    Spectate,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Game,
        Category::Looting,
        Category::Inventory,
        Category::Map,
        Category::Spectate,
    ];
}

/// Visibility of every overlay banner for one frame.
///
/// Recomputed from scratch each cycle; nothing carries over between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayState {
    pub game: bool,
    pub looting: bool,
    pub inventory: bool,
    pub map: bool,
    pub spectate: bool,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Game => self.game,
            Category::Looting => self.looting,
            Category::Inventory => self.inventory,
            Category::Map => self.map,
            Category::Spectate => self.spectate,
        }
    }

    /// Categories whose banner should be shown.
    pub fn visible(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.get(*c))
    }
}
