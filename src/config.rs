pub mod model;
pub mod prefs;

pub use model::ProjectConfig;
pub use prefs::Preferences;
