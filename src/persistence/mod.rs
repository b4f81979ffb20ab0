//! Save slots and the campaign save format

pub mod codec;
pub mod snapshot;
pub mod store;

pub use codec::{
    delete_save, list_saved_games, load, quick_load, quick_save, sanitize_save_name, save, QUICKSAVE_SLOT,
};
pub use snapshot::{SaveData, SaveInfo, SAVE_VERSION};
pub use store::{DirectorySaveStore, MemorySaveStore, SaveStore};
