pub mod asset;
pub mod brand;
pub mod error;
pub mod finish;
pub mod output;
pub mod params;
pub mod prompt;
pub mod style;
pub mod suggestion;

pub use asset::AssetType;
pub use brand::{BrandField, BrandProfile};
pub use error::{ErrorKind, StudioError};
pub use finish::{CropAspect, Finish, GenerationMode, OverlayColor};
pub use output::{ChatTarget, ChatTurn, GeneratedAsset, ImageData, Slot, SlotStatus};
pub use params::{GenerateParams, GenerationRequest};
pub use style::StylePreset;
pub use suggestion::{default_suggestion_for, default_suggestions, parse_suggestions, StyleSuggestion};
