use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AssetType, Finish};

/// Encoded image bytes plus what we know about them.
///
/// Images are values: nothing hands out `&mut` access to the bytes, so an
/// edit always produces a new `ImageData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            width,
            height,
        }
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

fn short_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4();
    format!("{}_{}", prefix, &uuid.to_string()[..8])
}

/// A successfully generated marketing image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAsset {
    /// Unique id (e.g., "as_abc12345")
    pub id: String,
    pub asset_type: AssetType,
    /// Finished image: what is shown, saved and exported
    pub image: ImageData,
    /// The image before crop and overlay
    pub base: ImageData,
    /// Background plate the product was composited onto (product-lock mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<ImageData>,
    pub finish: Finish,
    /// The prompt the image was generated from
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedAsset {
    pub fn new(asset_type: AssetType, image: ImageData, prompt: impl Into<String>) -> Self {
        Self {
            id: short_id("as"),
            asset_type,
            base: image.clone(),
            image,
            plate: None,
            finish: Finish::default(),
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }

    /// A finished asset: `image` is `base` after `finish` was applied
    pub fn finished(
        asset_type: AssetType,
        base: ImageData,
        image: ImageData,
        finish: Finish,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            base,
            finish,
            ..Self::new(asset_type, image, prompt)
        }
    }

    pub fn with_plate(mut self, plate: ImageData) -> Self {
        self.plate = Some(plate);
        self
    }

    /// Same asset with a re-finished image
    pub fn refinished(&self, image: ImageData, finish: Finish) -> Self {
        Self {
            image,
            finish,
            ..self.clone()
        }
    }

    /// File name used when exporting, e.g. "instagram_post_as_abc12345.png"
    pub fn file_name(&self) -> String {
        let ext = match self.image.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        };
        format!("{}_{}.{}", self.asset_type.file_stem(), self.id, ext)
    }
}

/// Status of one slot in a "Generate All" batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status")]
pub enum SlotStatus {
    Queued,
    Running,
    Completed,
    Failed { error: String },
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotStatus::Queued => write!(f, "queued"),
            SlotStatus::Running => write!(f, "running"),
            SlotStatus::Completed => write!(f, "completed"),
            SlotStatus::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

impl SlotStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlotStatus::Completed | SlotStatus::Failed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SlotStatus::Queued => "queued",
            SlotStatus::Running => "running",
            SlotStatus::Completed => "completed",
            SlotStatus::Failed { .. } => "failed",
        }
    }
}

/// One result slot: one per selected asset type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub asset_type: AssetType,
    pub status: SlotStatus,
    pub asset: Option<GeneratedAsset>,
    /// Whether this result has been saved to the gallery
    #[serde(default)]
    pub saved: bool,
    pub updated_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(asset_type: AssetType) -> Self {
        Self {
            asset_type,
            status: SlotStatus::Queued,
            asset: None,
            saved: false,
            updated_at: Utc::now(),
        }
    }

    pub fn set_running(&mut self) {
        self.status = SlotStatus::Running;
        self.updated_at = Utc::now();
    }

    pub fn set_completed(&mut self, asset: GeneratedAsset) {
        self.asset = Some(asset);
        self.status = SlotStatus::Completed;
        self.updated_at = Utc::now();
    }

    pub fn set_failed(&mut self, error: impl Into<String>) {
        self.asset = None;
        self.status = SlotStatus::Failed {
            error: error.into(),
        };
        self.updated_at = Utc::now();
    }
}

/// Points at the gallery entry a chat turn edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTarget {
    pub gallery_index: usize,
    pub asset_id: String,
    pub asset_type: AssetType,
}

/// One natural-language edit instruction and its resulting image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Unique id (e.g., "ct_abc12345")
    pub id: String,
    pub instruction: String,
    pub target: ChatTarget,
    pub result: ImageData,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(instruction: impl Into<String>, target: ChatTarget, result: ImageData) -> Self {
        Self {
            id: short_id("ct"),
            instruction: instruction.into(),
            target,
            result,
            created_at: Utc::now(),
        }
    }

    /// The edit result as an asset of the same type as its target
    pub fn to_asset(&self) -> GeneratedAsset {
        GeneratedAsset::new(self.target.asset_type, self.result.clone(), self.instruction.clone())
    }
}
