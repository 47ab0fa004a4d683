use serde::{Deserialize, Serialize};

/// Boolean capability flags derived for one model.
///
/// Every flag defaults to `false`; classification never fails.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    pub supports_vision: bool,
    pub supports_audio: bool,
    pub supports_tools: bool,
    pub supports_image_generation: bool,
    pub supports_file_input: bool,
    pub supports_search_capability: bool,
}
