use serde::{Deserialize, Serialize};

use crate::models::content::ContentKind;

/// Branding applied to every post of one content kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfile {
    #[serde(rename = "_id")]
    pub kind: ContentKind,
    pub display_name: String,
    /// Hashtags appended to every caption of this kind.
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Account handle shown on cover and closing slides.
    #[serde(default)]
    pub handle: String,
    /// Call to action used on the closing slide and in the caption.
    #[serde(default)]
    pub closing_text: String,
}

impl CategoryProfile {
    /// Built-in profile used until an operator stores a custom one.
    pub fn default_for(kind: ContentKind) -> Self {
        let (display_name, hashtags, closing_text) = match kind {
            ContentKind::Riddle => (
                "Teka-teki",
                vec!["#tekateki", "#riddle", "#asahotak"],
                "Follow untuk teka-teki berikutnya!",
            ),
            ContentKind::Site => (
                "Situs Rekomendasi",
                vec!["#websitegratis", "#rekomendasi", "#tools"],
                "Simpan postingan ini biar nggak lupa!",
            ),
            ContentKind::Topic => (
                "Topik",
                vec!["#faktaunik", "#edukasi", "#belajar"],
                "Bagikan ke temanmu yang perlu tahu!",
            ),
            ContentKind::Tutorial => (
                "Tutorial",
                vec!["#tutorial", "#tipsandtrick", "#belajar"],
                "Coba sekarang dan ceritakan hasilnya!",
            ),
        };

        Self {
            kind,
            display_name: display_name.to_string(),
            hashtags: hashtags.into_iter().map(String::from).collect(),
            handle: "@carousel.studio".to_string(),
            closing_text: closing_text.to_string(),
        }
    }
}
