//! Message lookup with built-in Uzbek fallbacks.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> Option<String>;
}

/// Flat `key = "text"` table read from a TOML file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Catalog {
    #[serde(flatten)]
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read translations '{}'", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("failed to parse translations '{}'", path.display()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Title,
    FirstName,
    LastName,
    MiddleName,
    ClickToUpload,
    ImageSelected,
    FileUnreadable,
    RequiredFields,
    RegisterSuccess,
    RegisterFailed,
    SystemFailure,
    Upload,
    Uploading,
    Cancel,
}

impl MessageKey {
    pub fn key(self) -> &'static str {
        match self {
            MessageKey::Title => "register_title",
            MessageKey::FirstName => "first_name",
            MessageKey::LastName => "last_name",
            MessageKey::MiddleName => "middle_name",
            MessageKey::ClickToUpload => "click_to_upload",
            MessageKey::ImageSelected => "image_selected",
            MessageKey::FileUnreadable => "error_file_read",
            MessageKey::RequiredFields => "error_required_fields",
            MessageKey::RegisterSuccess => "success_register",
            // Both failure texts share one translation but differ in fallback.
            MessageKey::RegisterFailed | MessageKey::SystemFailure => "error_register",
            MessageKey::Upload => "upload",
            MessageKey::Uploading => "uploading",
            MessageKey::Cancel => "cancel",
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            MessageKey::Title => "QR orqali ro‘yxatdan o‘tish",
            MessageKey::FirstName => "Ism *",
            MessageKey::LastName => "Familiya *",
            MessageKey::MiddleName => "Otasining ismi (ixtiyoriy)",
            MessageKey::ClickToUpload => "Rasm tanlang",
            MessageKey::ImageSelected => "Rasm tanlandi",
            MessageKey::FileUnreadable => "Rasmni o‘qib bo‘lmadi.",
            MessageKey::RequiredFields => "Iltimos, barcha majburiy maydonlarni to‘ldiring.",
            MessageKey::RegisterSuccess => "QR kod muvaffaqiyatli ro‘yxatdan o‘tkazildi!",
            MessageKey::RegisterFailed => "Xatolik yuz berdi.",
            MessageKey::SystemFailure => "Tizimda xatolik yuz berdi.",
            MessageKey::Upload => "Yuborish",
            MessageKey::Uploading => "Yuborilmoqda...",
            MessageKey::Cancel => "Bekor qilish",
        }
    }
}

pub struct Localizer {
    translator: Box<dyn Translator>,
}

impl Localizer {
    pub fn new(translator: impl Translator + 'static) -> Self {
        Self {
            translator: Box::new(translator),
        }
    }

    /// Translated text, or the built-in fallback when the translation is missing or empty.
    pub fn resolve(&self, key: MessageKey) -> String {
        self.translator
            .translate(key.key())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| key.fallback().to_string())
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}
