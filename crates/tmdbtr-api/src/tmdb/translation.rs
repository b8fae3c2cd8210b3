//! Translation models returned by the `*/translations` endpoints.
//!
//! The outer types are strict: every key is required. The inner
//! [`TranslationData`] is lenient: every key is optional, and the localized
//! name may arrive as either `name` (TV series, seasons, episodes) or
//! `title` (movies).

use serde::{Deserialize, Serialize};

use super::types::Identifiable;

/// Localized strings of a single translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTranslationData")]
pub struct TranslationData {
    /// Title or name in the target language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Overview in the target language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

/// Wire shape of [`TranslationData`] accepting both `name` and `title`.
///
/// `title` stays untyped until `name` turns out to be absent or `null`.
#[derive(Deserialize)]
struct RawTranslationData {
    name: Option<String>,
    title: Option<serde_json::Value>,
    overview: Option<String>,
}

impl TryFrom<RawTranslationData> for TranslationData {
    type Error = serde_json::Error;

    fn try_from(raw: RawTranslationData) -> Result<Self, Self::Error> {
        let name = match (raw.name, raw.title) {
            (Some(name), _) => Some(name),
            (None, Some(title)) => Some(String::deserialize(title)?),
            (None, None) => None,
        };
        Ok(Self {
            name,
            overview: raw.overview,
        })
    }
}

impl TranslationData {
    /// Creates translation data from optional name and overview.
    #[must_use]
    pub const fn new(name: Option<String>, overview: Option<String>) -> Self {
        Self { name, overview }
    }
}

/// A single locale entry of a translations response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Translation {
    /// Language code (ISO 639-1).
    #[serde(rename = "iso_639_1")]
    pub language_code: String,
    /// Country code (ISO 3166-1).
    #[serde(rename = "iso_3166_1")]
    pub country_code: String,
    /// Language name in that language (e.g. "Français").
    pub name: String,
    /// Language name in English (e.g. "French").
    pub english_name: String,
    /// Localized strings.
    pub data: TranslationData,
}

impl Translation {
    /// Returns the locale tag, e.g. `fr-FR`.
    #[must_use]
    pub fn locale(&self) -> String {
        format!("{}-{}", self.language_code, self.country_code)
    }
}

/// All translations available for one TMDB item.
///
/// `Item` only selects the identifier type; the same decode and encode
/// logic is shared by every media kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TranslationsCollection<Item: Identifiable> {
    id: Item::Id,
    translations: Vec<Translation>,
}

impl<Item: Identifiable> TranslationsCollection<Item> {
    /// Creates a collection for the item `id`.
    #[must_use]
    pub const fn new(id: Item::Id, translations: Vec<Translation>) -> Self {
        Self { id, translations }
    }

    /// Returns the item identifier.
    #[must_use]
    pub const fn id(&self) -> Item::Id {
        self.id
    }

    /// Returns the translations in source order.
    #[must_use]
    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    /// Returns the number of translations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.translations.len()
    }

    /// Returns `true` if the item has no translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Iterates over the translations in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Translation> {
        self.translations.iter()
    }

    /// Returns a new collection holding only the given languages.
    ///
    /// Codes are ISO 639-1 and compared case-insensitively. An empty
    /// `language_codes` keeps every translation.
    #[must_use]
    pub fn filter_languages<S: AsRef<str>>(&self, language_codes: &[S]) -> Self {
        if language_codes.is_empty() {
            return Self::new(self.id, self.translations.clone());
        }
        let translations = self
            .translations
            .iter()
            .filter(|t| {
                language_codes
                    .iter()
                    .any(|code| t.language_code.eq_ignore_ascii_case(code.as_ref()))
            })
            .cloned()
            .collect();
        Self::new(self.id, translations)
    }

    /// Splits the collection into its identifier and translations.
    #[must_use]
    pub fn into_parts(self) -> (Item::Id, Vec<Translation>) {
        (self.id, self.translations)
    }
}

impl<'a, Item: Identifiable> IntoIterator for &'a TranslationsCollection<Item> {
    type Item = &'a Translation;
    type IntoIter = std::slice::Iter<'a, Translation>;

    fn into_iter(self) -> Self::IntoIter {
        self.translations.iter()
    }
}
