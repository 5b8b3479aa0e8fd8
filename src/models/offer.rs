//! Offer catalog record.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::OfferId;
use super::record::{KeyOrder, deserialize_ordered, serialize_ordered};

/// An entry of the offer catalog.
///
/// Only `title`, `description` and `categories` are edited by this tool.
/// They default to empty when a record lacks them. Any other fields
/// present in the document are kept in `extra` and written back untouched,
/// in their original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    /// Unique identifier, assigned externally.
    pub id: OfferId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ordered category names.
    pub categories: Vec<String>,
    /// Fields this tool does not manage.
    pub extra: Map<String, Value>,
    /// Key order of the record as read.
    pub key_order: KeyOrder,
}

/// Wire form of an [`Offer`] being read.
#[derive(Deserialize)]
struct OfferFields {
    /// See [`Offer::id`].
    id: OfferId,
    /// See [`Offer::title`].
    #[serde(default)]
    title: String,
    /// See [`Offer::description`].
    #[serde(default)]
    description: String,
    /// See [`Offer::categories`].
    #[serde(default)]
    categories: Vec<String>,
    /// See [`Offer::extra`].
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Wire form of an [`Offer`] being written.
///
/// Managed fields that were missing from the record and are still empty
/// stay missing.
#[derive(Serialize)]
struct OfferFieldsRef<'offer> {
    /// See [`Offer::id`].
    id: &'offer OfferId,
    /// See [`Offer::title`].
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'offer str>,
    /// See [`Offer::description`].
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'offer str>,
    /// See [`Offer::categories`].
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<&'offer [String]>,
    /// See [`Offer::extra`].
    #[serde(flatten)]
    extra: &'offer Map<String, Value>,
}

impl Serialize for Offer {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let order = &self.key_order;
        let written = |key: &str, empty: bool| order.is_empty() || !empty || order.contains(key);
        let fields = OfferFieldsRef {
            id: &self.id,
            title: written("title", self.title.is_empty()).then_some(self.title.as_str()),
            description: written("description", self.description.is_empty())
                .then_some(self.description.as_str()),
            categories: written("categories", self.categories.is_empty())
                .then_some(self.categories.as_slice()),
            extra: &self.extra,
        };
        serialize_ordered(&fields, order, serializer)
    }
}

impl<'de> Deserialize<'de> for Offer {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (fields, key_order): (OfferFields, _) = deserialize_ordered(deserializer)?;
        Ok(Self {
            id: fields.id,
            title: fields.title,
            description: fields.description,
            categories: fields.categories,
            extra: fields.extra,
            key_order,
        })
    }
}

impl Offer {
    /// Creates an offer with no extra fields.
    #[inline]
    #[must_use]
    pub fn new(id: OfferId, title: String, description: String, categories: Vec<String>) -> Self {
        Self {
            id,
            title,
            description,
            categories,
            extra: Map::new(),
            key_order: KeyOrder::default(),
        }
    }

    /// Applies an operator edit. Fields left as `None` keep their value.
    #[inline]
    pub fn apply(&mut self, edit: OfferEdit) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(categories) = edit.categories {
            self.categories = categories;
        }
    }
}

/// Changes collected from the operator for a single offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferEdit {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category list.
    pub categories: Option<Vec<String>>,
}

/// Splits a comma-separated category answer, trimming each segment.
///
/// Segments are kept even when empty, so `"a,,b"` yields three entries.
#[inline]
#[must_use]
pub fn parse_categories(input: &str) -> Vec<String> {
    input.split(',').map(|part| part.trim().to_owned()).collect()
}
