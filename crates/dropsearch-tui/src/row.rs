//! Row element type and the config-driven index renderer.

use dropsearch_core::config::{AppearanceConfig, Config, validate_descriptors};
use dropsearch_core::render::{IndexChild, RenderOverrides, ResultElement};
use dropsearch_types::{Hit, IndexDescriptor};
use serde::Deserialize;
use serde_json::Value;

/// Default text of the placeholder row
pub const NO_RESULTS_TEXT: &str = "No Results";

/// Record fields tried, in order, when no primary field is configured.
const FALLBACK_FIELDS: [&str; 5] = ["name", "title", "label", "objectID", "id"];

/// One line of the results surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRow {
    Title(String),
    NoResults(String),
    Hit {
        primary: String,
        secondary: Option<String>,
        hit: Hit,
    },
    /// Free text, used for the side component
    Label(String),
}

impl ResultElement for ResultRow {
    fn title(title: &str) -> Self {
        Self::Title(title.to_string())
    }

    fn no_results() -> Self {
        Self::NoResults(NO_RESULTS_TEXT.to_string())
    }
}

impl ResultRow {
    /// Only hits can be selected and chosen.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    #[must_use]
    pub fn hit(&self) -> Option<&Hit> {
        match self {
            Self::Hit { hit, .. } => Some(hit),
            _ => None,
        }
    }

    /// Plain-text rendering, for non-interactive output.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Title(text) => format!("== {text} =="),
            Self::NoResults(text) | Self::Label(text) => text.clone(),
            Self::Hit {
                primary,
                secondary: Some(secondary),
                ..
            } => format!("  {primary} - {secondary}"),
            Self::Hit { primary, .. } => format!("  {primary}"),
        }
    }
}

/// Which record fields a row shows. Read from the `display` key of an index
/// entry in the config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFields {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
}

impl DisplayFields {
    /// Missing or malformed `display` falls back to defaults.
    fn from_entry(entry: &Value) -> Self {
        entry
            .get("display")
            .and_then(|display| serde_json::from_value(display.clone()).ok())
            .unwrap_or_default()
    }
}

/// Renders hits of one index as [`ResultRow::Hit`].
#[derive(Debug, Clone)]
pub struct FieldChild {
    descriptor: IndexDescriptor,
    display: DisplayFields,
}

impl FieldChild {
    #[must_use]
    pub fn new(descriptor: IndexDescriptor, display: DisplayFields) -> Self {
        Self {
            descriptor,
            display,
        }
    }

    fn field_text(hit: &Hit, field: &str) -> Option<String> {
        match hit.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn primary_text(&self, hit: &Hit) -> String {
        if let Some(text) = self
            .display
            .primary
            .as_deref()
            .and_then(|field| Self::field_text(hit, field))
        {
            return text;
        }

        FALLBACK_FIELDS
            .iter()
            .find_map(|field| Self::field_text(hit, field))
            .unwrap_or_else(|| match hit {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }
}

impl IndexChild<ResultRow> for FieldChild {
    fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    fn render_hit(&self, hit: &Hit, _position: usize) -> ResultRow {
        ResultRow::Hit {
            primary: self.primary_text(hit),
            secondary: self
                .display
                .secondary
                .as_deref()
                .and_then(|field| Self::field_text(hit, field)),
            hit: hit.clone(),
        }
    }
}

/// One child per configured index, in config order.
///
/// # Errors
///
/// Returns the first malformed index entry with its position.
pub fn children_from_config(
    config: &Config,
) -> dropsearch_core::Result<Vec<Box<dyn IndexChild<ResultRow>>>> {
    let descriptors = validate_descriptors(&config.indices)?;

    Ok(descriptors
        .into_iter()
        .zip(&config.indices)
        .map(|(descriptor, entry)| {
            Box::new(FieldChild::new(descriptor, DisplayFields::from_entry(entry)))
                as Box<dyn IndexChild<ResultRow>>
        })
        .collect())
}

/// Title and no-results overrides from the appearance config.
#[must_use]
pub fn overrides_from_config(appearance: &AppearanceConfig) -> RenderOverrides<ResultRow> {
    let mut overrides = RenderOverrides::default();

    if let Some(format) = appearance.title_format.clone() {
        overrides =
            overrides.with_title(move |title| ResultRow::Title(format.replace("{title}", title)));
    }

    if let Some(text) = appearance.no_results_text.clone() {
        overrides = overrides.with_no_results(move || ResultRow::NoResults(text.clone()));
    }

    overrides
}
