use dropsearch_types::Hit;
use serde_json::Value;

/// Record fields tried, in order, as the primary match text.
const NAME_FIELDS: [&str; 4] = ["name", "title", "label", "id"];

/// A record prepared for matching
#[derive(Debug, Clone)]
pub struct Searchable {
    /// Position of the record in its index
    pub position: usize,

    /// Primary search text (name)
    pub name: String,

    /// Secondary search text: every other string field
    pub keywords: Vec<String>,

    /// The record itself, returned as the hit
    pub record: Hit,
}

impl Searchable {
    /// Build from a dataset record.
    ///
    /// The first of `name`, `title`, `label`, `id` holding a string becomes the
    /// name; remaining top-level strings become keywords. Non-object records
    /// match on their string form.
    #[must_use]
    pub fn from_record(position: usize, record: Hit) -> Self {
        let Value::Object(obj) = &record else {
            let name = match &record {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Self {
                position,
                name,
                keywords: Vec::new(),
                record,
            };
        };

        let name_field = NAME_FIELDS
            .iter()
            .find(|field| obj.get(**field).is_some_and(Value::is_string));

        let name = name_field
            .and_then(|field| obj.get(*field))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let keywords = obj
            .iter()
            .filter(|(key, _)| name_field.is_none_or(|field| key.as_str() != *field))
            .filter_map(|(_, value)| value.as_str().map(String::from))
            .collect();

        Self {
            position,
            name,
            keywords,
            record,
        }
    }
}

/// A search match result with a reference to the matched searchable.
/// Uses a lifetime to avoid cloning during search operations.
#[derive(Debug)]
pub struct SearchMatch<'a> {
    /// Reference to the matched searchable
    pub searchable: &'a Searchable,

    /// Combined fuzzy match score
    pub score: f64,
}
