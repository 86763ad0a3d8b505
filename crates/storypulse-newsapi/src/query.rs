//! Query compilation: a signal's opaque parameter map plus date bounds become
//! the flat query-pair list the API expects.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

/// Period convention used when none is specified: daily buckets.
pub const DEFAULT_PERIOD: &str = "+1DAY";

/// A compiled, period-scoped query ready to be sent to either endpoint.
#[derive(Debug, Clone)]
pub struct StoryQuery {
    pub aql: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period: String,
    pub language: String,
    pub per_page: Option<u32>,
}

impl StoryQuery {
    /// Cap the number of stories returned per call (stories endpoint only).
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Flatten into URL query pairs. Timestamps are RFC 3339 UTC.
    pub(crate) fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("aql".to_string(), self.aql.clone()),
            (
                "published_at.start".to_string(),
                self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            (
                "published_at.end".to_string(),
                self.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("period".to_string(), self.period.clone()),
            ("language".to_string(), self.language.clone()),
        ];
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        pairs
    }
}

/// Compile a signal's parameter map into a query scoped to `[start, end)`.
#[must_use]
pub fn compile_query(
    params: &BTreeMap<String, serde_json::Value>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: &str,
    language: &str,
) -> StoryQuery {
    StoryQuery {
        aql: params_to_aql(params),
        start,
        end,
        period: period.to_string(),
        language: language.to_string(),
        per_page: None,
    }
}

/// Translate the opaque parameter map into the API's query language.
///
/// `entity_ids` becomes an `entity.id:(A OR B)` term and `surface_forms` a
/// quoted full-text term; multiple terms are joined with `AND`. Keys the
/// compiler does not know are ignored.
#[must_use]
pub fn params_to_aql(params: &BTreeMap<String, serde_json::Value>) -> String {
    let mut terms = Vec::new();

    if let Some(ids) = string_values(params.get("entity_ids")) {
        if !ids.is_empty() {
            terms.push(format!("entity.id:({})", ids.join(" OR ")));
        }
    }

    if let Some(forms) = string_values(params.get("surface_forms")) {
        if !forms.is_empty() {
            let quoted: Vec<String> = forms.iter().map(|f| format!("\"{f}\"")).collect();
            terms.push(format!("text:({})", quoted.join(" OR ")));
        }
    }

    terms.join(" AND ")
}

fn string_values(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
