//! Story reduction: the pure mapping from a raw API content record to the
//! persisted schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storypulse_newsapi::RawStory;

/// Word cap for persisted story bodies.
pub const MAX_BODY_TOKENS: usize = 500;

/// The one taxonomy whose category tags survive reduction.
pub const SMART_TAGGER_TAXONOMY: &str = "smart_tagger";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedCategory {
    pub id: String,
    pub score: f64,
}

/// The normalized, truncated, category-filtered form of a story that gets
/// persisted in bucket records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedStory {
    pub title: String,
    pub body: String,
    pub id: i64,
    pub published_at: DateTime<Utc>,
    pub language: String,
    pub url: String,
    pub smart_tagger_categories: Vec<ReducedCategory>,
}

/// Reduce a raw story to the persisted schema.
///
/// Deterministic and side-effect free. The body is truncated on word
/// boundaries to [`MAX_BODY_TOKENS`] words; category tags are restricted to
/// the [`SMART_TAGGER_TAXONOMY`] taxonomy and reduced to `{id, score}`.
#[must_use]
pub fn reduce_story(story: &RawStory) -> ReducedStory {
    let body: Vec<&str> = story.body.split_whitespace().take(MAX_BODY_TOKENS).collect();
    ReducedStory {
        title: story.title.clone(),
        body: body.join(" "),
        id: story.id,
        published_at: story.published_at,
        language: story.language.clone(),
        url: story.links.permalink.clone(),
        smart_tagger_categories: smart_tagger_categories(story),
    }
}

fn smart_tagger_categories(story: &RawStory) -> Vec<ReducedCategory> {
    story
        .categories
        .iter()
        .filter(|c| c.taxonomy == SMART_TAGGER_TAXONOMY)
        .map(|c| ReducedCategory {
            id: c.id.clone(),
            score: c.score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use storypulse_newsapi::{StoryCategory, StoryLinks};

    use super::*;

    fn raw_story(body: &str, categories: Vec<StoryCategory>) -> RawStory {
        RawStory {
            id: 42,
            title: "Title".to_string(),
            body: body.to_string(),
            published_at: Utc.with_ymd_and_hms(2023, 1, 1, 6, 0, 0).unwrap(),
            language: "en".to_string(),
            links: StoryLinks {
                permalink: "https://example.com/42".to_string(),
            },
            categories,
        }
    }

    #[test]
    fn long_body_truncates_to_exactly_500_words() {
        let words: Vec<String> = (0..800).map(|i| format!("w{i}")).collect();
        let reduced = reduce_story(&raw_story(&words.join(" "), vec![]));

        let kept: Vec<&str> = reduced.body.split(' ').collect();
        assert_eq!(kept.len(), MAX_BODY_TOKENS);
        assert_eq!(kept[0], "w0");
        assert_eq!(kept[499], "w499", "word order and content must be preserved");
    }

    #[test]
    fn short_body_is_unchanged() {
        let reduced = reduce_story(&raw_story("just a few words", vec![]));
        assert_eq!(reduced.body, "just a few words");
    }

    #[test]
    fn categories_filter_to_designated_taxonomy() {
        let categories = vec![
            StoryCategory {
                taxonomy: SMART_TAGGER_TAXONOMY.to_string(),
                id: "st.business".to_string(),
                score: 0.91,
            },
            StoryCategory {
                taxonomy: "iptc".to_string(),
                id: "04000000".to_string(),
                score: 0.50,
            },
            StoryCategory {
                taxonomy: SMART_TAGGER_TAXONOMY.to_string(),
                id: "st.tech".to_string(),
                score: 0.33,
            },
        ];
        let reduced = reduce_story(&raw_story("body", categories));

        assert_eq!(
            reduced.smart_tagger_categories,
            vec![
                ReducedCategory {
                    id: "st.business".to_string(),
                    score: 0.91
                },
                ReducedCategory {
                    id: "st.tech".to_string(),
                    score: 0.33
                },
            ]
        );
    }

    #[test]
    fn reduction_carries_identity_fields() {
        let reduced = reduce_story(&raw_story("body", vec![]));
        assert_eq!(reduced.id, 42);
        assert_eq!(reduced.title, "Title");
        assert_eq!(reduced.language, "en");
        assert_eq!(reduced.url, "https://example.com/42");
    }
}
