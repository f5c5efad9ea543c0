use crate::model::{NormalizedReview, Reviewee, Reviewer};
use crate::normalizer::normalize_timestamp;
use crate::parser::lenient;
use serde::Deserialize;
use serde_json::Number;

/// One review as the upstream sends it. Every field is optional and
/// several have alternate spellings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    #[serde(default, deserialize_with = "lenient::text")]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub localized_language: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(rename = "created_at", default, deserialize_with = "lenient::text")]
    pub created_at_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub reviewee: Option<RawReviewee>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub reviewer: Option<RawReviewer>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub rating: Option<Number>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_rating: Option<Number>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub localized_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReviewee {
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub host_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub picture_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReviewer {
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub picture_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub localized_reviewer_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
}

/// Maps a raw review onto the output contract. Never fails.
pub fn sanitize_review(raw: RawReview) -> NormalizedReview {
    let reviewee = raw.reviewee.unwrap_or_default();
    let reviewer = raw.reviewer.unwrap_or_default();

    let created_at = first_present(raw.created_at, raw.created_at_snake);

    NormalizedReview {
        comments: raw
            .comments
            .map(|c| c.trim().to_string())
            .unwrap_or_default(),
        id: present(raw.id).unwrap_or_default(),
        language: first_present(raw.language, raw.localized_language),
        created_at: normalize_timestamp(created_at.as_deref()),
        reviewee: Reviewee {
            first_name: first_present(reviewee.first_name.clone(), reviewee.host_name.clone()),
            host_name: first_present(reviewee.host_name, reviewee.first_name),
            picture_url: reviewee.picture_url,
        },
        reviewer: Reviewer {
            first_name: first_present(reviewer.first_name, reviewer.name),
            picture_url: first_present(reviewer.picture_url, reviewer.avatar_url),
            localized_reviewer_location: first_present(
                reviewer.localized_reviewer_location,
                reviewer.location,
            ),
        },
        rating: raw
            .rating
            .filter(is_nonzero)
            .or(raw.overall_rating.filter(is_nonzero)),
        localized_date: raw.localized_date,
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn first_present(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    present(primary).or_else(|| present(fallback))
}

fn is_nonzero(n: &Number) -> bool {
    n.as_f64().is_some_and(|v| v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn raw(value: Value) -> RawReview {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_record_has_every_field() {
        let review = sanitize_review(RawReview::default());
        let value = serde_json::to_value(&review).unwrap();

        for key in [
            "comments",
            "id",
            "language",
            "createdAt",
            "reviewee",
            "reviewer",
            "rating",
            "localizedDate",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["comments"], json!(""));
        assert_eq!(value["id"], json!(""));
        assert_eq!(value["rating"], Value::Null);
        assert_eq!(
            value["reviewee"],
            json!({"firstName": null, "hostName": null, "pictureUrl": null})
        );
        assert_eq!(
            value["reviewer"],
            json!({"firstName": null, "pictureUrl": null, "localizedReviewerLocation": null})
        );
    }

    #[test]
    fn test_primary_fields() {
        let review = sanitize_review(raw(json!({
            "comments": "  Lovely flat, great host.\n",
            "id": 987654321,
            "language": "en",
            "createdAt": "2024-05-01T10:20:30.000Z",
            "reviewee": {"firstName": "Ana", "hostName": "Ana M.", "pictureUrl": "https://img/ana.jpg"},
            "reviewer": {"firstName": "Tom", "pictureUrl": "https://img/tom.jpg", "localizedReviewerLocation": "Lisbon, Portugal"},
            "rating": 5,
            "localizedDate": "May 2024"
        })));

        assert_eq!(review.comments, "Lovely flat, great host.");
        assert_eq!(review.id, "987654321");
        assert_eq!(review.language.as_deref(), Some("en"));
        assert_eq!(review.created_at.as_deref(), Some("2024-05-01T10:20:30Z"));
        assert_eq!(review.reviewee.first_name.as_deref(), Some("Ana"));
        assert_eq!(review.reviewee.host_name.as_deref(), Some("Ana M."));
        assert_eq!(review.reviewee.picture_url.as_deref(), Some("https://img/ana.jpg"));
        assert_eq!(review.reviewer.first_name.as_deref(), Some("Tom"));
        assert_eq!(
            review.reviewer.localized_reviewer_location.as_deref(),
            Some("Lisbon, Portugal")
        );
        assert_eq!(review.rating, Some(Number::from(5)));
        assert_eq!(review.localized_date.as_deref(), Some("May 2024"));
    }

    #[test]
    fn test_alternate_keys() {
        let review = sanitize_review(raw(json!({
            "id": "abc",
            "localizedLanguage": "fr",
            "created_at": "2021-06-07 08:09:10",
            "reviewer": {"name": "Luc", "avatarUrl": "https://img/luc.png", "location": "Lyon"},
            "overallRating": 4
        })));

        assert_eq!(review.language.as_deref(), Some("fr"));
        assert_eq!(review.created_at.as_deref(), Some("2021-06-07T08:09:10Z"));
        assert_eq!(review.reviewer.first_name.as_deref(), Some("Luc"));
        assert_eq!(review.reviewer.picture_url.as_deref(), Some("https://img/luc.png"));
        assert_eq!(review.reviewer.localized_reviewer_location.as_deref(), Some("Lyon"));
        assert_eq!(review.rating, Some(Number::from(4)));
    }

    #[test]
    fn test_empty_primary_falls_back() {
        let review = sanitize_review(raw(json!({
            "language": "",
            "localizedLanguage": "de",
            "createdAt": "",
            "created_at": "2020-02-02T02:02:02Z",
            "rating": 0,
            "overallRating": 3
        })));

        assert_eq!(review.language.as_deref(), Some("de"));
        assert_eq!(review.created_at.as_deref(), Some("2020-02-02T02:02:02Z"));
        assert_eq!(review.rating, Some(Number::from(3)));
    }

    #[test]
    fn test_reviewee_names_fill_each_other() {
        let only_host = sanitize_review(raw(json!({"reviewee": {"hostName": "Maria"}})));
        assert_eq!(only_host.reviewee.first_name.as_deref(), Some("Maria"));
        assert_eq!(only_host.reviewee.host_name.as_deref(), Some("Maria"));

        let only_first = sanitize_review(raw(json!({"reviewee": {"firstName": "Joao"}})));
        assert_eq!(only_first.reviewee.first_name.as_deref(), Some("Joao"));
        assert_eq!(only_first.reviewee.host_name.as_deref(), Some("Joao"));
    }

    #[test]
    fn test_wrong_types_do_not_fail() {
        let review = sanitize_review(raw(json!({
            "comments": ["not", "a", "string"],
            "id": null,
            "reviewer": "nobody",
            "reviewee": null,
            "rating": "five",
            "createdAt": 1700000000
        })));

        assert_eq!(review.comments, "");
        assert_eq!(review.id, "");
        assert_eq!(review.reviewer, Reviewer::default());
        assert_eq!(review.reviewee, Reviewee::default());
        assert_eq!(review.rating, None);
        assert_eq!(review.created_at.as_deref(), Some("1700000000"));
    }

    #[test]
    fn test_unparseable_date_kept_verbatim() {
        let review = sanitize_review(raw(json!({"createdAt": "yesterday"})));
        assert_eq!(review.created_at.as_deref(), Some("yesterday"));
    }

    #[test]
    fn test_numeric_zero_id_is_kept() {
        // A zero id is still an id; only absent or null ids become "".
        assert_eq!(sanitize_review(raw(json!({"id": 0}))).id, "0");
        assert_eq!(sanitize_review(raw(json!({"id": ""}))).id, "");
    }
}
