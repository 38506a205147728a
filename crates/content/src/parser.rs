//! Reading content lists from JSON.
//!
//! A list document is a JSON array of items of one shape. The shape is not
//! recorded in the document, so the caller names it with a `ContentType`.

use crate::error::{ContentError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read and deserialize any JSON document.
///
/// A missing file is reported as `FileNotFound` rather than a bare I/O error
/// so the message names the path.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_file(path)?;

    serde_json::from_str(&text).map_err(|source| ContentError::ParseError {
        file: path.display().to_string(),
        source,
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ContentError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => ContentError::IoError(e),
    })
}

/// Parse a JSON array into the list shape named by `content_type`.
pub fn parse_content_list(content_type: ContentType, json: &str) -> Result<ContentList> {
    let parse_error = |source| ContentError::ParseError {
        file: format!("<{} list>", content_type),
        source,
    };

    let list = match content_type {
        ContentType::Models => ContentList::Models(serde_json::from_str(json).map_err(parse_error)?),
        ContentType::Images => ContentList::Images(serde_json::from_str(json).map_err(parse_error)?),
        ContentType::Articles => {
            ContentList::Articles(serde_json::from_str(json).map_err(parse_error)?)
        }
        ContentType::Users => ContentList::Users(serde_json::from_str(json).map_err(parse_error)?),
        ContentType::Collections => {
            ContentList::Collections(serde_json::from_str(json).map_err(parse_error)?)
        }
        ContentType::Bounties => {
            ContentList::Bounties(serde_json::from_str(json).map_err(parse_error)?)
        }
        ContentType::Posts => ContentList::Posts(serde_json::from_str(json).map_err(parse_error)?),
    };

    tracing::debug!("Parsed {} {}", list.len(), content_type);
    Ok(list)
}

/// Load a list document from disk.
pub fn load_content_list(content_type: ContentType, path: &Path) -> Result<ContentList> {
    let text = read_file(path)?;

    parse_content_list(content_type, &text).map_err(|e| match e {
        ContentError::ParseError { source, .. } => ContentError::ParseError {
            file: path.display().to_string(),
            source,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_models_with_defaults() {
        let json = r#"[
            {"id": 1, "user": {"id": 5}, "nsfwLevel": 1, "name": "Base",
             "images": [{"id": 10, "nsfwLevel": 1, "tags": [3]}]},
            {"id": 2, "user": {"id": 6}, "nsfwLevel": 4}
        ]"#;

        let list = parse_content_list(ContentType::Models, json).unwrap();
        let ContentList::Models(models) = list else {
            panic!("expected models");
        };

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].user.id, 5);
        assert_eq!(models[0].images[0].tags, vec![3]);
        assert_eq!(models[0].extra["name"], "Base");
        // Absent optional collections come back empty
        assert!(models[1].tags.is_empty());
        assert!(models[1].images.is_empty());
    }

    #[test]
    fn test_parse_posts_keeps_absent_images_distinct() {
        let json = r#"[
            {"id": 1, "user": {"id": 5}, "nsfwLevel": 1},
            {"id": 2, "user": {"id": 5}, "nsfwLevel": 1, "images": []},
            {"user": {"id": 5}, "nsfwLevel": 1,
             "images": [{"id": 3, "nsfwLevel": 1, "ingestion": "Pending"}]}
        ]"#;

        let ContentList::Posts(posts) = parse_content_list(ContentType::Posts, json).unwrap() else {
            panic!("expected posts");
        };

        assert!(posts[0].images.is_none());
        assert_eq!(posts[1].images.as_deref(), Some(&[][..]));
        assert_eq!(posts[2].id, None);
        assert_eq!(
            posts[2].images.as_ref().unwrap()[0].ingestion,
            Some(IngestionStatus::Pending)
        );
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let json = r#"[{"id": 4, "username": "ada", "stats": {"followers": 3}}]"#;
        let list = parse_content_list(ContentType::Users, json).unwrap();
        let out = serde_json::to_value(&list).unwrap();

        assert_eq!(out[0]["username"], "ada");
        assert_eq!(out[0]["stats"]["followers"], 3);
    }

    #[test]
    fn test_parse_error_names_list_type() {
        let err = parse_content_list(ContentType::Bounties, "{not json").unwrap_err();
        assert!(err.to_string().contains("bounties"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "userId": 2, "nsfwLevel": 1, "tagIds": [8]}}]"#).unwrap();

        let list = load_content_list(ContentType::Images, file.path()).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_content_list(ContentType::Images, Path::new("/no/such/list.json")).unwrap_err();
        assert!(matches!(err, ContentError::FileNotFound { .. }));
    }
}
