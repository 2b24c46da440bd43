//! The closed set of relay messages.
//!
//! On the wire every message is `{"event": <tag>, "value": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::store::RevisionStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value")]
pub enum Message {
    #[serde(rename = "generate:revision")]
    GenerateRevision,

    #[serde(rename = "change:revision")]
    ChangeRevision { revision: String },

    #[serde(rename = "clear:revisions")]
    ClearRevisions,

    /// Raw text to validate and import.
    #[serde(rename = "import:revisions")]
    ImportRevisions { revisions: String },

    #[serde(rename = "download:revisions")]
    DownloadRevisions,

    #[serde(rename = "copy:revisions")]
    CopyRevisions,

    #[serde(rename = "paste:revisions")]
    PasteRevisions,

    /// Sent bare by the UI; the document surface attaches its store.
    #[serde(rename = "create:gist")]
    CreateGist {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revisions: Option<RevisionStore>,
    },

    #[serde(rename = "update:gist", rename_all = "camelCase")]
    UpdateGist {
        gist_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revisions: Option<RevisionStore>,
    },

    #[serde(rename = "import:gist", rename_all = "camelCase")]
    ImportGist { gist_url: String },

    #[serde(rename = "copy:gistUrl", rename_all = "camelCase")]
    CopyGistUrl { gist_url: String },

    #[serde(rename = "reload:page")]
    ReloadPage,

    #[serde(rename = "update:revisionsSelect")]
    UpdateRevisionsSelect { revisions: Vec<String> },

    #[serde(rename = "clear:revisionsSelect")]
    ClearRevisionsSelect,

    #[serde(rename = "update:gistInput", rename_all = "camelCase")]
    UpdateGistInput { gist_url: String },
}

impl Message {
    /// The wire tag, for logging.
    pub fn event(&self) -> &'static str {
        match self {
            Message::GenerateRevision => "generate:revision",
            Message::ChangeRevision { .. } => "change:revision",
            Message::ClearRevisions => "clear:revisions",
            Message::ImportRevisions { .. } => "import:revisions",
            Message::DownloadRevisions => "download:revisions",
            Message::CopyRevisions => "copy:revisions",
            Message::PasteRevisions => "paste:revisions",
            Message::CreateGist { .. } => "create:gist",
            Message::UpdateGist { .. } => "update:gist",
            Message::ImportGist { .. } => "import:gist",
            Message::CopyGistUrl { .. } => "copy:gistUrl",
            Message::ReloadPage => "reload:page",
            Message::UpdateRevisionsSelect { .. } => "update:revisionsSelect",
            Message::ClearRevisionsSelect => "clear:revisionsSelect",
            Message::UpdateGistInput { .. } => "update:gistInput",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_struct_variant_wire_shape() {
        let message = Message::ChangeRevision {
            revision: "3".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"event": "change:revision", "value": {"revision": "3"}})
        );
    }

    #[test]
    fn test_camel_case_payload_fields() {
        let message: Message = serde_json::from_value(json!({
            "event": "import:gist",
            "value": {"gistUrl": "https://gist.github.com/u/abc123"}
        }))
        .unwrap();
        assert_eq!(
            message,
            Message::ImportGist {
                gist_url: "https://gist.github.com/u/abc123".to_string()
            }
        );
    }

    #[test]
    fn test_unit_variant_has_no_value() {
        let value = serde_json::to_value(Message::GenerateRevision).unwrap();
        assert_eq!(value, json!({"event": "generate:revision"}));
        assert_eq!(
            serde_json::from_value::<Message>(value).unwrap(),
            Message::GenerateRevision
        );
    }

    #[test]
    fn test_bare_create_gist_from_ui() {
        let message: Message = serde_json::from_value(json!({
            "event": "create:gist",
            "value": {"gistUrl": ""}
        }))
        .unwrap();
        assert_eq!(message, Message::CreateGist { revisions: None });
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result = serde_json::from_value::<Message>(json!({"event": "delete:revision"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_event_matches_serialized_tag() {
        let messages = [
            Message::PasteRevisions,
            Message::CopyGistUrl {
                gist_url: "u".to_string(),
            },
            Message::UpdateRevisionsSelect {
                revisions: vec!["0".to_string()],
            },
        ];
        for message in messages {
            let value = serde_json::to_value(&message).unwrap();
            assert_eq!(value["event"], json!(message.event()));
        }
    }
}
