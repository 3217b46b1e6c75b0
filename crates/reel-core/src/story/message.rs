//! Chat message data model.
//!
//! Messages are immutable payloads: the player never inspects them beyond
//! ordering, and the renderer decides presentation (alignment, sender label,
//! media row). Field names match the story JSON wire format.

use serde::{Deserialize, Serialize};

/// A single chat message within a story transcript.
///
/// `timestamp` is a display string; message ordering is positional within the
/// transcript, never derived from timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender: String,
    pub text: String,
    pub timestamp: String,
    pub is_sent_by_me: bool,
    /// Media attachment kind, if any. The remaining fields qualify it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
}

/// Media attachment kinds a message can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Document,
    Button,
    Image,
    Audio,
}

/// A validated, borrowed view of a message's media attachment.
///
/// Built by [`Message::media`]; a kind whose required fields are missing
/// yields no view at all, so malformed data degrades to a plain text bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media<'a> {
    Video {
        url: &'a str,
        title: Option<&'a str>,
        size: Option<&'a str>,
    },
    Document {
        title: &'a str,
        size: Option<&'a str>,
    },
    Button {
        label: &'a str,
    },
    Image {
        url: &'a str,
        title: Option<&'a str>,
    },
    Audio {
        url: &'a str,
    },
}

impl Message {
    /// Returns a plain text message with no media attachment.
    pub fn text(sender: impl Into<String>, text: impl Into<String>, sent_by_me: bool) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp: String::new(),
            is_sent_by_me: sent_by_me,
            media_type: None,
            media_url: None,
            media_title: None,
            media_size: None,
            button_text: None,
        }
    }

    /// Projects the flat media fields into a typed view.
    ///
    /// Returns `None` when no media kind is set, or when the kind's required
    /// field is absent (a document without a title, a button without a label).
    pub fn media(&self) -> Option<Media<'_>> {
        let url = self.media_url.as_deref();
        let title = self.media_title.as_deref();
        let size = self.media_size.as_deref();
        match self.media_type? {
            MediaKind::Video => Some(Media::Video {
                url: url?,
                title,
                size,
            }),
            MediaKind::Document => Some(Media::Document {
                title: title?,
                size,
            }),
            MediaKind::Button => Some(Media::Button {
                label: self.button_text.as_deref()?,
            }),
            MediaKind::Image => Some(Media::Image { url: url?, title }),
            MediaKind::Audio => Some(Media::Audio { url: url? }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roundtrips_wire_names() {
        let json = r#"{
            "sender": "Ana (Bot)",
            "text": "Here is the form",
            "timestamp": "10:42",
            "isSentByMe": false,
            "mediaType": "document",
            "mediaTitle": "application.pdf",
            "mediaSize": "312 KB"
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.sender, "Ana (Bot)");
        assert!(!message.is_sent_by_me);
        assert_eq!(
            message.media(),
            Some(Media::Document {
                title: "application.pdf",
                size: Some("312 KB"),
            })
        );

        let back = serde_json::to_value(&message).unwrap();
        assert_eq!(back["isSentByMe"], false);
        assert_eq!(back["mediaType"], "document");
        assert!(back.get("mediaUrl").is_none());
    }

    #[test]
    fn test_plain_message_has_no_media() {
        let message = Message::text("Rui", "hello", true);
        assert!(message.media().is_none());
    }

    #[test]
    fn test_media_with_missing_required_field_degrades() {
        let mut message = Message::text("Ana (Bot)", "see attached", false);
        message.media_type = Some(MediaKind::Button);
        // No button_text: the view refuses rather than inventing a label.
        assert!(message.media().is_none());

        message.button_text = Some("Apply now".to_string());
        assert_eq!(
            message.media(),
            Some(Media::Button { label: "Apply now" })
        );
    }

    #[test]
    fn test_video_view_carries_optional_metadata() {
        let mut message = Message::text("Ana (Bot)", "watch this", false);
        message.media_type = Some(MediaKind::Video);
        message.media_url = Some("https://example.org/intro.mp4".to_string());
        message.media_title = Some("Intro".to_string());
        assert_eq!(
            message.media(),
            Some(Media::Video {
                url: "https://example.org/intro.mp4",
                title: Some("Intro"),
                size: None,
            })
        );
    }
}
