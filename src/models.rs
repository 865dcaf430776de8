use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PicovicoError, Result};

/// Longest caption accepted on an image frame.
pub const MAX_CAPTION_CHARS: usize = 140;
/// Longest title accepted on a text frame.
pub const MAX_TITLE_CHARS: usize = 64;
/// Longest body accepted on a text frame.
pub const MAX_BODY_CHARS: usize = 140;

/// An extra field a style requires on every video that uses it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtraFieldSpec {
    pub machine_name: String,

    /// `None` or `Some(0)` means unlimited.
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl ExtraFieldSpec {
    /// The enforced limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.max_length.filter(|&n| n > 0)
    }
}

/// A visual template ("theme") offered by the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Style {
    pub machine_name: String,

    #[serde(default)]
    pub extra_field: Vec<ExtraFieldSpec>,

    /// Remaining keys of the catalog entry, untouched.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// A frame type known to the service, e.g. `image_frame`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrameKind {
    pub machine_name: String,

    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// GET /themes response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StyleCatalog {
    #[serde(default)]
    pub themes: Vec<Style>,

    #[serde(default)]
    pub frames: Vec<FrameKind>,
}

impl StyleCatalog {
    /// First style whose machine name matches.
    pub fn style(&self, machine_name: &str) -> Option<&Style> {
        self.themes.iter().find(|s| s.machine_name == machine_name)
    }

    /// First frame kind whose machine name matches.
    pub fn frame_kind(&self, machine_name: &str) -> Option<&FrameKind> {
        self.frames.iter().find(|f| f.machine_name == machine_name)
    }
}

/// One unit of the video timeline.
///
/// Serializes to the wire shape `{"frame": "image_frame", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "frame", content = "data", rename_all = "snake_case")]
pub enum Frame {
    ImageFrame {
        url: String,
        #[serde(rename = "text")]
        caption: Option<String>,
    },
    TextFrame {
        title: Option<String>,
        #[serde(rename = "text")]
        body: Option<String>,
    },
}

impl Frame {
    /// Image frame, validated. Empty captions are sent as `null`.
    pub fn image(url: impl Into<String>, caption: Option<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(PicovicoError::missing("url"));
        }
        let caption = non_empty(caption);
        check_length("caption", caption.as_deref(), MAX_CAPTION_CHARS)?;
        Ok(Frame::ImageFrame { url, caption })
    }

    /// Text frame, validated. At least one of `title` and `body` must be non-empty.
    pub fn text(title: Option<String>, body: Option<String>) -> Result<Self> {
        let title = non_empty(title);
        let body = non_empty(body);
        if title.is_none() && body.is_none() {
            return Err(PicovicoError::missing("title or text"));
        }
        check_length("title", title.as_deref(), MAX_TITLE_CHARS)?;
        check_length("text", body.as_deref(), MAX_BODY_CHARS)?;
        Ok(Frame::TextFrame { title, body })
    }

    /// The wire name of this frame's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::ImageFrame { .. } => "image_frame",
            Frame::TextFrame { .. } => "text_frame",
        }
    }
}

/// Opaque identifier of a rendering job, returned by the create call.
///
/// The service posts render results to the video's callback URL along with
/// this token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token(s)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// POST /create response.
#[derive(Deserialize)]
pub(crate) struct CreateVideoResponse {
    #[serde(default)]
    pub token: Option<serde_json::Value>,
}

impl CreateVideoResponse {
    /// The token, if the service sent one as a string.
    pub fn into_token(self) -> Option<String> {
        match self.token {
            Some(serde_json::Value::String(token)) => Some(token),
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Fails when `value` has more than `limit` characters.
pub(crate) fn check_length(field: &str, value: Option<&str>, limit: usize) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let length = value.chars().count();
    if length > limit {
        return Err(PicovicoError::LengthOutOfRange {
            field: field.to_string(),
            limit,
            length,
        });
    }
    Ok(())
}
