use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::client::Client;
use crate::errors::{PicovicoError, Result};
use crate::models::{check_length, CreateVideoResponse, Frame, Style, Token};

/// A single video being assembled for submission.
///
/// Created by [`Client::video`]. Frames are kept in the order they are added,
/// which is the order they appear in the rendered video. [`create`](Self::create)
/// consumes the builder; start a new one to submit again.
#[derive(Debug)]
pub struct VideoBuilder<'a> {
    client: &'a Client,
    style: String,
    music_url: String,
    callback_url: String,
    frames: Vec<Frame>,
    extra_fields: BTreeMap<String, Option<String>>,
}

impl<'a> VideoBuilder<'a> {
    pub(crate) fn new(
        client: &'a Client,
        style: String,
        music_url: String,
        callback_url: String,
    ) -> Result<Self> {
        if style.is_empty() {
            return Err(PicovicoError::missing("style"));
        }
        if music_url.is_empty() {
            return Err(PicovicoError::missing("music_url"));
        }
        if callback_url.is_empty() {
            return Err(PicovicoError::missing("callback_url"));
        }

        Ok(Self {
            client,
            style,
            music_url,
            callback_url,
            frames: Vec::new(),
            extra_fields: BTreeMap::new(),
        })
    }

    /// Append an image frame. Captions are limited to 140 characters.
    pub fn add_image(
        &mut self,
        url: impl Into<String>,
        caption: Option<&str>,
    ) -> Result<&mut Self> {
        let frame = Frame::image(url, caption.map(str::to_owned))?;
        self.frames.push(frame);
        Ok(self)
    }

    /// Append a text frame. Titles are limited to 64 characters and bodies to
    /// 140; at least one of them must be given.
    pub fn add_text(
        &mut self,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<&mut Self> {
        let frame = Frame::text(title.map(str::to_owned), body.map(str::to_owned))?;
        self.frames.push(frame);
        Ok(self)
    }

    /// Set a style-specific extra field, replacing any earlier value.
    ///
    /// Every extra field the style declares must be set before
    /// [`create`](Self::create), even if only to `None`.
    pub fn set_extra_field(
        &mut self,
        key: impl Into<String>,
        value: Option<&str>,
    ) -> &mut Self {
        self.extra_fields.insert(key.into(), value.map(str::to_owned));
        self
    }

    pub fn style_name(&self) -> &str {
        &self.style
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn extra_fields(&self) -> &BTreeMap<String, Option<String>> {
        &self.extra_fields
    }

    /// The JSON document sent as the `vdd` form field.
    ///
    /// Extra fields sit at the top level next to `callback_url`, `music_url`,
    /// `frames` and `theme`; the latter win on a name clash.
    pub fn payload(&self) -> Value {
        let mut data = serde_json::Map::new();
        for (key, value) in &self.extra_fields {
            data.insert(key.clone(), json!(value));
        }
        data.insert("callback_url".into(), json!(self.callback_url));
        data.insert("music_url".into(), json!(self.music_url));
        data.insert("frames".into(), json!(self.frames));
        data.insert("theme".into(), json!(self.style));
        Value::Object(data)
    }

    /// Check the extra fields against what `style` declares.
    fn validate(&self, style: &Style) -> Result<()> {
        for spec in &style.extra_field {
            let Some(value) = self.extra_fields.get(&spec.machine_name) else {
                return Err(PicovicoError::missing(&spec.machine_name));
            };
            if let Some(limit) = spec.limit() {
                check_length(&spec.machine_name, value.as_deref(), limit)?;
            }
        }
        Ok(())
    }

    /// Validate the video against its style and submit it for rendering.
    ///
    /// Returns the job [`Token`]. The service reports completion by calling
    /// the callback URL.
    ///
    /// # Errors
    ///
    /// - [`PicovicoError::UnknownStyle`] if the style is not in the catalog.
    /// - [`PicovicoError::MissingField`] if a declared extra field was never set.
    /// - [`PicovicoError::LengthOutOfRange`] if an extra field exceeds its limit.
    /// - [`PicovicoError::Request`] if the service rejects the request.
    /// - [`PicovicoError::MissingToken`] if the response carries no token.
    pub async fn create(self) -> Result<Token> {
        let style = self
            .client
            .style(&self.style)
            .await?
            .ok_or_else(|| PicovicoError::UnknownStyle(self.style.clone()))?;

        self.validate(&style)?;

        let vdd = serde_json::to_string(&self.payload())?;
        tracing::debug!(
            style = %self.style,
            frames = self.frames.len(),
            "Submitting video"
        );

        let body = self.client.post_form("create", &[("vdd", vdd)]).await?;
        let response: CreateVideoResponse = serde_json::from_str(&body)?;
        let token = response
            .into_token()
            .ok_or(PicovicoError::MissingToken { body })?;

        tracing::debug!(token = %token, "Video queued");
        Ok(Token::from(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> Client {
        Client::new("test-token").unwrap()
    }

    fn style(fields: Value) -> Style {
        serde_json::from_value(json!({"machine_name": "vanilla", "extra_field": fields})).unwrap()
    }

    #[test]
    fn constructor_requires_all_arguments() {
        let client = client();
        for (s, m, c, missing) in [
            ("", "m", "c", "style"),
            ("vanilla", "", "c", "music_url"),
            ("vanilla", "m", "", "callback_url"),
        ] {
            let err = client.video(s, m, c).unwrap_err();
            assert!(matches!(err, PicovicoError::MissingField { ref field } if field == missing));
        }
        // An unknown style only fails at create time.
        assert!(client.video("no-such-style", "m", "c").is_ok());
    }

    #[test]
    fn rejected_frames_are_not_appended() {
        let client = client();
        let mut video = client.video("vanilla", "m", "c").unwrap();
        assert!(video.add_image("", None).is_err());
        assert!(video.add_image("http://a/1.jpg", Some("c".repeat(141).as_str())).is_err());
        assert!(video.add_text(None, None).is_err());
        assert!(video.frames().is_empty());
    }

    #[test]
    fn payload_keeps_frame_order() {
        let client = client();
        let mut video = client.video("vanilla", "http://m/song.aac", "http://cb").unwrap();
        video
            .add_image("http://a/1.jpg", Some("first"))
            .unwrap()
            .add_text(Some("Flora"), None)
            .unwrap()
            .add_image("http://a/2.jpg", None)
            .unwrap();

        let payload = video.payload();
        let frames = payload["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0]["data"]["url"], "http://a/1.jpg");
        assert_eq!(frames[1]["frame"], "text_frame");
        assert_eq!(frames[2]["data"]["url"], "http://a/2.jpg");
        assert_eq!(payload["theme"], "vanilla");
        assert_eq!(payload["music_url"], "http://m/song.aac");
        assert_eq!(payload["callback_url"], "http://cb");
    }

    #[test]
    fn set_extra_field_overwrites_and_reserved_keys_win() {
        let client = client();
        let mut video = client.video("vanilla", "m", "c").unwrap();
        video.set_extra_field("title_text", Some("one"));
        video.set_extra_field("title_text", None);
        video.set_extra_field("theme", Some("bogus"));

        assert_eq!(video.extra_fields()["title_text"], None);
        let payload = video.payload();
        assert_eq!(payload["title_text"], Value::Null);
        assert_eq!(payload["theme"], "vanilla");
    }

    #[test]
    fn validate_requires_declared_keys() {
        let client = client();
        let style = style(json!([{"machine_name": "video_title_16", "max_length": 0}]));

        let video = client.video("vanilla", "m", "c").unwrap();
        let err = video.validate(&style).unwrap_err();
        assert!(matches!(err, PicovicoError::MissingField { ref field } if field == "video_title_16"));

        let mut video = client.video("vanilla", "m", "c").unwrap();
        video.set_extra_field("video_title_16", None);
        assert!(video.validate(&style).is_ok());
    }

    #[test]
    fn validate_enforces_declared_max_length() {
        let client = client();
        let style = style(json!([
            {"machine_name": "video_title_16", "max_length": 16},
            {"machine_name": "title_text", "max_length": 0}
        ]));

        let mut video = client.video("vanilla", "m", "c").unwrap();
        video.set_extra_field("video_title_16", Some("a".repeat(17).as_str()));
        video.set_extra_field("title_text", Some("b".repeat(500).as_str()));
        let err = video.validate(&style).unwrap_err();
        assert!(matches!(
            err,
            PicovicoError::LengthOutOfRange { ref field, limit: 16, length: 17 } if field == "video_title_16"
        ));

        video.set_extra_field("video_title_16", Some("a".repeat(16).as_str()));
        assert!(video.validate(&style).is_ok());
    }
}
