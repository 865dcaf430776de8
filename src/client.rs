use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::errors::{PicovicoError, Result};
use crate::models::{FrameKind, Style, StyleCatalog};
use crate::video::VideoBuilder;

const DEFAULT_HOST: &str = "https://api.picovico.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ACCESS_TOKEN_ENV: &str = "PICOVICO_ACCESS_TOKEN";

/// Configuration for a [`Client`].
///
/// Picovico authenticates every call with an `access_token` query parameter,
/// so the token is the only required setting. The host and timeout can be
/// pointed elsewhere for staging or tests.
///
/// ```no_run
/// use picovico::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> picovico::Result<()> {
/// let client = ClientBuilder::new()
///     .access_token("my-access-token")
///     .host("https://staging.example.com")
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    access_token: Option<String>,
    host: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Production host, 60 second timeout, token taken from the environment
    /// unless set.
    pub fn new() -> Self {
        Self {
            access_token: None,
            host: DEFAULT_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Token appended as `?access_token=` to the themes and create calls.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Base URL the `themes` and `create` paths are joined onto.
    /// A trailing slash is ignored.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Per-request timeout applied to the underlying HTTP client.
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// Finish configuration. No request is made here; the style catalog is
    /// fetched on first use.
    ///
    /// Falls back to `PICOVICO_ACCESS_TOKEN` when no token was given, and
    /// fails with [`PicovicoError::Authentication`] if that is unset or empty.
    pub fn build(self) -> Result<Client> {
        let access_token = self
            .access_token
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PicovicoError::Authentication {
                message: format!("no access token configured and {ACCESS_TOKEN_ENV} is not set"),
            })?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(PicovicoError::Http)?;

        Ok(Client {
            host: self.host.trim_end_matches('/').to_string(),
            access_token,
            http,
            styles: RwLock::new(None),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The Picovico API client.
///
/// Holds the credentials and a lazily fetched copy of the style catalog,
/// which is shared read-only by every [`VideoBuilder`] created from it.
///
/// # Example
///
/// ```no_run
/// use picovico::Client;
///
/// # async fn example() -> picovico::Result<()> {
/// let client = Client::new("my-access-token")?;
///
/// let mut video = client.video(
///     "vanilla",
///     "http://example.com/music/my_music.aac",
///     "http://example.com/callback",
/// )?;
/// video.add_image("http://example.com/1.jpg", Some("The predator and the prey"))?;
/// video.set_extra_field("video_title_16", Some("Video title"));
/// video.set_extra_field("title_text", None);
///
/// let token = video.create().await?;
/// println!("queued as {token}");
/// # Ok(())
/// # }
/// ```
pub struct Client {
    host: String,
    access_token: String,
    http: reqwest::Client,
    styles: RwLock<Option<Arc<StyleCatalog>>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client for the production host using `access_token`.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().access_token(access_token).build()
    }

    /// Return the style catalog, fetching it on first use.
    ///
    /// The catalog is cached for the lifetime of the client; pass
    /// `force = true` to fetch it again.
    pub async fn fetch_styles(&self, force: bool) -> Result<Arc<StyleCatalog>> {
        if !force {
            if let Some(catalog) = self.styles.read().await.as_ref() {
                tracing::debug!("Using cached style catalog");
                return Ok(Arc::clone(catalog));
            }
        }

        let mut slot = self.styles.write().await;
        // Another caller may have filled the slot while we waited.
        if !force {
            if let Some(catalog) = slot.as_ref() {
                return Ok(Arc::clone(catalog));
            }
        }

        let body = self.get("themes").await?;
        let catalog: StyleCatalog = serde_json::from_str(&body)?;
        tracing::debug!(
            themes = catalog.themes.len(),
            frames = catalog.frames.len(),
            "Fetched style catalog"
        );

        let catalog = Arc::new(catalog);
        *slot = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Look up a style by machine name. `Ok(None)` if the catalog has no such style.
    pub async fn style(&self, machine_name: &str) -> Result<Option<Style>> {
        let catalog = self.fetch_styles(false).await?;
        Ok(catalog.style(machine_name).cloned())
    }

    /// Look up a frame kind by machine name. `Ok(None)` if it is unknown.
    pub async fn frame_kind(&self, machine_name: &str) -> Result<Option<FrameKind>> {
        let catalog = self.fetch_styles(false).await?;
        Ok(catalog.frame_kind(machine_name).cloned())
    }

    /// Start a new, empty video.
    ///
    /// All three arguments are required; whether `style` exists is only
    /// checked when the video is created.
    pub fn video(
        &self,
        style: impl Into<String>,
        music_url: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Result<VideoBuilder<'_>> {
        VideoBuilder::new(self, style.into(), music_url.into(), callback_url.into())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.host, path)
    }

    /// GET `path`, returning the body text of a successful response.
    pub(crate) async fn get(&self, path: &str) -> Result<String> {
        tracing::debug!(path, "GET");
        let request = self
            .http
            .get(self.endpoint(path))
            .query(&[("access_token", &self.access_token)]);
        Self::send(request).await
    }

    /// POST `form` urlencoded to `path`, returning the body text of a successful response.
    pub(crate) async fn post_form<F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<String> {
        tracing::debug!(path, "POST");
        let request = self
            .http
            .post(self.endpoint(path))
            .query(&[("access_token", &self.access_token)])
            .form(form);
        Self::send(request).await
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.send().await.map_err(PicovicoError::Http)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Picovico request failed");
            return Err(PicovicoError::Request {
                status_code: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(PicovicoError::Http)
    }
}
