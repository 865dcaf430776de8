//! # Picovico SDK for Rust
//!
//! Client for the [Picovico](https://picovico.com) video creation API.
//! Describe a video as an ordered list of image and text frames, pick a
//! style and a soundtrack, and submit it for rendering. The service renders
//! asynchronously and reports back through your callback URL; the token
//! returned by [`VideoBuilder::create`] identifies the job in that callback.
//!
//! ## Quick start
//!
//! ```no_run
//! use picovico::Client;
//!
//! #[tokio::main]
//! async fn main() -> picovico::Result<()> {
//!     let client = Client::new("your-access-token")?;
//!
//!     let mut video = client.video(
//!         "vanilla",
//!         "http://example.com/music/my_music.aac",
//!         "http://example.com/callback",
//!     )?;
//!     video.add_image("http://example.com/1.jpg", Some("The predator and the prey"))?;
//!     video.add_text(Some("Photos by"), Some("Suraj Sapkota"))?;
//!     video.set_extra_field("video_title_16", Some("Video title"));
//!     video.set_extra_field("title_text", None);
//!
//!     let token = video.create().await?;
//!     println!("Video token: {token}");
//!     Ok(())
//! }
//! ```
//!
//! ## Styles
//!
//! The style catalog is fetched once per [`Client`] and cached:
//!
//! ```no_run
//! # async fn example(client: picovico::Client) -> picovico::Result<()> {
//! let catalog = client.fetch_styles(false).await?;
//! for style in &catalog.themes {
//!     let fields: Vec<_> = style.extra_field.iter().map(|f| f.machine_name.as_str()).collect();
//!     println!("{}: {}", style.machine_name, fields.join(", "));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod errors;
mod models;
mod video;

pub use client::{Client, ClientBuilder};
pub use errors::{PicovicoError, Result};
pub use models::{
    ExtraFieldSpec, Frame, FrameKind, Style, StyleCatalog, Token, MAX_BODY_CHARS,
    MAX_CAPTION_CHARS, MAX_TITLE_CHARS,
};
pub use video::VideoBuilder;
