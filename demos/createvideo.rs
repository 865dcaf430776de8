//! Assemble and submit a slideshow video.
//!
//! Run with:
//!   PICOVICO_ACCESS_TOKEN=... cargo run --example createvideo
//!
//! Access tokens can be requested at developers@picovico.com.

use picovico::ClientBuilder;

// Called by the service once the video has been rendered.
const CALLBACK_URL: &str = "http://example.com/callback";
const MUSIC_URL: &str = "http://example.com/music/my_music.aac";

#[tokio::main]
async fn main() -> picovico::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = ClientBuilder::new().build()?;

    // -----------------------------------------------------------------------
    // 1. List the available styles and the extra fields they need
    // -----------------------------------------------------------------------
    let catalog = client.fetch_styles(false).await?;
    for style in &catalog.themes {
        let fields: Vec<_> = style
            .extra_field
            .iter()
            .map(|f| f.machine_name.as_str())
            .collect();
        println!("{:<20} {}", style.machine_name, fields.join(", "));
    }
    println!();

    // -----------------------------------------------------------------------
    // 2. Build the video
    // -----------------------------------------------------------------------
    let mut video = client.video("vanilla", MUSIC_URL, CALLBACK_URL)?;

    video
        .add_image(
            "http://farm7.static.flickr.com/6034/6227544215_fe9a9ed1ea_b.jpg",
            Some("The predator and the prey"),
        )?
        .add_image(
            "http://farm7.static.flickr.com/6169/6228061064_413bf3da13_b.jpg",
            None,
        )?
        .add_image(
            "http://farm7.static.flickr.com/6080/6115623115_ab728913f3_b.jpg",
            Some("The eternal rays"),
        )?
        .add_text(Some("Flora"), None)?
        .add_image(
            "http://farm7.static.flickr.com/6014/5909306527_0ba1606f8f_b.jpg",
            None,
        )?
        .add_image(
            "http://farm5.static.flickr.com/4079/4764595958_fee8a036f5_b.jpg",
            None,
        )?
        .add_text(Some("Photos by"), Some("Suraj Sapkota"))?;

    video
        .set_extra_field("video_title_16", Some("Video title"))
        .set_extra_field("title_text", None);

    // -----------------------------------------------------------------------
    // 3. Submit it. The callback payload references this token.
    // -----------------------------------------------------------------------
    let token = video.create().await?;
    println!("Video token: {token}");

    Ok(())
}
