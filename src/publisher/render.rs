//! HTML for the post page and the feed item description.

use html_escape::{encode_double_quoted_attribute, encode_single_quoted_attribute, encode_text};

use crate::domain::StoryRecord;

/// Standalone post page. `image_src` is relative to the page.
pub fn render_post(story: &StoryRecord, image_src: &str, home_url: &str) -> String {
    let title = encode_text(&story.title);
    let alt = encode_double_quoted_attribute(&story.title);
    let image_src = encode_double_quoted_attribute(image_src);
    let home_url = encode_double_quoted_attribute(home_url);

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>
    html, body {{ margin: 0; background: #0e0f11; color: #f6f7fb; font: 16px/1.65 system-ui, sans-serif; }}
    @media (prefers-color-scheme: light) {{ html, body {{ background: #fff; color: #121317; }} }}
    .topbar {{ display: flex; justify-content: space-between; align-items: center; max-width: 900px; margin: 0 auto; padding: 10px 16px; }}
    .title {{ font-size: 1.4rem; margin: 0; }}
    .close {{ color: inherit; text-decoration: none; border: 1px solid currentColor; border-radius: 999px; padding: 6px 12px; }}
    .wrap {{ max-width: 900px; margin: 24px auto 60px; padding: 0 16px; }}
    figure {{ margin: 0 0 18px; border-radius: 16px; overflow: hidden; }}
    img.post {{ width: 100%; height: auto; display: block; }}
  </style>
</head>
<body>
  <header class="topbar">
    <h1 class="title">{title}</h1>
    <a class="close" href="{home_url}">Close ✕</a>
  </header>
  <main class="wrap">
    <figure><img class="post" src="{image_src}" alt="illustration for {alt}"></figure>
    <article>{story}</article>
  </main>
</body>
</html>
"#,
        story = story.story_html,
    )
}

/// Feed description: the story markup followed by the illustration.
pub fn feed_description(story_html: &str, image_url: &str) -> String {
    format!(
        "{}<p><img src='{}' alt='illustration'/></p>",
        story_html,
        encode_single_quoted_attribute(image_url)
    )
}
