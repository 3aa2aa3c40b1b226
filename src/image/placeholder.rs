use html_escape::encode_text;

use crate::domain::{ImageAsset, ImageFormat};

/// Longest prompt excerpt embedded in a placeholder, in characters.
pub const EXCERPT_LIMIT: usize = 180;

/// Deterministic SVG poster standing in for an illustration that could not be generated.
pub fn placeholder(prompt: &str) -> ImageAsset {
    let svg = format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="1280" height="720">
  <defs>
    <linearGradient id="g" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="#0f172a"/>
      <stop offset="100%" stop-color="#1e293b"/>
    </linearGradient>
  </defs>
  <rect width="100%" height="100%" fill="url(#g)"/>
  <g transform="translate(56,80)">
    <text x="0" y="0" font-family="Inter, system-ui, Arial, sans-serif" font-size="42" font-weight="700" fill="#e5e7eb">Auto Illustration</text>
    <foreignObject x="0" y="28" width="1168" height="600">
      <div xmlns="http://www.w3.org/1999/xhtml" style="font-family: Inter, system-ui, Arial, sans-serif; font-size: 24px; line-height: 1.45; color: #cbd5e1;">{}</div>
    </foreignObject>
  </g>
</svg>
"##,
        excerpt(prompt)
    );

    ImageAsset::new(svg.into_bytes(), ImageFormat::Svg)
}

/// Trimmed, truncated and XML-escaped prompt text.
fn excerpt(prompt: &str) -> String {
    let text = prompt.trim();
    let text = if text.is_empty() { "illustration" } else { text };

    let mut truncated: String = text.chars().take(EXCERPT_LIMIT).collect();
    if text.chars().count() > EXCERPT_LIMIT {
        truncated.push('…');
    }

    encode_text(&truncated).into_owned()
}
