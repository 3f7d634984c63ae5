//! Hover text for scene nodes.

use crate::config::SceneStyle;
use crate::similarity::Neighbor;

const ELLIPSIS: &str = "...";

/// First `budget` characters of `text`, with an ellipsis when cut.
pub fn truncate_preview(text: &str, budget: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(budget) {
        Some((byte, _)) => format!("{}{}", &text[..byte], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Chunk preview plus its strongest neighbors, strongest first.
pub fn node_hover(index: usize, chunks: &[String], neighbors: &[Neighbor], style: &SceneStyle) -> String {
    let text = chunks.get(index).map(String::as_str).unwrap_or("");
    let preview = truncate_preview(text, style.preview_chars);

    let lines: Vec<String> = neighbors
        .iter()
        .take(style.hover_neighbors)
        .map(|nb| {
            let neighbor_text = chunks.get(nb.index).map(String::as_str).unwrap_or("");
            format!(
                "  • C{} ({:.2}): {}",
                nb.index,
                nb.score,
                truncate_preview(neighbor_text, style.neighbor_preview_chars)
            )
        })
        .collect();

    let neighbor_text = if lines.is_empty() {
        "No close neighbors".to_string()
    } else {
        lines.join("<br>")
    };

    format!(
        "<b>Chunk {}</b><br>{}<br><br><b>Similar chunks:</b><br>{}",
        index, preview, neighbor_text
    )
}

pub fn query_hover(query_text: Option<&str>, style: &SceneStyle) -> String {
    match query_text {
        Some(text) if !text.is_empty() => {
            format!("<b>Query Point</b><br>{}", truncate_preview(text, style.preview_chars))
        }
        _ => "<b>Query Point</b>".to_string(),
    }
}
