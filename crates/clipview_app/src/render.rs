use clipview_core::{AppViewModel, ClipListView, PreviewImage, PreviewView};

pub const NO_CLIPS_TEXT: &str = "No clips produced.";

/// Terminal lines for one frame of the view model.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![view.status_text.clone()];
    lines.push(render_preview(&view.preview));

    match &view.clips {
        ClipListView::Empty => {}
        ClipListView::NoClips => lines.push(NO_CLIPS_TEXT.to_string()),
        ClipListView::Entries(rows) => {
            for (index, row) in rows.iter().enumerate() {
                if row.label.is_empty() {
                    lines.push(format!("  [{}] {}", index + 1, row.url));
                } else {
                    lines.push(format!("  [{}] {} ({})", index + 1, row.url, row.label));
                }
            }
        }
    }
    lines
}

fn render_preview(preview: &PreviewView) -> String {
    let image = match &preview.background {
        None => return "preview: none".to_string(),
        Some(PreviewImage::Remote(url)) => url.clone(),
        Some(PreviewImage::Encoded {
            bytes,
            content_type,
        }) => format!("{} bytes of {}", bytes.len(), content_type),
    };
    let height = preview
        .height
        .map(|h| format!("{h:.0}"))
        .unwrap_or_else(|| "auto".to_string());
    format!("preview: {image} [{:.0}x{height}]", preview.width)
}
