use log::debug;
use url::Url;

pub const WIDGET_PATH: &str = "/static/widget.html";

/// Origin the conversation frame is loaded from: that of the loading script,
/// or the page's own origin when the script source is missing or unusable.
pub fn resolve_frame_origin(script_src: Option<&str>, page_origin: &str) -> String {
    let Some(src) = script_src else {
        debug!("No script source, using page origin {}", page_origin);
        return page_origin.to_string();
    };

    match Url::parse(src) {
        Ok(url) => {
            let origin = url.origin();
            if origin.is_tuple() {
                origin.ascii_serialization()
            } else {
                debug!("Script source '{}' has an opaque origin, using page origin", src);
                page_origin.to_string()
            }
        }
        Err(e) => {
            debug!("Could not parse script source '{}': {}. Using page origin", src, e);
            page_origin.to_string()
        }
    }
}

pub fn frame_src(origin: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), WIDGET_PATH)
}
