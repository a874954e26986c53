//! Template-based renderers: the rate chart (SVG) and the interactive page (HTML).

pub mod to_html;
pub mod to_svg;
