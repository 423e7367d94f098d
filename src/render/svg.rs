//! Standalone SVG document output

use super::Renderer;
use crate::services::{RectDescriptor, Scene, TooltipDescriptor};

/// Root element class, kept for stylesheets written against the web component
pub const SVG_CLASS: &str = "react-calendar-heatmap";

/// Default fills for the built-in class names
const DEFAULT_PALETTE: [(&str, &str); 6] = [
    ("color-empty", "#eeeeee"),
    ("color-filled", "#8cc665"),
    ("color-scale-1", "#d6e685"),
    ("color-scale-2", "#8cc665"),
    ("color-scale-3", "#44a340"),
    ("color-scale-4", "#1e6823"),
];

const LABEL_STYLE: &str = "font-size: 10px; fill: #aaa;";
const TOOLTIP_FONT_SIZE: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct SvgRenderer {
    /// Emit a `<style>` block with the default palette
    pub embed_style: bool,
    /// Extra `class -> fill` rules appended after the defaults
    pub palette: Vec<(String, String)>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            embed_style: true,
            palette: Vec::new(),
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bare markup; styling is left to the host page
    pub fn unstyled() -> Self {
        Self {
            embed_style: false,
            palette: Vec::new(),
        }
    }

    pub fn with_fill(mut self, class_name: impl Into<String>, fill: impl Into<String>) -> Self {
        self.palette.push((class_name.into(), fill.into()));
        self
    }

    fn render_style(&self) -> String {
        let mut css = String::from("  <style>\n");
        css.push_str(&format!("    .{SVG_CLASS} text {{ {LABEL_STYLE} }}\n"));
        let rules = DEFAULT_PALETTE
            .iter()
            .map(|(class, fill)| (*class, *fill))
            .chain(self.palette.iter().map(|(c, f)| (c.as_str(), f.as_str())));
        for (class_name, fill) in rules {
            css.push_str(&format!(
                "    .{SVG_CLASS} .{} {{ fill: {}; }}\n",
                xml_escape(class_name),
                xml_escape(fill)
            ));
        }
        css.push_str("  </style>\n");
        css
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="{SVG_CLASS}" viewBox="{}">"#,
            scene.view_box
        ));
        svg.push('\n');

        if self.embed_style {
            svg.push_str(&self.render_style());
        }

        svg.push_str("  <g class=\"month-labels\">\n");
        for label in &scene.labels {
            svg.push_str(&format!(
                r#"    <text x="{}" y="{}">{}</text>"#,
                label.x,
                label.y,
                xml_escape(&label.text)
            ));
            svg.push('\n');
        }
        svg.push_str("  </g>\n");

        svg.push_str("  <g class=\"weeks\">\n");
        for cell in &scene.cells {
            svg.push_str(&render_rect(cell));
        }
        svg.push_str("  </g>\n");

        if let Some(tooltip) = &scene.tooltip {
            svg.push_str(&render_tooltip(tooltip));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Attributes every cell rect already carries
const RECT_ATTRS: [&str; 6] = ["x", "y", "width", "height", "class", "data-date"];

fn render_rect(cell: &RectDescriptor) -> String {
    let mut attrs = format!(
        r#"x="{}" y="{}" width="{}" height="{}" class="{}" data-date="{}""#,
        cell.x,
        cell.y,
        cell.width,
        cell.height,
        xml_escape(&cell.class_name),
        cell.date.format("%Y-%m-%d")
    );
    for (name, value) in &cell.data_attrs {
        let name = attr_name(name);
        if name.is_empty() || RECT_ATTRS.contains(&name.as_str()) {
            tracing::debug!(%name, "skipping data attribute that would clash on <rect>");
            continue;
        }
        attrs.push_str(&format!(r#" {name}="{}""#, xml_escape(value)));
    }

    match cell.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => format!(
            "    <rect {attrs}><title>{}</title></rect>\n",
            xml_escape(title)
        ),
        None => format!("    <rect {attrs}/>\n"),
    }
}

fn render_tooltip(tooltip: &TooltipDescriptor) -> String {
    format!(
        concat!(
            "  <g class=\"tooltip\">\n",
            "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" ",
            "fill=\"#000\" fill-opacity=\"0.8\"/>\n",
            "    <text x=\"{}\" y=\"{}\" fill=\"#fff\" text-anchor=\"middle\" stroke=\"none\" ",
            "font-size=\"{}\">{}</text>\n",
            "  </g>\n"
        ),
        tooltip.x,
        tooltip.y,
        tooltip.background_width,
        tooltip.background_height,
        tooltip.text_x,
        tooltip.text_y,
        TOOLTIP_FONT_SIZE,
        xml_escape(&tooltip.text),
        r = tooltip.corner_radius,
    )
}

/// Keep only characters valid in an XML attribute name
fn attr_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect()
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
