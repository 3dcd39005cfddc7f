//! SVG output

use jdrkit_core::{BoundingBox, Point};

use super::{drawing_bbox, emit_shape, format_number, OutlineSink};
use crate::context::DrawContext;
use crate::error::ShapeError;
use crate::paint::Paint;
use crate::shape::Shape;
use crate::stroke::{Join, PathStyle};

pub struct SvgWriter {
    body: String,
    data: String,
    attributes: String,
    precision: usize,
    pretty: bool,
}

impl SvgWriter {
    pub fn new(precision: usize) -> Self {
        Self {
            body: String::new(),
            data: String::new(),
            attributes: String::new(),
            precision,
            pretty: false,
        }
    }

    /// One element per indented line
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn num(&self, v: f64) -> String {
        format_number(v, self.precision)
    }

    fn point(&mut self, p: Point) {
        let s = format!("{} {} ", self.num(p.x), self.num(p.y));
        self.data.push_str(&s);
    }

    fn paint_attributes(&self, name: &str, paint: &Paint) -> String {
        if paint.is_transparent() {
            return format!(" {}=\"none\"", name);
        }
        let rgb = paint.to_rgb();
        let mut s = format!(" {}=\"{}\"", name, rgb.to_hex());
        if rgb.alpha < 1.0 {
            s.push_str(&format!(" {}-opacity=\"{}\"", name, self.num(rgb.alpha)));
        }
        s
    }

    fn style_attributes(&self, style: &PathStyle) -> String {
        let mut s = self.paint_attributes("fill", &style.fill_paint);
        s.push_str(&self.paint_attributes("stroke", &style.line_paint));
        if style.line_paint.is_transparent() {
            return s;
        }
        let stroke = &style.stroke;
        s.push_str(&format!(" stroke-width=\"{}\"", self.num(stroke.width.to_bp())));
        if !stroke.dash.is_solid() {
            let dashes: Vec<String> = stroke.dash.pattern.iter().map(|v| self.num(*v)).collect();
            s.push_str(&format!(" stroke-dasharray=\"{}\"", dashes.join(",")));
            if stroke.dash.offset != 0.0 {
                s.push_str(&format!(" stroke-dashoffset=\"{}\"", self.num(stroke.dash.offset)));
            }
        }
        s.push_str(&format!(" stroke-linecap=\"{}\"", stroke.cap.svg()));
        s.push_str(&format!(" stroke-linejoin=\"{}\"", stroke.join.svg()));
        if let Join::Miter(limit) = stroke.join {
            s.push_str(&format!(" stroke-miterlimit=\"{}\"", self.num(limit)));
        }
        s
    }

    /// Path elements written so far
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Complete document with the view box set to `bbox`
    pub fn finish(self, bbox: Option<BoundingBox>) -> String {
        let bbox = bbox.unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0));
        let sep = if self.pretty { "\n" } else { "" };
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{w}pt\" height=\"{h}pt\" viewBox=\"{x} {y} {w} {h}\">{sep}{body}</svg>\n",
            x = self.num(bbox.min.x),
            y = self.num(bbox.min.y),
            w = self.num(bbox.width()),
            h = self.num(bbox.height()),
            sep = sep,
            body = self.body,
        )
    }
}

impl OutlineSink for SvgWriter {
    fn begin(&mut self, style: &PathStyle) {
        self.data.clear();
        self.attributes = self.style_attributes(style);
    }

    fn move_to(&mut self, p: Point) {
        self.data.push_str("M ");
        self.point(p);
    }

    fn line_to(&mut self, p: Point) {
        self.data.push_str("L ");
        self.point(p);
    }

    fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.data.push_str("C ");
        self.point(ctrl1);
        self.point(ctrl2);
        self.point(to);
    }

    fn close_path(&mut self) {
        self.data.push_str("Z ");
    }

    fn end(&mut self) {
        if self.pretty {
            self.body.push_str("  ");
        }
        self.body
            .push_str(&format!("<path d=\"{}\"{}/>", self.data.trim_end(), self.attributes));
        if self.pretty {
            self.body.push('\n');
        }
        self.data.clear();
    }
}

/// Standalone SVG document for `shapes`
pub fn emit_svg<'a>(
    shapes: impl IntoIterator<Item = &'a Shape> + Clone,
    ctx: &DrawContext,
    precision: usize,
    pretty: bool,
) -> Result<String, ShapeError> {
    let bbox = drawing_bbox(shapes.clone(), ctx)?;
    let mut writer = SvgWriter::new(precision).pretty(pretty);
    for shape in shapes {
        emit_shape(shape, ctx, &mut writer)?;
    }
    Ok(writer.finish(bbox))
}
