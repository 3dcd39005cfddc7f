//! Encapsulated PostScript output
//!
//! PostScript's y axis points up, so every y coordinate is negated.

use jdrkit_core::{BoundingBox, Point};

use super::{drawing_bbox, emit_shape, format_number, OutlineSink};
use crate::context::DrawContext;
use crate::error::ShapeError;
use crate::paint::Paint;
use crate::shape::Shape;
use crate::stroke::{Join, PathStyle};

pub struct EpsWriter {
    body: String,
    style: Option<PathStyle>,
    precision: usize,
}

impl EpsWriter {
    pub fn new(precision: usize) -> Self {
        Self {
            body: String::new(),
            style: None,
            precision,
        }
    }

    fn num(&self, v: f64) -> String {
        format_number(v, self.precision)
    }

    fn point(&self, p: Point) -> String {
        format!("{} {}", self.num(p.x), self.num(-p.y))
    }

    fn colour(&self, paint: &Paint) -> String {
        match paint {
            Paint::Grey(c) => format!("{} setgray", self.num(c.grey)),
            Paint::Cmyk(c) => format!(
                "{} {} {} {} setcmykcolor",
                self.num(c.cyan),
                self.num(c.magenta),
                self.num(c.yellow),
                self.num(c.black)
            ),
            _ => {
                let rgb = paint.to_rgb();
                format!(
                    "{} {} {} setrgbcolor",
                    self.num(rgb.red),
                    self.num(rgb.green),
                    self.num(rgb.blue)
                )
            }
        }
    }

    fn stroke_settings(&self, style: &PathStyle) -> String {
        let stroke = &style.stroke;
        let mut s = format!("{} setlinewidth\n", self.num(stroke.width.to_bp()));
        s.push_str(&format!("{} setlinecap\n", stroke.cap.code()));
        s.push_str(&format!("{} setlinejoin\n", stroke.join.code()));
        if let Join::Miter(limit) = stroke.join {
            s.push_str(&format!("{} setmiterlimit\n", self.num(limit)));
        }
        let dashes: Vec<String> = stroke.dash.pattern.iter().map(|v| self.num(*v)).collect();
        s.push_str(&format!("[{}] {} setdash\n", dashes.join(" "), self.num(stroke.dash.offset)));
        s
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn finish(self, bbox: Option<BoundingBox>) -> String {
        let bbox = bbox.unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0));
        // flipped: PostScript's lower edge is the storage maximum y
        let (llx, lly, urx, ury) = (bbox.min.x, -bbox.max.y, bbox.max.x, -bbox.min.y);
        format!(
            "%!PS-Adobe-3.0 EPSF-3.0\n\
             %%BoundingBox: {} {} {} {}\n\
             %%HiResBoundingBox: {} {} {} {}\n\
             %%Creator: jdrkit\n\
             %%EndComments\n\
             {}showpage\n\
             %%EOF\n",
            llx.floor(),
            lly.floor(),
            urx.ceil(),
            ury.ceil(),
            self.num(llx),
            self.num(lly),
            self.num(urx),
            self.num(ury),
            self.body
        )
    }
}

impl OutlineSink for EpsWriter {
    fn begin(&mut self, style: &PathStyle) {
        self.style = Some(style.clone());
        self.body.push_str("newpath\n");
    }

    fn move_to(&mut self, p: Point) {
        let s = format!("{} moveto\n", self.point(p));
        self.body.push_str(&s);
    }

    fn line_to(&mut self, p: Point) {
        let s = format!("{} lineto\n", self.point(p));
        self.body.push_str(&s);
    }

    fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let s = format!("{} {} {} curveto\n", self.point(ctrl1), self.point(ctrl2), self.point(to));
        self.body.push_str(&s);
    }

    fn close_path(&mut self) {
        self.body.push_str("closepath\n");
    }

    fn end(&mut self) {
        let Some(style) = self.style.take() else {
            return;
        };
        let fill = !style.fill_paint.is_transparent();
        let stroke = !style.line_paint.is_transparent() && style.stroke.width.to_bp() > 0.0;
        let mut s = String::new();
        if fill {
            s.push_str(&format!("gsave {} fill grestore\n", self.colour(&style.fill_paint)));
        }
        if stroke {
            s.push_str("gsave\n");
            s.push_str(&self.stroke_settings(&style));
            s.push_str(&format!("{} stroke\ngrestore\n", self.colour(&style.line_paint)));
        }
        s.push_str("newpath\n");
        self.body.push_str(&s);
    }
}

/// Standalone EPS document for `shapes`
pub fn emit_eps<'a>(
    shapes: impl IntoIterator<Item = &'a Shape> + Clone,
    ctx: &DrawContext,
    precision: usize,
) -> Result<String, ShapeError> {
    let bbox = drawing_bbox(shapes.clone(), ctx)?;
    let mut writer = EpsWriter::new(precision);
    for shape in shapes {
        emit_shape(shape, ctx, &mut writer)?;
    }
    Ok(writer.finish(bbox))
}
