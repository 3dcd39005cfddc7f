//! PGF picture output for LaTeX documents

use jdrkit_core::{BoundingBox, Point};

use super::{drawing_bbox, emit_shape, format_number, OutlineSink};
use crate::context::DrawContext;
use crate::error::ShapeError;
use crate::paint::Paint;
use crate::shape::Shape;
use crate::stroke::{Cap, Join, PathStyle};

pub struct PgfWriter {
    body: String,
    data: String,
    style: Option<PathStyle>,
    precision: usize,
}

impl PgfWriter {
    pub fn new(precision: usize) -> Self {
        Self {
            body: String::new(),
            data: String::new(),
            style: None,
            precision,
        }
    }

    fn num(&self, v: f64) -> String {
        format_number(v, self.precision)
    }

    fn point(&self, p: Point) -> String {
        format!("\\pgfpoint{{{}bp}}{{{}bp}}", self.num(p.x), self.num(-p.y))
    }

    fn rgb(&self, paint: &Paint) -> String {
        let rgb = paint.to_rgb();
        format!("{},{},{}", self.num(rgb.red), self.num(rgb.green), self.num(rgb.blue))
    }

    fn scope_settings(&self, style: &PathStyle, fill: bool, stroke: bool) -> String {
        let mut s = String::new();
        if stroke {
            let st = &style.stroke;
            s.push_str(&format!("\\color[rgb]{{{}}}\n", self.rgb(&style.line_paint)));
            s.push_str(&format!("\\pgfsetlinewidth{{{}bp}}\n", self.num(st.width.to_bp())));
            let dashes: String = st
                .dash
                .pattern
                .iter()
                .map(|v| format!("{{{}bp}}", self.num(*v)))
                .collect();
            s.push_str(&format!("\\pgfsetdash{{{}}}{{{}bp}}\n", dashes, self.num(st.dash.offset)));
            s.push_str(match st.cap {
                Cap::Butt => "\\pgfsetbuttcap\n",
                Cap::Round => "\\pgfsetroundcap\n",
                Cap::Square => "\\pgfsetrectcap\n",
            });
            match st.join {
                Join::Miter(limit) => {
                    s.push_str(&format!("\\pgfsetmiterjoin\n\\pgfsetmiterlimit{{{}}}\n", self.num(limit)))
                }
                Join::Round => s.push_str("\\pgfsetroundjoin\n"),
                Join::Bevel => s.push_str("\\pgfsetbeveljoin\n"),
            }
        }
        if fill {
            s.push_str(&format!(
                "\\definecolor{{jdrfill}}{{rgb}}{{{}}}\n\\pgfsetfillcolor{{jdrfill}}\n",
                self.rgb(&style.fill_paint)
            ));
            let alpha = style.fill_paint.alpha();
            if alpha < 1.0 {
                s.push_str(&format!("\\pgfsetfillopacity{{{}}}\n", self.num(alpha)));
            }
        }
        s
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn finish(self, bbox: Option<BoundingBox>) -> String {
        let mut doc = String::from("\\begin{pgfpicture}\n");
        if let Some(b) = bbox {
            doc.push_str(&format!(
                "\\pgfpathrectangle{{{}}}{{\\pgfpoint{{{}bp}}{{{}bp}}}}\n\\pgfusepath{{use as bounding box}}\n",
                self.point(Point::new(b.min.x, b.max.y)),
                self.num(b.width()),
                self.num(b.height())
            ));
        }
        doc.push_str(&self.body);
        doc.push_str("\\end{pgfpicture}\n");
        doc
    }
}

impl OutlineSink for PgfWriter {
    fn begin(&mut self, style: &PathStyle) {
        self.style = Some(style.clone());
        self.data.clear();
    }

    fn move_to(&mut self, p: Point) {
        let s = format!("\\pgfpathmoveto{{{}}}\n", self.point(p));
        self.data.push_str(&s);
    }

    fn line_to(&mut self, p: Point) {
        let s = format!("\\pgfpathlineto{{{}}}\n", self.point(p));
        self.data.push_str(&s);
    }

    fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let s = format!(
            "\\pgfpathcurveto{{{}}}{{{}}}{{{}}}\n",
            self.point(ctrl1),
            self.point(ctrl2),
            self.point(to)
        );
        self.data.push_str(&s);
    }

    fn close_path(&mut self) {
        self.data.push_str("\\pgfpathclose\n");
    }

    fn end(&mut self) {
        let Some(style) = self.style.take() else {
            return;
        };
        let fill = !style.fill_paint.is_transparent();
        let stroke = !style.line_paint.is_transparent() && style.stroke.width.to_bp() > 0.0;
        let actions: Vec<&str> = [(fill, "fill"), (stroke, "stroke")]
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();

        let mut s = String::from("\\begin{pgfscope}\n");
        s.push_str(&self.scope_settings(&style, fill, stroke));
        s.push_str(&self.data);
        s.push_str(&format!("\\pgfusepath{{{}}}\n", actions.join(",")));
        s.push_str("\\end{pgfscope}\n");
        self.body.push_str(&s);
        self.data.clear();
    }
}

/// `pgfpicture` environment drawing `shapes`
pub fn emit_pgf<'a>(
    shapes: impl IntoIterator<Item = &'a Shape> + Clone,
    ctx: &DrawContext,
    precision: usize,
) -> Result<String, ShapeError> {
    let bbox = drawing_bbox(shapes.clone(), ctx)?;
    let mut writer = PgfWriter::new(precision);
    for shape in shapes {
        emit_shape(shape, ctx, &mut writer)?;
    }
    Ok(writer.finish(bbox))
}
