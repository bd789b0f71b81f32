//! Small bridge between `kurbo` geometry and the `vello_cpu` render context.
//! `vello_cpu` re-exports its own `kurbo`, so paths built with the top-level
//! crate are converted element-by-element.

use kurbo::Shape;

use crate::foundation::core::Rgba8;

/// Flattening tolerance for shape-to-path conversion.
pub(crate) const PATH_TOLERANCE: f64 = 0.1;

pub(crate) fn to_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn to_cpu_point(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn to_cpu_path(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(to_cpu_point(p)),
            PathEl::LineTo(p) => out.line_to(to_cpu_point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(to_cpu_point(p1), to_cpu_point(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(to_cpu_point(p1), to_cpu_point(p2), to_cpu_point(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Fill a kurbo shape in canvas coordinates.
pub(crate) fn fill_shape(
    ctx: &mut vello_cpu::RenderContext,
    shape: &impl Shape,
    color: Rgba8,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(to_color(color));
    ctx.fill_path(&to_cpu_path(&shape.to_path(PATH_TOLERANCE)));
}

/// Stroke a kurbo shape by expanding the stroke to a fillable outline.
pub(crate) fn stroke_shape(
    ctx: &mut vello_cpu::RenderContext,
    shape: &impl Shape,
    width: f64,
    color: Rgba8,
) {
    let outline = kurbo::stroke(
        shape.path_elements(PATH_TOLERANCE),
        &kurbo::Stroke::new(width),
        &kurbo::StrokeOpts::default(),
        PATH_TOLERANCE,
    );
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(to_color(color));
    ctx.fill_path(&to_cpu_path(&outline));
}
