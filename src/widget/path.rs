//! Glyph outline commands, their bounding box and SVG path serialisation

use std::fmt::Write as _;

/// One outline drawing instruction in absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    CurveTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    Close,
}

impl DrawCommand {
    pub fn tag(&self) -> char {
        match self {
            Self::MoveTo { .. } => 'M',
            Self::LineTo { .. } => 'L',
            Self::QuadTo { .. } => 'Q',
            Self::CurveTo { .. } => 'C',
            Self::Close => 'Z',
        }
    }
}

/// Axis aligned box `(x1, y1)`-`(x2, y2)` with `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Exact extent of an outline, curve extrema included.
    ///
    /// An outline without points yields the zero box.
    pub fn from_commands(commands: &[DrawCommand]) -> BoundingBox {
        let mut extent = Extent::default();
        let (mut start_x, mut start_y) = (0.0, 0.0);
        let (mut prev_x, mut prev_y) = (0.0, 0.0);

        for command in commands {
            match *command {
                DrawCommand::MoveTo { x, y } => {
                    extent.add_point(x, y);
                    (start_x, start_y) = (x, y);
                    (prev_x, prev_y) = (x, y);
                }
                DrawCommand::LineTo { x, y } => {
                    extent.add_point(x, y);
                    (prev_x, prev_y) = (x, y);
                }
                DrawCommand::QuadTo { x1, y1, x, y } => {
                    // Elevate to the equivalent cubic
                    let c1x = prev_x + 2.0 / 3.0 * (x1 - prev_x);
                    let c1y = prev_y + 2.0 / 3.0 * (y1 - prev_y);
                    let c2x = x + 2.0 / 3.0 * (x1 - x);
                    let c2y = y + 2.0 / 3.0 * (y1 - y);
                    extent.add_cubic([prev_x, prev_y], [c1x, c1y], [c2x, c2y], [x, y]);
                    (prev_x, prev_y) = (x, y);
                }
                DrawCommand::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    extent.add_cubic([prev_x, prev_y], [x1, y1], [x2, y2], [x, y]);
                    (prev_x, prev_y) = (x, y);
                }
                DrawCommand::Close => {
                    (prev_x, prev_y) = (start_x, start_y);
                }
            }
        }

        extent.finish()
    }
}

#[derive(Default)]
struct Extent {
    bounds: Option<BoundingBox>,
}

impl Extent {
    fn add_point(&mut self, x: f64, y: f64) {
        let point = BoundingBox {
            x1: x,
            y1: y,
            x2: x,
            y2: y,
        };
        self.bounds = Some(match self.bounds {
            Some(current) => current.union(&point),
            None => point,
        });
    }

    fn add_cubic(&mut self, p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], p3: [f64; 2]) {
        self.add_point(p0[0], p0[1]);
        self.add_point(p3[0], p3[1]);

        for axis in 0..2 {
            for t in cubic_extrema(p0[axis], p1[axis], p2[axis], p3[axis]) {
                let x = cubic_at(p0[0], p1[0], p2[0], p3[0], t);
                let y = cubic_at(p0[1], p1[1], p2[1], p3[1], t);
                self.add_point(x, y);
            }
        }
    }

    fn finish(self) -> BoundingBox {
        self.bounds.unwrap_or_default()
    }
}

/// Parameters in (0, 1) where the derivative of one cubic coordinate vanishes
fn cubic_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> Vec<f64> {
    let a = -3.0 * p0 + 9.0 * p1 - 9.0 * p2 + 3.0 * p3;
    let b = 6.0 * p0 - 12.0 * p1 + 6.0 * p2;
    let c = 3.0 * p1 - 3.0 * p0;

    let roots = if a.abs() < 1e-12 {
        if b.abs() < 1e-12 { vec![] } else { vec![-c / b] }
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            vec![]
        } else {
            let root = discriminant.sqrt();
            vec![(-b + root) / (2.0 * a), (-b - root) / (2.0 * a)]
        }
    };

    roots.into_iter().filter(|t| *t > 0.0 && *t < 1.0).collect()
}

fn cubic_at(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * mt * p0 + 3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t * p3
}

/// Serialises commands into SVG path data.
///
/// Each command is its tag, then control points as `x1 y1, ` (and `x2 y2, `
/// for cubics), then the endpoint as `x y`. Commands are joined without a
/// separator and every number is rounded to two decimals.
pub fn serialize_path(commands: &[DrawCommand]) -> String {
    let mut out = String::with_capacity(commands.len() * 16);

    for command in commands {
        out.push(command.tag());
        match *command {
            DrawCommand::MoveTo { x, y } | DrawCommand::LineTo { x, y } => {
                push_pair(&mut out, x, y);
            }
            DrawCommand::QuadTo { x1, y1, x, y } => {
                push_pair(&mut out, x1, y1);
                out.push_str(", ");
                push_pair(&mut out, x, y);
            }
            DrawCommand::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                push_pair(&mut out, x1, y1);
                out.push_str(", ");
                push_pair(&mut out, x2, y2);
                out.push_str(", ");
                push_pair(&mut out, x, y);
            }
            DrawCommand::Close => {}
        }
    }

    out
}

fn push_pair(out: &mut String, x: f64, y: f64) {
    let _ = write!(out, "{} {}", round2(x), round2(y));
}

/// Half-up rounding to two decimals; negative zero collapses to zero
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}
