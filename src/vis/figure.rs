use crate::vis::palette::Color;

/// One labelled line on an axis
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub label: String,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

/// Plot area holding curves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    pub x_label: String,
    pub y_label: String,
    pub curves: Vec<Curve>,
}

impl Axis {
    pub fn add_curve(&mut self, curve: Curve) {
        self.curves.push(curve);
    }

    pub fn curve(&self, label: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.label == label)
    }

    /// `((x_min, x_max), (y_min, y_max))` over every finite point
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self
            .curves
            .iter()
            .flat_map(|c| c.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        let &(x0, y0) = points.next()?;
        Some(points.fold(((x0, x0), (y0, y0)), |((xl, xh), (yl, yh)), &(x, y)| {
            ((xl.min(x), xh.max(x)), (yl.min(y), yh.max(y)))
        }))
    }
}

/// A single-axis chart, built up explicitly and passed between plotting calls
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    pub axis: Axis,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Figure {
            title: title.into(),
            ..Figure::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for Figure {
    fn default() -> Self {
        Figure {
            title: String::new(),
            width: 1000,
            height: 600,
            axis: Axis::default(),
        }
    }
}
