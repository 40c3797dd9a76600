use eframe::egui::{Pos2, Rect, pos2};

pub const HEADER_HEIGHT: f32 = 24.0;
pub const TILE_PADDING: f32 = 1.0;

const EDGE_EPSILON: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameLayout {
    pub region: Rect,
    pub header: Rect,
    pub tiles: Vec<Rect>,
}

impl FrameLayout {
    pub fn empty(width: f32, height: f32) -> Self {
        let (width, height) = (sanitize_extent(width), sanitize_extent(height));
        Self {
            region: Rect::from_min_max(Pos2::ZERO, pos2(width, height)),
            header: Rect::from_min_max(pos2(0.0, -HEADER_HEIGHT), pos2(width, 0.0)),
            tiles: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Bounds {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Bounds {
    fn width(self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    fn height(self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Packs `values` into a `width × height` region with a squarified tiling.
///
/// Larger values are placed first (ties keep input order) and every tile's
/// area is proportional to its share of the total. Values that are not
/// positive and finite get an empty rect at the region origin.
pub fn pack(values: &[f64], width: f32, height: f32) -> FrameLayout {
    let mut layout = FrameLayout::empty(width, height);
    layout.tiles = vec![Rect::from_min_max(Pos2::ZERO, Pos2::ZERO); values.len()];
    if values.is_empty() {
        return layout;
    }

    let weights = values
        .iter()
        .map(|&value| if value.is_finite() && value > 0.0 { value } else { 0.0 })
        .collect::<Vec<_>>();
    let total = weights.iter().sum::<f64>();

    let region = Bounds {
        x0: 0.0,
        y0: 0.0,
        x1: f64::from(layout.region.width()),
        y1: f64::from(layout.region.height()),
    };
    let region_area = region.width() * region.height();
    if !(total > 0.0 && total.is_finite()) || region_area <= 0.0 {
        return layout;
    }

    let mut order = (0..weights.len())
        .filter(|&index| weights[index] > 0.0)
        .collect::<Vec<_>>();
    order.sort_by(|a, b| weights[*b].total_cmp(&weights[*a]));

    let scale = region_area / total;
    let areas = order
        .iter()
        .map(|&index| weights[index] * scale)
        .collect::<Vec<_>>();

    let mut raw = vec![region; weights.len()];
    squarify(&order, &areas, region, &mut raw);

    for &index in &order {
        layout.tiles[index] = pad_inner(raw[index], region);
    }

    layout
}

fn worst_ratio(sum: f64, min: f64, max: f64, side: f64) -> f64 {
    if sum <= 0.0 || min <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

fn squarify(order: &[usize], areas: &[f64], region: Bounds, out: &mut [Bounds]) {
    let mut rest = region;
    let mut start = 0;

    while start < areas.len() {
        let side = rest.width().min(rest.height());

        let mut end = start + 1;
        let mut row_sum = areas[start];
        let mut row_min = areas[start];
        let mut row_max = areas[start];
        let mut best = worst_ratio(row_sum, row_min, row_max, side);

        while end < areas.len() {
            let area = areas[end];
            let sum = row_sum + area;
            let min = row_min.min(area);
            let max = row_max.max(area);
            let ratio = worst_ratio(sum, min, max, side);
            if ratio > best {
                break;
            }
            row_sum = sum;
            row_min = min;
            row_max = max;
            best = ratio;
            end += 1;
        }

        let last_row = end == areas.len();
        rest = lay_row(
            &order[start..end],
            &areas[start..end],
            row_sum,
            rest,
            last_row,
            out,
        );
        start = end;
    }
}

/// Lays one row along the shorter side of `rest` and returns what is left.
/// The last row and the last tile of each row absorb float drift so the
/// tiles cover the region exactly.
fn lay_row(
    indices: &[usize],
    areas: &[f64],
    row_sum: f64,
    rest: Bounds,
    last_row: bool,
    out: &mut [Bounds],
) -> Bounds {
    let count = indices.len();

    if rest.width() >= rest.height() {
        let thickness = if last_row || rest.height() <= 0.0 {
            rest.width()
        } else {
            (row_sum / rest.height()).min(rest.width())
        };
        let x1 = rest.x0 + thickness;
        let mut y = rest.y0;
        for (position, (&index, &area)) in indices.iter().zip(areas).enumerate() {
            let next_y = if position + 1 == count || thickness <= 0.0 {
                rest.y1
            } else {
                (y + area / thickness).min(rest.y1)
            };
            out[index] = Bounds {
                x0: rest.x0,
                y0: y,
                x1,
                y1: next_y,
            };
            y = next_y;
        }
        Bounds { x0: x1, ..rest }
    } else {
        let thickness = if last_row || rest.width() <= 0.0 {
            rest.height()
        } else {
            (row_sum / rest.width()).min(rest.height())
        };
        let y1 = rest.y0 + thickness;
        let mut x = rest.x0;
        for (position, (&index, &area)) in indices.iter().zip(areas).enumerate() {
            let next_x = if position + 1 == count || thickness <= 0.0 {
                rest.x1
            } else {
                (x + area / thickness).min(rest.x1)
            };
            out[index] = Bounds {
                x0: x,
                y0: rest.y0,
                x1: next_x,
                y1,
            };
            x = next_x;
        }
        Bounds { y0: y1, ..rest }
    }
}

fn pad_inner(tile: Bounds, region: Bounds) -> Rect {
    let half = f64::from(TILE_PADDING) / 2.0;
    let inset = |edge: f64, outer: f64| (edge - outer).abs() > EDGE_EPSILON;

    let mut x0 = if inset(tile.x0, region.x0) { tile.x0 + half } else { tile.x0 };
    let mut x1 = if inset(tile.x1, region.x1) { tile.x1 - half } else { tile.x1 };
    let mut y0 = if inset(tile.y0, region.y0) { tile.y0 + half } else { tile.y0 };
    let mut y1 = if inset(tile.y1, region.y1) { tile.y1 - half } else { tile.y1 };

    if x1 < x0 {
        let mid = (tile.x0 + tile.x1) / 2.0;
        (x0, x1) = (mid, mid);
    }
    if y1 < y0 {
        let mid = (tile.y0 + tile.y1) / 2.0;
        (y0, y1) = (mid, mid);
    }

    Rect::from_min_max(pos2(x0 as f32, y0 as f32), pos2(x1 as f32, y1 as f32))
}
