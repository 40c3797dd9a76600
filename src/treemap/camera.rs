use eframe::egui::{Pos2, Rect, lerp, pos2};

use super::nav::NavigationFrame;

pub const DEFAULT_ZOOM_SECONDS: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub domain: Rect,
    pub range: Rect,
}

impl Camera {
    pub fn identity(region: Rect) -> Self {
        Self {
            domain: region,
            range: region,
        }
    }

    #[cfg(test)]
    pub fn is_identity(&self) -> bool {
        self.domain == self.range
    }

    pub fn map_pos(&self, pos: Pos2) -> Pos2 {
        pos2(
            map_axis(pos.x, self.domain.min.x, self.domain.max.x, self.range.min.x, self.range.max.x),
            map_axis(pos.y, self.domain.min.y, self.domain.max.y, self.range.min.y, self.range.max.y),
        )
    }

    pub fn map_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.map_pos(rect.min), self.map_pos(rect.max))
    }
}

fn map_axis(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let span = from_max - from_min;
    if span.abs() <= f32::EPSILON {
        return to_min;
    }
    to_min + (value - from_min) * (to_max - to_min) / span
}

pub fn rescale_into(rect: Rect, region: Rect, target: Rect) -> Rect {
    Camera {
        domain: region,
        range: target,
    }
    .map_rect(rect)
}

pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn lerp_rect(from: Rect, to: Rect, t: f32) -> Rect {
    Rect::from_min_max(
        pos2(lerp(from.min.x..=to.min.x, t), lerp(from.min.y..=to.min.y, t)),
        pos2(lerp(from.max.x..=to.max.x, t), lerp(from.max.y..=to.max.y, t)),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Clone, Debug)]
pub enum PendingCommit {
    Push(NavigationFrame),
    Pop,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionLayer {
    pub tiles: Vec<(usize, Rect)>,
}

impl TransitionLayer {
    pub fn full_scale(frame: &NavigationFrame) -> Self {
        Self {
            tiles: frame.layout.tiles.iter().copied().enumerate().collect(),
        }
    }

    pub fn rescaled(frame: &NavigationFrame, target: Rect) -> Self {
        let region = frame.layout.region;
        Self {
            tiles: frame
                .layout
                .tiles
                .iter()
                .map(|rect| rescale_into(*rect, region, target))
                .enumerate()
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSample {
    pub domain: Rect,
    pub incoming_opacity: f32,
    pub outgoing_opacity: f32,
    pub finished: bool,
}

/// An in-flight drill animation. Nothing is committed to the navigation
/// stack until `pending` is taken at the end.
#[derive(Clone, Debug)]
pub struct ZoomTransition {
    pub direction: ZoomDirection,
    pub started_at: f64,
    pub duration: f64,
    pub from_domain: Rect,
    pub to_domain: Rect,
    pub incoming: TransitionLayer,
    pub outgoing: TransitionLayer,
    pub pending: PendingCommit,
}

impl ZoomTransition {
    /// Zoom into `clicked`: the current frame stays at full scale while the
    /// next frame fades in squeezed into the clicked tile.
    pub fn drill_down(
        current: &NavigationFrame,
        next: NavigationFrame,
        clicked: Rect,
        started_at: f64,
        duration: f64,
    ) -> Self {
        let region = current.layout.region;
        Self {
            direction: ZoomDirection::In,
            started_at,
            duration,
            from_domain: region,
            to_domain: clicked,
            incoming: TransitionLayer::rescaled(&next, clicked),
            outgoing: TransitionLayer::full_scale(current),
            pending: PendingCommit::Push(next),
        }
    }

    /// Zoom back out of `leaving.entered_rect`: the leaving frame shrinks
    /// into the tile it was entered from while the parent fades in.
    pub fn drill_up(
        leaving: &NavigationFrame,
        parent: &NavigationFrame,
        started_at: f64,
        duration: f64,
    ) -> Self {
        Self {
            direction: ZoomDirection::Out,
            started_at,
            duration,
            from_domain: leaving.entered_rect,
            to_domain: parent.layout.region,
            incoming: TransitionLayer::full_scale(parent),
            outgoing: TransitionLayer::rescaled(leaving, leaving.entered_rect),
            pending: PendingCommit::Pop,
        }
    }

    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn sample(&self, now: f64) -> TransitionSample {
        let progress = self.progress(now);
        let eased = ease_cubic_in_out(progress);
        TransitionSample {
            domain: lerp_rect(self.from_domain, self.to_domain, eased),
            incoming_opacity: eased,
            outgoing_opacity: 1.0 - eased,
            finished: progress >= 1.0,
        }
    }
}
