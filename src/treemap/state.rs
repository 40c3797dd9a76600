use eframe::egui::{Pos2, Vec2};
use tracing::debug;

use crate::cluster::{ClusterTree, MetricSelector};

use super::camera::{Camera, DEFAULT_ZOOM_SECONDS, PendingCommit, ZoomTransition};
use super::nav::{NavigationFrame, Navigator};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    DrillDown,
    DrillUp,
    Ignored,
}

/// Everything the treemap view mutates: committed navigation, the camera
/// and at most one in-flight transition.
#[derive(Debug)]
pub struct TreemapState {
    navigator: Navigator,
    camera: Camera,
    transition: Option<ZoomTransition>,
    duration: f64,
}

impl TreemapState {
    pub fn new(tree: ClusterTree, selector: MetricSelector, size: Vec2) -> Self {
        let navigator = Navigator::new(tree, selector, size);
        let camera = Camera::identity(navigator.current().layout.region);
        Self {
            navigator,
            camera,
            transition: None,
            duration: DEFAULT_ZOOM_SECONDS,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn transition(&self) -> Option<&ZoomTransition> {
        self.transition.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition_frames(&self) -> Option<(&NavigationFrame, &NavigationFrame)> {
        let transition = self.transition.as_ref()?;
        let incoming = match &transition.pending {
            PendingCommit::Push(frame) => frame,
            PendingCommit::Pop => self.navigator.parent()?,
        };
        Some((incoming, self.navigator.current()))
    }

    pub fn tile_at(&self, pos: Pos2) -> Option<usize> {
        let frame = self.navigator.current();
        frame
            .layout
            .tiles
            .iter()
            .zip(&frame.tiles)
            .position(|(rect, tile)| tile.drillable && rect.contains(pos))
    }

    /// Drillable tiles take the click; everything else falls through to the
    /// background, which drills up.
    pub fn click(&mut self, pos: Pos2, now: f64) -> ClickOutcome {
        if self.is_animating() {
            return ClickOutcome::Ignored;
        }

        match self.tile_at(pos) {
            Some(index) if self.request_drill_down(index, now) => ClickOutcome::DrillDown,
            Some(_) => ClickOutcome::Ignored,
            None if self.request_drill_up(now) => ClickOutcome::DrillUp,
            None => ClickOutcome::Ignored,
        }
    }

    pub fn request_drill_down(&mut self, tile_index: usize, now: f64) -> bool {
        if self.is_animating() {
            return false;
        }
        let Some(next) = self.navigator.plan_drill_down(tile_index) else {
            return false;
        };

        let clicked = next.entered_rect;
        debug!(tile_index, depth = next.depth, "starting zoom in");
        self.transition = Some(ZoomTransition::drill_down(
            self.navigator.current(),
            next,
            clicked,
            now,
            self.duration,
        ));
        self.tick(now);
        true
    }

    pub fn request_drill_up(&mut self, now: f64) -> bool {
        if self.is_animating() {
            return false;
        }
        let Some(parent) = self.navigator.parent() else {
            return false;
        };

        debug!(depth = parent.depth, "starting zoom out");
        self.transition = Some(ZoomTransition::drill_up(
            self.navigator.current(),
            parent,
            now,
            self.duration,
        ));
        self.tick(now);
        true
    }

    /// Advances the camera. Commits the pending navigation change once the
    /// transition has run its course. Returns whether an animation is still
    /// running.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(transition) = &self.transition else {
            return false;
        };

        let sample = transition.sample(now);
        if !sample.finished {
            self.camera.domain = sample.domain;
            return true;
        }

        self.finish_transition();
        false
    }

    fn finish_transition(&mut self) {
        let Some(transition) = self.transition.take() else {
            return;
        };

        match transition.pending {
            PendingCommit::Push(frame) => self.navigator.push(frame),
            PendingCommit::Pop => {
                self.navigator.drill_up();
            }
        }
        self.camera = Camera::identity(self.navigator.current().layout.region);
    }

    fn cancel_transition(&mut self) {
        if self.transition.take().is_some() {
            debug!("cancelled in-flight zoom");
        }
        self.camera = Camera::identity(self.navigator.current().layout.region);
    }

    /// Switches the measure. An in-flight transition is dropped without
    /// committing and navigation returns to the top level.
    pub fn set_selector(&mut self, selector: MetricSelector) -> bool {
        if self.navigator.selector() == &selector {
            return false;
        }
        self.cancel_transition();
        self.navigator.set_selector(selector);
        self.camera = Camera::identity(self.navigator.current().layout.region);
        true
    }

    pub fn resize(&mut self, size: Vec2) {
        if self.navigator.size() == size {
            return;
        }
        self.finish_transition();
        self.navigator.resize(size);
        self.camera = Camera::identity(self.navigator.current().layout.region);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::cluster::{ClusterNode, MetricKind};
    use crate::treemap::camera::ZoomDirection;

    fn node(depth: i32, name: &str, value: f64, children: Vec<ClusterNode>) -> ClusterNode {
        let mut node = ClusterNode::new(depth, name);
        node.measures.global = Some(value);
        node.children = children;
        node
    }

    fn state() -> TreemapState {
        let tree = ClusterTree::new(
            "All clusters",
            vec![
                node(
                    2,
                    "A",
                    75.0,
                    vec![
                        node(1, "A1", 50.0, vec![node(0, "A1a", 10.0, vec![])]),
                        node(1, "A2", 25.0, vec![]),
                    ],
                ),
                node(2, "B", 25.0, vec![]),
            ],
        );
        TreemapState::new(tree, MetricSelector::global(), vec2(400.0, 200.0)).with_duration(1.0)
    }

    fn center_of(state: &TreemapState, index: usize) -> Pos2 {
        state.navigator().current().layout.tiles[index].center()
    }

    #[test]
    fn click_on_drillable_tile_zooms_in_and_commits_at_the_end() {
        let mut state = state();
        let clicked = state.navigator().current().layout.tiles[0];

        assert_eq!(state.click(center_of(&state, 0), 10.0), ClickOutcome::DrillDown);
        assert_eq!(state.navigator().stack_len(), 1, "nothing committed mid-flight");
        let transition = state.transition().expect("transition running");
        assert_eq!(transition.direction, ZoomDirection::In);
        assert!(
            transition
                .incoming
                .tiles
                .iter()
                .all(|(_, rect)| clicked.expand(0.01).contains_rect(*rect))
        );

        assert!(state.tick(10.5));
        assert!(!state.camera().is_identity());

        assert!(!state.tick(11.0));
        assert_eq!(state.navigator().stack_len(), 2);
        assert_eq!(state.navigator().depth(), 1);
        assert!(state.camera().is_identity());
        assert!(state.transition().is_none());
    }

    #[test]
    fn swap_is_seamless_at_the_end_of_zoom_in() {
        let mut state = state();
        state.click(center_of(&state, 0), 0.0);

        let transition = state.transition().expect("transition running").clone();
        let sample = transition.sample(1.0);
        let camera = Camera {
            domain: sample.domain,
            range: state.navigator().current().layout.region,
        };
        assert!(sample.finished);
        assert_eq!(sample.incoming_opacity, 1.0);

        state.tick(1.0);
        let committed = &state.navigator().current().layout.tiles;
        for (index, overlay_rect) in &transition.incoming.tiles {
            let on_screen = camera.map_rect(*overlay_rect);
            let fresh = committed[*index];
            assert!((on_screen.min - fresh.min).length() < 1e-2);
            assert!((on_screen.max - fresh.max).length() < 1e-2);
        }
    }

    #[test]
    fn zoom_out_starts_seamlessly_and_fades_in_the_parent() {
        let mut state = state();
        state.click(center_of(&state, 0), 0.0);
        state.tick(1.0);

        let leaving = state.navigator().current().layout.tiles.clone();
        let region = state.navigator().current().layout.region;
        assert!(state.request_drill_up(2.0));
        let transition = state.transition().expect("transition running").clone();

        let start = transition.sample(2.0);
        assert!(!start.finished);
        assert_eq!(start.incoming_opacity, 0.0);
        assert_eq!(start.outgoing_opacity, 1.0);

        let camera = Camera {
            domain: start.domain,
            range: region,
        };
        assert_eq!(transition.outgoing.tiles.len(), leaving.len());
        for (index, overlay_rect) in &transition.outgoing.tiles {
            let on_screen = camera.map_rect(*overlay_rect);
            let shown = leaving[*index];
            assert!((on_screen.min - shown.min).length() < 1e-2);
            assert!((on_screen.max - shown.max).length() < 1e-2);
        }

        let middle = transition.sample(2.5);
        assert!(middle.incoming_opacity > 0.0 && middle.incoming_opacity < 1.0);
        assert!((middle.incoming_opacity + middle.outgoing_opacity - 1.0).abs() < 1e-6);

        let end = transition.sample(3.0);
        assert!(end.finished);
        assert_eq!(end.incoming_opacity, 1.0);
        assert_eq!(end.outgoing_opacity, 0.0);
        assert_eq!(end.domain, region);
    }

    #[test]
    fn transition_frames_pair_incoming_with_current() {
        let mut state = state();
        assert!(state.transition_frames().is_none());

        state.click(center_of(&state, 0), 0.0);
        let (incoming, outgoing) = state.transition_frames().expect("frames");
        assert_eq!(incoming.depth, 1);
        assert_eq!(outgoing.depth, 2);
        state.tick(1.0);

        state.request_drill_up(2.0);
        let (incoming, outgoing) = state.transition_frames().expect("frames");
        assert_eq!(incoming.depth, 2);
        assert_eq!(outgoing.depth, 1);
    }

    #[test]
    fn clicks_during_animation_are_ignored() {
        let mut state = state();
        state.click(center_of(&state, 0), 0.0);

        assert_eq!(state.click(center_of(&state, 0), 0.2), ClickOutcome::Ignored);
        assert!(!state.request_drill_down(0, 0.3));
        assert!(!state.request_drill_up(0.3));

        state.tick(5.0);
        assert_eq!(state.navigator().stack_len(), 2);
    }

    #[test]
    fn background_click_zooms_out_from_entered_rect() {
        let mut state = state();
        let entered = state.navigator().current().layout.tiles[0];
        state.click(center_of(&state, 0), 0.0);
        state.tick(1.0);

        let outcome = state.click(pos2(-50.0, -50.0), 2.0);
        assert_eq!(outcome, ClickOutcome::DrillUp);
        let transition = state.transition().expect("transition running");
        assert_eq!(transition.direction, ZoomDirection::Out);
        assert_eq!(transition.from_domain, entered);
        assert_eq!(state.camera().domain, entered);

        state.tick(3.0);
        assert_eq!(state.navigator().stack_len(), 1);
        assert!(state.camera().is_identity());
    }

    #[test]
    fn non_drillable_tiles_fall_through_to_the_background() {
        let mut state = state();
        state.click(center_of(&state, 0), 0.0);
        state.tick(1.0);

        // A2 has no children, so its tile is not a click target.
        let a2 = state
            .navigator()
            .current()
            .tiles
            .iter()
            .position(|tile| tile.label == "A2")
            .expect("A2 tile");
        assert_eq!(state.tile_at(center_of(&state, a2)), None);
        assert_eq!(state.click(center_of(&state, a2), 2.0), ClickOutcome::DrillUp);
    }

    #[test]
    fn background_click_at_root_does_nothing() {
        let mut state = state();
        // B is not drillable: falls through to a drill-up that has nowhere to go.
        assert_eq!(state.click(center_of(&state, 1), 0.0), ClickOutcome::Ignored);
        assert!(!state.is_animating());
    }

    #[test]
    fn selector_change_cancels_in_flight_zoom() {
        let mut state = state();
        state.click(center_of(&state, 0), 0.0);
        state.tick(0.4);

        let changed = state.set_selector(MetricSelector::new(MetricKind::StateUs, Some("tx")));
        assert!(changed);
        assert!(state.transition().is_none());
        assert!(state.camera().is_identity());
        assert_eq!(state.navigator().stack_len(), 1);
        assert_eq!(state.navigator().depth(), 2);

        assert!(!state.tick(2.0));
        assert_eq!(state.navigator().stack_len(), 1, "cancelled frame never lands");
    }

    #[test]
    fn resize_mid_flight_commits_then_relayouts() {
        let mut state = state();
        state.click(center_of(&state, 0), 0.0);
        state.resize(vec2(300.0, 300.0));

        assert!(state.transition().is_none());
        assert_eq!(state.navigator().stack_len(), 2);
        assert_eq!(state.camera().range.size(), vec2(300.0, 300.0));
    }

    #[test]
    fn zero_duration_commits_immediately() {
        let mut state = state().with_duration(0.0);
        assert_eq!(state.click(center_of(&state, 0), 0.0), ClickOutcome::DrillDown);
        assert!(!state.is_animating());
        assert_eq!(state.navigator().stack_len(), 2);
    }
}
