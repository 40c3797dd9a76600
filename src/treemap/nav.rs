use eframe::egui::{Rect, Vec2};
use tracing::debug;

use crate::cluster::{ClusterTree, MetricSelector, NodePath, TOP_DEPTH};

use super::project::{ProjectedTile, project};
use super::squarify::{FrameLayout, pack};

pub const INITIAL_DEPTH: i32 = TOP_DEPTH;

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationFrame {
    pub focus: NodePath,
    pub depth: i32,
    pub tiles: Vec<ProjectedTile>,
    pub layout: FrameLayout,
    /// Rect of the parent-frame tile this frame was entered from, in the
    /// parent's layout space. The full region for the root frame.
    pub entered_rect: Rect,
    pub entered_from: Option<usize>,
}

#[derive(Debug)]
pub struct Navigator {
    tree: ClusterTree,
    selector: MetricSelector,
    size: Vec2,
    stack: Vec<NavigationFrame>,
}

impl Navigator {
    pub fn new(tree: ClusterTree, selector: MetricSelector, size: Vec2) -> Self {
        let mut navigator = Self {
            tree,
            selector,
            size,
            stack: Vec::new(),
        };
        navigator.reset();
        navigator
    }

    fn build_frame(
        &self,
        focus: NodePath,
        depth: i32,
        entered: Option<(usize, Rect)>,
    ) -> NavigationFrame {
        let tiles = self
            .tree
            .resolve(&focus)
            .map(|node| project(node, &focus, depth, &self.selector))
            .unwrap_or_default();
        let values = tiles.iter().map(|tile| tile.value).collect::<Vec<_>>();
        let layout = pack(&values, self.size.x, self.size.y);
        let (entered_from, entered_rect) = match entered {
            Some((index, rect)) => (Some(index), rect),
            None => (None, layout.region),
        };

        NavigationFrame {
            focus,
            depth,
            tiles,
            layout,
            entered_rect,
            entered_from,
        }
    }

    fn reset(&mut self) {
        let root = self.build_frame(Vec::new(), INITIAL_DEPTH, None);
        self.stack.clear();
        self.stack.push(root);
    }

    pub fn tree(&self) -> &ClusterTree {
        &self.tree
    }

    pub fn selector(&self) -> &MetricSelector {
        &self.selector
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn current(&self) -> &NavigationFrame {
        // The stack always holds the root frame.
        &self.stack[self.stack.len() - 1]
    }

    pub fn parent(&self) -> Option<&NavigationFrame> {
        self.stack.len().checked_sub(2).map(|index| &self.stack[index])
    }

    pub fn depth(&self) -> i32 {
        self.current().depth
    }

    #[cfg(test)]
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn breadcrumb(&self) -> Vec<&str> {
        self.tree.ancestor_names(&self.current().focus)
    }

    pub fn plan_drill_down(&self, tile_index: usize) -> Option<NavigationFrame> {
        let current = self.current();
        if current.depth <= 0 {
            return None;
        }
        let tile = current.tiles.get(tile_index).filter(|tile| tile.drillable)?;
        let clicked = *current.layout.tiles.get(tile_index)?;

        Some(self.build_frame(
            tile.node.clone(),
            current.depth - 1,
            Some((tile_index, clicked)),
        ))
    }

    pub fn push(&mut self, frame: NavigationFrame) {
        debug!(depth = frame.depth, tiles = frame.tiles.len(), "entered frame");
        self.stack.push(frame);
    }

    #[cfg(test)]
    pub fn drill_down(&mut self, tile_index: usize) -> bool {
        match self.plan_drill_down(tile_index) {
            Some(frame) => {
                self.push(frame);
                true
            }
            None => false,
        }
    }

    pub fn can_drill_up(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn drill_up(&mut self) -> bool {
        if !self.can_drill_up() {
            return false;
        }
        self.stack.pop();
        debug!(depth = self.depth(), "left frame");
        true
    }

    /// Switches the measure. Any drill position is dropped since values
    /// differ per selector.
    pub fn set_selector(&mut self, selector: MetricSelector) -> bool {
        if self.selector == selector {
            return false;
        }
        debug!(selector = %selector.describe(), "selector changed, resetting navigation");
        self.selector = selector;
        self.reset();
        true
    }

    /// Re-packs every frame for a new tile region size and re-derives the
    /// entered rects from the re-packed parents.
    pub fn resize(&mut self, size: Vec2) {
        if self.size == size {
            return;
        }
        self.size = size;

        for index in 0..self.stack.len() {
            let values = self.stack[index]
                .tiles
                .iter()
                .map(|tile| tile.value)
                .collect::<Vec<_>>();
            let layout = pack(&values, size.x, size.y);

            let entered_rect = match (index.checked_sub(1), self.stack[index].entered_from) {
                (Some(parent), Some(tile_index)) => self.stack[parent]
                    .layout
                    .tiles
                    .get(tile_index)
                    .copied()
                    .unwrap_or(layout.region),
                _ => layout.region,
            };

            let frame = &mut self.stack[index];
            frame.layout = layout;
            frame.entered_rect = entered_rect;
        }
    }
}
