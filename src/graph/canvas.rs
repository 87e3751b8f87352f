/// Canvas root: owns the viewport, routes and draws connections, and turns
/// pointer/keyboard input into viewport moves and graph-model callbacks.
use crate::core::config;
use crate::core::model::{CanvasHost, GraphModel};
use crate::core::types::*;
use crate::graph::connection_renderer::{ConnectionHit, ConnectionRenderer, EdgeAction, InteractionState};
use crate::graph::connection_router::route_connection;
use crate::graph::gesture::{EventDisposition, GestureState, InputGestureHandler};
use crate::graph::graph_node::GraphNodeRenderer;
use crate::graph::path_measure::{FlatteningMeasurer, PathMeasurer};
use crate::graph::transform::Viewport;
use crate::graph::viewport::ViewportController;
use crate::platform::renderer::Renderer;
use crate::store::preference_store::PreferenceStore;
use std::collections::{HashMap, HashSet};

struct NodeDrag {
    node_id: NodeId,
    grab_offset: Vec2,
}

pub struct WorkflowCanvas<G: GraphModel, H: CanvasHost> {
    graph: G,
    host: H,

    viewport: ViewportController,
    gestures: InputGestureHandler,

    // Connections
    measurer: Box<dyn PathMeasurer>,
    connection_renderers: HashMap<ConnectionId, ConnectionRenderer>,
    unroutable: HashSet<ConnectionId>,
    hovered_connection: Option<(ConnectionId, ConnectionHit)>,
    selected_connection: Option<ConnectionId>,

    // Nodes
    node_renderer: GraphNodeRenderer,
    hovered_node: Option<NodeId>,
    node_drag: Option<NodeDrag>,

    show_navigation_hint: bool,

    // Timing
    time_sec: f64,
}

impl<G: GraphModel, H: CanvasHost> WorkflowCanvas<G, H> {
    /// Mount a canvas. The navigation hint is shown only if the preferences
    /// say the user has not seen it; showing it marks it seen.
    pub fn new(graph: G, host: H, preferences: &mut PreferenceStore) -> Self {
        let show_navigation_hint = !preferences.navigation_hint_seen();
        if show_navigation_hint {
            log::info!("showing navigation hint");
            preferences.mark_navigation_hint_seen();
        }

        Self {
            graph,
            host,
            viewport: ViewportController::new(),
            gestures: InputGestureHandler::new(),
            measurer: Box::new(FlatteningMeasurer::new()),
            connection_renderers: HashMap::new(),
            unroutable: HashSet::new(),
            hovered_connection: None,
            selected_connection: None,
            node_renderer: GraphNodeRenderer::new(),
            hovered_node: None,
            node_drag: None,
            show_navigation_hint,
            time_sec: 0.0,
        }
    }

    /// Swap in a backend-specific path measurer.
    pub fn with_measurer(mut self, measurer: Box<dyn PathMeasurer>) -> Self {
        self.measurer = measurer;
        self.connection_renderers.clear();
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ===== Viewport capabilities =====

    pub fn set_container(&mut self, origin: Vec2, size: Vec2) {
        self.viewport.set_container(origin, size);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    pub fn viewport_controller(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_controller_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn zoom_level(&self) -> u32 {
        self.viewport.zoom_level()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.viewport.screen_to_world(screen)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.viewport.world_to_screen(world)
    }

    pub fn zoom_to_area(&mut self, area: Rect, now_ms: f64) {
        self.viewport.zoom_to_area(area, now_ms);
    }

    pub fn pan_to_point(&mut self, world: Vec2, now_ms: f64) {
        self.viewport.pan_to_point(world, now_ms);
    }

    /// Frame every node.
    pub fn zoom_to_fit(&mut self, now_ms: f64) {
        let Some(bounds) = self
            .graph
            .nodes()
            .iter()
            .map(Node::bounds)
            .reduce(|a, b| a.union(&b))
        else {
            return;
        };
        self.viewport.zoom_to_area(bounds, now_ms);
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    // ===== Navigation hint =====

    pub fn show_navigation_hint(&self) -> bool {
        self.show_navigation_hint
    }

    pub fn dismiss_navigation_hint(&mut self) {
        self.show_navigation_hint = false;
    }

    // ===== Connection capabilities =====

    pub fn selected_connection(&self) -> Option<&ConnectionId> {
        self.selected_connection.as_ref()
    }

    pub fn connection_state(&self, id: &ConnectionId) -> Option<InteractionState> {
        self.connection_renderers.get(id).map(|r| r.interaction_state())
    }

    pub fn connection_renderer(&self, id: &ConnectionId) -> Option<&ConnectionRenderer> {
        self.connection_renderers.get(id)
    }

    /// Ask the host to open the insert-node panel at the connection's midpoint.
    pub fn open_node_panel_for_connection(&mut self, id: &ConnectionId) {
        let Some(r) = self.connection_renderers.get(id) else {
            log::warn!("open_node_panel_for_connection: unknown connection {}", id);
            return;
        };
        let screen = self.viewport.world_to_screen(r.label_anchor());
        self.host.open_node_panel_for_connection(id, screen);
    }

    pub fn commit_label_edit(&mut self, id: &ConnectionId, text: &str) {
        self.graph.update_connection_label(id, text);
        if let Some(r) = self.connection_renderers.get_mut(id) {
            r.finish_label_edit();
        }
    }

    pub fn cancel_label_edit(&mut self, id: &ConnectionId) {
        if let Some(r) = self.connection_renderers.get_mut(id) {
            r.finish_label_edit();
        }
    }

    pub fn remove_connection(&mut self, id: &ConnectionId) {
        log::info!("removing connection {}", id);
        self.graph.remove_connection(id);
        self.connection_renderers.remove(id);
        if self.selected_connection.as_ref() == Some(id) {
            self.selected_connection = None;
        }
        if self.hovered_connection.as_ref().map(|(h, _)| h) == Some(id) {
            self.hovered_connection = None;
        }
    }

    // ===== Input =====

    pub fn handle_key(&mut self, e: &KeyEvent, now_ms: f64) -> EventDisposition {
        if self.gestures.handle_key(e, &mut self.viewport, now_ms) == EventDisposition::Consumed {
            return EventDisposition::Consumed;
        }
        if !e.pressed {
            return EventDisposition::Ignored;
        }

        match e.key {
            Key::Delete | Key::Backspace => match self.selected_connection.clone() {
                Some(id) => self.remove_connection(&id),
                None => return EventDisposition::Ignored,
            },
            Key::Escape => {
                if self.show_navigation_hint {
                    self.dismiss_navigation_hint();
                } else {
                    self.select_connection(None);
                }
            }
            Key::Digit1 if e.shift => self.zoom_to_fit(now_ms),
            _ => return EventDisposition::Ignored,
        }
        EventDisposition::Consumed
    }

    pub fn handle_mouse(&mut self, e: &MouseEvent, now_ms: f64) -> EventDisposition {
        // Wheel zoom runs alongside everything; a running pan owns the
        // pointer until its button comes up.
        if e.wheel_delta_y != 0.0 || self.gestures.state() == GestureState::DragPanning {
            self.gestures.handle_mouse(e, &mut self.viewport, now_ms);
            if e.released && e.button == BUTTON_LEFT {
                self.node_drag = None;
            }
            return EventDisposition::Consumed;
        }

        let screen = e.position();
        let world = self.screen_to_world(screen);

        if let Some(drag) = &self.node_drag {
            if e.released {
                if e.button == BUTTON_LEFT {
                    self.node_drag = None;
                }
            } else if e.dragging {
                let id = drag.node_id.clone();
                let position = world - drag.grab_offset;
                self.graph.move_node(&id, position);
            }
            return EventDisposition::Consumed;
        }

        if self.gestures.handle_mouse(e, &mut self.viewport, now_ms) == EventDisposition::Consumed {
            return EventDisposition::Consumed;
        }

        if e.pressed && e.button == BUTTON_LEFT {
            return self.handle_press(e, screen, world, now_ms);
        }

        if !e.pressed && !e.released {
            self.update_hover(world, now_ms);
        }
        EventDisposition::Ignored
    }

    /// Per-frame update: advance animations, re-route connections and fire
    /// per-connection timers.
    pub fn update(&mut self, now_ms: f64) {
        self.time_sec = now_ms / 1000.0;

        self.viewport.tick(now_ms);
        self.gestures.update(&self.viewport);
        self.sync_connections(now_ms);

        for r in self.connection_renderers.values_mut() {
            r.update(now_ms, self.measurer.as_ref());
        }
    }

    pub fn render(&self, renderer: &dyn Renderer) {
        let vp = self.viewport.viewport();
        let origin = self.viewport.container();
        renderer.push_transform(Vec2::new(vp.x + origin.x, vp.y + origin.y), vp.zoom);

        // Connections behind nodes
        for conn in self.graph.connections() {
            if let Some(r) = self.connection_renderers.get(&conn.id) {
                r.render(renderer, conn, self.time_sec);
            }
        }

        for node in self.graph.nodes() {
            let hovered = self.hovered_node.as_ref() == Some(&node.id);
            self.node_renderer.render(renderer, node, hovered);
        }

        renderer.pop_transform();

        self.render_overlay(renderer, origin);
    }

    // ===== Private helpers =====

    fn handle_press(&mut self, e: &MouseEvent, screen: Vec2, world: Vec2, now_ms: f64) -> EventDisposition {
        if let Some((id, hit)) = self.hit_connection(world) {
            match hit {
                ConnectionHit::Action(EdgeAction::AddNode) => self.open_node_panel_for_connection(&id),
                ConnectionHit::Action(EdgeAction::Delete) => self.remove_connection(&id),
                ConnectionHit::Path if e.click_count >= 2 => {
                    let request = self
                        .connection_renderers
                        .get_mut(&id)
                        .and_then(|r| r.request_label_edit(screen, now_ms));
                    if let Some(request) = request {
                        log::debug!("label edit requested for {}", id);
                        self.host.request_label_edit(request);
                    }
                }
                ConnectionHit::Path => self.select_connection(Some(id)),
            }
            return EventDisposition::Consumed;
        }

        if let Some(node) = self
            .graph
            .nodes()
            .iter()
            .rev()
            .find(|n| self.node_renderer.hit_test(n, world))
        {
            self.node_drag = Some(NodeDrag {
                node_id: node.id.clone(),
                grab_offset: world - node.position,
            });
            self.select_connection(None);
            return EventDisposition::Consumed;
        }

        self.select_connection(None);
        EventDisposition::Ignored
    }

    /// Topmost connection under a world point; later connections draw on top.
    fn hit_connection(&self, world: Vec2) -> Option<(ConnectionId, ConnectionHit)> {
        self.graph.connections().iter().rev().find_map(|c| {
            self.connection_renderers
                .get(&c.id)
                .and_then(|r| r.hit_test(world))
                .map(|hit| (c.id.clone(), hit))
        })
    }

    fn update_hover(&mut self, world: Vec2, now_ms: f64) {
        let hit = self.hit_connection(world);
        if hit != self.hovered_connection {
            if let Some((id, prev)) = self.hovered_connection.take() {
                if let Some(r) = self.connection_renderers.get_mut(&id) {
                    match prev {
                        ConnectionHit::Path => r.pointer_leave_path(now_ms),
                        ConnectionHit::Action(_) => r.pointer_leave_action(now_ms),
                    }
                }
            }
            if let Some((id, next)) = &hit {
                if let Some(r) = self.connection_renderers.get_mut(id) {
                    match next {
                        ConnectionHit::Path => r.pointer_enter_path(),
                        ConnectionHit::Action(_) => r.pointer_enter_action(),
                    }
                }
            }
            self.hovered_connection = hit;
        }

        self.hovered_node = if self.hovered_connection.is_some() {
            None
        } else {
            self.graph
                .nodes()
                .iter()
                .rev()
                .find(|n| self.node_renderer.hit_test(n, world))
                .map(|n| n.id.clone())
        };
    }

    fn select_connection(&mut self, id: Option<ConnectionId>) {
        if self.selected_connection == id {
            return;
        }
        if let Some(prev) = self.selected_connection.take() {
            if let Some(r) = self.connection_renderers.get_mut(&prev) {
                r.set_selected(false);
            }
        }
        if let Some(next) = &id {
            if let Some(r) = self.connection_renderers.get_mut(next) {
                r.set_selected(true);
            }
        }
        self.selected_connection = id;
    }

    fn sync_connections(&mut self, now_ms: f64) {
        let mut live = HashSet::new();
        let mut present = HashSet::new();

        for conn in self.graph.connections() {
            present.insert(conn.id.clone());
            match route_connection(&self.graph, conn) {
                Ok(path) => {
                    live.insert(conn.id.clone());
                    self.unroutable.remove(&conn.id);
                    let selected = self.selected_connection.as_ref() == Some(&conn.id);
                    let r = self
                        .connection_renderers
                        .entry(conn.id.clone())
                        .or_insert_with(|| {
                            let mut r = ConnectionRenderer::new(conn.id.clone());
                            r.set_selected(selected);
                            r
                        });
                    r.set_path(path, self.measurer.as_ref(), now_ms);
                }
                Err(e) => {
                    if self.unroutable.insert(conn.id.clone()) {
                        log::warn!("skipping connection: {}", e);
                    }
                }
            }
        }

        self.connection_renderers.retain(|id, _| live.contains(id));
        self.unroutable.retain(|id| present.contains(id));
        if let Some(id) = &self.selected_connection {
            if !live.contains(id) {
                self.selected_connection = None;
            }
        }
        if let Some((id, _)) = &self.hovered_connection {
            if !live.contains(id) {
                self.hovered_connection = None;
            }
        }
    }

    fn render_overlay(&self, renderer: &dyn Renderer, container: Rect) {
        let text = Color::from_hex(config::TEXT_SECONDARY, 1.0);
        renderer.draw_text(
            container.x + container.width - 56.0,
            container.y + container.height - 24.0,
            &format!("{}%", self.zoom_level()),
            12.0,
            text,
        );

        if self.show_navigation_hint {
            let x = container.x + 16.0;
            let y = container.y + container.height - 40.0;
            renderer.fill_rounded_rect(x, y, 430.0, 26.0, 6.0, Color::from_hex(config::LABEL_BG, 0.9));
            renderer.draw_text(
                x + 10.0,
                y + 6.0,
                "Space+drag or middle-drag to pan, scroll to zoom, Ctrl+0 to reset",
                12.0,
                Color::from_hex(config::TEXT_PRIMARY, 1.0),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{LabelEditRequest, WorkflowGraph};
    use crate::platform::renderer::recording::{DrawCall, RecordingRenderer};

    #[derive(Default)]
    struct RecordingHost {
        panels: Vec<(ConnectionId, Vec2)>,
        edits: Vec<LabelEditRequest>,
    }

    impl CanvasHost for RecordingHost {
        fn open_node_panel_for_connection(&mut self, id: &ConnectionId, screen_position: Vec2) {
            self.panels.push((id.clone(), screen_position));
        }

        fn request_label_edit(&mut self, request: LabelEditRequest) {
            self.edits.push(request);
        }
    }

    fn sample_graph() -> WorkflowGraph {
        WorkflowGraph::new(
            vec![
                Node::new("a", 0.0, 0.0, 70.0, 70.0),
                Node::new("b", 300.0, 0.0, 70.0, 70.0),
            ],
            vec![
                Connection::new("c1", "a", "b", ConnectionType::Bezier).with_label("ok"),
                Connection::new("dangling", "a", "ghost", ConnectionType::Step),
            ],
        )
    }

    fn mounted() -> WorkflowCanvas<WorkflowGraph, RecordingHost> {
        let mut prefs = PreferenceStore::new();
        let mut canvas = WorkflowCanvas::new(sample_graph(), RecordingHost::default(), &mut prefs);
        canvas.set_container(Vec2::new(0.0, 0.0), Vec2::new(800.0, 600.0));
        canvas
            .viewport_controller_mut()
            .set_viewport(Viewport::new(0.0, 0.0, 1.0));
        canvas.update(0.0);
        canvas
    }

    fn c1() -> ConnectionId {
        ConnectionId::from("c1")
    }

    #[test]
    fn test_missing_endpoint_is_skipped() {
        let canvas = mounted();
        assert!(canvas.connection_renderer(&c1()).is_some());
        assert!(canvas.connection_renderer(&ConnectionId::from("dangling")).is_none());

        let out = RecordingRenderer::new();
        canvas.render(&out);
        let paths = out
            .take()
            .iter()
            .filter(|c| matches!(c, DrawCall::Path(_)))
            .count();
        assert_eq!(paths, 1);
    }

    #[test]
    fn test_hover_debounce_through_pointer_moves() {
        let mut canvas = mounted();
        canvas.handle_mouse(&MouseEvent::moved(150.0, 36.0, false, 0), 10.0);
        assert_eq!(canvas.connection_state(&c1()), Some(InteractionState::HoveredPath));

        canvas.handle_mouse(&MouseEvent::moved(150.0, 200.0, false, 0), 20.0);
        canvas.update(60.0);
        assert_eq!(canvas.connection_state(&c1()), Some(InteractionState::HoveredPath));
        canvas.update(120.0);
        assert_eq!(canvas.connection_state(&c1()), Some(InteractionState::Idle));
    }

    #[test]
    fn test_crossing_gap_to_actions_keeps_hover() {
        let mut canvas = mounted();
        canvas.handle_mouse(&MouseEvent::moved(185.0, 35.0, false, 0), 0.0);
        // Gap between the path and the buttons
        canvas.handle_mouse(&MouseEvent::moved(199.0, 42.5, false, 0), 10.0);
        canvas.update(50.0);
        canvas.handle_mouse(&MouseEvent::moved(199.0, 53.0, false, 0), 60.0);
        canvas.update(500.0);
        assert_eq!(canvas.connection_state(&c1()), Some(InteractionState::HoveredAction));
    }

    #[test]
    fn test_double_click_requests_one_label_edit() {
        let mut canvas = mounted();
        for i in 0..4 {
            let mut press = MouseEvent::pressed(150.0, 35.0, BUTTON_LEFT);
            press.click_count = 2;
            canvas.handle_mouse(&press, 100.0 + i as f64 * 30.0);
            canvas.handle_mouse(&MouseEvent::released(150.0, 35.0, BUTTON_LEFT), 110.0 + i as f64 * 30.0);
        }
        assert_eq!(canvas.host().edits.len(), 1);
        assert_eq!(canvas.host().edits[0].connection_id, c1());
        assert_eq!(canvas.host().edits[0].screen_position, Vec2::new(150.0, 35.0));

        canvas.commit_label_edit(&c1(), "approved");
        assert_eq!(
            canvas.graph().connection(&c1()).unwrap().label.as_deref(),
            Some("approved")
        );
        assert!(!canvas.connection_renderer(&c1()).unwrap().is_label_edit_pending());
    }

    #[test]
    fn test_click_selects_and_delete_key_removes() {
        let mut canvas = mounted();
        canvas.handle_mouse(&MouseEvent::pressed(150.0, 35.0, BUTTON_LEFT), 0.0);
        assert_eq!(canvas.selected_connection(), Some(&c1()));
        assert_eq!(canvas.connection_state(&c1()), Some(InteractionState::Selected));

        let d = canvas.handle_key(&KeyEvent::down(Key::Delete), 10.0);
        assert_eq!(d, EventDisposition::Consumed);
        assert!(canvas.graph().connection(&c1()).is_none());
        assert!(canvas.selected_connection().is_none());
    }

    #[test]
    fn test_action_buttons() {
        let mut canvas = mounted();
        canvas.handle_mouse(&MouseEvent::pressed(150.0, 35.0, BUTTON_LEFT), 0.0);

        let r = canvas.connection_renderer(&c1()).unwrap();
        let anchor = r.label_anchor();
        assert!((anchor.x - 185.0).abs() < 1e-6 && (anchor.y - 35.0).abs() < 1e-6);
        let [(_, add), (_, delete)] = r.action_positions();
        canvas.handle_mouse(&MouseEvent::pressed(add.x, add.y, BUTTON_LEFT), 10.0);
        assert_eq!(canvas.host().panels, vec![(c1(), anchor)]);

        canvas.handle_mouse(&MouseEvent::pressed(delete.x, delete.y, BUTTON_LEFT), 20.0);
        assert!(canvas.graph().connection(&c1()).is_none());
    }

    #[test]
    fn test_node_drag_reroutes_connection() {
        let mut canvas = mounted();
        let before = canvas.connection_renderer(&c1()).unwrap().path().cloned().unwrap();

        canvas.handle_mouse(&MouseEvent::pressed(335.0, 35.0, BUTTON_LEFT), 0.0);
        canvas.handle_mouse(&MouseEvent::moved(335.0, 435.0, true, BUTTON_LEFT), 16.0);
        canvas.handle_mouse(&MouseEvent::released(335.0, 435.0, BUTTON_LEFT), 32.0);
        canvas.update(40.0);

        let node = canvas.graph().node(&NodeId::from("b")).unwrap();
        assert_eq!(node.position, Vec2::new(300.0, 400.0));
        let after = canvas.connection_renderer(&c1()).unwrap().path().cloned().unwrap();
        assert_ne!(before.path, after.path);
        // b is now mostly below a: vertical routing
        assert_eq!(after.from, Vec2::new(35.0, 70.0));
        assert_eq!(after.to, Vec2::new(335.0, 400.0));
    }

    #[test]
    fn test_space_drag_pans_without_selecting() {
        let mut canvas = mounted();
        canvas.handle_key(&KeyEvent::down(Key::Space), 0.0);
        canvas.handle_mouse(&MouseEvent::pressed(150.0, 35.0, BUTTON_LEFT), 0.0);
        canvas.handle_mouse(&MouseEvent::moved(170.0, 35.0, true, BUTTON_LEFT), 16.0);
        assert_eq!(canvas.gesture_state(), GestureState::DragPanning);
        assert_eq!(canvas.viewport().x, 20.0);
        assert!(canvas.selected_connection().is_none());
    }

    #[test]
    fn test_left_press_during_middle_pan_does_not_grab_node() {
        let mut canvas = mounted();
        canvas.handle_mouse(&MouseEvent::pressed(35.0, 35.0, BUTTON_MIDDLE), 0.0);
        assert_eq!(canvas.gesture_state(), GestureState::DragPanning);

        let d = canvas.handle_mouse(&MouseEvent::pressed(35.0, 35.0, BUTTON_LEFT), 10.0);
        assert_eq!(d, EventDisposition::Consumed);
        canvas.handle_mouse(&MouseEvent::released(35.0, 35.0, BUTTON_MIDDLE), 20.0);
        canvas.handle_mouse(&MouseEvent::released(35.0, 35.0, BUTTON_LEFT), 30.0);
        assert_eq!(canvas.gesture_state(), GestureState::Idle);

        // Plain hover afterwards must neither pan nor move a node
        canvas.handle_mouse(&MouseEvent::moved(235.0, 135.0, false, 0), 40.0);
        assert_eq!(canvas.viewport().offset(), Vec2::new(0.0, 0.0));
        let a = canvas.graph().node(&NodeId::from("a")).unwrap();
        assert_eq!(a.position, Vec2::new(0.0, 0.0));
        assert!(canvas.selected_connection().is_none());
    }

    #[test]
    fn test_wheel_zooms_during_node_drag() {
        let mut canvas = mounted();
        canvas.handle_mouse(&MouseEvent::pressed(35.0, 35.0, BUTTON_LEFT), 0.0);
        let d = canvas.handle_mouse(&MouseEvent::wheel(35.0, 35.0, -1.0), 5.0);
        assert_eq!(d, EventDisposition::Consumed);

        let mut now = 5.0;
        for _ in 0..20 {
            now += config::FRAME_MS;
            canvas.update(now);
        }
        assert!((canvas.viewport().zoom - 1.05).abs() < 1e-9);

        // The drag is still live after the zoom
        let grab = canvas.world_to_screen(Vec2::new(35.0, 35.0));
        let target = canvas.world_to_screen(Vec2::new(135.0, 35.0));
        canvas.handle_mouse(&MouseEvent::moved(target.x, target.y, true, BUTTON_LEFT), now);
        canvas.handle_mouse(&MouseEvent::released(target.x, target.y, BUTTON_LEFT), now);
        let a = canvas.graph().node(&NodeId::from("a")).unwrap();
        assert!((a.position.x - 100.0).abs() < 1e-6 && a.position.y.abs() < 1e-6);
        assert!((grab.x - 35.0).abs() < 1e-6);
    }

    #[test]
    fn test_removed_dangling_connection_is_forgotten() {
        let mut canvas = mounted();
        let dangling = ConnectionId::from("dangling");
        assert!(canvas.unroutable.contains(&dangling));

        canvas.graph.remove_connection(&dangling);
        canvas.update(16.0);
        assert!(canvas.unroutable.is_empty());
    }

    #[test]
    fn test_navigation_hint_is_one_shot() {
        let mut prefs = PreferenceStore::open_in_memory().unwrap();
        let mut first = WorkflowCanvas::new(sample_graph(), RecordingHost::default(), &mut prefs);
        assert!(first.show_navigation_hint());
        first.handle_key(&KeyEvent::down(Key::Escape), 0.0);
        assert!(!first.show_navigation_hint());

        let second = WorkflowCanvas::new(sample_graph(), RecordingHost::default(), &mut prefs);
        assert!(!second.show_navigation_hint());
    }

    #[test]
    fn test_zoom_to_fit_frames_nodes() {
        let mut canvas = mounted();
        canvas.handle_key(&KeyEvent::down(Key::Digit1).with_shift(), 0.0);
        let mut now = 0.0;
        while canvas.viewport_controller().is_animating() {
            now += config::FRAME_MS;
            canvas.update(now);
        }
        // bounds 370x70 -> min(800 / 470, 600 / 170, 2)
        assert!((canvas.viewport().zoom - 800.0 / 470.0).abs() < 1e-9);
        let center = canvas.world_to_screen(Vec2::new(185.0, 35.0));
        assert!((center.x - 400.0).abs() < 1e-6 && (center.y - 300.0).abs() < 1e-6);
        assert_eq!(canvas.zoom_level(), 170);
    }
}
