use std::path::PathBuf;
use std::time::Instant;
use workflow_canvas::core::config;
use workflow_canvas::core::error::WindowError;
use workflow_canvas::core::model::{CanvasHost, LabelEditRequest, WorkflowGraph};
use workflow_canvas::core::types::*;
use workflow_canvas::graph::canvas::WorkflowCanvas;
use workflow_canvas::platform::renderer::Renderer;
use workflow_canvas::platform::renderer_cairo::RendererCairo;
use workflow_canvas::platform::window_x11::WindowX11;
use workflow_canvas::store::preference_store::PreferenceStore;

struct Args {
    prefs_path: PathBuf,
    width: i32,
    height: i32,
}

fn parse_args() -> Args {
    let mut args = Args {
        prefs_path: PathBuf::from(".workflow-canvas.db"),
        width: 1280,
        height: 720,
    };

    let argv: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--prefs" if i + 1 < argv.len() => {
                i += 1;
                args.prefs_path = PathBuf::from(&argv[i]);
            }
            "--width" if i + 1 < argv.len() => {
                i += 1;
                args.width = argv[i].parse().unwrap_or(args.width);
            }
            "--height" if i + 1 < argv.len() => {
                i += 1;
                args.height = argv[i].parse().unwrap_or(args.height);
            }
            other => log::warn!("ignoring argument {}", other),
        }
        i += 1;
    }

    args
}

/// Stands in for the surrounding editor: logs what it would open.
#[derive(Default)]
struct DemoHost {
    pending_edits: Vec<LabelEditRequest>,
}

impl CanvasHost for DemoHost {
    fn open_node_panel_for_connection(&mut self, connection_id: &ConnectionId, screen_position: Vec2) {
        log::info!(
            "insert node on {} at ({:.0}, {:.0})",
            connection_id,
            screen_position.x,
            screen_position.y
        );
    }

    fn request_label_edit(&mut self, request: LabelEditRequest) {
        log::info!("edit label of {}", request.connection_id);
        self.pending_edits.push(request);
    }
}

fn demo_graph() -> WorkflowGraph {
    let w = config::NODE_DEFAULT_W;
    let h = config::NODE_DEFAULT_H;
    let nodes = vec![
        Node::new("trigger", 80.0, 200.0, w, h).with_title("Webhook"),
        Node::new("check", 380.0, 200.0, w, h).with_title("Check status"),
        Node::new("notify", 700.0, 80.0, w, h).with_title("Send notification"),
        Node::new("store", 700.0, 330.0, w, h).with_title("Store record"),
        Node::new("audit", 380.0, 520.0, w, h).with_title("Audit log"),
    ];
    let connections = vec![
        Connection::new("e1", "trigger", "check", ConnectionType::Bezier),
        Connection::new("e2", "check", "notify", ConnectionType::Bezier).with_label("ok"),
        Connection::new("e3", "check", "store", ConnectionType::Step).with_label("retry"),
        Connection::new("e4", "check", "audit", ConnectionType::Bezier).with_style(ConnectionStyle {
            dashed: true,
            animated: true,
            ..Default::default()
        }),
    ];
    WorkflowGraph::new(nodes, connections)
}

fn run(args: Args) -> Result<(), WindowError> {
    let mut prefs = PreferenceStore::open_or_session(&args.prefs_path);
    let mut canvas = WorkflowCanvas::new(demo_graph(), DemoHost::default(), &mut prefs);

    let mut window = WindowX11::new();
    window.create(args.width, args.height, "Workflow Canvas")?;

    let cr = window.create_cairo_context().ok_or(WindowError::NoCairoContext)?;
    let mut renderer = RendererCairo::new(cr);

    let start = Instant::now();

    // Main loop
    'frame: loop {
        if !window.poll_events() {
            break;
        }
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;

        canvas.set_container(
            Vec2::new(0.0, 0.0),
            Vec2::new(window.width() as f64, window.height() as f64),
        );

        for event in window.take_mouse_events() {
            canvas.handle_mouse(&event, now_ms);
        }
        for event in window.take_key_events() {
            // Ctrl+Q: quit
            if event.pressed && event.ctrl && event.key == Key::Char('q') {
                break 'frame;
            }
            canvas.handle_key(&event, now_ms);
        }

        // No inline editor here: keep the current label and close the request
        for request in std::mem::take(&mut canvas.host_mut().pending_edits) {
            canvas.cancel_label_edit(&request.connection_id);
        }

        canvas.update(now_ms);

        if let Some(cr) = window.create_cairo_context() {
            renderer.set_context(cr);
        }

        renderer.begin_frame(window.width(), window.height());
        renderer.fill_rect(
            0.0,
            0.0,
            window.width() as f64,
            window.height() as f64,
            Color::from_hex(config::BG_COLOR, 1.0),
        );
        canvas.render(&renderer);
        renderer.end_frame();

        window.flush();

        // Cap at ~60fps
        std::thread::sleep(std::time::Duration::from_millis(16));
    }

    prefs.close();
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(parse_args()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
