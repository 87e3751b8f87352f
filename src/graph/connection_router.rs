/// Connection routing: anchor selection and path geometry between two node boxes.
///
/// Everything here is a pure function of node rectangles and connection type,
/// so identical inputs always give byte-identical path strings.
use crate::core::config;
use crate::core::error::RouteError;
use crate::core::model::GraphModel;
use crate::core::types::*;

/// Dominant axis of displacement between two node centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Route between two nodes. `None` when either endpoint is missing.
pub fn calculate_connection_path(
    from: Option<&Node>,
    to: Option<&Node>,
    connection_type: ConnectionType,
) -> Option<ConnectionPath> {
    let (from, to) = (from?, to?);
    let (start, end, axis) = anchors(from, to);

    let path = match connection_type {
        ConnectionType::Bezier => bezier_path(start, end, axis),
        ConnectionType::Step => step_path(start, end, axis),
    };

    Some(ConnectionPath {
        path,
        from: start,
        to: end,
    })
}

/// Resolve a connection's endpoints in the graph model and route it.
pub fn route_connection<G: GraphModel + ?Sized>(
    graph: &G,
    connection: &Connection,
) -> Result<ConnectionPath, RouteError> {
    let from = graph.node(&connection.from);
    let to = graph.node(&connection.to);

    calculate_connection_path(from, to, connection.connection_type).ok_or_else(|| {
        let node = if from.is_none() {
            connection.from.clone()
        } else {
            connection.to.clone()
        };
        RouteError::MissingEndpoint {
            connection: connection.id.clone(),
            node,
        }
    })
}

/// Pick departure/arrival points on the facing sides of the two boxes.
pub fn anchors(from: &Node, to: &Node) -> (Vec2, Vec2, Axis) {
    let a = from.center();
    let b = to.center();
    let d = b - a;

    if d.length() < config::DEGENERATE_EPSILON {
        log::trace!("nodes {} and {} share a centre; collapsing anchors", from.id, to.id);
        return (a, a, Axis::Horizontal);
    }

    if d.x.abs() >= d.y.abs() {
        let (start_x, end_x) = if d.x > 0.0 {
            (from.position.x + from.width, to.position.x)
        } else {
            (from.position.x, to.position.x + to.width)
        };
        (Vec2::new(start_x, a.y), Vec2::new(end_x, b.y), Axis::Horizontal)
    } else {
        let (start_y, end_y) = if d.y > 0.0 {
            (from.position.y + from.height, to.position.y)
        } else {
            (from.position.y, to.position.y + to.height)
        };
        (Vec2::new(a.x, start_y), Vec2::new(b.x, end_y), Axis::Vertical)
    }
}

/// Control points sit on the dominant axis so the curve leaves and enters
/// perpendicular to the node edges.
pub fn bezier_control_points(start: Vec2, end: Vec2, axis: Axis) -> (Vec2, Vec2) {
    if start.distance(end) < config::DEGENERATE_EPSILON {
        return (start, end);
    }

    let (span, unit) = match axis {
        Axis::Horizontal => (end.x - start.x, Vec2::new(1.0, 0.0)),
        Axis::Vertical => (end.y - start.y, Vec2::new(0.0, 1.0)),
    };
    let dir = if span < 0.0 { -1.0 } else { 1.0 };
    let offset = (span.abs() * config::BEZIER_TENSION).max(config::BEZIER_MIN_OFFSET);

    (start + unit * (dir * offset), end - unit * (dir * offset))
}

fn bezier_path(start: Vec2, end: Vec2, axis: Axis) -> String {
    let (c1, c2) = bezier_control_points(start, end, axis);
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        num(start.x),
        num(start.y),
        num(c1.x),
        num(c1.y),
        num(c2.x),
        num(c2.y),
        num(end.x),
        num(end.y)
    )
}

fn step_path(start: Vec2, end: Vec2, axis: Axis) -> String {
    if start.distance(end) < config::DEGENERATE_EPSILON {
        return format!(
            "M {} {} L {} {}",
            num(start.x),
            num(start.y),
            num(end.x),
            num(end.y)
        );
    }

    let points = match axis {
        Axis::Horizontal => {
            let mid_x = (start.x + end.x) / 2.0;
            [start, Vec2::new(mid_x, start.y), Vec2::new(mid_x, end.y), end]
        }
        Axis::Vertical => {
            let mid_y = (start.y + end.y) / 2.0;
            [start, Vec2::new(start.x, mid_y), Vec2::new(end.x, mid_y), end]
        }
    };

    rounded_polyline(&points, config::STEP_CORNER_RADIUS)
}

/// Polyline through `points` with each interior corner replaced by a
/// quadratic arc whose radius is shrunk to fit the adjoining segments.
fn rounded_polyline(points: &[Vec2], radius: f64) -> String {
    let mut out = Vec::with_capacity(points.len() * 2);
    let Some(first) = points.first() else {
        return String::new();
    };
    out.push(format!("M {} {}", num(first.x), num(first.y)));

    for i in 1..points.len().saturating_sub(1) {
        let prev = points[i - 1];
        let curr = points[i];
        let next = points[i + 1];

        let len_in = curr.distance(prev);
        let len_out = next.distance(curr);
        let r = radius.min(len_in / 2.0).min(len_out / 2.0);

        if r < 0.5 {
            out.push(format!("L {} {}", num(curr.x), num(curr.y)));
            continue;
        }

        let arc_start = curr - (curr - prev).normalized() * r;
        let arc_end = curr + (next - curr).normalized() * r;
        out.push(format!("L {} {}", num(arc_start.x), num(arc_start.y)));
        out.push(format!(
            "Q {} {}, {} {}",
            num(curr.x),
            num(curr.y),
            num(arc_end.x),
            num(arc_end.y)
        ));
    }

    if let Some(last) = points.last().filter(|_| points.len() > 1) {
        out.push(format!("L {} {}", num(last.x), num(last.y)));
    }

    out.join(" ")
}

/// Two-decimal rendering with negative zero folded to zero.
fn num(v: f64) -> String {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 || !r.is_finite() {
        return "0".to_string();
    }
    format!("{}", r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::WorkflowGraph;
    use crate::graph::path_measure::{parse_path, FlatteningMeasurer, PathMeasurer, PathSegment};

    fn node(id: &str, x: f64, y: f64) -> Node {
        Node::new(id, x, y, 70.0, 70.0)
    }

    #[test]
    fn test_horizontal_bezier_routing() {
        let a = node("a", 0.0, 0.0);
        let b = node("b", 300.0, 0.0);
        let path = calculate_connection_path(Some(&a), Some(&b), ConnectionType::Bezier).unwrap();

        assert_eq!(path.from, Vec2::new(70.0, 35.0));
        assert_eq!(path.to, Vec2::new(300.0, 35.0));
        assert_eq!(path.path, "M 70 35 C 185 35, 185 35, 300 35");
    }

    #[test]
    fn test_vertical_and_reversed_routing() {
        let a = node("a", 0.0, 400.0);
        let b = node("b", 20.0, 0.0);
        let path = calculate_connection_path(Some(&a), Some(&b), ConnectionType::Bezier).unwrap();
        // b is above a: leave from a's top, arrive at b's bottom
        assert_eq!(path.from, Vec2::new(35.0, 400.0));
        assert_eq!(path.to, Vec2::new(55.0, 70.0));

        let left = node("l", -500.0, 10.0);
        let path = calculate_connection_path(Some(&a), Some(&left), ConnectionType::Bezier).unwrap();
        assert_eq!(path.from, Vec2::new(0.0, 435.0));
        assert_eq!(path.to, Vec2::new(-430.0, 45.0));
    }

    #[test]
    fn test_control_points_follow_dominant_axis() {
        let (c1, c2) =
            bezier_control_points(Vec2::new(0.0, 0.0), Vec2::new(200.0, 80.0), Axis::Horizontal);
        assert_eq!(c1, Vec2::new(100.0, 0.0));
        assert_eq!(c2, Vec2::new(100.0, 80.0));

        // Short spans still bulge by the minimum offset
        let (c1, c2) =
            bezier_control_points(Vec2::new(0.0, 0.0), Vec2::new(0.0, -10.0), Axis::Vertical);
        assert_eq!(c1, Vec2::new(0.0, -20.0));
        assert_eq!(c2, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_routing_is_deterministic() {
        let a = node("a", 13.37, -42.0).with_title("x");
        let b = node("b", 911.5, 250.25);
        for ty in [ConnectionType::Bezier, ConnectionType::Step] {
            let first = calculate_connection_path(Some(&a), Some(&b), ty).unwrap();
            for _ in 0..10 {
                assert_eq!(calculate_connection_path(Some(&a), Some(&b), ty).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_coincident_nodes_give_zero_length_path() {
        let a = node("a", 10.0, 10.0);
        let b = node("b", 10.0, 10.0);
        let measurer = FlatteningMeasurer::new();
        for ty in [ConnectionType::Bezier, ConnectionType::Step] {
            let path = calculate_connection_path(Some(&a), Some(&b), ty).unwrap();
            assert!(!path.path.contains("NaN"), "{}", path.path);
            assert!(path.from.is_finite() && path.to.is_finite());
            assert!(parse_path(&path.path).is_ok());
            assert!(measurer.length(&path.path) < 1e-6);
        }
    }

    #[test]
    fn test_step_path_has_rounded_corners() {
        let a = node("a", 0.0, 0.0);
        let b = node("b", 300.0, 100.0);
        let path = calculate_connection_path(Some(&a), Some(&b), ConnectionType::Step).unwrap();
        let segments = parse_path(&path.path).unwrap();

        let quads = segments
            .iter()
            .filter(|s| matches!(s, PathSegment::QuadTo(..)))
            .count();
        assert_eq!(quads, 2);
        assert_eq!(segments.first(), Some(&PathSegment::MoveTo(Vec2::new(70.0, 35.0))));
        assert_eq!(segments.last(), Some(&PathSegment::LineTo(Vec2::new(300.0, 135.0))));
        assert!(path.path.starts_with("M 70 35 L 177 35 Q 185 35, 185 43"));
    }

    #[test]
    fn test_step_path_aligned_nodes_is_straight() {
        let a = node("a", 0.0, 0.0);
        let b = node("b", 300.0, 0.0);
        let path = calculate_connection_path(Some(&a), Some(&b), ConnectionType::Step).unwrap();
        assert!(!path.path.contains('Q'));
        let length = FlatteningMeasurer::new().length(&path.path);
        assert!((length - 230.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_endpoint() {
        let a = node("a", 0.0, 0.0);
        assert!(calculate_connection_path(Some(&a), None, ConnectionType::Bezier).is_none());
        assert!(calculate_connection_path(None, Some(&a), ConnectionType::Step).is_none());

        let graph = WorkflowGraph::new(vec![a], vec![]);
        let conn = Connection::new("c1", "a", "ghost", ConnectionType::Bezier);
        assert_eq!(
            route_connection(&graph, &conn),
            Err(RouteError::MissingEndpoint {
                connection: ConnectionId::from("c1"),
                node: NodeId::from("ghost"),
            })
        );
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(12.345678), "12.35");
        assert_eq!(num(-7.5), "-7.5");
        assert_eq!(num(f64::NAN), "0");
    }
}
