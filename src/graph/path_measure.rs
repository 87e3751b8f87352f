/// Path command parsing and measurement.
///
/// Routed connections are carried as SVG-style command strings. Renderers
/// that cannot query their backend for path geometry measure through the
/// `PathMeasurer` trait instead; `FlatteningMeasurer` is the default and works
/// on a polyline approximation of the parsed commands.
use crate::core::config;
use crate::core::error::PathError;
use crate::core::types::Vec2;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<cmd>[A-Za-z])|(?P<num>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)")
        .expect("path token pattern is valid")
});

/// One absolute drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    Close,
}

/// Geometry queries a renderer backend provides for a path string.
pub trait PathMeasurer {
    /// Total length; 0 when the path is empty or cannot be measured.
    fn length(&self, path: &str) -> f64;
    /// Point at `distance` along the path, clamped to its ends.
    fn point_at(&self, path: &str, distance: f64) -> Option<Vec2>;
}

#[derive(Debug)]
enum Token {
    Cmd(char),
    Num(f64),
}

fn tokenize(path: &str) -> Result<Vec<Token>, PathError> {
    TOKEN_RE
        .captures_iter(path)
        .map(|caps| {
            if let Some(cmd) = caps.name("cmd") {
                // A bare letter is always a single char
                Ok(Token::Cmd(cmd.as_str().chars().next().unwrap_or('?')))
            } else {
                let raw = caps.name("num").map(|m| m.as_str()).unwrap_or_default();
                raw.parse::<f64>()
                    .map(Token::Num)
                    .map_err(|_| PathError::InvalidNumber(raw.to_string()))
            }
        })
        .collect()
}

fn arity(cmd: char) -> Option<usize> {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' => Some(2),
        'H' | 'V' => Some(1),
        'Q' => Some(4),
        'C' => Some(6),
        'Z' => Some(0),
        _ => None,
    }
}

/// Parse `M/L/H/V/Q/C/Z` commands (absolute or relative) into absolute segments.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let tokens = tokenize(path)?;
    let mut segments = Vec::new();
    let mut i = 0;
    let mut current = Vec2::default();
    let mut subpath_start = Vec2::default();

    match tokens.first() {
        None => return Err(PathError::Empty),
        Some(Token::Cmd('M' | 'm')) => {}
        Some(Token::Cmd(c)) => return Err(PathError::MissingMoveTo(*c)),
        Some(Token::Num(_)) => return Err(PathError::MissingMoveTo('?')),
    }

    while i < tokens.len() {
        let cmd = match tokens[i] {
            Token::Cmd(c) => c,
            Token::Num(_) => unreachable!("numbers are consumed with their command"),
        };
        i += 1;
        let n = arity(cmd).ok_or(PathError::UnsupportedCommand(cmd))?;

        let mut args = Vec::new();
        while let Some(Token::Num(v)) = tokens.get(i) {
            args.push(*v);
            i += 1;
        }

        if n == 0 {
            if !args.is_empty() {
                return Err(PathError::ArgumentCount {
                    command: cmd,
                    expected: 0,
                    found: args.len(),
                });
            }
            segments.push(PathSegment::Close);
            current = subpath_start;
            continue;
        }

        if args.is_empty() || args.len() % n != 0 {
            return Err(PathError::ArgumentCount {
                command: cmd,
                expected: n,
                found: args.len(),
            });
        }

        let relative = cmd.is_ascii_lowercase();
        for (group, chunk) in args.chunks(n).enumerate() {
            let base = if relative { current } else { Vec2::default() };
            let pt = |k: usize| Vec2::new(chunk[k], chunk[k + 1]) + base;
            let segment = match cmd.to_ascii_uppercase() {
                // Extra coordinate pairs after a move are implicit lines
                'M' if group == 0 => {
                    subpath_start = pt(0);
                    PathSegment::MoveTo(pt(0))
                }
                'M' | 'L' => PathSegment::LineTo(pt(0)),
                'H' => {
                    let x = if relative { current.x + chunk[0] } else { chunk[0] };
                    PathSegment::LineTo(Vec2::new(x, current.y))
                }
                'V' => {
                    let y = if relative { current.y + chunk[0] } else { chunk[0] };
                    PathSegment::LineTo(Vec2::new(current.x, y))
                }
                'Q' => PathSegment::QuadTo(pt(0), pt(2)),
                _ => PathSegment::CubicTo(pt(0), pt(2), pt(4)),
            };
            current = end_point(&segment).unwrap_or(current);
            segments.push(segment);
        }
    }

    Ok(segments)
}

fn end_point(segment: &PathSegment) -> Option<Vec2> {
    match *segment {
        PathSegment::MoveTo(p) | PathSegment::LineTo(p) => Some(p),
        PathSegment::QuadTo(_, p) | PathSegment::CubicTo(_, _, p) => Some(p),
        PathSegment::Close => None,
    }
}

/// Evaluate a cubic bezier at parameter t.
pub fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    let uuu = uu * u;
    let ttt = tt * t;

    Vec2 {
        x: uuu * p0.x + 3.0 * uu * t * p1.x + 3.0 * u * tt * p2.x + ttt * p3.x,
        y: uuu * p0.y + 3.0 * uu * t * p1.y + 3.0 * u * tt * p2.y + ttt * p3.y,
    }
}

pub fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    Vec2 {
        x: u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        y: u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    }
}

/// Approximate the drawn parts of a path as straight line pieces.
pub fn flatten(segments: &[PathSegment]) -> Vec<(Vec2, Vec2)> {
    let steps = config::PATH_FLATTEN_SEGMENTS;
    let mut lines = Vec::new();
    let mut current = Vec2::default();
    let mut start = Vec2::default();

    for segment in segments {
        match *segment {
            PathSegment::MoveTo(p) => {
                current = p;
                start = p;
            }
            PathSegment::LineTo(p) => {
                lines.push((current, p));
                current = p;
            }
            PathSegment::QuadTo(c, p) => {
                let mut prev = current;
                for k in 1..=steps {
                    let next = quadratic_point(current, c, p, k as f64 / steps as f64);
                    lines.push((prev, next));
                    prev = next;
                }
                current = p;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let mut prev = current;
                for k in 1..=steps {
                    let next = cubic_point(current, c1, c2, p, k as f64 / steps as f64);
                    lines.push((prev, next));
                    prev = next;
                }
                current = p;
            }
            PathSegment::Close => {
                lines.push((current, start));
                current = start;
            }
        }
    }

    lines
}

/// Shortest distance from `p` to any of the line pieces.
pub fn distance_to_lines(p: Vec2, lines: &[(Vec2, Vec2)]) -> f64 {
    lines
        .iter()
        .map(|&(a, b)| distance_to_segment(p, a, b))
        .fold(f64::INFINITY, f64::min)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < 1e-12 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Total length of flattened line pieces.
pub fn lines_length(lines: &[(Vec2, Vec2)]) -> f64 {
    lines.iter().map(|&(a, b)| a.distance(b)).sum()
}

/// Point at `distance` along flattened line pieces.
pub fn lines_point_at(lines: &[(Vec2, Vec2)], distance: f64) -> Option<Vec2> {
    let (first, _) = *lines.first()?;
    if distance <= 0.0 {
        return Some(first);
    }
    let mut remaining = distance;
    for &(a, b) in lines {
        let len = a.distance(b);
        if remaining <= len {
            if len < 1e-12 {
                return Some(a);
            }
            return Some(a + (b - a) * (remaining / len));
        }
        remaining -= len;
    }
    lines.last().map(|&(_, b)| b)
}

/// Measures by flattening curves into short line pieces.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatteningMeasurer;

impl FlatteningMeasurer {
    pub fn new() -> Self {
        Self
    }

    fn lines(&self, path: &str) -> Option<Vec<(Vec2, Vec2)>> {
        match parse_path(path) {
            Ok(segments) => Some(flatten(&segments)),
            Err(e) => {
                log::debug!("cannot measure path {:?}: {}", path, e);
                None
            }
        }
    }
}

impl PathMeasurer for FlatteningMeasurer {
    fn length(&self, path: &str) -> f64 {
        self.lines(path).map(|l| lines_length(&l)).unwrap_or(0.0)
    }

    fn point_at(&self, path: &str, distance: f64) -> Option<Vec2> {
        lines_point_at(&self.lines(path)?, distance)
    }
}
