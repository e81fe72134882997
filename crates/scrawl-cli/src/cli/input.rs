//! Path input: SVG `d` strings and SVG documents.
//!
//! `svgtypes` handles a bare `d` attribute; `usvg` resolves a whole document
//! (shapes, CSS, transforms) down to paths. Both end up as scrawl
//! operations with absolute coordinates.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};
use tracing::debug;

use scrawl::{Operation, Point};

/// Parse SVG path data into operations.
///
/// Relative commands, shorthands and arcs are resolved by the parser;
/// `Z` becomes a line back to the subpath start.
pub fn parse_path_data(d: &str) -> Result<Vec<Operation>> {
    let mut ops = Vec::new();
    let mut start = Point::default();
    for segment in SimplifyingPathParser::from(d) {
        let segment = segment.with_context(|| format!("invalid path data: {d:?}"))?;
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                start = Point::new(x, y);
                ops.push(Operation::Move(start));
            }
            SimplePathSegment::LineTo { x, y } => ops.push(Operation::LineTo(Point::new(x, y))),
            SimplePathSegment::Quadratic { x1, y1, x, y } => ops.push(Operation::QuadraticCurveTo {
                control: Point::new(x1, y1),
                to: Point::new(x, y),
            }),
            SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => ops.push(Operation::CubicCurveTo {
                control1: Point::new(x1, y1),
                control2: Point::new(x2, y2),
                to: Point::new(x, y),
            }),
            SimplePathSegment::ClosePath => ops.push(Operation::LineTo(start)),
        }
    }
    if ops.is_empty() {
        bail!("path data contains no segments");
    }
    Ok(ops)
}

/// Extract every path of an SVG document, with transforms applied.
pub fn extract_paths_from_svg(svg_content: &str) -> Result<Vec<Vec<Operation>>> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options).context("SVG parse error")?;

    let mut paths = Vec::new();
    extract_from_group(tree.root(), &mut paths);
    if paths.is_empty() {
        bail!("no paths found in SVG");
    }
    debug!(paths = paths.len(), "extracted SVG paths");
    Ok(paths)
}

fn extract_from_group(group: &usvg::Group, paths: &mut Vec<Vec<Operation>>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => extract_from_group(group, paths),
            usvg::Node::Path(path) => {
                if let Some(ops) = path_to_operations(path) {
                    paths.push(ops);
                }
            }
            // Text, images
            _ => {}
        }
    }
}

fn path_to_operations(path: &usvg::Path) -> Option<Vec<Operation>> {
    use usvg::tiny_skia_path::PathSegment;

    let data = path.data().clone().transform(path.abs_transform())?;
    let point = |p: usvg::tiny_skia_path::Point| Point::new(p.x as f64, p.y as f64);

    let mut ops = Vec::new();
    let mut start = Point::default();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                start = point(p);
                ops.push(Operation::Move(start));
            }
            PathSegment::LineTo(p) => ops.push(Operation::LineTo(point(p))),
            PathSegment::QuadTo(ctrl, p) => ops.push(Operation::QuadraticCurveTo {
                control: point(ctrl),
                to: point(p),
            }),
            PathSegment::CubicTo(ctrl1, ctrl2, p) => ops.push(Operation::CubicCurveTo {
                control1: point(ctrl1),
                control2: point(ctrl2),
                to: point(p),
            }),
            PathSegment::Close => ops.push(Operation::LineTo(start)),
        }
    }
    (ops.len() >= 2).then_some(ops)
}

/// Read an SVG file, or stdin when the path is `-`.
pub fn read_svg(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).context("failed to read SVG from stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Paths from either a `d` string or an SVG file.
pub fn load_paths(d: Option<&str>, svg: Option<&Path>) -> Result<Vec<Vec<Operation>>> {
    match (d, svg) {
        (Some(d), None) => Ok(vec![parse_path_data(d)?]),
        (None, Some(svg)) => extract_paths_from_svg(&read_svg(svg)?),
        (Some(_), Some(_)) => bail!("give either --d or --svg, not both"),
        (None, None) => bail!("no input path: use --d \"M0 0 ...\" or --svg file.svg"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_commands_become_absolute() {
        let ops = parse_path_data("m10 10 h20 v20 z").unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Move(Point::new(10.0, 10.0)),
                Operation::LineTo(Point::new(30.0, 10.0)),
                Operation::LineTo(Point::new(30.0, 30.0)),
                Operation::LineTo(Point::new(10.0, 10.0)),
            ]
        );
    }

    #[test]
    fn curves_are_kept() {
        let ops = parse_path_data("M0 0 C10 0 20 10 20 20 Q30 30 40 20").unwrap();
        assert!(matches!(ops[1], Operation::CubicCurveTo { .. }));
        assert!(matches!(ops[2], Operation::QuadraticCurveTo { .. }));
    }

    #[test]
    fn bad_path_data_is_an_error() {
        assert!(parse_path_data("").is_err());
        assert!(parse_path_data("M 10 banana").is_err());
    }

    #[test]
    fn svg_shapes_become_paths() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect x="10" y="10" width="80" height="80"/>
                <circle cx="50" cy="50" r="20"/>
            </svg>
        "#;
        let paths = extract_paths_from_svg(svg).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[1].iter().any(|op| matches!(op, Operation::CubicCurveTo { .. })));
    }

    #[test]
    fn transforms_are_applied() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 200">
                <g transform="translate(100 0)">
                    <path d="M0 0 L10 0 L10 10 Z"/>
                </g>
            </svg>
        "#;
        let paths = extract_paths_from_svg(svg).unwrap();
        assert_eq!(paths[0][0], Operation::Move(Point::new(100.0, 0.0)));
    }

    #[test]
    fn empty_svg_is_an_error() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"></svg>"#;
        assert!(extract_paths_from_svg(svg).is_err());
    }
}
