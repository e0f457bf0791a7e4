use std::fmt::Write;

use crate::types::{Bin, Plan};

pub const DEFAULT_BAR_WIDTH: usize = 60;

const PIECE_FILLS: [char; 2] = ['#', '='];
const WASTE_FILL: char = '.';

const SVG_WIDTH: f64 = 500.0;
const SVG_HEIGHT: f64 = 30.0;
const SVG_PIECE_COLORS: [&str; 2] = ["#1f77b4", "#aec7e8"];
const SVG_WASTE_COLOR: &str = "#f78e0e";

const SEPARATOR_WIDTH: usize = 40;

/// A piece or waste span of a bar, in stock units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    offset: u64,
    length: u32,
    waste: bool,
}

fn segments(bin: &Bin) -> Vec<Segment> {
    let mut out = Vec::with_capacity(bin.pieces.len() + 1);
    let mut offset = 0u64;
    for &length in &bin.pieces {
        out.push(Segment {
            offset,
            length,
            waste: false,
        });
        offset += length as u64;
    }
    if bin.remaining_space > 0 {
        out.push(Segment {
            offset,
            length: bin.remaining_space,
            waste: true,
        });
    }
    out
}

// Labels only go on segments longer than a tenth of the bar.
fn is_labelled(length: u32, total: u64) -> bool {
    length as u64 * 10 > total
}

/// Proportional one-line bar: alternating piece fills, dotted waste.
pub fn render_bar(bin: &Bin, capacity: u32, width: usize) -> String {
    let total = capacity as u64;
    if total == 0 || width == 0 {
        return String::new();
    }
    let scale = width as f64 / total as f64;
    let mut cells = vec![' '; width];

    for (i, seg) in segments(bin).iter().enumerate() {
        let start = (seg.offset as f64 * scale).round() as usize;
        let end = ((seg.offset + seg.length as u64) as f64 * scale).round() as usize;
        let end = end.min(width);
        if start >= end {
            continue;
        }

        let fill = if seg.waste {
            WASTE_FILL
        } else {
            PIECE_FILLS[i % PIECE_FILLS.len()]
        };
        cells[start..end].fill(fill);

        let label: Vec<char> = seg.length.to_string().chars().collect();
        let span = end - start;
        if is_labelled(seg.length, total) && label.len() <= span {
            let label_start = start + (span - label.len()) / 2;
            cells[label_start..label_start + label.len()].copy_from_slice(&label);
        }
    }

    let bar: String = cells.into_iter().collect();
    format!("[{bar}]")
}

/// Same bar as `render_bar`, as a standalone SVG element.
pub fn render_bar_svg(bin: &Bin, capacity: u32) -> String {
    let total = capacity as u64;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SVG_WIDTH}" height="{SVG_HEIGHT}">"#
    );
    if total == 0 {
        svg.push_str("</svg>");
        return svg;
    }
    let scale = SVG_WIDTH / total as f64;

    for (i, seg) in segments(bin).iter().enumerate() {
        let x = seg.offset as f64 * scale;
        let w = seg.length as f64 * scale;
        let color = if seg.waste {
            SVG_WASTE_COLOR
        } else {
            SVG_PIECE_COLORS[i % SVG_PIECE_COLORS.len()]
        };
        let _ = write!(
            svg,
            r#"<rect x="{x:.2}" y="0" width="{w:.2}" height="{SVG_HEIGHT}" fill="{color}"/>"#
        );
        if is_labelled(seg.length, total) {
            let _ = write!(
                svg,
                r##"<text x="{:.2}" y="{}" text-anchor="middle" fill="#fff" font-size="12px">{}</text>"##,
                x + w / 2.0,
                SVG_HEIGHT / 2.0 + 5.0,
                seg.length
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

fn header(index: usize, bin: &Bin) -> String {
    format!("Stick {}  waste: {}", index + 1, bin.remaining_space)
}

/// One block per bin, least waste first, pieces pipe-delimited.
pub fn render_results(plan: &Plan, bar_width: Option<usize>) -> String {
    let mut out = String::new();
    for (i, bin) in plan.display_order().into_iter().enumerate() {
        let cuts: Vec<String> = bin.pieces.iter().map(|p| p.to_string()).collect();
        let _ = writeln!(out, "{}", header(i, bin));
        let _ = writeln!(out, "  cuts: {}", cuts.join(" | "));
        if let Some(width) = bar_width {
            let _ = writeln!(out, "  {}", render_bar(bin, plan.capacity, width));
        }
    }
    out
}

/// Cut list for the workshop: one piece per line, a rule between bins.
pub fn render_print(plan: &Plan) -> String {
    let rule = "-".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();
    for (i, bin) in plan.display_order().into_iter().enumerate() {
        let _ = writeln!(out, "{}", header(i, bin));
        out.push_str("Cuts:\n");
        for piece in &bin.pieces {
            let _ = writeln!(out, "{piece}");
        }
        let _ = writeln!(out, "{rule}");
    }
    out
}
