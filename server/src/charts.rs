//! Minimal raster charts encoded as PNG data URIs.
//!
//! Text is drawn with the 8x8 public-domain bitmap font from `font8x8`, so
//! no font file is needed at runtime. Characters outside its basic set are
//! shown as `?`.

use anyhow::{bail, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

const GLYPH: u32 = 8;
const PAD: u32 = 8;
const TITLE_BAND: u32 = 2 * GLYPH + 2 * PAD;
const LABEL_CHARS: usize = 18;

const CELL: u32 = 40;
const BAR_HEIGHT: u32 = 24;
const BAR_GAP: u32 = 8;
const BAR_WIDTH: u32 = 400;
const PIE_SIZE: u32 = 320;
const SWATCH: u32 = 10;
const LEGEND_ROW: u32 = 18;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([33, 33, 33]);
const INK_LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

const PASTEL: [Rgb<u8>; 10] = [
    Rgb([161, 201, 244]),
    Rgb([255, 180, 130]),
    Rgb([141, 229, 161]),
    Rgb([255, 159, 155]),
    Rgb([208, 187, 255]),
    Rgb([222, 187, 155]),
    Rgb([250, 176, 228]),
    Rgb([207, 207, 207]),
    Rgb([255, 254, 163]),
    Rgb([185, 242, 240]),
];

pub fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

fn encode(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Blue (0.0) through white (0.5) to red (1.0).
fn coolwarm(v: f32) -> Rgb<u8> {
    let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    let lerp = |a: f32, b: f32, t: f32| (a + (b - a) * t).round() as u8;
    let (cold, mid, warm) = ([59.0, 76.0, 192.0], [221.0, 221.0, 221.0], [180.0, 4.0, 38.0]);
    let (from, to, t) = if v < 0.5 { (cold, mid, v * 2.0) } else { (mid, warm, (v - 0.5) * 2.0) };
    Rgb([lerp(from[0], to[0], t), lerp(from[1], to[1], t), lerp(from[2], to[2], t)])
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let (x_end, y_end) = ((x + w).min(img.width()), (y + h).min(img.height()));
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Pixel width of `text` at `scale`.
fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH * scale
}

/// Draw `text` with its top-left corner at `(x, y)`, clipped to the image.
fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>, scale: u32) {
    for (i, ch) in text.chars().enumerate() {
        let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')).unwrap_or([0; 8]);
        let left = x + i as u32 * GLYPH * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) != 0 {
                    fill_rect(img, left + col * scale, y + row as u32 * scale, scale, scale, color);
                }
            }
        }
    }
}

/// Cut `label` to at most `max` characters, marking the cut with `..`.
fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max.saturating_sub(2)).collect();
    out.push_str("..");
    out
}

/// Canvas with `title` drawn large across the top band.
fn canvas(title: &str, body_width: u32, body_height: u32) -> RgbImage {
    let width = body_width.max(text_width(title, 2) + 2 * PAD);
    let mut img = RgbImage::from_pixel(width, TITLE_BAND + body_height, BACKGROUND);
    draw_text(&mut img, PAD, PAD, title, INK, 2);
    img
}

/// Square grid of cells colored by similarity, each annotated with its
/// value. Rows carry numbered labels; columns carry the same numbers.
pub fn heatmap_png(title: &str, labels: &[String], values: &[Vec<f32>]) -> Result<Vec<u8>> {
    let n = values.len() as u32;
    if n == 0 || values.iter().any(|row| row.len() != values.len()) {
        bail!("heatmap needs a non-empty square grid");
    }
    if labels.len() != values.len() {
        bail!("heatmap needs one label per row, got {} for {}", labels.len(), n);
    }
    let left = (LABEL_CHARS as u32 + 4) * GLYPH + PAD;
    let top = GLYPH + PAD;
    let mut img = canvas(title, left + n * CELL + PAD, top + n * CELL + PAD);
    let (grid_x, grid_y) = (left, TITLE_BAND + top);

    for (i, label) in labels.iter().enumerate() {
        let i = i as u32;
        let row_label = format!("{}. {}", i + 1, truncate(label, LABEL_CHARS));
        draw_text(&mut img, PAD, grid_y + i * CELL + (CELL - GLYPH) / 2, &row_label, INK, 1);
        let number = (i + 1).to_string();
        let nx = grid_x + i * CELL + (CELL - text_width(&number, 1)) / 2;
        draw_text(&mut img, nx, TITLE_BAND, &number, INK, 1);
    }

    for (r, row) in values.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            let (x, y) = (grid_x + c as u32 * CELL, grid_y + r as u32 * CELL);
            fill_rect(&mut img, x + 1, y + 1, CELL - 1, CELL - 1, coolwarm(v));
            let text = format!("{:.2}", if v.is_finite() { v } else { 0.0 });
            let ink = if !(0.2..=0.8).contains(&v) { INK_LIGHT } else { INK };
            let tx = x + (CELL - text_width(&text, 1)) / 2;
            draw_text(&mut img, tx, y + (CELL - GLYPH) / 2, &text, ink, 1);
        }
    }
    encode(&img)
}

/// Horizontal bars scaled to the largest value, top to bottom in input
/// order, each with its label on the left and value on the right.
pub fn bar_chart_png(title: &str, labels: &[String], values: &[f32]) -> Result<Vec<u8>> {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    if values.is_empty() || max <= 0.0 {
        bail!("bar chart needs at least one positive value");
    }
    if labels.len() != values.len() {
        bail!("bar chart needs one label per bar, got {} for {}", labels.len(), values.len());
    }
    let n = values.len() as u32;
    let left = LABEL_CHARS as u32 * GLYPH + 2 * PAD;
    let value_room = 6 * GLYPH + PAD;
    let mut img = canvas(title, left + BAR_WIDTH + value_room + PAD, n * (BAR_HEIGHT + BAR_GAP) + BAR_GAP);

    for (i, (label, &v)) in labels.iter().zip(values).enumerate() {
        let y = TITLE_BAND + BAR_GAP + i as u32 * (BAR_HEIGHT + BAR_GAP);
        let text_y = y + (BAR_HEIGHT - GLYPH) / 2;
        draw_text(&mut img, PAD, text_y, &truncate(label, LABEL_CHARS), INK, 1);
        let len = (v.max(0.0) / max * BAR_WIDTH as f32).round() as u32;
        fill_rect(&mut img, left, y, len, BAR_HEIGHT, PASTEL[0]);
        draw_text(&mut img, left + len + 4, text_y, &format!("{v:.3}"), INK, 1);
    }
    encode(&img)
}

/// Pie slices proportional to counts, clockwise from twelve o'clock, with a
/// legend giving each slice's label and share.
pub fn pie_chart_png(title: &str, labels: &[String], counts: &[usize]) -> Result<Vec<u8>> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        bail!("pie chart needs a positive total");
    }
    if labels.len() != counts.len() {
        bail!("pie chart needs one label per slice, got {} for {}", labels.len(), counts.len());
    }
    let mut bounds = Vec::with_capacity(counts.len());
    let mut acc = 0usize;
    for c in counts {
        acc += c;
        bounds.push(acc as f32 / total as f32);
    }

    let legend_x = PIE_SIZE + 2 * PAD;
    let legend_width = SWATCH + PAD + (LABEL_CHARS as u32 + 9) * GLYPH;
    let body_height = PIE_SIZE.max(counts.len() as u32 * LEGEND_ROW) + PAD;
    let mut img = canvas(title, legend_x + legend_width + PAD, body_height);

    let r = PIE_SIZE as f32 / 2.0;
    for y in 0..PIE_SIZE {
        for x in 0..PIE_SIZE {
            let dx = x as f32 + 0.5 - r;
            let dy = y as f32 + 0.5 - r;
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let turn = (dx.atan2(-dy) / std::f32::consts::TAU).rem_euclid(1.0);
            let slice = bounds.iter().position(|&b| turn < b).unwrap_or(counts.len() - 1);
            img.put_pixel(PAD + x, TITLE_BAND + y, PASTEL[slice % PASTEL.len()]);
        }
    }

    for (i, (label, &count)) in labels.iter().zip(counts).enumerate() {
        let y = TITLE_BAND + i as u32 * LEGEND_ROW;
        fill_rect(&mut img, legend_x, y, SWATCH, SWATCH, PASTEL[i % PASTEL.len()]);
        let share = count as f64 / total as f64 * 100.0;
        let entry = format!("{} {share:.1}%", truncate(label, LABEL_CHARS));
        draw_text(&mut img, legend_x + SWATCH + PAD, y + 1, &entry, INK, 1);
    }
    encode(&img)
}
