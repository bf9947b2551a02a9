//! Rasterize a rendered frame into a PNG.
//!
//! Each terminal cell becomes a `CELL_WIDTH` x `CELL_HEIGHT` block painted with the cell
//! background; visible glyphs are drawn as an ink box in the foreground color.

use std::io::Cursor;
use std::path::Path;

use calltime_core::RecapError;
use image::{ImageFormat, Rgba, RgbaImage};
use ratatui::buffer::{Buffer, Cell};
use ratatui::style::{Color, Modifier};

/// Pixel width of one column. Mouse positions are converted with the same factor.
pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

const DEFAULT_BG: [u8; 3] = [17, 17, 17];
const DEFAULT_FG: [u8; 3] = [235, 235, 235];

const ANSI: [[u8; 3]; 16] = [
    [0, 0, 0],
    [205, 49, 49],
    [13, 188, 121],
    [229, 229, 16],
    [36, 114, 200],
    [188, 63, 188],
    [17, 168, 205],
    [229, 229, 229],
    [102, 102, 102],
    [241, 76, 76],
    [35, 209, 139],
    [245, 245, 67],
    [59, 142, 234],
    [214, 112, 214],
    [41, 184, 219],
    [255, 255, 255],
];

fn indexed(i: u8) -> [u8; 3] {
    match i {
        0..=15 => ANSI[usize::from(i)],
        16..=231 => {
            let i = i - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            [level(i / 36), level((i / 6) % 6), level(i % 6)]
        }
        _ => {
            let v = 8 + (i - 232) * 10;
            [v, v, v]
        }
    }
}

fn rgb(color: Color, fallback: [u8; 3]) -> [u8; 3] {
    match color {
        Color::Reset => fallback,
        Color::Black => ANSI[0],
        Color::Red => ANSI[1],
        Color::Green => ANSI[2],
        Color::Yellow => ANSI[3],
        Color::Blue => ANSI[4],
        Color::Magenta => ANSI[5],
        Color::Cyan => ANSI[6],
        Color::Gray => ANSI[7],
        Color::DarkGray => ANSI[8],
        Color::LightRed => ANSI[9],
        Color::LightGreen => ANSI[10],
        Color::LightYellow => ANSI[11],
        Color::LightBlue => ANSI[12],
        Color::LightMagenta => ANSI[13],
        Color::LightCyan => ANSI[14],
        Color::White => ANSI[15],
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Indexed(i) => indexed(i),
    }
}

fn cell_colors(cell: &Cell) -> ([u8; 3], [u8; 3]) {
    let fg = rgb(cell.fg, DEFAULT_FG);
    let bg = rgb(cell.bg, DEFAULT_BG);
    if cell.modifier.contains(Modifier::REVERSED) {
        (bg, fg)
    } else {
        (fg, bg)
    }
}

/// Pixel rows `[top, bottom)` and columns `[left, right)` covered by a glyph.
fn ink_box(symbol: &str) -> Option<(u32, u32, u32, u32)> {
    match symbol {
        "" | " " => None,
        "█" => Some((0, CELL_HEIGHT, 0, CELL_WIDTH)),
        "▀" => Some((0, CELL_HEIGHT / 2, 0, CELL_WIDTH)),
        "▄" => Some((CELL_HEIGHT / 2, CELL_HEIGHT, 0, CELL_WIDTH)),
        "━" | "─" | "═" => Some((7, 9, 0, CELL_WIDTH)),
        "│" | "┃" | "║" => Some((0, CELL_HEIGHT, 3, 5)),
        "·" | "•" | "." => Some((7, 9, 3, 5)),
        _ => Some((4, 12, 1, CELL_WIDTH - 1)),
    }
}

/// Paint `frame` into an RGBA image.
pub fn rasterize(frame: &Buffer) -> RgbaImage {
    let area = frame.area;
    let mut img = RgbaImage::new(
        u32::from(area.width) * CELL_WIDTH,
        u32::from(area.height) * CELL_HEIGHT,
    );
    for row in 0..area.height {
        for col in 0..area.width {
            let Some(cell) = frame.cell((area.x + col, area.y + row)) else {
                continue;
            };
            let (fg, bg) = cell_colors(cell);
            let ink = ink_box(cell.symbol());
            let x0 = u32::from(col) * CELL_WIDTH;
            let y0 = u32::from(row) * CELL_HEIGHT;
            for dy in 0..CELL_HEIGHT {
                for dx in 0..CELL_WIDTH {
                    let inked = ink.is_some_and(|(top, bottom, left, right)| {
                        (top..bottom).contains(&dy) && (left..right).contains(&dx)
                    });
                    let [r, g, b] = if inked { fg } else { bg };
                    img.put_pixel(x0 + dx, y0 + dy, Rgba([r, g, b, 255]));
                }
            }
        }
    }
    img
}

pub fn encode_png(frame: &Buffer) -> Result<Vec<u8>, RecapError> {
    if frame.area.is_empty() {
        return Err(RecapError::Capture("nothing on screen to capture".into()));
    }
    let img = rasterize(frame);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| RecapError::Capture(e.to_string()))?;
    Ok(out.into_inner())
}

/// Encode `frame` and write it atomically to `path`.
pub fn save_png(frame: &Buffer, path: &Path) -> Result<(), RecapError> {
    let png = encode_png(frame)?;
    calltime_store::write_atomic(path, &png).map_err(|e| RecapError::Capture(e.to_string()))?;
    tracing::info!(path = %path.display(), bytes = png.len(), "slide captured");
    Ok(())
}
