//! Frame output and color registration over crossterm.
use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use termesh_core::{Buffer, Camera, Material};

/// Foreground color slots registered for materials. Faces whose material
/// index falls past the cap render with the default foreground instead of
/// failing.
const COLOR_SLOTS: usize = 255;

/// Material colors registered once at startup from the mesh's material list.
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// No registered colors; every cell renders with the default foreground.
    pub fn empty() -> Self {
        Self { colors: Vec::new() }
    }

    pub fn from_materials(materials: &[Material]) -> Self {
        let colors = materials
            .iter()
            .take(COLOR_SLOTS)
            .map(|m| Color::Rgb {
                r: channel(m.diffuse.x),
                g: channel(m.diffuse.y),
                b: channel(m.diffuse.z),
            })
            .collect();
        Self { colors }
    }

    /// Color for a cell's material index; `None` for uncolored cells and for
    /// indices past the registered slots.
    pub fn color(&self, material: Option<usize>) -> Option<Color> {
        material.and_then(|m| self.colors.get(m).copied())
    }
}

/// [0, 1] reflectance to an 8-bit channel.
fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Queue one frame of the grid. The foreground color switches only when a
/// cell's palette entry differs from the previous cell's.
pub fn draw_frame<W: Write>(writer: &mut W, buffer: &Buffer, palette: &Palette) -> io::Result<()> {
    let mut current: Option<Color> = None;

    for row in 0..buffer.rows() {
        queue!(writer, cursor::MoveTo(0, row as u16))?;
        for pixel in buffer.row(row) {
            let color = palette.color(pixel.material);
            if color != current {
                match color {
                    Some(c) => queue!(writer, SetForegroundColor(c))?,
                    None => queue!(writer, ResetColor)?,
                }
                current = color;
            }
            queue!(writer, Print(pixel.glyph))?;
        }
    }

    if current.is_some() {
        queue!(writer, ResetColor)?;
    }
    Ok(())
}

/// Queue the HUD overlay in the top-left corner.
pub fn draw_hud<W: Write>(writer: &mut W, camera: &Camera, fps: f32) -> io::Result<()> {
    let lines = [
        format!("framerate {:6.0} fps", fps),
        format!("zoom      {:6.1} x", camera.zoom),
        format!("azimuth   {:6.1} deg", camera.azimuth.to_degrees()),
        format!("altitude  {:6.1} deg", camera.altitude.to_degrees()),
    ];

    for (row, line) in lines.iter().enumerate() {
        queue!(writer, cursor::MoveTo(0, row as u16), Print(line))?;
    }
    Ok(())
}
