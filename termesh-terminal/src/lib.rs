//! Terminal session, input handling, and the frame loop.
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, terminal,
};
use termesh_core::{render, Buffer, Camera, Light, Mesh, RenderOptions, DEFAULT_CHAR_ASPECT};

pub mod display;

use display::Palette;

/// Frame budget; caps the loop at roughly 30 fps.
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Setup choices collected by the CLI, applied once before the loop starts.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    /// Initial camera zoom.
    pub zoom: f32,
    /// Azimuth spin rate in deg/s, when animating.
    pub animate: Option<f32>,
    pub color: bool,
    pub static_light: bool,
}

/// Owns the terminal session and drives the render loop.
pub struct TerminalApp {
    mesh: Mesh,
    camera: Camera,
    light: Light,
    buffer: Buffer,
    palette: Palette,
    options: RenderOptions,
    animate: Option<f32>,
    hud: bool,
    running: bool,
    out: Stdout,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, options: AppOptions) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;

        let palette = if options.color {
            Palette::from_materials(&mesh.materials)
        } else {
            Palette::empty()
        };

        Ok(Self {
            camera: Camera::new(options.zoom),
            light: Light::default(),
            buffer: Buffer::new(cols as usize, rows as usize, DEFAULT_CHAR_ASPECT),
            palette,
            options: RenderOptions {
                static_light: options.static_light,
                color: options.color,
            },
            animate: options.animate,
            hud: false,
            running: true,
            mesh,
            out: stdout(),
        })
    }

    /// Run the frame loop inside a raw-mode alternate screen, restoring the
    /// terminal on the way out.
    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(self.out, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut last = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = frame_start.duration_since(last).as_secs_f32();
            last = frame_start;

            if let Some(rate) = self.animate {
                self.camera.rotate_left_by(rate.to_radians() * dt);
            }

            self.buffer.clear();
            render(
                &mut self.buffer,
                &self.mesh,
                &self.camera,
                &self.light,
                self.options,
            );

            display::draw_frame(&mut self.out, &self.buffer, &self.palette)?;
            if self.hud {
                let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
                display::draw_hud(&mut self.out, &self.camera, fps)?;
            }
            self.out.flush()?;

            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
                    Event::Resize(cols, rows) => {
                        // logical scale factors depend on the new aspect,
                        // so the grid is rebuilt rather than resized
                        self.buffer =
                            Buffer::new(cols as usize, rows as usize, DEFAULT_CHAR_ASPECT);
                    }
                    _ => {}
                }
            }

            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                std::thread::sleep(FRAME_DURATION - elapsed);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Tab => {
                self.hud = !self.hud;
                return;
            }
            _ => {}
        }

        // arrows / vim / wasd
        let mut moved = true;
        match code {
            KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => self.camera.rotate_left(),
            KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => self.camera.rotate_right(),
            KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => self.camera.rotate_up(),
            KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => self.camera.rotate_down(),
            KeyCode::Char('+' | '=' | 'i' | 'I') => self.camera.zoom_in(),
            KeyCode::Char('-' | 'o' | 'O') => self.camera.zoom_out(),
            _ => moved = false,
        }

        // any manual control takes over from the animation
        if moved {
            self.animate = None;
        }
    }
}
