/// Terminal front end: an ASCII view of the creature and the paint canvas
use anyhow::Context;
use critter_core::{
    parse_command, pointer_to_clip, submit_frame, BrushKind, Camera, Canvas, Clock, Creature,
    DragRotation, Gait, JointName, ProjectionMode,
};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info, warn};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;

pub use config::Config;
pub use renderer::AsciiRenderer;

/// Rows reserved for the status overlay
const OVERLAY_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Creature,
    Canvas,
}

/// Main application struct for the terminal renderer
pub struct TerminalApp {
    config: Config,
    creature: Creature,
    canvas: Canvas,
    view: View,
    selected: usize,
    prompt: Option<String>,
    status: String,
    clock: Clock,
    creature_camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        Self::with_size(config, width, height)
    }

    pub fn with_size(config: Config, width: u16, height: u16) -> anyhow::Result<Self> {
        let height = height.saturating_sub(OVERLAY_ROWS);
        let gait = Gait::standard().with_frequency(config.gait_frequency_hz);
        let mut creature = Creature::with_parts(critter_core::model::creature()?, gait);
        creature.set_animating(config.animate_on_start);

        let creature_camera = Camera::new(width as u32, height as u32)
            .with_distance(config.camera_distance)
            .with_mode(config.projection.into());

        Ok(Self {
            config,
            creature,
            canvas: Canvas::new(),
            view: View::Creature,
            selected: 0,
            prompt: None,
            status: String::new(),
            clock: Clock::start(),
            creature_camera,
            renderer: AsciiRenderer::new(width as usize, height as usize, creature_camera),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn selected_joint(&self) -> JointName {
        JointName::ALL[self.selected]
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.target_fps));

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                let height = height.saturating_sub(OVERLAY_ROWS);
                debug!("resize to {}x{}", width, height);
                self.renderer.resize(width as usize, height as usize);
                self.creature_camera.resize(width as u32, height as u32);
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.prompt.is_some() {
            self.handle_prompt_key(code);
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Tab => self.toggle_view(),
            KeyCode::Char(':') => {
                self.prompt = Some(String::new());
            }
            _ => match self.view {
                View::Creature => self.handle_creature_key(code),
                View::Canvas => self.handle_canvas_key(code),
            },
        }
    }

    fn handle_creature_key(&mut self, code: KeyCode) {
        let step = self.config.angle_step;
        let input = self.creature.input();
        match code {
            KeyCode::Char(' ') => {
                let animating = !input.animating();
                self.creature.set_animating(animating);
            }
            KeyCode::Char('[') => {
                self.selected = (self.selected + JointName::ALL.len() - 1) % JointName::ALL.len();
            }
            KeyCode::Char(']') => {
                self.selected = (self.selected + 1) % JointName::ALL.len();
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => self.nudge_joint(step),
            KeyCode::Char('-') | KeyCode::Down => self.nudge_joint(-step),
            KeyCode::Char('a') | KeyCode::Left => {
                let angle = input.global_angle() - step;
                self.creature.set_global_angle(angle);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                let angle = input.global_angle() + step;
                self.creature.set_global_angle(angle);
            }
            _ => {}
        }
    }

    fn nudge_joint(&mut self, delta: f32) {
        let joint = self.selected_joint();
        let current = self.creature.input().joint_angle(joint).unwrap_or(0.0);
        self.creature.set_joint_angle(joint, current + delta);
    }

    fn handle_canvas_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('c') => self.canvas.clear(),
            KeyCode::Char('f') => self.canvas.paint_picture(),
            KeyCode::Char('1') => self.canvas.brush.kind = BrushKind::Point,
            KeyCode::Char('2') => self.canvas.brush.kind = BrushKind::Triangle,
            KeyCode::Char('3') => self.canvas.brush.kind = BrushKind::Circle,
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Backspace => {
                prompt.pop();
            }
            KeyCode::Char(c) => prompt.push(c),
            KeyCode::Enter => {
                let line = std::mem::take(prompt);
                self.prompt = None;
                self.run_command(&line);
            }
            _ => {}
        }
    }

    pub fn run_command(&mut self, line: &str) {
        match parse_command(line) {
            Ok(command) => {
                self.creature.apply(command);
                self.status.clear();
            }
            Err(e) => {
                warn!("rejected command: {}", e);
                self.status = e.to_string();
            }
        }
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Creature => View::Canvas,
            View::Canvas => View::Creature,
        };
        let camera = match self.view {
            View::Creature => self.creature_camera,
            View::Canvas => self.creature_camera.with_mode(ProjectionMode::Clip),
        };
        self.renderer.set_camera(camera);
        info!("switched to {:?} view", self.view);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let (View::Creature, MouseEventKind::Up(MouseButton::Left)) = (self.view, mouse.kind) {
            self.creature.set_drag_rotation(0.0, 0.0, false);
            return;
        }

        // The overlay rows sit above the drawing area
        let Some(row) = mouse.row.checked_sub(OVERLAY_ROWS) else {
            return;
        };
        let (x, y) = pointer_to_clip(
            mouse.column as f32 + 0.5,
            row as f32 + 0.5,
            self.renderer.width() as f32,
            self.renderer.height() as f32,
        );

        match (self.view, mouse.kind) {
            (View::Creature, MouseEventKind::Down(MouseButton::Left))
            | (View::Creature, MouseEventKind::Drag(MouseButton::Left)) => {
                let drag = DragRotation::from_clip(x, y);
                self.creature.set_drag_rotation(drag.pitch, drag.yaw, true);
            }
            (View::Canvas, MouseEventKind::Down(MouseButton::Left))
            | (View::Canvas, MouseEventKind::Drag(MouseButton::Left)) => {
                if let Err(e) = self.canvas.click(x, y) {
                    warn!("brush rejected: {}", e);
                    self.status = e.to_string();
                }
            }
            _ => {}
        }
    }

    /// Rasterize the current view into the renderer's buffers
    pub fn draw_frame(&mut self, elapsed: f64) -> anyhow::Result<()> {
        self.renderer.clear();
        match self.view {
            View::Creature => {
                let frame = self.creature.advance_frame(elapsed)?;
                submit_frame(&frame, &mut self.renderer)?;
            }
            View::Canvas => self.canvas.render(&mut self.renderer)?,
        }
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.draw_frame(self.clock.elapsed_secs())?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, OVERLAY_ROWS))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.overlay()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn overlay(&self) -> String {
        if let Some(prompt) = &self.prompt {
            return format!(":{}", prompt);
        }
        let controls = match self.view {
            View::Creature => {
                let input = self.creature.input();
                let joint = self.selected_joint();
                format!(
                    "{} {:.0}° | camera {:.0}° | {} | []=joint +/-=angle a/d=camera space=animate drag=rotate",
                    joint,
                    input.joint_angle(joint).unwrap_or(0.0),
                    input.global_angle(),
                    if input.animating() { "walking" } else { "posing" },
                )
            }
            View::Canvas => format!(
                "{} strokes | brush {:?} | click=paint 1/2/3=brush f=fish c=clear",
                self.canvas.strokes().len(),
                self.canvas.brush.kind,
            ),
        };
        let mut line = format!("Critter | FPS: {:.1} | {} | Tab=view :=command Q=quit", self.fps, controls);
        if !self.status.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.status);
        }
        line
    }
}
