#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Sprint.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the crate is built without the default `audio` feature. Audio cues are
//! handled by the owner of the session instead.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use maze_sprint_core::Intent;
use maze_sprint_rendering::{
    palette, BoardLayout, Color, FrameInput, Presentation, RenderingBackend, Scene,
};
use std::time::Duration;

/// Height of the heads-up display strip above the board.
const HUD_HEIGHT: f32 = 36.0;

/// Font size used by the heads-up display.
const HUD_FONT_SIZE: f32 = 24.0;

/// Font size used by full-screen banners.
const BANNER_FONT_SIZE: f32 = 48.0;

/// Keys that map onto player intents.
pub const KEY_BINDINGS: [(KeyCode, Intent); 10] = [
    (KeyCode::Up, Intent::MoveUp),
    (KeyCode::W, Intent::MoveUp),
    (KeyCode::Down, Intent::MoveDown),
    (KeyCode::S, Intent::MoveDown),
    (KeyCode::Left, Intent::MoveLeft),
    (KeyCode::A, Intent::MoveLeft),
    (KeyCode::Right, Intent::MoveRight),
    (KeyCode::D, Intent::MoveRight),
    (KeyCode::Enter, Intent::ConfirmStart),
    (KeyCode::Space, Intent::ConfirmStart),
];

/// Translates the keys reported by `pressed` into intents, in binding order.
#[must_use]
pub fn intents_from_keys<P>(mut pressed: P) -> Vec<Intent>
where
    P: FnMut(KeyCode) -> bool,
{
    KEY_BINDINGS
        .iter()
        .filter(|(key, _)| pressed(*key))
        .map(|(_, intent)| *intent)
        .collect()
}

#[derive(Debug)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// Gameplay intents pressed this frame.
    intents: Vec<Intent>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            intents: intents_from_keys(is_key_pressed),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_width,
            window_height,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_width).unwrap_or(i32::MAX),
            window_height: i32::try_from(window_height).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                update_scene(
                    frame_dt,
                    FrameInput {
                        intents: keyboard.intents,
                    },
                    &mut scene,
                );

                draw_hud(&scene);
                let board_height = (screen_height - HUD_HEIGHT).max(0.0);
                if let Ok(mut layout) =
                    BoardLayout::fit(scene.columns, scene.rows, screen_width, board_height)
                {
                    layout.origin.y += HUD_HEIGHT;
                    draw_board(&scene, &layout);
                }
                if let Some(banner) = scene.banner {
                    draw_banner(banner.text(), screen_width, screen_height);
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_board(scene: &Scene, layout: &BoardLayout) {
    let thickness = (layout.cell_size.min_element() / 8.0).max(1.0);
    let wall_color = to_macroquad_color(palette::WALL);
    for wall in &scene.walls {
        let from = layout.to_screen(wall.from);
        let to = layout.to_screen(wall.to);
        macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, wall_color);
    }

    let inset = layout.cell_size * 0.2;
    if let Some(goal) = scene.goal {
        let corner = layout.to_screen(Vec2::new(goal.column() as f32, goal.row() as f32));
        let size = layout.cell_size - inset * 2.0;
        macroquad::shapes::draw_rectangle(
            corner.x + inset.x,
            corner.y + inset.y,
            size.x,
            size.y,
            to_macroquad_color(palette::GOAL),
        );
    }

    let radius = layout.cell_size.min_element() * 0.3;
    for bonus in &scene.bonuses {
        let center = layout.cell_center(bonus.cell);
        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(bonus.color));
    }

    if let Some(avatar) = scene.avatar {
        let center = layout.cell_center(avatar);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius * 1.2,
            to_macroquad_color(palette::AVATAR),
        );
    }

    let award_color = to_macroquad_color(palette::AWARD);
    for floating in &scene.floating_texts {
        let center = layout.cell_center(floating.cell);
        let _ = macroquad::text::draw_text(
            &floating.text,
            center.x - layout.cell_size.x,
            center.y - layout.cell_size.y * 0.6,
            HUD_FONT_SIZE,
            award_color,
        );
    }
}

fn draw_hud(scene: &Scene) {
    let _ = macroquad::text::draw_text(
        &scene.hud.to_string(),
        8.0,
        HUD_HEIGHT - 10.0,
        HUD_FONT_SIZE,
        to_macroquad_color(palette::TEXT),
    );
}

fn draw_banner(text: &str, screen_width: f32, screen_height: f32) {
    let dimensions = macroquad::text::measure_text(text, None, BANNER_FONT_SIZE as u16, 1.0);
    let _ = macroquad::text::draw_text(
        text,
        (screen_width - dimensions.width) / 2.0,
        screen_height / 2.0,
        BANNER_FONT_SIZE,
        to_macroquad_color(palette::TEXT),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
