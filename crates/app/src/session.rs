//! One viewer session: board + camera + input, stepped frame by frame.

use anyhow::{Context, Result};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use corelib::board::{Board, GameStatus};
use corelib::camera::{Camera, CameraConfig};
use corelib::pick::{CellCoord, PickResolver};
use corelib::ray::intersect_plane_z;
use corelib::vec3;
use platform::{Action, CursorMode, FlightController, InputSnapshot, KeyBindings};
use renderer::FrameData;

use crate::config::{AppConfig, Aim};

/// Ground plane the board lies on.
const BOARD_Z: f32 = 0.0;
/// Camera starts this high above the board centre, looking straight down.
const START_HEIGHT: f32 = 5.0;

pub struct Session {
    board: Board,
    camera: Camera,
    resolver: PickResolver,
    controller: FlightController,
    bindings: KeyBindings,
    cursor: CursorMode,
    cell_size: f32,
    mines: u32,
    seed: Option<u64>,
    new_game_was_held: bool,
}

impl Session {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let board = Board::new(cfg.board_x, cfg.board_y, cfg.mines, cfg.seed)
            .context("Failed to create board")?;
        let resolver =
            PickResolver::for_board(&board, cfg.cell_size).context("Invalid cell size")?;

        let center = vec3(
            cfg.board_x as f32 * cfg.cell_size / 2.0,
            cfg.board_y as f32 * cfg.cell_size / 2.0,
            START_HEIGHT,
        );
        let camera = Camera::new(
            CameraConfig {
                width: cfg.width,
                height: cfg.height,
                ..CameraConfig::default()
            },
            center,
            vec3(0.0, 0.0, -1.0),
            vec3(-1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        )
        .context("Failed to create camera")?;

        let cursor = CursorMode::with_aiming(cfg.aim == Aim::Cursor);

        Ok(Self {
            board,
            camera,
            resolver,
            controller: FlightController::default(),
            bindings: KeyBindings::default(),
            cursor,
            cell_size: cfg.cell_size,
            mines: cfg.mines,
            seed: cfg.seed,
            new_game_was_held: false,
        })
    }

    /// Fresh board of the same size and mine count. The camera stays put.
    pub fn restart(&mut self, seed: Option<u64>) -> Result<()> {
        let (size_x, size_y) = self.board.size();
        self.board = Board::new(size_x, size_y, self.mines, seed)
            .context("Failed to create board")?;
        log::info!("New game started (seed={seed:?})");
        Ok(())
    }

    /// Window resize: the projection follows the new aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.camera
            .set_screen_size(width, height)
            .context("Resize rejected")?;
        log::info!("Resized: {width}x{height}");
        Ok(())
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn cursor(&self) -> &CursorMode {
        &self.cursor
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    /// Input first, then capture the matrices for drawing.
    pub fn frame(&mut self, keys: &[KeyCode], mouse_delta: (f32, f32), dt: f32) -> FrameData {
        let input = InputSnapshot::from_keys(keys.iter().copied(), &self.bindings)
            .with_mouse_delta(mouse_delta.0, mouse_delta.1);
        self.cursor.update(input.is_held(Action::ToggleCursor));

        let new_game = input.is_held(Action::NewGame);
        if new_game && !self.new_game_was_held {
            if let Err(e) = self.restart(self.seed) {
                log::error!("{e:#}");
            }
        }
        self.new_game_was_held = new_game;

        self.controller
            .apply(&mut self.camera, &input, dt, &self.cursor);
        FrameData::capture(&self.camera, &self.board, self.cell_size)
    }

    /// Cast through the cursor (or the boresight when the cursor is locked)
    /// and apply the button's action to the picked cell.
    pub fn click(&mut self, button: MouseButton, x: f32, y: f32) -> Option<CellCoord> {
        let action = platform::pick_action(button)?;
        let ray = if self.cursor.cursor_aiming() {
            self.camera.ray_through_screen_position(x, y)
        } else {
            self.camera.ray()
        };
        let hit = intersect_plane_z(&ray, BOARD_Z);
        let picked = self.resolver.dispatch(&mut self.board, &hit, action);
        match picked {
            Some(c) => log::info!("{action:?} at cell ({}, {})", c.x, c.y),
            None => log::info!("Click at ({x:.0}, {y:.0}) missed the board"),
        }
        picked
    }
}
