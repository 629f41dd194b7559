#![warn(missing_docs)]
//! Mouse input for the orbit controls.

use glam::Vec2;
use std::collections::HashSet;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixels of touchpad scroll that count as one wheel step.
const PIXELS_PER_STEP: f32 = 100.0;

/// What a drag does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    /// Left button: orbit around the target.
    Rotate,
    /// Right button: move the target in the view plane.
    Pan,
}

/// Camera input gathered over one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitInput {
    /// Pixels dragged with the rotate button held.
    pub rotate: Vec2,
    /// Pixels dragged with the pan button held.
    pub pan: Vec2,
    /// Wheel steps; positive zooms in.
    pub zoom_steps: f32,
}

impl OrbitInput {
    /// Whether anything happened this frame.
    pub fn is_empty(&self) -> bool {
        self.rotate == Vec2::ZERO && self.pan == Vec2::ZERO && self.zoom_steps == 0.0
    }
}

/// Mouse state tracking for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Mouse buttons currently pressed.
    mouse_buttons: HashSet<MouseButton>,
    /// Last known cursor position, `None` while outside the window.
    cursor: Option<Vec2>,
    /// Accumulated frame input.
    frame: OrbitInput,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event the UI did not consume.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(*position),
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput { state, button, .. } => {
                self.button(*button, *state == ElementState::Pressed)
            }
            WindowEvent::MouseWheel { delta, .. } => self.wheel(*delta),
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// Cursor moved to `position`; drags accumulate while a button is held.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let position = Vec2::new(position.x as f32, position.y as f32);
        if let (Some(previous), Some(action)) = (self.cursor, self.drag_action()) {
            let delta = position - previous;
            match action {
                DragAction::Rotate => self.frame.rotate += delta,
                DragAction::Pan => self.frame.pan += delta,
            }
        }
        self.cursor = Some(position);
    }

    /// Button pressed or released.
    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    /// Wheel or touchpad scroll. Scrolling up zooms in.
    pub fn wheel(&mut self, delta: MouseScrollDelta) {
        self.frame.zoom_steps += match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_STEP,
        };
    }

    /// Process a window event the UI consumed.
    ///
    /// A click claimed by the UI never starts a drag, and a release over the
    /// UI still ends the drag that began on the scene.
    pub fn handle_claimed_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { .. } => self.release_all(),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            _ => {}
        }
    }

    /// Forget every held button, ending any drag.
    pub fn release_all(&mut self) {
        self.mouse_buttons.clear();
    }

    /// Active drag, if any. Rotate takes priority when both buttons are held.
    pub fn drag_action(&self) -> Option<DragAction> {
        if self.mouse_buttons.contains(&MouseButton::Left) {
            Some(DragAction::Rotate)
        } else if self.mouse_buttons.contains(&MouseButton::Right) {
            Some(DragAction::Pan)
        } else {
            None
        }
    }

    /// Input gathered since the last [`InputState::begin_frame`].
    pub fn orbit_input(&self) -> OrbitInput {
        self.frame
    }

    /// Reset per-frame state (call after the frame's input was consumed).
    pub fn begin_frame(&mut self) {
        self.frame = OrbitInput::default();
    }
}
