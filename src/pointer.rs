//! Virtual pointer targeting
//!
//! The pointer target is moved on the fixed simulation clock and read on the
//! render clock. Each step remembers where the target was at the start of the
//! step (`prev`) and where handlers queued it to (`cur`); rendering linearly
//! interpolates between the two with the render engine's sub-step fraction, so
//! on-screen motion stays smooth when frame rate and step rate differ.

use tracing::{debug, trace};

/// Target cursor in window pixel space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VirtualPointer {
    prev_x: i32,
    prev_y: i32,
    cur_x: i32,
    cur_y: i32,
    window_width: u32,
    window_height: u32,
}

impl VirtualPointer {
    /// Creates a pointer centred in a window of the given size.
    pub fn new(window_width: u32, window_height: u32) -> Self {
        let mut pointer = Self::default();
        pointer.reset_to_center(window_width, window_height);
        pointer
    }

    /// Start of a simulation step: the queued target becomes the new origin.
    pub fn advance(&mut self) {
        self.prev_x = self.cur_x;
        self.prev_y = self.cur_y;
    }

    /// Moves the target to an absolute position, clamped to the window.
    pub fn queue_absolute(&mut self, x: f64, y: f64) {
        self.cur_x = x.clamp(0.0, f64::from(self.window_width)) as i32;
        self.cur_y = y.clamp(0.0, f64::from(self.window_height)) as i32;
        trace!("Pointer target queued at ({}, {})", self.cur_x, self.cur_y);
    }

    /// Moves the target relative to its current queued position.
    pub fn queue_relative(&mut self, dx: f64, dy: f64) {
        self.queue_absolute(f64::from(self.cur_x) + dx, f64::from(self.cur_y) + dy);
    }

    /// Interpolated position for the render path.
    ///
    /// `fraction` is the render engine's progress through the current step
    /// (0.0 to 1.0). The half pixel offset lands on pixel centres.
    pub fn render_position(&self, fraction: f32) -> (f64, f64) {
        let fraction = f64::from(fraction);
        let x = f64::from(self.prev_x) + f64::from(self.cur_x - self.prev_x) * fraction + 0.5;
        let y = f64::from(self.prev_y) + f64::from(self.cur_y - self.prev_y) * fraction + 0.5;
        (x, y)
    }

    /// Whether the target moved during the current step.
    pub fn is_moving(&self) -> bool {
        self.prev_x != self.cur_x || self.prev_y != self.cur_y
    }

    /// Window resize: adopt the new bounds and jump to the centre.
    pub fn reset_to_center(&mut self, window_width: u32, window_height: u32) {
        self.window_width = window_width;
        self.window_height = window_height;
        let x = (window_width as f32 / 2.0) as i32;
        let y = (window_height as f32 / 2.0) as i32;
        self.jump_to(x, y);
        debug!("Pointer reset to window centre ({}, {})", x, y);
    }

    /// Mode switch: adopt the position of the real hardware cursor.
    pub fn reset_to_current_hardware_cursor(&mut self, x: f64, y: f64) {
        self.jump_to(x as i32, y as i32);
        debug!("Pointer reset to hardware cursor ({}, {})", self.cur_x, self.cur_y);
    }

    pub fn target(&self) -> (i32, i32) {
        (self.cur_x, self.cur_y)
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    fn jump_to(&mut self, x: i32, y: i32) {
        self.prev_x = x;
        self.cur_x = x;
        self.prev_y = y;
        self.cur_y = y;
    }
}
