use bytemuck::{Pod, Zeroable};

/// Per-sprite render data read by the host through `get_sprites_ptr`.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// X position: viewport units (vw) before `viewport_split`, pixels after.
    pub x: f32,
    /// Y position: viewport units (vh) before `viewport_split`, pixels after.
    pub y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Uniform scale factor applied on top of `size`.
    pub scale: f32,
    /// Index into the glyph table.
    pub glyph: f32,
    /// Opacity, 0.0..=1.0.
    pub alpha: f32,
    /// Font size in pixels.
    pub size: f32,
    /// Bit flags, see `FLAG_*`.
    pub flags: f32,
}

impl SpriteInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Light drop-shadow (night) instead of dark (day).
    pub const FLAG_NIGHT_GLOW: u32 = 1;
    /// Drawn above page content (bursts, transition blossoms).
    pub const FLAG_FOREGROUND: u32 = 2;

    pub fn has_flag(&self, flag: u32) -> bool {
        (self.flags as u32) & flag != 0
    }
}

/// Sprite instances for one frame.
///
/// Viewport-anchored sprites (ambient blossoms) come first, pixel-anchored
/// ones (trails, bursts, transition blossoms, notes) after `viewport_split`.
pub struct RenderBuffer {
    pub instances: Vec<SpriteInstance>,
    pub viewport_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            viewport_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.viewport_split = 0;
    }

    pub fn push(&mut self, instance: SpriteInstance) {
        self.instances.push(instance);
    }

    /// Mark the current length as the end of the viewport-anchored run.
    pub fn end_viewport_run(&mut self) {
        self.viewport_split = self.instances.len() as u32;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for zero-copy reads from the host.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
