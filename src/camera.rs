use glam::Vec2;

use crate::world::World;

/// Camera uniform uploaded to the GPU. Holds the combined view-projection matrix.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2/w`, `sy = -2/h`, `tx = -1 - sx*vx`, `ty = 1 - sy*vy`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Column-major 4×4 view-projection matrix sent to the vertex shader.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Plain orthographic projection (no camera transform).
    /// Maps pixel coords [0..w] × [0..h] directly to clip space.
    /// Used for the screen pass so that the minimap and overlays stay fixed.
    pub fn identity_ortho(width: f32, height: f32) -> Self {
        let sx = 2.0 / width;
        let sy = -2.0 / height;
        Self {
            view_proj: [
                [sx,   0.0,  0.0, 0.0], // col0
                [0.0,  sy,   0.0, 0.0], // col1
                [0.0,  0.0,  1.0, 0.0], // col2
                [-1.0, 1.0,  0.0, 1.0], // col3
            ],
        }
    }

    /// World pass projection: world point `(viewport.x, viewport.y)` lands on
    /// the top-left pixel, i.e. world content is translated by `-viewport`.
    ///
    /// Derivation (y-down pixel space → NDC):
    /// ```text
    /// x_ndc = sx * (world_x - vx) - 1
    /// y_ndc = sy * (world_y - vy) + 1
    /// ```
    pub fn for_viewport(viewport: &Viewport) -> Self {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let sx = 2.0 / w;
        let sy = -2.0 / h;
        let tx = -1.0 - sx * viewport.x;
        let ty = 1.0 - sy * viewport.y;
        Self {
            view_proj: [
                [sx,  0.0, 0.0, 0.0], // col0
                [0.0, sy,  0.0, 0.0], // col1
                [0.0, 0.0, 1.0, 0.0], // col2
                [tx,  ty,  0.0, 1.0], // col3
            ],
        }
    }
}

/// The camera's world-space window: top-left corner plus the canvas size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    /// Canvas width in pixels (tracks the surface, not an independent setting).
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { x: 0.0, y: 0.0, width, height }
    }

    /// Centre the camera on `player`, clamped so it never shows area outside
    /// the world.  A canvas larger than the world pins the camera to 0.
    /// No easing: the camera snaps to the clamped target every call.
    pub fn follow(&mut self, player: Vec2, world: &World) {
        let target_x = player.x - self.width / 2.0;
        let target_y = player.y - self.height / 2.0;
        self.x = target_x.clamp(0.0, (world.width() - self.width).max(0.0));
        self.y = target_y.clamp(0.0, (world.height() - self.height).max(0.0));
    }

    /// New canvas size; recomputes the offset immediately.
    pub fn resize(&mut self, width: f32, height: f32, player: Vec2, world: &World) {
        self.width = width;
        self.height = height;
        self.follow(player, world);
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Convert world coordinates to canvas pixels.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.origin()
    }

    /// Convert canvas pixels to world coordinates.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.origin()
    }
}
