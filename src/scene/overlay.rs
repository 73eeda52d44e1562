//! The "back" button drawn over every example and level scene.

use crate::{
    backend::{TextureId, TextureLoader, Wrap},
    data_structures::model::{ColoredVertex, Index, Vertex},
    frame::{Frame, Topology},
    math,
    platform::{BACK_BUTTON, PlatformState},
    shader::{ColorShader, TexturedShader},
};

/// Fill behind the label, translucent dark blue.
pub const BACKGROUND_COLOR: [f32; 4] = [0.2, 0.2, 0.4, 0.9];

const QUAD_INDICES: [Index; 6] = [0, 1, 2, 0, 2, 3];

/// Owns the label texture built from the platform's pending bitmap.
#[derive(Debug, Default)]
pub struct BackButtonOverlay {
    texture: Option<TextureId>,
}

/// Button edges in the centered pixel space of the overlay projection, where
/// the window center is the origin and Y points up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl OverlayRect {
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let (half_w, half_h) = (width * 0.5, height * 0.5);
        Self {
            left: BACK_BUTTON.left - half_w,
            right: BACK_BUTTON.right() - half_w,
            top: (height - BACK_BUTTON.top) - half_h,
            bottom: (height - BACK_BUTTON.bottom()) - half_h,
        }
    }

    /// Corners from bottom-left, counter-clockwise.
    fn corners(&self) -> [[f32; 3]; 4] {
        [
            [self.left, self.bottom, 0.0],
            [self.right, self.bottom, 0.0],
            [self.right, self.top, 0.0],
            [self.left, self.top, 0.0],
        ]
    }
}

impl BackButtonOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Replaces the label texture with the pending bitmap, if there is one.
    fn refresh_texture<L: TextureLoader + ?Sized>(&mut self, platform: &PlatformState, loader: &mut L) {
        let Some(label) = platform.try_take_pending() else {
            return;
        };
        if let Some(old) = self.texture.take() {
            loader.delete_texture(old);
        }
        match loader.create_texture_rgba(label.width, label.height, &label.pixels, Wrap::ClampToEdge) {
            Ok(texture) => {
                log::debug!("Overlay label is {} ({}x{})", texture, label.width, label.height);
                self.texture = Some(texture);
            }
            Err(e) => log::warn!("Could not create the overlay label texture: {:#}", e),
        }
    }

    /// Draws the button over whatever `frame` holds so far. Does nothing when
    /// no example or level scene is active or the viewport is empty.
    ///
    /// Leaves the textured shader's projection and UV offset changed.
    pub fn draw<L: TextureLoader + ?Sized>(
        &mut self,
        platform: &PlatformState,
        loader: &mut L,
        frame: &mut Frame,
        textured: &mut TexturedShader,
        colored: &mut ColorShader,
        (width, height): (u32, u32),
    ) {
        if !platform.selection().has_back_button() || width == 0 || height == 0 {
            return;
        }
        self.refresh_texture(platform, loader);

        let (w, h) = (width as f32, height as f32);
        let projection = math::orthographic(h * 0.5, w / h, -1.0, 1.0);
        let corners = OverlayRect::for_viewport(w, h).corners();

        frame.set_depth_test(false);

        colored.activate(frame);
        colored.set_mvp(&projection);
        let background = corners.map(|p| ColoredVertex::new(p, BACKGROUND_COLOR));
        colored.draw(frame, &background, &QUAD_INDICES, Topology::Triangles);

        if let Some(texture) = self.texture {
            let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
            let label: [Vertex; 4] = std::array::from_fn(|i| Vertex::new(corners[i], uvs[i]));
            textured.activate(frame);
            textured.set_tex_offset(0.0, 0.0);
            textured.set_projection_matrix(&projection);
            textured.draw_textured_quad(frame, &label, &QUAD_INDICES, Some(texture));
        }

        frame.set_depth_test(true);
    }

    pub fn release<L: TextureLoader + ?Sized>(&mut self, loader: &mut L) {
        if let Some(texture) = self.texture.take() {
            loader.delete_texture(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_sits_in_the_top_left_corner() {
        let rect = OverlayRect::for_viewport(800.0, 600.0);
        assert_eq!(rect.left, -380.0);
        assert_eq!(rect.right, -180.0);
        assert_eq!(rect.top, 280.0);
        assert_eq!(rect.bottom, 224.0);
    }
}
