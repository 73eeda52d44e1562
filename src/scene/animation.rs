//! Angles advanced once per frame while a numbered example runs.

/// One of the animated quantities a recipe can rotate by.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AngleSource {
    Angle,
    AngleX,
    AngleY,
    AngleZ,
    CubeX,
    CubeY,
    PyramidX,
    PyramidY,
}

/// Angles are in degrees and grow without bound; `texture_offset` wraps into
/// `[0, 1)`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub angle: f32,
    pub angle_x: f32,
    pub angle_y: f32,
    pub angle_z: f32,
    pub cube_angle_x: f32,
    pub cube_angle_y: f32,
    pub pyramid_angle_x: f32,
    pub pyramid_angle_y: f32,
    pub texture_offset: f32,
}

impl AnimationState {
    pub fn advance(&mut self) {
        self.angle += 0.5;
        self.angle_x += 0.5;
        self.angle_y += 0.4;
        self.angle_z += 0.3;
        self.cube_angle_x += 0.5;
        self.cube_angle_y += 0.4;
        self.pyramid_angle_x += 0.4;
        self.pyramid_angle_y += 0.3;
        self.texture_offset += 0.002;
        if self.texture_offset >= 1.0 {
            self.texture_offset -= 1.0;
        }
    }

    pub fn get(&self, source: AngleSource) -> f32 {
        match source {
            AngleSource::Angle => self.angle,
            AngleSource::AngleX => self.angle_x,
            AngleSource::AngleY => self.angle_y,
            AngleSource::AngleZ => self.angle_z,
            AngleSource::CubeX => self.cube_angle_x,
            AngleSource::CubeY => self.cube_angle_y,
            AngleSource::PyramidX => self.pyramid_angle_x,
            AngleSource::PyramidY => self.pyramid_angle_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_applies_fixed_increments() {
        let mut state = AnimationState::default();
        state.advance();
        state.advance();
        assert!((state.angle - 1.0).abs() < 1e-6);
        assert!((state.angle_y - 0.8).abs() < 1e-6);
        assert!((state.angle_z - 0.6).abs() < 1e-6);
        assert!((state.pyramid_angle_y - 0.6).abs() < 1e-6);
        assert!((state.texture_offset - 0.004).abs() < 1e-6);
    }

    #[test]
    fn texture_offset_stays_in_unit_range() {
        let mut state = AnimationState::default();
        for _ in 0..2_000 {
            state.advance();
            assert!((0.0..1.0).contains(&state.texture_offset));
        }
        // angles keep growing
        assert!(state.angle > 999.0);
    }
}
