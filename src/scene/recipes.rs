//! The fixed per-example draw recipes.
//!
//! Every numbered example draws one or more objects with the transform
//! `P * T * Tobj * R1 * R2 ...`, where `T` pulls the camera back, `Tobj` places
//! the object and the rotations are listed in the order they are multiplied.
//! A [`Recipe`] records exactly that per example; [`super::Renderer`] evaluates it.

use crate::scene::animation::AngleSource;

/// Camera pull-back shared by all perspective examples.
pub const CAMERA_TRANSLATION: [f32; 3] = [0.0, 0.0, -6.0];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A rotation of `factor * angle(source)` degrees about `axis`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spin {
    pub axis: Axis,
    pub source: AngleSource,
    pub factor: f32,
}

const fn spin(axis: Axis, source: AngleSource) -> Spin {
    Spin {
        axis,
        source,
        factor: 1.0,
    }
}

const fn scaled(axis: Axis, source: AngleSource, factor: f32) -> Spin {
    Spin {
        axis,
        source,
        factor,
    }
}

/// What an object draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshRef {
    /// One of the colored meshes, drawn with the colored shader.
    Colored(usize),
    /// One textured model.
    Model(usize),
    /// Every textured model under a single transform.
    AllModels,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObjectRecipe {
    pub translation: [f32; 3],
    pub spins: &'static [Spin],
    pub mesh: MeshRef,
}

/// UV scroll written before a textured recipe draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TexOffset {
    /// Leave whatever offset the shader holds.
    Keep,
    Zero,
    /// `(texture_offset, texture_offset)` from the animation state.
    Scroll,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Recipe {
    pub objects: &'static [ObjectRecipe],
    pub tex_offset: TexOffset,
}

const ORIGIN: [f32; 3] = [0.0, 0.0, 0.0];
const LEFT: [f32; 3] = [-1.5, 0.0, 0.0];
const RIGHT: [f32; 3] = [1.5, 0.0, 0.0];

use AngleSource::*;
use Axis::{X, Y, Z};

const TUMBLE_SLOW: &[Spin] = &[spin(Y, Angle), scaled(X, Angle, 0.5)];
const TUMBLE_XYZ: &[Spin] = &[spin(Y, AngleY), spin(X, AngleX), spin(Z, AngleZ)];
const TUMBLE_XY: &[Spin] = &[spin(Y, AngleY), spin(X, AngleX)];
const CUBE_SPIN: &[Spin] = &[spin(Y, CubeY), spin(X, CubeX)];
const PYRAMID_SPIN: &[Spin] = &[spin(Y, PyramidY), spin(X, PyramidX)];
const TURN: &[Spin] = &[spin(Y, Angle)];
const TILT_HALF: &[Spin] = &[spin(Y, Angle), scaled(X, AngleX, 0.5)];
const STILL: &[Spin] = &[];
const TURN_DOUBLE: &[Spin] = &[scaled(Y, Angle, 2.0)];
const TURN_REVERSED: &[Spin] = &[scaled(Y, Angle, -1.0)];
const TURN_AND_HALF: &[Spin] = &[scaled(Y, Angle, 1.5)];

const fn object(translation: [f32; 3], spins: &'static [Spin], mesh: MeshRef) -> ObjectRecipe {
    ObjectRecipe {
        translation,
        spins,
        mesh,
    }
}

static COLORED_SLOW: Recipe = Recipe {
    objects: &[object(ORIGIN, TUMBLE_SLOW, MeshRef::Colored(0))],
    tex_offset: TexOffset::Keep,
};

static COLORED_XYZ: Recipe = Recipe {
    objects: &[object(ORIGIN, TUMBLE_XYZ, MeshRef::Colored(0))],
    tex_offset: TexOffset::Keep,
};

static CUBE_AND_PYRAMID: Recipe = Recipe {
    objects: &[
        object(LEFT, CUBE_SPIN, MeshRef::Colored(0)),
        object(RIGHT, PYRAMID_SPIN, MeshRef::Colored(1)),
    ],
    tex_offset: TexOffset::Keep,
};

static TEXTURED_QUAD: Recipe = Recipe {
    objects: &[object(ORIGIN, TILT_HALF, MeshRef::Model(0))],
    tex_offset: TexOffset::Keep,
};

static FIRST_MODEL_XY: Recipe = Recipe {
    objects: &[object(ORIGIN, TUMBLE_XY, MeshRef::Model(0))],
    tex_offset: TexOffset::Zero,
};

static ALL_MODELS_XY: Recipe = Recipe {
    objects: &[object(ORIGIN, TUMBLE_XY, MeshRef::AllModels)],
    tex_offset: TexOffset::Zero,
};

static SCROLLING_QUAD: Recipe = Recipe {
    objects: &[object(ORIGIN, TURN, MeshRef::Model(0))],
    tex_offset: TexOffset::Scroll,
};

static TURNING_QUAD: Recipe = Recipe {
    objects: &[object(ORIGIN, TURN, MeshRef::Model(0))],
    tex_offset: TexOffset::Zero,
};

static TEXTURED_CUBE_AND_PYRAMID: Recipe = Recipe {
    objects: &[
        object(LEFT, CUBE_SPIN, MeshRef::Model(0)),
        object(RIGHT, PYRAMID_SPIN, MeshRef::Model(1)),
    ],
    tex_offset: TexOffset::Zero,
};

static GROUND_SCENE: Recipe = Recipe {
    objects: &[
        object([0.0, -2.0, 0.0], STILL, MeshRef::Model(0)),
        object(LEFT, TURN_DOUBLE, MeshRef::Model(1)),
        object(RIGHT, TURN_REVERSED, MeshRef::Model(2)),
        object([0.0, 1.5, 0.0], TURN_AND_HALF, MeshRef::Model(3)),
    ],
    tex_offset: TexOffset::Zero,
};

/// The recipe of a numbered example, `None` outside `1..=15`.
pub fn recipe(example_index: i32) -> Option<&'static Recipe> {
    let recipe = match example_index {
        1 | 2 => &COLORED_SLOW,
        3 | 4 => &COLORED_XYZ,
        5 => &CUBE_AND_PYRAMID,
        6 => &TEXTURED_QUAD,
        7 | 13 => &FIRST_MODEL_XY,
        8 | 11 | 15 => &ALL_MODELS_XY,
        9 => &SCROLLING_QUAD,
        10 => &TURNING_QUAD,
        12 => &TEXTURED_CUBE_AND_PYRAMID,
        14 => &GROUND_SCENE,
        _ => return None,
    };
    Some(recipe)
}

/// Menu title of an example; index 0 is the base scene.
pub fn example_title(example_index: i32) -> &'static str {
    match example_index {
        1 => "001: Rotating triangle",
        2 => "002: Colored square",
        3 => "003: Wireframe cube",
        4 => "004: Solid cube, one color per face",
        5 => "005: Cube and pyramid",
        6 => "006: Textured square",
        7 => "007: Wood cube",
        8 => "008: Wood cube with grass top",
        9 => "009: Scrolling texture",
        10 => "010: Repeated texture",
        11 => "011: Tiles from an atlas",
        12 => "012: Wood cube and grass pyramid",
        13 => "013: Wood cube, flat lit",
        14 => "014: Ground, cube and tiles",
        15 => "015: Wood cube and atlas tile",
        _ => "Base scene",
    }
}

/// Menu title of a level scene.
pub fn scene_title(scene_index: i32) -> &'static str {
    match scene_index {
        0 => "Floor",
        1 => "Walls",
        2 => "Objects",
        3 => "Enemies",
        4 => "Player",
        _ => "No scene",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_numbered_example_has_a_recipe() {
        for index in 1..=15 {
            assert!(recipe(index).is_some(), "example {index}");
        }
        assert!(recipe(0).is_none());
        assert!(recipe(16).is_none());
    }

    #[test]
    fn multi_object_examples_place_objects_apart() {
        let five = recipe(5).unwrap();
        assert_eq!(five.objects.len(), 2);
        assert_eq!(five.objects[0].translation, LEFT);
        assert_eq!(five.objects[1].mesh, MeshRef::Colored(1));

        let fourteen = recipe(14).unwrap();
        assert_eq!(fourteen.objects.len(), 4);
        assert!(fourteen.objects[0].spins.is_empty());
        assert_eq!(fourteen.objects[2].spins[0].factor, -1.0);
    }

    #[test]
    fn only_example_nine_scrolls() {
        for index in 1..=15 {
            let scrolls = recipe(index).unwrap().tex_offset == TexOffset::Scroll;
            assert_eq!(scrolls, index == 9, "example {index}");
        }
    }
}
