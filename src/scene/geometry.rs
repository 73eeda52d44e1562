//! Static geometry of every example, built once when the example is selected.

use crate::{
    backend::{TextureId, TextureLoader},
    data_structures::model::{ColoredMesh, ColoredVertex, Index, Model, Vertex},
    frame::Topology,
};

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub const WOOD: &str = "wood.jpg";
pub const GRASS: &str = "grass.jpg";
pub const ATLAS: &str = "set-001.jpg";
pub const ROBOT: &str = "android_robot.png";

const QUAD_INDICES: [Index; 6] = [0, 1, 2, 0, 2, 3];
const PYRAMID_INDICES: [Index; 18] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 12, 14, 15];

/// Meshes of one example plus the textures they were built with.
///
/// The geometry owns the textures it loaded; models only borrow the handles.
#[derive(Debug, Default)]
pub struct SceneGeometry {
    pub models: Vec<Model>,
    pub colored: Vec<ColoredMesh>,
    /// Topology the colored meshes are drawn with.
    pub topology: Topology,
    textures: Vec<TextureId>,
}

impl SceneGeometry {
    /// Builds the geometry of `example_index`. Any index without a numbered
    /// example gets the base scene.
    ///
    /// A texture that fails to load is logged and leaves its models with no
    /// texture; they are still drawn.
    pub fn build<L: TextureLoader + ?Sized>(example_index: i32, loader: &mut L) -> Self {
        let mut scene = Self::default();
        match example_index {
            1 => scene.colored.push(triangle()),
            2 => scene.colored.push(colored_quad()),
            3 => {
                scene.colored.push(wire_cube(1.0));
                scene.topology = Topology::Lines;
            }
            4 => scene.colored.push(colored_cube(1.0)),
            5 => {
                scene.colored.push(colored_cube(0.5));
                scene.colored.push(colored_pyramid(0.5));
            }
            6 => {
                let wood = scene.load(loader, WOOD);
                scene.models.push(textured_quad(1.0, wood));
            }
            7 | 13 => {
                let wood = scene.load(loader, WOOD);
                scene.models.push(textured_cube(1.0, wood));
            }
            8 => {
                let wood = scene.load(loader, WOOD);
                let grass = scene.load(loader, GRASS);
                for (face, vertices) in cube_faces(1.0).into_iter().enumerate() {
                    let texture = if face == TOP_FACE { grass } else { wood };
                    scene.models.push(Model::new(vertices.to_vec(), QUAD_INDICES.to_vec(), texture));
                }
            }
            9 => {
                let wood = scene.load(loader, WOOD);
                scene.models.push(textured_quad(2.0, wood));
            }
            10 => {
                let wood = scene.load(loader, WOOD);
                scene.models.push(textured_quad(3.0, wood));
            }
            11 => {
                let atlas = scene.load(loader, ATLAS);
                scene.models.extend(atlas_tiles(atlas));
            }
            12 => {
                let wood = scene.load(loader, WOOD);
                let grass = scene.load(loader, GRASS);
                scene.models.push(textured_cube(0.5, wood));
                scene.models.push(textured_pyramid(0.5, grass));
            }
            14 => {
                let grass = scene.load(loader, GRASS);
                let wood = scene.load(loader, WOOD);
                let atlas = scene.load(loader, ATLAS);
                scene.models.push(ground(grass));
                scene.models.push(textured_cube(0.5, wood));
                scene.models.push(atlas_quad(
                    [[0.9, 0.9], [1.9, 0.9], [1.9, 1.9], [0.9, 1.9]],
                    1.5,
                    [[0.0, 0.0], [0.25, 0.0], [0.25, 0.25], [0.0, 0.25]],
                    atlas,
                ));
                scene.models.push(atlas_quad(
                    [[-0.9, 0.6], [-0.1, 0.6], [-0.1, 1.4], [-0.9, 1.4]],
                    1.5,
                    [[0.25, 0.25], [0.5, 0.25], [0.5, 0.5], [0.25, 0.5]],
                    atlas,
                ));
            }
            15 => {
                let wood = scene.load(loader, WOOD);
                let atlas = scene.load(loader, ATLAS);
                scene.models.push(textured_cube(1.0, wood));
                scene.models.push(atlas_quad(
                    [[1.9, -0.3], [2.5, -0.3], [2.5, 0.3], [1.9, 0.3]],
                    0.0,
                    [[0.0, 0.0], [0.25, 0.0], [0.25, 0.25], [0.0, 0.25]],
                    atlas,
                ));
            }
            _ => {
                let robot = scene.load(loader, ROBOT);
                scene.models.push(robot_quad(robot));
            }
        }
        log::info!(
            "Built example {}: {} models, {} colored meshes, {} textures",
            example_index,
            scene.models.len(),
            scene.colored.len(),
            scene.textures.len()
        );
        scene
    }

    fn load<L: TextureLoader + ?Sized>(&mut self, loader: &mut L, name: &str) -> Option<TextureId> {
        match loader.load_texture(name) {
            Ok(texture) => {
                self.textures.push(texture);
                Some(texture)
            }
            Err(e) => {
                log::warn!("Could not load texture {}: {:#}", name, e);
                None
            }
        }
    }

    /// Textures loaded for this geometry.
    pub fn textures(&self) -> &[TextureId] {
        &self.textures
    }

    /// Deletes the owned textures and drops every mesh.
    pub fn release<L: TextureLoader + ?Sized>(&mut self, loader: &mut L) {
        for texture in self.textures.drain(..) {
            loader.delete_texture(texture);
        }
        self.models.clear();
        self.colored.clear();
    }
}

fn triangle() -> ColoredMesh {
    ColoredMesh::new(
        vec![
            ColoredVertex::new([0.0, 1.0, 0.0], RED),
            ColoredVertex::new([-1.0, -1.0, 0.0], GREEN),
            ColoredVertex::new([1.0, -1.0, 0.0], BLUE),
        ],
        vec![0, 1, 2],
    )
}

fn colored_quad() -> ColoredMesh {
    ColoredMesh::new(
        vec![
            ColoredVertex::new([-1.0, 1.0, 0.0], RED),
            ColoredVertex::new([1.0, 1.0, 0.0], GREEN),
            ColoredVertex::new([1.0, -1.0, 0.0], BLUE),
            ColoredVertex::new([-1.0, -1.0, 0.0], YELLOW),
        ],
        QUAD_INDICES.to_vec(),
    )
}

fn wire_cube(s: f32) -> ColoredMesh {
    let corners = [
        [-s, -s, s],
        [s, -s, s],
        [s, s, s],
        [-s, s, s],
        [-s, -s, -s],
        [s, -s, -s],
        [s, s, -s],
        [-s, s, -s],
    ];
    ColoredMesh::new(
        corners.iter().map(|&p| ColoredVertex::new(p, WHITE)).collect(),
        vec![
            0, 1, 1, 2, 2, 3, 3, 0, // front
            4, 5, 5, 6, 6, 7, 7, 4, // back
            0, 4, 1, 5, 2, 6, 3, 7,
        ],
    )
}

/// Four indices per face, two triangles each.
fn face_indices(faces: usize) -> Vec<Index> {
    (0..faces as Index)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b, b + 2, b + 3]
        })
        .collect()
}

/// Corner positions of the six cube faces: front, back, top, bottom, right, left.
fn cube_corners(s: f32) -> [[[f32; 3]; 4]; 6] {
    [
        [[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]],
        [[-s, -s, -s], [-s, s, -s], [s, s, -s], [s, -s, -s]],
        [[-s, s, -s], [-s, s, s], [s, s, s], [s, s, -s]],
        [[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]],
        [[s, -s, -s], [s, s, -s], [s, s, s], [s, -s, s]],
        [[-s, -s, -s], [-s, -s, s], [-s, s, s], [-s, s, -s]],
    ]
}

const TOP_FACE: usize = 2;

const CUBE_FACE_UVS: [[[f32; 2]; 4]; 6] = [
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
    [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
    [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
    [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
];

fn colored_cube(s: f32) -> ColoredMesh {
    let colors = [RED, GREEN, BLUE, YELLOW, MAGENTA, CYAN];
    let vertices = cube_corners(s)
        .into_iter()
        .zip(colors)
        .flat_map(|(corners, color)| corners.map(|p| ColoredVertex::new(p, color)))
        .collect();
    ColoredMesh::new(vertices, face_indices(6))
}

fn colored_pyramid(h: f32) -> ColoredMesh {
    let apex = [0.0, h, 0.0];
    let vertices = vec![
        ColoredVertex::new(apex, RED),
        ColoredVertex::new([-h, -h, h], GREEN),
        ColoredVertex::new([h, -h, h], BLUE),
        ColoredVertex::new(apex, YELLOW),
        ColoredVertex::new([h, -h, -h], CYAN),
        ColoredVertex::new([-h, -h, -h], MAGENTA),
        ColoredVertex::new(apex, RED),
        ColoredVertex::new([h, -h, h], BLUE),
        ColoredVertex::new([h, -h, -h], MAGENTA),
        ColoredVertex::new(apex, GREEN),
        ColoredVertex::new([-h, -h, -h], CYAN),
        ColoredVertex::new([-h, -h, h], RED),
        // base
        ColoredVertex::new([-h, -h, h], WHITE),
        ColoredVertex::new([h, -h, h], WHITE),
        ColoredVertex::new([h, -h, -h], WHITE),
        ColoredVertex::new([-h, -h, -h], WHITE),
    ];
    ColoredMesh::new(vertices, PYRAMID_INDICES.to_vec())
}

fn cube_faces(s: f32) -> [[Vertex; 4]; 6] {
    let corners = cube_corners(s);
    std::array::from_fn(|face| {
        std::array::from_fn(|i| Vertex::new(corners[face][i], CUBE_FACE_UVS[face][i]))
    })
}

fn textured_cube(s: f32, texture: Option<TextureId>) -> Model {
    let vertices = cube_faces(s).into_iter().flatten().collect();
    Model::new(vertices, face_indices(6), texture)
}

/// Square of half-size 1 in the XY plane; UVs run from 0 to `repeat`.
fn textured_quad(repeat: f32, texture: Option<TextureId>) -> Model {
    Model::new(
        vec![
            Vertex::new([-1.0, -1.0, 0.0], [0.0, 0.0]),
            Vertex::new([1.0, -1.0, 0.0], [repeat, 0.0]),
            Vertex::new([1.0, 1.0, 0.0], [repeat, repeat]),
            Vertex::new([-1.0, 1.0, 0.0], [0.0, repeat]),
        ],
        QUAD_INDICES.to_vec(),
        texture,
    )
}

fn textured_pyramid(h: f32, texture: Option<TextureId>) -> Model {
    let apex = [0.0, h, 0.0];
    let tip = [0.5, 1.0];
    let vertices = vec![
        Vertex::new(apex, tip),
        Vertex::new([-h, -h, h], [0.0, 0.0]),
        Vertex::new([h, -h, h], [1.0, 0.0]),
        Vertex::new(apex, tip),
        Vertex::new([h, -h, -h], [1.0, 0.0]),
        Vertex::new([-h, -h, -h], [0.0, 0.0]),
        Vertex::new(apex, tip),
        Vertex::new([h, -h, h], [0.0, 0.0]),
        Vertex::new([h, -h, -h], [1.0, 0.0]),
        Vertex::new(apex, tip),
        Vertex::new([-h, -h, -h], [1.0, 0.0]),
        Vertex::new([-h, -h, h], [0.0, 0.0]),
        Vertex::new([-h, -h, h], [0.0, 0.0]),
        Vertex::new([h, -h, h], [1.0, 0.0]),
        Vertex::new([h, -h, -h], [1.0, 1.0]),
        Vertex::new([-h, -h, -h], [0.0, 1.0]),
    ];
    Model::new(vertices, PYRAMID_INDICES.to_vec(), texture)
}

/// A 2x2 block of cells cut from the top-left of a 4x4 atlas.
fn atlas_tiles(atlas: Option<TextureId>) -> Vec<Model> {
    let mut tiles = Vec::with_capacity(4);
    for row in 0..2 {
        for col in 0..2 {
            let (u1, u2) = (col as f32 / 4.0, (col + 1) as f32 / 4.0);
            let (v1, v2) = (row as f32 / 4.0, (row + 1) as f32 / 4.0);
            let x = col as f32 * 2.0 - 1.0;
            let y = 1.0 - row as f32 * 2.0;
            tiles.push(atlas_quad(
                [
                    [x - 0.5, y - 0.5],
                    [x + 0.5, y - 0.5],
                    [x + 0.5, y + 0.5],
                    [x - 0.5, y + 0.5],
                ],
                0.0,
                [[u1, v1], [u2, v1], [u2, v2], [u1, v2]],
                atlas,
            ));
        }
    }
    tiles
}

fn atlas_quad(
    corners: [[f32; 2]; 4],
    z: f32,
    uvs: [[f32; 2]; 4],
    texture: Option<TextureId>,
) -> Model {
    let vertices = corners
        .iter()
        .zip(uvs)
        .map(|(&[x, y], uv)| Vertex::new([x, y, z], uv))
        .collect();
    Model::new(vertices, QUAD_INDICES.to_vec(), texture)
}

fn ground(texture: Option<TextureId>) -> Model {
    Model::new(
        vec![
            Vertex::new([-3.0, 0.0, -3.0], [0.0, 0.0]),
            Vertex::new([3.0, 0.0, -3.0], [4.0, 0.0]),
            Vertex::new([3.0, 0.0, 3.0], [4.0, 4.0]),
            Vertex::new([-3.0, 0.0, 3.0], [0.0, 4.0]),
        ],
        QUAD_INDICES.to_vec(),
        texture,
    )
}

/// Base scene quad. The UVs are mirrored so the image reads correctly under
/// the base scene's orthographic projection.
fn robot_quad(texture: Option<TextureId>) -> Model {
    Model::new(
        vec![
            Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0]),
            Vertex::new([-1.0, 1.0, 0.0], [1.0, 0.0]),
            Vertex::new([-1.0, -1.0, 0.0], [1.0, 1.0]),
            Vertex::new([1.0, -1.0, 0.0], [0.0, 1.0]),
        ],
        QUAD_INDICES.to_vec(),
        texture,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_faces_index_their_own_corners() {
        let indices = face_indices(6);
        assert_eq!(indices.len(), 36);
        assert_eq!(&indices[6..12], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(*indices.iter().max().unwrap(), 23);
    }

    #[test]
    fn wire_cube_is_twelve_edges() {
        let cube = wire_cube(1.0);
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.indices.len(), 24);
    }

    #[test]
    fn atlas_tiles_use_quarter_cells() {
        let tiles = atlas_tiles(None);
        assert_eq!(tiles.len(), 4);
        let last = &tiles[3];
        assert_eq!(last.vertices[0].position, [0.5, -1.5, 0.0]);
        assert_eq!(last.vertices[2].uv, [0.5, 0.5]);
    }

    #[test]
    fn pyramid_base_is_two_triangles() {
        let pyramid = colored_pyramid(0.5);
        assert_eq!(pyramid.vertices.len(), 16);
        assert_eq!(&pyramid.indices[12..], &[12, 13, 14, 12, 14, 15]);
    }
}
