//! Name lookup for WGSL sources.
//!
//! GL resolves attribute and uniform names against a linked program. WGSL has
//! no such query, so names are read straight from the source: attributes are
//! the `@location` members of the `VertexInput` struct, uniforms are the
//! members of the struct bound with `var<uniform>`, laid out with the WGSL
//! uniform address space rules.

use std::sync::LazyLock;

use regex::Regex;

static STRUCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"struct\s+(\w+)\s*\{([^}]*)\}").unwrap());
static UNIFORM_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var<uniform>\s+\w+\s*:\s*(\w+)").unwrap());
static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@location\(\s*(\d+)\s*\)").unwrap());
static MEMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*:\s*([\w<>]+)\s*$").unwrap());
static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//[^\n]*").unwrap());

/// Name of the struct whose members are the vertex attributes.
pub const VERTEX_INPUT_STRUCT: &str = "VertexInput";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformMember {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reflection {
    attributes: Vec<(String, u32)>,
    uniforms: Vec<UniformMember>,
    uniform_block_size: u32,
}

impl Reflection {
    pub fn parse(source: &str) -> Self {
        let source = LINE_COMMENT_RE.replace_all(source, "");
        let structs: Vec<(&str, &str)> = STRUCT_RE
            .captures_iter(&source)
            .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
            .collect();
        let body_of = |name: &str| {
            structs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, body)| *body)
        };

        let attributes = body_of(VERTEX_INPUT_STRUCT)
            .map(|body| {
                members(body)
                    .filter_map(|(decorations, name, _)| {
                        let location = LOCATION_RE.captures(decorations)?.get(1)?;
                        Some((name.to_string(), location.as_str().parse().ok()?))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut uniforms = Vec::new();
        let mut uniform_block_size: u32 = 0;
        let uniform_type = UNIFORM_VAR_RE
            .captures(&source)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        if let Some(body) = uniform_type.and_then(body_of) {
            let mut offset: u32 = 0;
            let mut max_align: u32 = 4;
            for (_, name, ty) in members(body) {
                let (size, align) = layout_of(ty);
                offset = offset.next_multiple_of(align);
                uniforms.push(UniformMember {
                    name: name.to_string(),
                    offset,
                    size,
                });
                offset += size;
                max_align = max_align.max(align);
            }
            uniform_block_size = offset.next_multiple_of(max_align.max(16));
        }

        Self {
            attributes,
            uniforms,
            uniform_block_size,
        }
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, location)| *location)
    }

    /// Byte offset of `name` inside the uniform struct.
    pub fn uniform_offset(&self, name: &str) -> Option<u32> {
        self.uniforms
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.offset)
    }

    pub fn uniforms(&self) -> &[UniformMember] {
        &self.uniforms
    }

    pub fn uniform_block_size(&self) -> u32 {
        self.uniform_block_size
    }
}

/// Splits a struct body into `(decorations, name, type)` triples.
fn members(body: &str) -> impl Iterator<Item = (&str, &str, &str)> {
    body.split(',').filter_map(|member| {
        let member = member.trim();
        let captures = MEMBER_RE.captures(member)?;
        let whole = captures.get(0)?;
        Some((
            &member[..whole.start()],
            captures.get(1)?.as_str(),
            captures.get(2)?.as_str(),
        ))
    })
}

/// `(size, alignment)` in the uniform address space.
fn layout_of(ty: &str) -> (u32, u32) {
    match ty {
        "f32" | "i32" | "u32" => (4, 4),
        "vec2<f32>" | "vec2f" => (8, 8),
        "vec3<f32>" | "vec3f" => (12, 16),
        "vec4<f32>" | "vec4f" => (16, 16),
        "mat3x3<f32>" | "mat3x3f" => (48, 16),
        "mat4x4<f32>" | "mat4x4f" => (64, 16),
        other => {
            log::warn!("unknown uniform type `{}`, assuming 16 bytes", other);
            (16, 16)
        }
    }
}
