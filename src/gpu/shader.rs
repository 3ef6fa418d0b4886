use bytemuck::{Pod, Zeroable};

use crate::render::Sprite;

pub const SPRITE_SOURCE: &str = include_str!("sprite.wgsl");

/// Per-instance data for one sprite quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
    pub angle: f32,
    pub corner_radius: f32,
    pub alpha: f32,
    pub _pad: f32,
}

impl SpriteInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32,
        3 => Float32,
        4 => Float32
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&Sprite> for SpriteInstance {
    fn from(sprite: &Sprite) -> Self {
        Self {
            center: sprite.center.to_array(),
            half_extents: sprite.half_extents().to_array(),
            angle: sprite.angle(),
            corner_radius: sprite.corner_radius(),
            alpha: sprite.alpha.clamp(0.0, 1.0),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    /// Logical screen size the sprite coordinates are expressed in.
    pub screen_size: [f32; 2],
    /// 1.0 when the surface composites premultiplied colour.
    pub premultiplied: f32,
    pub _pad: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Shape;
    use glam::Vec2;

    #[test]
    fn test_instance_layout_size() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 32);
        assert_eq!(std::mem::size_of::<Uniforms>(), 16);
    }

    #[test]
    fn test_instance_from_disc() {
        let sprite = Sprite {
            center: Vec2::new(10.0, 20.0),
            alpha: 0.5,
            shape: Shape::Disc { radius: 3.0 },
        };
        let instance = SpriteInstance::from(&sprite);
        assert_eq!(instance.center, [10.0, 20.0]);
        assert_eq!(instance.half_extents, [3.0, 3.0]);
        assert_eq!(instance.corner_radius, 3.0);
        assert_eq!(instance.angle, 0.0);
    }

    #[test]
    fn test_shader_validates() {
        let module = naga::front::wgsl::parse_str(SPRITE_SOURCE).expect("WGSL parse failed");
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).expect("WGSL validation failed");
    }
}
