use bevy::mesh::{MeshVertexAttribute, MeshVertexBufferLayoutRef};
use bevy::pbr::{Material, MaterialPipeline, MaterialPipelineKey, MaterialPlugin};
use bevy::prelude::*;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderType, SpecializedMeshPipelineError,
    VertexFormat,
};
use bevy::shader::ShaderRef;

const SHADER_ASSET_PATH: &str = "shaders/tension_line.wgsl";

/// Per-vertex spring tension (current length / rest length)
pub const ATTRIBUTE_TENSION: MeshVertexAttribute =
    MeshVertexAttribute::new("Tension", 988_540_917, VertexFormat::Float32);

pub struct TensionLineMaterialPlugin;

impl Plugin for TensionLineMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<TensionLineMaterial>::default());
    }
}

/// Colour ramp parameters: `k = tension * tension_scale - tension_offset`
#[derive(ShaderType, Debug, Clone, Copy)]
pub struct TensionLineUniform {
    pub tension_scale: f32,
    pub tension_offset: f32,
    pub alpha: f32,
    pub _padding: f32,
}

impl Default for TensionLineUniform {
    fn default() -> Self {
        TensionLineUniform {
            tension_scale: 3.0,
            tension_offset: 2.0,
            alpha: 1.0,
            _padding: 0.0,
        }
    }
}

/// Material for the spring line-list mesh
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct TensionLineMaterial {
    #[uniform(0)]
    pub data: TensionLineUniform,
}

impl Material for TensionLineMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        if self.data.alpha < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        }
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // Only position + tension: the line mesh has no normals or UVs
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_TENSION.at_shader_location(1),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        Ok(())
    }
}

/// Resource to store the handle of the shared line mesh
#[derive(Resource)]
pub struct LineMeshHandle(pub Handle<Mesh>);
