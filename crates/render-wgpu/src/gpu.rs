use crate::camera::ChaseCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use ringflight_kernel::Simulation;
use wgpu::util::DeviceExt;

/// Segments drawn per ring.
pub const RING_SEGMENTS: usize = 16;

const SKY: [f32; 4] = [0.529, 0.808, 0.980, 1.0];
const FOG_DENSITY: f32 = 0.004;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CRAFT_COLOR: [f32; 4] = [0.95, 0.75, 0.1, 1.0];
const CURRENT_RING_COLOR: [f32; 4] = [0.9, 0.15, 0.1, 1.0];
const RING_COLOR: [f32; 4] = [0.15, 0.35, 0.9, 1.0];
const PASSED_RING_COLOR: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
const WALL_COLOR: [f32; 4] = [0.1, 0.2, 0.1, 1.0];
const FLOOR_COLOR: [f32; 4] = [0.25, 0.45, 0.25, 1.0];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    fog_color: [f32; 4],
    fog_params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
        }
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model_3[0], self.model_3[1], self.model_3[2])
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Unit cube vertices and indices.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let p = normal * 0.5 + u * su + v * sv;
            vertices.push(Vertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// Boxes for one frame: the craft first, then every ring's segments.
pub fn scene_instances(sim: &Simulation) -> Vec<InstanceData> {
    let craft = sim.craft();
    let bounds = sim.craft_bounds();
    let track = sim.track();
    let shape = track.shape();

    let mut out = Vec::with_capacity(1 + track.rings().len() * RING_SEGMENTS);
    let craft_model = Mat4::from_translation(craft.position)
        * Mat4::from_rotation_y(craft.yaw.to_radians())
        * Mat4::from_translation(bounds.center())
        * Mat4::from_scale(bounds.size().max(Vec3::splat(0.01)));
    out.push(InstanceData::new(craft_model, CRAFT_COLOR));

    let segment_len = std::f32::consts::TAU * shape.outer / RING_SEGMENTS as f32 * 1.05;
    let thickness = 2.0 * shape.tube;
    for (i, ring) in track.rings().iter().enumerate() {
        let color = match i.cmp(&track.cursor()) {
            std::cmp::Ordering::Less => PASSED_RING_COLOR,
            std::cmp::Ordering::Equal => CURRENT_RING_COLOR,
            std::cmp::Ordering::Greater => RING_COLOR,
        };
        let ring_model =
            Mat4::from_translation(ring.position) * Mat4::from_rotation_y(ring.spin.to_radians());
        for k in 0..RING_SEGMENTS {
            let theta = std::f32::consts::TAU * k as f32 / RING_SEGMENTS as f32;
            let (sin, cos) = theta.sin_cos();
            // segment y runs along the tube, z points away from the centre
            let segment = Mat4::from_scale_rotation_translation(
                Vec3::new(thickness, segment_len, thickness),
                Quat::from_rotation_x(-theta),
                Vec3::new(0.0, shape.outer * sin, shape.outer * cos),
            );
            out.push(InstanceData::new(ring_model * segment, color));
        }
    }
    out
}

/// Corridor wireframe plus floor lines at every ring row.
pub fn corridor_lines(sim: &Simulation) -> Vec<LineVertex> {
    let track = sim.track();
    let b = track.corridor().bounds;
    let corners = b.corners();
    // pairs of corner indices that differ in exactly one axis
    let mut out = Vec::new();
    for i in 0..8usize {
        for axis in [1usize, 2, 4] {
            let j = i | axis;
            if j != i {
                out.push(LineVertex {
                    position: corners[i].to_array(),
                    color: WALL_COLOR,
                });
                out.push(LineVertex {
                    position: corners[j].to_array(),
                    color: WALL_COLOR,
                });
            }
        }
    }

    let mut xs: Vec<f32> = track.rings().iter().map(|r| r.position.x).collect();
    xs.dedup();
    for x in xs {
        out.push(LineVertex {
            position: [x, b.min.y, b.min.z],
            color: FLOOR_COLOR,
        });
        out.push(LineVertex {
            position: [x, b.min.y, b.max.z],
            color: FLOOR_COLOR,
        });
    }
    out
}

/// Shader and vertex layout for one depth-tested scene pipeline.
struct ScenePass<'a> {
    label: &'a str,
    source: &'a str,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
}

fn scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    pass: ScenePass<'_>,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(pass.label),
        source: wgpu::ShaderSource::Wgsl(pass.source.into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(pass.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(pass.vertex_entry),
            compilation_options: Default::default(),
            buffers: pass.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(pass.fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: pass.topology,
            cull_mode: pass.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// wgpu renderer for the corridor, rings and craft.
pub struct WgpuRenderer {
    box_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    line_buffer: wgpu::Buffer,
    max_line_vertices: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                eye: [0.0; 4],
                fog_color: SKY,
                fog_params: [0.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let box_pipeline = scene_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            ScenePass {
                label: "box",
                source: shaders::BOX_SHADER,
                vertex_entry: "vs_main",
                fragment_entry: "fs_main",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4
                        ],
                    },
                ],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
            },
        );

        let line_pipeline = scene_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            ScenePass {
                label: "line",
                source: shaders::LINE_SHADER,
                vertex_entry: "vs_line",
                fragment_entry: "fs_line",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
                }],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
            },
        );

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let cube_index_count = cube_indices.len() as u32;

        let max_line_vertices = 4_096u32;
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line_buffer"),
            size: max_line_vertices as u64 * std::mem::size_of::<LineVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let max_instances = 32_768u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: max_instances as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);
        tracing::debug!(?surface_format, width, height, "wgpu renderer ready");

        Self {
            box_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count,
            line_buffer,
            max_line_vertices,
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: corridor lines, craft and rings, fogged when the
    /// simulation has fog switched on.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &ChaseCamera,
        sim: &Simulation,
    ) {
        let density = if sim.fog() { FOG_DENSITY } else { 0.0 };
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                eye: camera.eye.extend(1.0).to_array(),
                fog_color: SKY,
                fog_params: [density, 0.0, 0.0, 0.0],
            }),
        );

        let mut instances = scene_instances(sim);
        if instances.len() > self.max_instances as usize {
            tracing::warn!(count = instances.len(), "instance buffer full, dropping rings");
            instances.truncate(self.max_instances as usize);
        }
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let mut lines = corridor_lines(sim);
        lines.truncate(self.max_line_vertices as usize);
        queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&lines));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: SKY[0] as f64,
                            g: SKY[1] as f64,
                            b: SKY[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if !lines.is_empty() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                pass.draw(0..lines.len() as u32, 0..1);
            }

            pass.set_pipeline(&self.box_pipeline);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.cube_index_count, 0, 0..instances.len() as u32);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
