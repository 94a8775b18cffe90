#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use foundation::math::{Quat, Vec3, mat4_from_scale_rotation_translation, mat4_mul};
    use narrative::{FrameView, SurfaceError};

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub stars_pipeline: ::wgpu::RenderPipeline,
        pub stars_count: u32,
        pub globe_pipeline: ::wgpu::RenderPipeline,
        pub markers_pipeline: ::wgpu::RenderPipeline,
        pub uniform_buffer: ::wgpu::Buffer,
        pub uniform_bind_group: ::wgpu::BindGroup,
        pub depth_view: ::wgpu::TextureView,
        pub vertex_buffer: ::wgpu::Buffer,
        pub index_buffer: ::wgpu::Buffer,
        pub index_count: u32,
        pub markers_vertex_buffer: ::wgpu::Buffer,
        pub markers_capacity: usize,
    }

    const GLOBE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_dir: vec3<f32>,
    star_shift: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) local: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    let world = globals.model * vec4<f32>(position, 1.0);
    let n = (globals.model * vec4<f32>(normal, 0.0)).xyz;
    return VsOut(globals.view_proj * world, n, position);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(globals.light_dir);
    let ndotl = max(dot(n, l), 0.0);

    // Procedural ocean bands; no texture needed.
    let lon = atan2(fs_in.local.x, fs_in.local.z);
    let band = 0.5 + 0.5 * sin(fs_in.local.y * 18.0) * cos(lon * 9.0);
    let base = mix(vec3<f32>(0.05, 0.22, 0.45), vec3<f32>(0.10, 0.42, 0.70), band);

    // Atmosphere rim.
    let rim = pow(1.0 - abs(n.z), 3.0);
    let shade = 0.25 + 0.75 * ndotl;
    return vec4<f32>(base * shade + vec3<f32>(0.25, 0.45, 0.9) * rim * 0.6, 1.0);
}
"#;

    const STARS_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_dir: vec3<f32>,
    star_shift: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

fn hash_u32(x_in: u32) -> u32 {
    var x = x_in;
    x ^= x >> 16u;
    x *= 0x7feb352du;
    x ^= x >> 15u;
    x *= 0x846ca68bu;
    x ^= x >> 16u;
    return x;
}

fn hash01(x: u32) -> f32 {
    return f32(hash_u32(x)) / 4294967295.0;
}

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) a: f32,
};

@vertex
fn vs_main(@builtin(vertex_index) vid: u32) -> VsOut {
    let rx = hash01(vid ^ 0x68bc21ebu);
    let ry = hash01(vid ^ 0x02e5be93u);
    let rb = hash01(vid ^ 0x9e3779b9u);

    // Nearer (brighter) stars drift faster.
    let depth = 0.3 + 0.7 * rb;
    let x = fract(rx + globals.star_shift * depth) * 2.0 - 1.0;
    let y = ry * 2.0 - 1.0;
    let a = 0.03 + 0.22 * rb * rb;

    return VsOut(vec4<f32>(x, y, 0.9999, 1.0), a);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, in.a);
}
"#;

    const MARKERS_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_dir: vec3<f32>,
    star_shift: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) opacity: f32,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) opacity: f32) -> VsOut {
    return VsOut(globals.view_proj * vec4<f32>(position, 1.0), opacity);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.82, 0.25, in.opacity);
}
"#;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        position: [f32; 3],
        normal: [f32; 3],
    }

    #[repr(C)]
    #[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct MarkerVertex {
        position: [f32; 3],
        opacity: f32,
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        model: [[f32; 4]; 4],
        light_dir: [f32; 3],
        star_shift: f32,
    }

    const LIGHT_DIR: [f32; 3] = [0.4, 0.7, 0.6];
    const STAR_COUNT: u32 = 1200;

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("portfolio-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    /// Unit sphere, Y-up, matching the marker projection.
    fn generate_sphere_mesh(lat_segments: u32, lon_segments: u32) -> (Vec<Vertex>, Vec<u16>) {
        let lat_segments = lat_segments.max(3);
        let lon_segments = lon_segments.max(3);

        let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
        for lat in 0..=lat_segments {
            let v = lat as f32 / lat_segments as f32;
            let theta = v * std::f32::consts::PI;
            let (sin_t, cos_t) = theta.sin_cos();

            for lon in 0..=lon_segments {
                let u = lon as f32 / lon_segments as f32;
                let phi = u * std::f32::consts::TAU;
                let (sin_p, cos_p) = phi.sin_cos();

                let p = [sin_t * sin_p, cos_t, sin_t * cos_p];
                vertices.push(Vertex {
                    position: p,
                    normal: p,
                });
            }
        }

        let stride = lon_segments + 1;
        let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
        for lat in 0..lat_segments {
            for lon in 0..lon_segments {
                let i0 = lat * stride + lon;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                for i in [i0, i2, i1, i1, i2, i3] {
                    indices.push(i as u16);
                }
            }
        }

        (vertices, indices)
    }

    struct PipelineDesc<'a> {
        label: &'a str,
        shader: &'a ::wgpu::ShaderModule,
        vertex_stride: ::wgpu::BufferAddress,
        /// Empty for shaders that synthesize their vertices.
        attributes: &'a [::wgpu::VertexAttribute],
        blend: ::wgpu::BlendState,
        topology: ::wgpu::PrimitiveTopology,
        depth: Option<::wgpu::DepthStencilState>,
    }

    fn create_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        format: ::wgpu::TextureFormat,
        desc: PipelineDesc<'_>,
    ) -> ::wgpu::RenderPipeline {
        let layouts = [::wgpu::VertexBufferLayout {
            array_stride: desc.vertex_stride,
            step_mode: ::wgpu::VertexStepMode::Vertex,
            attributes: desc.attributes,
        }];
        let buffers: &[::wgpu::VertexBufferLayout<'_>] = if desc.attributes.is_empty() {
            &[]
        } else {
            &layouts
        };
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module: desc.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers,
            },
            fragment: Some(::wgpu::FragmentState {
                module: desc.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(desc.blend),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: desc.topology,
                ..Default::default()
            },
            depth_stencil: desc.depth,
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    fn depth_state(write: bool, compare: ::wgpu::CompareFunction) -> ::wgpu::DepthStencilState {
        ::wgpu::DepthStencilState {
            format: ::wgpu::TextureFormat::Depth24Plus,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: ::wgpu::StencilState::default(),
            bias: ::wgpu::DepthBiasState::default(),
        }
    }

    const GLOBE_ATTRIBUTES: [::wgpu::VertexAttribute; 2] =
        ::wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    const MARKER_ATTRIBUTES: [::wgpu::VertexAttribute; 2] =
        ::wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

    pub async fn init_wgpu_from_canvas_id(canvas_id: &str) -> Result<WgpuContext, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas_elem = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas missing"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let width = canvas_elem.width();
        let height = canvas_elem.height();

        // The surface must not outlive its instance; leak the instance for
        // the lifetime of the page.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("portfolio-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| JsValue::from_str("surface has no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let globe_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("portfolio-globe-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(GLOBE_SHADER)),
        });
        let stars_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("portfolio-stars-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(STARS_SHADER)),
        });
        let markers_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("portfolio-markers-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(MARKERS_SHADER)),
        });

        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("portfolio-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("portfolio-globals-bgl"),
                entries: &[::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: ::wgpu::BindingType::Buffer {
                        ty: ::wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("portfolio-globals-bg"),
            layout: &uniform_bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("portfolio-pipeline-layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            immediate_size: 0,
        });

        let stars_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineDesc {
                label: "portfolio-stars-pipeline",
                shader: &stars_shader,
                vertex_stride: 0,
                attributes: &[],
                blend: ::wgpu::BlendState::ALPHA_BLENDING,
                topology: ::wgpu::PrimitiveTopology::PointList,
                depth: None,
            },
        );
        let globe_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineDesc {
                label: "portfolio-globe-pipeline",
                shader: &globe_shader,
                vertex_stride: std::mem::size_of::<Vertex>() as ::wgpu::BufferAddress,
                attributes: &GLOBE_ATTRIBUTES,
                blend: ::wgpu::BlendState::REPLACE,
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                depth: Some(depth_state(true, ::wgpu::CompareFunction::Less)),
            },
        );
        let markers_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineDesc {
                label: "portfolio-markers-pipeline",
                shader: &markers_shader,
                vertex_stride: std::mem::size_of::<MarkerVertex>() as ::wgpu::BufferAddress,
                attributes: &MARKER_ATTRIBUTES,
                blend: ::wgpu::BlendState::ALPHA_BLENDING,
                topology: ::wgpu::PrimitiveTopology::PointList,
                depth: Some(depth_state(false, ::wgpu::CompareFunction::LessEqual)),
            },
        );

        let (vertices, indices) = generate_sphere_mesh(64, 128);
        let vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("portfolio-globe-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("portfolio-globe-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        let markers_capacity = 8;
        let markers_vertex_buffer = create_markers_buffer(&device, markers_capacity);

        // Initialize uniforms so the first render doesn't read uninitialized memory.
        let globals = Globals {
            view_proj: [[0.0; 4]; 4],
            model: [[0.0; 4]; 4],
            light_dir: LIGHT_DIR,
            star_shift: 0.0,
        };
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&globals));

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas_elem,
            stars_pipeline,
            stars_count: STAR_COUNT,
            globe_pipeline,
            markers_pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            markers_vertex_buffer,
            markers_capacity,
        })
    }

    fn create_markers_buffer(device: &::wgpu::Device, capacity: usize) -> ::wgpu::Buffer {
        device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("portfolio-markers-vertices"),
            size: (capacity.max(1) * std::mem::size_of::<MarkerVertex>()) as u64,
            usage: ::wgpu::BufferUsages::VERTEX | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload_markers(ctx: &mut WgpuContext, view: &FrameView) -> u32 {
        let points: Vec<MarkerVertex> = view
            .markers
            .iter()
            .filter(|m| m.opacity > 0.0)
            .map(|m| MarkerVertex {
                position: m.world_position.to_f32(),
                opacity: m.opacity as f32,
            })
            .collect();
        if points.is_empty() {
            return 0;
        }
        if points.len() > ctx.markers_capacity {
            ctx.markers_capacity = points.len().next_power_of_two();
            ctx.markers_vertex_buffer = create_markers_buffer(&ctx.device, ctx.markers_capacity);
        }
        ctx.queue
            .write_buffer(&ctx.markers_vertex_buffer, 0, bytemuck::cast_slice(&points));
        points.len() as u32
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    const SPACE: ::wgpu::Color = ::wgpu::Color {
        r: 0.004,
        g: 0.008,
        b: 0.016,
        a: 1.0,
    };

    fn color_attachment(
        view: &::wgpu::TextureView,
        load: ::wgpu::LoadOp<::wgpu::Color>,
    ) -> Option<::wgpu::RenderPassColorAttachment<'_>> {
        Some(::wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            depth_slice: None,
            ops: ::wgpu::Operations {
                load,
                store: ::wgpu::StoreOp::Store,
            },
        })
    }

    pub fn render_frame(ctx: &mut WgpuContext, view: &FrameView) -> Result<(), SurfaceError> {
        let frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| SurfaceError::Other(format!("surface acquire failed: {e}")))?;
        let target = frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        let radius =
            mat4_from_scale_rotation_translation(view.globe_radius, Quat::IDENTITY, Vec3::ZERO);
        let globals = Globals {
            view_proj: view.view_proj,
            model: mat4_mul(view.globe_model, radius),
            light_dir: LIGHT_DIR,
            star_shift: (view.starfield_rotation / std::f64::consts::TAU) as f32,
        };
        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(&globals));
        let marker_count = upload_markers(ctx, view);

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("portfolio-frame-encoder"),
            });

        // Pass 1: clear to deep space and draw stars (no depth attachment).
        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("portfolio-stars-pass"),
                color_attachments: &[color_attachment(&target, ::wgpu::LoadOp::Clear(SPACE))],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&ctx.stars_pipeline);
            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);
            rpass.draw(0..ctx.stars_count, 0..1);
        }

        // Pass 2: globe and markers share the depth buffer.
        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("portfolio-globe-pass"),
                color_attachments: &[color_attachment(&target, ::wgpu::LoadOp::Load)],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&ctx.globe_pipeline);
            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);
            rpass.set_vertex_buffer(0, ctx.vertex_buffer.slice(..));
            rpass.set_index_buffer(ctx.index_buffer.slice(..), ::wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..ctx.index_count, 0, 0..1);

            if marker_count > 0 {
                rpass.set_pipeline(&ctx.markers_pipeline);
                rpass.set_vertex_buffer(0, ctx.markers_vertex_buffer.slice(..));
                rpass.draw(0..marker_count, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use narrative::{FrameView, SurfaceError};
    use wasm_bindgen::prelude::JsValue;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    pub async fn init_wgpu_from_canvas_id(_canvas_id: &str) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn render_frame(_ctx: &mut WgpuContext, _view: &FrameView) -> Result<(), SurfaceError> {
        Err(SurfaceError::Other(
            "wgpu rendering is only available on wasm32 targets".to_string(),
        ))
    }
}

pub use imp::{WgpuContext, init_wgpu_from_canvas_id, render_frame, resize_wgpu};
