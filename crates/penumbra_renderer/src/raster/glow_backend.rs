//! `RasterApi` on top of OpenGL 3.3 / OpenGL ES 3.0 / WebGL2 through `glow`.

use glow::HasContext;
use penumbra_core::TextureLayout;

use crate::mesh::{Vertex, VERTEX_STREAMS};
use crate::raster::{CullFace, RasterApi, ShaderStage, TextureDesc, TextureUnit, UniformValue};

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn gl_formats(layout: TextureLayout) -> (u32, u32) {
    match layout {
        TextureLayout::Rgba => (glow::RGBA32F, glow::RGBA),
        TextureLayout::Rg => (glow::RG32F, glow::RG),
    }
}

impl RasterApi for glow::Context {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Texture = <glow::Context as HasContext>::Texture;
    type Framebuffer = <glow::Context as HasContext>::Framebuffer;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;
    type VertexArray = <glow::Context as HasContext>::VertexArray;

    fn enable_float_render_targets(&self) -> bool {
        let extensions = self.supported_extensions();
        // Desktop GL 3.0+ renders to float targets without an extension.
        let color_float = !self.version().is_embedded
            || extensions.iter().any(|e| e.ends_with("color_buffer_float"));
        if !extensions.iter().any(|e| e.ends_with("texture_float_linear")) {
            log::warn!("float textures may not filter linearly on this driver");
        }
        if !color_float {
            log::error!("driver cannot render to float textures; shadows and filters will be black");
        }
        color_float
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String> {
        unsafe {
            let shader = self.create_shader(gl_stage(stage))?;
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            if self.get_shader_compile_status(shader) {
                return Ok(shader);
            }
            let log = self.get_shader_info_log(shader);
            HasContext::delete_shader(self, shader);
            Err(log)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
        attributes: &[(u32, &str)],
    ) -> Result<Self::Program, String> {
        unsafe {
            let program = self.create_program()?;
            self.attach_shader(program, vertex);
            self.attach_shader(program, fragment);
            for (location, name) in attributes {
                self.bind_attrib_location(program, *location, name);
            }
            HasContext::link_program(self, program);

            self.detach_shader(program, vertex);
            self.detach_shader(program, fragment);

            if self.get_program_link_status(program) {
                return Ok(program);
            }
            let log = self.get_program_info_log(program);
            self.delete_program(program);
            Err(log)
        }
    }

    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn use_program(&self, program: Self::Program) {
        unsafe { HasContext::use_program(self, Some(program)) }
    }

    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue) {
        let location = Some(location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.uniform_1_i32(location, v),
                UniformValue::Float(v) => self.uniform_1_f32(location, v),
                UniformValue::Vec3([x, y, z]) => self.uniform_3_f32(location, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.uniform_4_f32(location, x, y, z, w),
                UniformValue::Mat4(m) => {
                    self.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }

    fn create_texture(
        &self,
        unit: TextureUnit,
        desc: &TextureDesc,
        pixels: Option<&[f32]>,
    ) -> Result<Self::Texture, String> {
        let (internal_format, format) = gl_formats(desc.layout);
        unsafe {
            let texture = HasContext::create_texture(self)?;
            self.active_texture(glow::TEXTURE0 + unit.0);
            HasContext::bind_texture(self, glow::TEXTURE_2D, Some(texture));
            self.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format as i32,
                desc.width as i32,
                desc.height as i32,
                0,
                format,
                glow::FLOAT,
                pixels.map(|p| bytemuck::cast_slice::<f32, u8>(p)),
            );

            let min_filter = if desc.mipmapped {
                self.generate_mipmap(glow::TEXTURE_2D);
                glow::LINEAR_MIPMAP_LINEAR
            } else {
                glow::LINEAR
            };
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            Ok(texture)
        }
    }

    fn create_framebuffer(
        &self,
        color: Self::Texture,
        width: u32,
        height: u32,
    ) -> Result<Self::Framebuffer, String> {
        unsafe {
            let framebuffer = HasContext::create_framebuffer(self)?;
            HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, Some(framebuffer));
            self.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color),
                0,
            );

            let depth = match self.create_renderbuffer() {
                Ok(depth) => depth,
                Err(e) => {
                    HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, None);
                    self.delete_framebuffer(framebuffer);
                    return Err(e);
                }
            };
            self.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            self.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH_COMPONENT16,
                width as i32,
                height as i32,
            );
            self.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );

            let status = self.check_framebuffer_status(glow::FRAMEBUFFER);
            HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, None);
            if status != glow::FRAMEBUFFER_COMPLETE {
                self.delete_renderbuffer(depth);
                self.delete_framebuffer(framebuffer);
                return Err(format!("framebuffer incomplete: 0x{status:x}"));
            }
            Ok(framebuffer)
        }
    }

    fn bind_framebuffer(&self, framebuffer: Option<Self::Framebuffer>) {
        unsafe { HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, framebuffer) }
    }

    fn bind_texture(&self, unit: TextureUnit, texture: Self::Texture) {
        unsafe {
            self.active_texture(glow::TEXTURE0 + unit.0);
            HasContext::bind_texture(self, glow::TEXTURE_2D, Some(texture));
        }
    }

    fn clear(&self) {
        unsafe { HasContext::clear(self, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.enable(glow::DEPTH_TEST);
            } else {
                self.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_face_culling(&self, face: Option<CullFace>) {
        unsafe {
            match face {
                Some(face) => {
                    self.enable(glow::CULL_FACE);
                    self.cull_face(match face {
                        CullFace::Front => glow::FRONT,
                        CullFace::Back => glow::BACK,
                    });
                }
                None => self.disable(glow::CULL_FACE),
            }
        }
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe { HasContext::viewport(self, 0, 0, width as i32, height as i32) }
    }

    fn upload_vertices(&self, vertices: &[Vertex]) -> Result<Self::VertexArray, String> {
        unsafe {
            let vertex_array = self.create_vertex_array()?;
            let buffer = self.create_buffer()?;
            self.bind_vertex_array(Some(vertex_array));
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            let stride = std::mem::size_of::<Vertex>() as i32;
            for (slot, offset) in VERTEX_STREAMS {
                let location = slot.location();
                self.enable_vertex_attrib_array(location);
                self.vertex_attrib_pointer_f32(location, 4, glow::FLOAT, false, stride, offset as i32);
            }

            self.bind_vertex_array(None);
            Ok(vertex_array)
        }
    }

    fn draw_triangles(&self, vertex_array: Self::VertexArray, vertex_count: u32) {
        unsafe {
            self.bind_vertex_array(Some(vertex_array));
            self.draw_arrays(glow::TRIANGLES, 0, vertex_count as i32);
            self.bind_vertex_array(None);
        }
    }
}
