//! A `RasterApi` that records commands instead of drawing.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::mesh::Vertex;
use crate::programs::interface::{Qualifier, discover_interface};
use crate::raster::{CullFace, RasterApi, ShaderStage, TextureDesc, TextureUnit, UniformValue};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    UseProgram(u32),
    Uniform { name: String, value: UniformValue },
    CreateTexture { unit: TextureUnit, texture: u32, desc: TextureDesc, with_pixels: bool },
    CreateFramebuffer { framebuffer: u32, color: u32, width: u32, height: u32 },
    BindFramebuffer(Option<u32>),
    BindTexture { unit: TextureUnit, texture: u32 },
    Clear,
    DepthTest(bool),
    Culling(Option<CullFace>),
    Viewport { width: u32, height: u32 },
    Draw { vertex_array: u32, vertex_count: u32 },
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, String>,
    programs: HashMap<u32, String>,
    commands: Vec<Command>,
    rejected_fragments: Vec<String>,
    fail_links: bool,
    fail_allocations: bool,
    no_float_targets: bool,
}

impl State {
    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct RecordingApi {
    state: RefCell<State>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any shader containing `fragment` fails to compile.
    pub fn reject_sources_containing(&self, fragment: &str) {
        self.state.borrow_mut().rejected_fragments.push(fragment.to_string());
    }

    pub fn fail_links(&self, fail: bool) {
        self.state.borrow_mut().fail_links = fail;
    }

    /// Texture, framebuffer and vertex uploads fail.
    pub fn fail_allocations(&self, fail: bool) {
        self.state.borrow_mut().fail_allocations = fail;
    }

    pub fn without_float_targets(&self) {
        self.state.borrow_mut().no_float_targets = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    pub fn take_commands(&self) -> Vec<Command> {
        std::mem::take(&mut self.state.borrow_mut().commands)
    }

    pub fn uniform_writes(&self, commands: &[Command]) -> Vec<(String, UniformValue)> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::Uniform { name, value } => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, command: Command) {
        self.state.borrow_mut().commands.push(command);
    }

    fn declares(&self, program: u32, qualifier: Qualifier, name: &str) -> bool {
        let state = self.state.borrow();
        let Some(source) = state.programs.get(&program) else {
            return false;
        };
        discover_interface(source)
            .iter()
            .filter(|var| var.qualifier == qualifier)
            .any(|var| var.binding_names().iter().any(|n| n == name))
    }

    fn allocate(&self, what: &str) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.fail_allocations {
            return Err(format!("out of memory allocating {what}"));
        }
        Ok(state.id())
    }
}

impl RasterApi for RecordingApi {
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type Framebuffer = u32;
    type UniformLocation = String;
    type VertexArray = u32;

    fn enable_float_render_targets(&self) -> bool {
        !self.state.borrow().no_float_targets
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if let Some(bad) = state.rejected_fragments.iter().find(|f| source.contains(f.as_str())) {
            return Err(format!("ERROR: 0:1: {stage:?} stage rejected '{bad}'"));
        }
        let id = state.id();
        state.shaders.insert(id, source.to_string());
        Ok(id)
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn link_program(&self, vertex: u32, fragment: u32, _attributes: &[(u32, &str)]) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.fail_links {
            return Err("ERROR: varyings do not match".to_string());
        }
        let source = match (state.shaders.get(&vertex), state.shaders.get(&fragment)) {
            (Some(vs), Some(fs)) => format!("{vs}\n{fs}"),
            _ => return Err("ERROR: shader object missing".to_string()),
        };
        let id = state.id();
        state.programs.insert(id, source);
        Ok(id)
    }

    fn attribute_location(&self, program: u32, name: &str) -> Option<u32> {
        if !self.declares(program, Qualifier::In, name) {
            return None;
        }
        crate::programs::AttributeSlot::ALL
            .iter()
            .find(|slot| slot.name() == name)
            .map(|slot| slot.location())
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<String> {
        self.declares(program, Qualifier::Uniform, name)
            .then(|| name.to_string())
    }

    fn use_program(&self, program: u32) {
        self.record(Command::UseProgram(program));
    }

    fn set_uniform(&self, location: &String, value: UniformValue) {
        self.record(Command::Uniform {
            name: location.clone(),
            value,
        });
    }

    fn create_texture(&self, unit: TextureUnit, desc: &TextureDesc, pixels: Option<&[f32]>) -> Result<u32, String> {
        let texture = self.allocate("texture")?;
        self.record(Command::CreateTexture {
            unit,
            texture,
            desc: *desc,
            with_pixels: pixels.is_some(),
        });
        Ok(texture)
    }

    fn create_framebuffer(&self, color: u32, width: u32, height: u32) -> Result<u32, String> {
        let framebuffer = self.allocate("framebuffer")?;
        self.record(Command::CreateFramebuffer {
            framebuffer,
            color,
            width,
            height,
        });
        Ok(framebuffer)
    }

    fn bind_framebuffer(&self, framebuffer: Option<u32>) {
        self.record(Command::BindFramebuffer(framebuffer));
    }

    fn bind_texture(&self, unit: TextureUnit, texture: u32) {
        self.record(Command::BindTexture { unit, texture });
    }

    fn clear(&self) {
        self.record(Command::Clear);
    }

    fn set_depth_test(&self, enabled: bool) {
        self.record(Command::DepthTest(enabled));
    }

    fn set_face_culling(&self, face: Option<CullFace>) {
        self.record(Command::Culling(face));
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(Command::Viewport { width, height });
    }

    fn upload_vertices(&self, _vertices: &[Vertex]) -> Result<u32, String> {
        self.allocate("vertex array")
    }

    fn draw_triangles(&self, vertex_array: u32, vertex_count: u32) {
        self.record(Command::Draw {
            vertex_array,
            vertex_count,
        });
    }
}
