//! Shader program construction and binding-location discovery.

use std::collections::BTreeMap;

use crate::error::ShaderError;
use crate::mesh::Mesh;
use crate::raster::{RasterApi, ShaderStage, TextureUnit, UniformValue};

pub mod filter_program;
pub mod interface;
pub mod scene_program;
pub mod slots;

pub use interface::{InterfaceVar, Qualifier, discover_interface};
pub use slots::{AttributeSlot, UniformSlot};

/// Where a discovered interface variable lives in a linked program.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding<L> {
    Attribute(u32),
    Uniform(L),
    /// Declared, but the driver reports no location (unused or optimised out).
    Inactive,
}

/// Name -> location for every interface variable of one program.
/// Filled once at link time.
#[derive(Clone, Debug)]
pub struct BindingTable<L> {
    entries: BTreeMap<String, Binding<L>>,
}

impl<L> BindingTable<L> {
    pub fn get(&self, name: &str) -> Option<&Binding<L>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding<L>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn uniform(&self, name: &str) -> Option<&L> {
        match self.entries.get(name) {
            Some(Binding::Uniform(location)) => Some(location),
            _ => None,
        }
    }
}

fn annotate(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compiles one stage. On failure the numbered source and the driver log
/// are logged and the shader object is already freed.
pub fn compile<A: RasterApi>(
    api: &A,
    stage: ShaderStage,
    source: &str,
) -> Result<A::Shader, ShaderError> {
    api.compile_shader(stage, source).map_err(|log| {
        log::error!("{stage:?} shader failed to compile:\n{}", annotate(source));
        log::error!("{log}");
        ShaderError::Compile { stage, log }
    })
}

/// Links two compiled stages and discovers the bindings declared in
/// `interface_source` (normally both stage sources concatenated).
pub fn link<A: RasterApi>(
    api: &A,
    vertex: A::Shader,
    fragment: A::Shader,
    interface_source: &str,
) -> Result<(A::Program, BindingTable<A::UniformLocation>), ShaderError> {
    let program = api
        .link_program(vertex, fragment, &AttributeSlot::bindings())
        .map_err(|log| {
            log::error!("program failed to link: {log}");
            ShaderError::Link { log }
        })?;

    let mut entries = BTreeMap::new();
    for var in discover_interface(interface_source) {
        for name in var.binding_names() {
            if entries.contains_key(&name) {
                continue;
            }
            let binding = if name.starts_with("a_") {
                api.attribute_location(program, &name).map(Binding::Attribute)
            } else {
                api.uniform_location(program, &name).map(Binding::Uniform)
            };
            entries.insert(name, binding.unwrap_or(Binding::Inactive));
        }
    }
    Ok((program, BindingTable { entries }))
}

/// A linked program plus its binding table and resolved uniform slots.
pub struct ShaderProgram<A: RasterApi> {
    label: String,
    handle: A::Program,
    bindings: BindingTable<A::UniformLocation>,
    slots: Vec<Option<A::UniformLocation>>,
}

impl<A: RasterApi> ShaderProgram<A> {
    pub fn build(
        api: &A,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = compile(api, ShaderStage::Vertex, vertex_source)?;
        let fragment = match compile(api, ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(e) => {
                api.delete_shader(vertex);
                return Err(e);
            }
        };

        let interface = format!("{vertex_source}\n{fragment_source}");
        let linked = link(api, vertex, fragment, &interface);
        api.delete_shader(vertex);
        api.delete_shader(fragment);
        let (handle, bindings) = linked?;

        let mut slots = vec![None; UniformSlot::COUNT];
        for slot in UniformSlot::all() {
            if let Some(index) = slot.index() {
                slots[index] = bindings.uniform(&slot.name()).cloned();
            }
        }

        log::debug!("linked program '{label}' with {} bindings", bindings.len());
        Ok(Self {
            label: label.to_string(),
            handle,
            bindings,
            slots,
        })
    }

    /// Like `build`, but a rejected program only costs a log entry; callers
    /// keep the `None` and skip every draw that would use it.
    pub fn build_or_log(
        api: &A,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Option<Self> {
        match Self::build(api, label, vertex_source, fragment_source) {
            Ok(program) => Some(program),
            Err(e) => {
                log::error!("program '{label}' left undefined: {e}");
                None
            }
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn handle(&self) -> A::Program {
        self.handle
    }

    pub fn bindings(&self) -> &BindingTable<A::UniformLocation> {
        &self.bindings
    }

    pub fn location(&self, slot: UniformSlot) -> Option<&A::UniformLocation> {
        slot.index()
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
    }
}

/// The selected program and its binding table, passed to everything that
/// uploads uniforms or draws.
///
/// Creating one selects the program, so uploads can never land on a
/// program other than the one whose table resolved them.
pub struct RenderContext<'a, A: RasterApi> {
    api: &'a A,
    program: &'a ShaderProgram<A>,
    missed: Vec<UniformSlot>,
}

impl<'a, A: RasterApi> RenderContext<'a, A> {
    pub fn bind(api: &'a A, program: &'a ShaderProgram<A>) -> Self {
        api.use_program(program.handle());
        Self {
            api,
            program,
            missed: Vec::new(),
        }
    }

    pub fn api(&self) -> &'a A {
        self.api
    }

    pub fn program(&self) -> &'a ShaderProgram<A> {
        self.program
    }

    /// Returns false, and records the miss, when the program has no
    /// location for `slot`.
    pub fn set(&mut self, slot: UniformSlot, value: impl Into<UniformValue>) -> bool {
        match self.program.location(slot) {
            Some(location) => {
                self.api.set_uniform(location, value.into());
                true
            }
            None => {
                log::trace!("'{}' has no binding for {:?}", self.program.label(), slot);
                self.missed.push(slot);
                false
            }
        }
    }

    /// Binds `texture` at `unit` and points sampler `u_texture[sampler]` at it.
    pub fn set_sampler(&mut self, sampler: usize, unit: TextureUnit, texture: A::Texture) -> bool {
        self.api.bind_texture(unit, texture);
        self.set(UniformSlot::Texture(sampler), unit.0 as i32)
    }

    pub fn draw(&mut self, mesh: &Mesh<A>) {
        self.api.draw_triangles(mesh.vertex_array, mesh.vertex_count);
    }

    pub fn missed_slots(&self) -> &[UniformSlot] {
        &self.missed
    }

    pub fn into_missed_slots(self) -> Vec<UniformSlot> {
        self.missed
    }
}
