//! GLSL shared by every program, plus the scene and shadow-distance programs.
//!
//! Slot 4 of the per-light arrays always describes the camera issuing the
//! pass, so `u_light_matrix[4]` is the clip transform.

pub const VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

in vec4 a_position, a_normal, a_color, a_angle;
out vec4 v_normal, world_position, v_color, v_angle;
out vec4 v_project_onto_light[5];

uniform vec4 u_world_position;
uniform mat4 u_world_rotation;
uniform mat4 u_light_matrix[5];

void main() {
  world_position = u_world_rotation * a_position - u_world_position;
  v_normal = u_world_rotation * a_normal;
  for (int i = 0; i < 5; i++) {
    v_project_onto_light[i] = u_light_matrix[i] * world_position;
  }
  v_color = a_color;
  v_angle = a_angle;
  gl_Position = u_light_matrix[4] * world_position;
}
"#;

/// Declarations every fragment program starts with. Samplers cannot be
/// indexed dynamically in GLSL ES 3.00, hence the `get_shader` switch.
pub const FRAGMENT_HEADER: &str = r#"#version 300 es
precision highp float;

in vec4 v_normal, world_position, v_color, v_angle, v_project_onto_light[5];

uniform bool u_render_direct, u_cell_shading;
uniform bool u_is_light_shadow[5];
uniform int u_which_shadow_light, u_texture_mux, u_render_texture;
uniform vec4 u_shift_color;
uniform vec4 u_light_position[5];
uniform float u_ambient_light;
uniform float u_light_brightness[5];
uniform vec3 u_neon_color;
uniform sampler2D u_texture[9];

out vec4 out_color;

vec4 get_shader(int i, vec2 texpos) {
  switch (i) {
    case 0: return texture(u_texture[0], texpos);
    case 1: return texture(u_texture[1], texpos);
    case 2: return texture(u_texture[2], texpos);
    case 3: return texture(u_texture[3], texpos);
    case 4: return texture(u_texture[4], texpos);
    case 5: return texture(u_texture[5], texpos);
    case 6: return texture(u_texture[6], texpos);
    case 7: return texture(u_texture[7], texpos);
    case 8: return texture(u_texture[8], texpos);
    default: return vec4(1.0);
  }
}
"#;

// Shadow maps hold (mean distance, mean squared distance) after blurring;
// the Chebyshev bound turns the variance into a soft visibility estimate.
const SCENE_BODY: &str = r#"
float light_visibility(int i) {
  vec4 projected = v_project_onto_light[i];
  if (projected.w <= 0.0) {
    return 0.0;
  }
  vec2 uv = projected.xy / projected.w * 0.5 + 0.5;
  if (any(lessThan(uv, vec2(0.0))) || any(greaterThan(uv, vec2(1.0)))) {
    return 0.0;
  }
  vec2 moments = get_shader(i, uv).rg;
  float d = distance(u_light_position[i], world_position);
  if (d <= moments.x) {
    return 1.0;
  }
  float variance = max(moments.y - moments.x * moments.x, 1e-4);
  float delta = d - moments.x;
  return variance / (variance + delta * delta);
}

void main() {
  if (u_render_direct) {
    out_color = v_color;
    return;
  }
  vec3 normal = normalize(v_normal.xyz);
  float intensity = 0.0;
  for (int i = 0; i < 5; i++) {
    float lambert = max(dot(normal, normalize(u_light_position[i].xyz - world_position.xyz)), 0.0);
    float visibility = u_is_light_shadow[i] ? light_visibility(i) : 1.0;
    intensity += lambert * visibility * u_light_brightness[i];
  }
  if (u_cell_shading) {
    intensity = floor(intensity * 4.0) / 4.0;
  }

  vec3 color = v_color.rgb * (u_ambient_light + intensity);
  if (u_cell_shading) {
    color = mix(color, u_neon_color, 0.3);
  }
  if (u_render_texture > 0) {
    color *= get_shader(u_texture_mux + 4, world_position.xy / 32.0).rgb;
  }
  out_color = vec4(color, v_color.a);
}
"#;

const SHADOW_BODY: &str = r#"
void main() {
  float d = distance(u_light_position[u_which_shadow_light], world_position);
  out_color = vec4(d, d * d, 0.0, 1.0);
}
"#;

pub fn scene_fragment_source() -> String {
    format!("{FRAGMENT_HEADER}{SCENE_BODY}")
}

/// Writes distance to the current light into red and its square into green.
pub fn shadow_fragment_source() -> String {
    format!("{FRAGMENT_HEADER}{SHADOW_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::interface::discover_interface;
    use crate::programs::slots::UniformSlot;

    #[test]
    fn shared_interface_declares_every_slot() {
        let source = format!("{VERTEX_SHADER}\n{}", scene_fragment_source());
        let names: Vec<String> = discover_interface(&source)
            .iter()
            .flat_map(|var| var.binding_names())
            .collect();
        for slot in UniformSlot::all() {
            assert!(names.iter().any(|n| *n == slot.name()), "{:?} undeclared", slot);
        }
    }

    #[test]
    fn shadow_program_encodes_moments() {
        let source = shadow_fragment_source();
        assert!(source.contains("u_light_position[u_which_shadow_light]"));
        assert!(source.contains("vec4(d, d * d, 0.0, 1.0)"));
    }
}
