//! Full-screen filter programs: the shared fragment header, a `get_tex`
//! helper sized to the filter's own target, and one `main` body per stage.

use crate::programs::scene_program::FRAGMENT_HEADER;

/// Keeps pixels whose weighted luma exceeds the threshold, black otherwise.
pub const BRIGHT_PASS: &str =
    "out_color = dot(get_tex(), vec4(21, 72, 7, 0)) > 100.0 ? get_tex() : vec4(0, 0, 0, 1);";

pub const PASSTHROUGH: &str = "out_color = get_tex();";

/// Adds the blurred bright pass (input 0) to the untouched scene (input 1),
/// scaled by the tint's w and offset by its rgb.
pub const COMPOSITE: &str =
    "out_color = vec4(u_shift_color.rgb + u_shift_color.w * (get_tex(1, vec2(0)) + get_tex()).rgb, 1.0);";

/// `width`/`height` are the dimensions of the filter's output, so a pixel
/// offset in `get_tex` is one texel of that resolution.
pub fn filter_fragment_source(code: &str, width: u32, height: u32) -> String {
    format!(
        r#"{FRAGMENT_HEADER}
vec4 get_tex(int i, vec2 xy_pos) {{
  return get_shader(i, (world_position.xy * 0.5 + 0.5) + xy_pos / vec2({width}.0, {height}.0));
}}
vec4 get_tex() {{ return get_tex(0, vec2(0)); }}

void main() {{
{code}
}}
"#
    )
}
