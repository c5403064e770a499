//! The 13×13 Gaussian used for shadow-map softening and bloom.
//!
//! Taps are weighted `exp(-(i² + j²) / 9)` and the sum is divided by a fixed
//! constant a hair above the truncated kernel's weight sum, so the blur very
//! slightly darkens. `blur_reference` mirrors the shader on the CPU.

pub const KERNEL_RADIUS: i32 = 6;
pub const KERNEL_SPREAD: f32 = 9.0;
pub const KERNEL_NORMALIZATION: f32 = 28.17;

pub fn weight(dx: i32, dy: i32) -> f32 {
    (-((dx * dx + dy * dy) as f32) / KERNEL_SPREAD).exp()
}

/// Sum of all raw tap weights.
pub fn kernel_weight_sum() -> f32 {
    let taps = -KERNEL_RADIUS..=KERNEL_RADIUS;
    taps.clone()
        .flat_map(|dy| taps.clone().map(move |dx| weight(dx, dy)))
        .sum()
}

/// Body of the blur filter's `main`.
pub fn gaussian_blur_code() -> String {
    let lo = -KERNEL_RADIUS;
    let hi = KERNEL_RADIUS + 1;
    format!(
        "vec4 the_res = vec4(0.0);
for (float i = {lo}.0; i < {hi}.0; i += 1.0) {{
  for (float j = {lo}.0; j < {hi}.0; j += 1.0) {{
    the_res += exp(-(i * i + j * j) / {KERNEL_SPREAD:.1}) * get_tex(0, vec2(j, i));
  }}
}}
out_color = the_res / {KERNEL_NORMALIZATION};"
    )
}

/// Blurs one channel of a `width × height` image, clamping reads to the edge
/// like the sampler does.
pub fn blur_reference(pixels: &[f32], width: usize, height: usize) -> Vec<f32> {
    if width == 0 || height == 0 || pixels.len() < width * height {
        return Vec::new();
    }
    let at = |x: i64, y: i64| {
        let x = x.clamp(0, width as i64 - 1) as usize;
        let y = y.clamp(0, height as i64 - 1) as usize;
        pixels[y * width + x]
    };

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut acc = 0.0;
            for dy in -KERNEL_RADIUS..=KERNEL_RADIUS {
                for dx in -KERNEL_RADIUS..=KERNEL_RADIUS {
                    acc += weight(dx, dy) * at(x + dx as i64, y + dy as i64);
                }
            }
            out.push(acc / KERNEL_NORMALIZATION);
        }
    }
    out
}
