//! Built-in demo gallery.
//!
//! Each entry carries everything a host needs to run it: GLSL sources, the
//! fullscreen quad layout the vertex shader expects, the attribute name, and
//! the uniform bindings the fragment shader reads. The shaders target GLSL ES
//! 1.00 so the same sources run on GLES2, WebGL-class embeddings, and desktop
//! compatibility contexts.

use surface::PrimitiveMode;

use crate::demo::{DemoDefinition, QuadGeometry, UniformBinding, UniformInput};

const BASIC_VERTEX: &str = r#"attribute vec3 a_position;

void main() {
    gl_Position = vec4(a_position, 1.0);
}
"#;

const BASIC_FRAGMENT: &str = r#"precision mediump float;

void main() {
    gl_FragColor = vec4(0.416, 0.298, 0.576, 1.0);
}
"#;

const PASSTHROUGH_XYZ_VERTEX: &str = r#"attribute vec3 position;

void main() {
    gl_Position = vec4(position, 1.0);
}
"#;

const PASSTHROUGH_XY_VERTEX: &str = r#"attribute vec2 position;

void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

const PULSE_FRAGMENT: &str = r#"precision mediump float;

uniform float u_time;

void main() {
    gl_FragColor = vec4(abs(sin(u_time)), 0.0, abs(cos(u_time)), 1.0);
}
"#;

const SHAPING_FRAGMENT: &str = r#"precision mediump float;

uniform float u_time;
uniform vec2 u_resolution;

float plot(vec2 st, float pct) {
    return smoothstep(pct - 0.02, pct, st.y) - smoothstep(pct, pct + 0.02, st.y);
}

void main() {
    vec2 st = gl_FragCoord.xy / u_resolution;
    float y = 0.5 + 0.35 * sin(st.x * 6.2831 + u_time);
    vec3 color = vec3(st.x * y);
    float pct = plot(st, y);
    color = (1.0 - pct) * color + pct * vec3(0.0, 1.0, 0.4);
    gl_FragColor = vec4(color, 1.0);
}
"#;

const NOISE_FRAGMENT: &str = r#"precision mediump float;

uniform float u_time;
uniform vec2 u_resolution;

float random(vec2 st) {
    return fract(sin(dot(st, vec2(12.9898, 78.233))) * 43758.5453123);
}

float noise(vec2 st) {
    vec2 i = floor(st);
    vec2 f = fract(st);
    float a = random(i);
    float b = random(i + vec2(1.0, 0.0));
    float c = random(i + vec2(0.0, 1.0));
    float d = random(i + vec2(1.0, 1.0));
    vec2 u = f * f * (3.0 - 2.0 * f);
    return mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}

void main() {
    vec2 st = gl_FragCoord.xy / u_resolution;
    st.x *= u_resolution.x / u_resolution.y;
    float n = noise(st * 6.0 + vec2(u_time * 0.4, u_time * 0.2));
    gl_FragColor = vec4(vec3(n), 1.0);
}
"#;

const BLOOM_FRAGMENT: &str = r#"precision mediump float;

uniform float time;
uniform vec2 resolution;

void main() {
    vec2 uv = gl_FragCoord.xy / resolution - 0.5;
    uv.x *= resolution.x / resolution.y;
    float d = length(uv);
    float glow = 0.045 / max(d, 0.001);
    glow *= 0.8 + 0.2 * sin(time * 2.0);
    gl_FragColor = vec4(glow * vec3(0.35, 0.55, 1.0), 1.0);
}
"#;

fn basic() -> DemoDefinition {
    DemoDefinition {
        name: "basic".into(),
        summary: "Flat violet fill over a triangle-fan quad".into(),
        vertex_source: BASIC_VERTEX.into(),
        fragment_source: BASIC_FRAGMENT.into(),
        geometry: QuadGeometry::fan_xyz(),
        attribute: "a_position".into(),
        mode: PrimitiveMode::TriangleFan,
        clear: [0.0, 0.0, 0.0, 1.0],
        uniforms: Vec::new(),
    }
}

fn pulse() -> DemoDefinition {
    DemoDefinition {
        name: "pulse".into(),
        summary: "Red/blue color pulse driven by a time uniform".into(),
        vertex_source: PASSTHROUGH_XYZ_VERTEX.into(),
        fragment_source: PULSE_FRAGMENT.into(),
        geometry: QuadGeometry::fan_xyz(),
        attribute: "position".into(),
        mode: PrimitiveMode::TriangleFan,
        clear: [0.0, 0.0, 0.0, 1.0],
        uniforms: vec![UniformBinding::new("u_time", UniformInput::Time)],
    }
}

fn shaping() -> DemoDefinition {
    DemoDefinition {
        name: "shaping".into(),
        summary: "Animated sine curve plotted with smoothstep shaping".into(),
        vertex_source: PASSTHROUGH_XYZ_VERTEX.into(),
        fragment_source: SHAPING_FRAGMENT.into(),
        geometry: QuadGeometry::fan_xyz(),
        attribute: "position".into(),
        mode: PrimitiveMode::TriangleFan,
        clear: [0.0, 0.0, 0.0, 1.0],
        uniforms: vec![
            UniformBinding::new("u_time", UniformInput::Time),
            UniformBinding::new("u_resolution", UniformInput::Resolution),
        ],
    }
}

fn noise() -> DemoDefinition {
    DemoDefinition {
        name: "noise".into(),
        summary: "Scrolling value noise field".into(),
        vertex_source: PASSTHROUGH_XY_VERTEX.into(),
        fragment_source: NOISE_FRAGMENT.into(),
        geometry: QuadGeometry::strip_xy(),
        attribute: "position".into(),
        mode: PrimitiveMode::TriangleStrip,
        clear: [0.0, 0.0, 0.0, 1.0],
        uniforms: vec![
            UniformBinding::new("u_time", UniformInput::Time),
            UniformBinding::new("u_resolution", UniformInput::Resolution),
        ],
    }
}

fn bloom() -> DemoDefinition {
    DemoDefinition {
        name: "bloom".into(),
        summary: "Pulsing radial glow centered on the surface".into(),
        vertex_source: PASSTHROUGH_XY_VERTEX.into(),
        fragment_source: BLOOM_FRAGMENT.into(),
        geometry: QuadGeometry::strip_xy(),
        attribute: "position".into(),
        mode: PrimitiveMode::TriangleStrip,
        clear: [0.0, 0.0, 0.0, 1.0],
        uniforms: vec![
            UniformBinding::new("time", UniformInput::Time),
            UniformBinding::new("resolution", UniformInput::Resolution),
        ],
    }
}

/// All built-in demos in gallery order.
pub fn builtin_demos() -> Vec<DemoDefinition> {
    vec![basic(), pulse(), shaping(), noise(), bloom()]
}

/// Finds a built-in demo by case-insensitive name.
pub fn find_builtin(name: &str) -> Option<DemoDefinition> {
    builtin_demos()
        .into_iter()
        .find(|demo| demo.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_validates_cleanly() {
        for demo in builtin_demos() {
            assert!(
                demo.validate().is_empty(),
                "demo '{}' failed validation: {:?}",
                demo.name,
                demo.validate()
            );
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(find_builtin("Bloom").is_some());
        assert!(find_builtin("BLOOM").is_some());
        assert!(find_builtin("plasma").is_none());
    }

    #[test]
    fn strip_demos_use_two_component_positions() {
        for name in ["noise", "bloom"] {
            let demo = find_builtin(name).unwrap();
            assert_eq!(demo.geometry.components_per_vertex, 2);
            assert_eq!(demo.mode, PrimitiveMode::TriangleStrip);
        }
    }
}
