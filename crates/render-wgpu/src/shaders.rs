/// Per-frame uniforms shared by every pipeline.
const GLOBALS: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // Unit vector pointing toward the light.
    light_dir: vec4<f32>,
    // rgb * intensity
    light_color: vec4<f32>,
    // x: shadows enabled, y: shadow texel size, z: depth bias
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

/// Lit meshes and the depth-only shadow pass.
const MESH: &str = r#"
@group(1) @binding(0)
var shadow_map: texture_depth_2d;
@group(1) @binding(1)
var shadow_sampler: sampler_comparison;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    // rgb specular, w shininess
    @location(7) specular: vec4<f32>,
    // x: phong, y: receives shadow
    @location(8) flags: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) specular: vec4<f32>,
    @location(4) flags: vec4<f32>,
    @location(5) light_space: vec4<f32>,
};

fn model_matrix(instance: InstanceInput) -> mat4x4<f32> {
    return mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = model_matrix(instance);
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.specular = instance.specular;
    out.flags = instance.flags;
    out.light_space = globals.light_view_proj * world_pos;
    return out;
}

@vertex
fn vs_shadow(vertex: VertexInput, instance: InstanceInput) -> @builtin(position) vec4<f32> {
    return globals.light_view_proj * model_matrix(instance) * vec4<f32>(vertex.position, 1.0);
}

// Fraction of light reaching a point, 3x3 PCF.
fn shadow_factor(light_space: vec4<f32>) -> f32 {
    let ndc = light_space.xyz / light_space.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5);
    let depth = ndc.z - globals.params.z;
    let texel = globals.params.y;

    var lit = 0.0;
    for (var x: i32 = -1; x <= 1; x++) {
        for (var y: i32 = -1; y <= 1; y++) {
            let offset = vec2<f32>(f32(x), f32(y)) * texel;
            lit += textureSampleCompareLevel(shadow_map, shadow_sampler, uv + offset, depth);
        }
    }
    lit = lit / 9.0;

    let outside = uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 || ndc.z > 1.0;
    return select(lit, 1.0, outside);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let l = normalize(globals.light_dir.xyz);
    let n_dot_l = max(dot(n, l), 0.0);

    var shadow = 1.0;
    let sampled = shadow_factor(in.light_space);
    if (globals.params.x > 0.5 && in.flags.y > 0.5) {
        shadow = sampled;
    }

    let light = globals.light_color.rgb * shadow;
    var color = in.color.rgb * light * n_dot_l;

    if (in.flags.x > 0.5) {
        let v = normalize(globals.camera_pos.xyz - in.world_pos);
        let h = normalize(l + v);
        let highlight = pow(max(dot(n, h), 0.0), in.specular.w);
        color += in.specular.rgb * light * highlight * step(0.0, dot(n, l));
    }

    return vec4<f32>(color, in.color.a);
}
"#;

/// Unlit colored lines for the helpers.
const LINE: &str = r#"
struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = globals.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

pub fn mesh_source() -> String {
    format!("{GLOBALS}{MESH}")
}

pub fn line_source() -> String {
    format!("{GLOBALS}{LINE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_declare_entry_points() {
        let mesh = mesh_source();
        for entry in ["fn vs_main", "fn fs_main", "fn vs_shadow"] {
            assert!(mesh.contains(entry), "missing {entry}");
        }
        let line = line_source();
        assert!(line.contains("fn vs_line") && line.contains("fn fs_line"));
        assert!(line.contains("struct Globals"));
    }
}
