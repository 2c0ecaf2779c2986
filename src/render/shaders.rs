/// Lit mesh pass (`vs_main`/`fs_main`) and helper line pass (`vs_line`/`fs_line`).
pub(crate) const SHADER: &str = r#"
const PI: f32 = 3.14159265;

struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    hemisphere_sky: vec4<f32>,
    hemisphere_ground: vec4<f32>,
    hemisphere_up: vec4<f32>,
    directional_color: vec4<f32>,
    directional_direction: vec4<f32>,
    point_color: vec4<f32>,
    point_position: vec4<f32>,
    point_params: vec4<f32>,
    spot_color: vec4<f32>,
    spot_position: vec4<f32>,
    spot_direction: vec4<f32>,
    spot_cone: vec4<f32>,
    rect_color: vec4<f32>,
    rect_position: vec4<f32>,
    rect_normal: vec4<f32>,
    rect_size: vec4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
    surface: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.world_pos = world_position.xyz;

    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;

    out.normal = normalize(world_normal);
    return out;
}

fn distance_attenuation(dist: f32, cutoff: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(dist, decay), 0.01);
    if (cutoff > 0.0) {
        let ratio = dist / cutoff;
        let fade = clamp(1.0 - ratio * ratio * ratio * ratio, 0.0, 1.0);
        falloff = falloff * fade * fade;
    }
    return falloff;
}

// Lambert diffuse plus GGX specular, already scaled by N.L.
fn direct_light(n: vec3<f32>, v: vec3<f32>, l: vec3<f32>, albedo: vec3<f32>, roughness: f32, metalness: f32) -> vec3<f32> {
    let n_dot_l = max(dot(n, l), 0.0);
    if (n_dot_l <= 0.0) {
        return vec3<f32>(0.0);
    }
    let h = normalize(l + v);
    let n_dot_v = max(dot(n, v), 1e-4);
    let n_dot_h = max(dot(n, h), 0.0);
    let v_dot_h = max(dot(v, h), 0.0);

    let alpha = max(roughness * roughness, 1e-3);
    let alpha2 = alpha * alpha;
    let denom = n_dot_h * n_dot_h * (alpha2 - 1.0) + 1.0;
    let d = alpha2 / (PI * denom * denom);
    let k = alpha * 0.5;
    let g = (n_dot_l / (n_dot_l * (1.0 - k) + k)) * (n_dot_v / (n_dot_v * (1.0 - k) + k));
    let f0 = mix(vec3<f32>(0.04), albedo, metalness);
    let f = f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - v_dot_h, 5.0);

    let specular = f * (d * g / max(4.0 * n_dot_l * n_dot_v, 1e-4));
    let diffuse = (vec3<f32>(1.0) - f) * (1.0 - metalness) * albedo / PI;
    return (diffuse + specular) * n_dot_l;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.normal);
    let v = normalize(globals.camera_position.xyz - input.world_pos);
    let albedo = object.color.rgb;
    let roughness = object.surface.x;
    let metalness = object.surface.y;

    let sky_weight = 0.5 * dot(n, globals.hemisphere_up.xyz) + 0.5;
    let hemisphere = mix(globals.hemisphere_ground.rgb, globals.hemisphere_sky.rgb, sky_weight);
    var color = (globals.ambient.rgb + hemisphere) * albedo * (1.0 - metalness) / PI;

    let dir_l = -globals.directional_direction.xyz;
    color += direct_light(n, v, dir_l, albedo, roughness, metalness) * globals.directional_color.rgb;

    let point_vec = globals.point_position.xyz - input.world_pos;
    let point_dist = length(point_vec);
    let point_l = point_vec / max(point_dist, 1e-4);
    let point_falloff = distance_attenuation(point_dist, globals.point_position.w, globals.point_params.x);
    color += direct_light(n, v, point_l, albedo, roughness, metalness) * globals.point_color.rgb * point_falloff;

    let spot_vec = globals.spot_position.xyz - input.world_pos;
    let spot_dist = length(spot_vec);
    let spot_l = spot_vec / max(spot_dist, 1e-4);
    let angle_cos = dot(spot_l, -globals.spot_direction.xyz);
    let cone = smoothstep(globals.spot_cone.x, globals.spot_cone.y, angle_cos);
    let spot_falloff = distance_attenuation(spot_dist, globals.spot_position.w, globals.spot_direction.w) * cone;
    color += direct_light(n, v, spot_l, albedo, roughness, metalness) * globals.spot_color.rgb * spot_falloff;

    // Rect area lights are approximated as a point emitter weighted by the
    // solid angle the rectangle subtends.
    let area = globals.rect_size.x * globals.rect_size.y;
    let rect_vec = globals.rect_position.xyz - input.world_pos;
    let rect_dist2 = max(dot(rect_vec, rect_vec), 1e-4);
    let rect_l = rect_vec * inverseSqrt(rect_dist2);
    let facing = max(dot(globals.rect_normal.xyz, -rect_l), 0.0);
    let solid_angle = area * facing / (rect_dist2 + area);
    color += direct_light(n, v, rect_l, albedo, roughness, metalness) * globals.rect_color.rgb * solid_angle;

    return vec4<f32>(color, object.color.a);
}

struct LineInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
}

struct LineOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_line(input: LineInput) -> LineOutput {
    var out: LineOutput;
    out.position = globals.view_proj * vec4<f32>(input.position, 1.0);
    out.color = input.color;
    return out;
}

@fragment
fn fs_line(input: LineOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::SHADER;

    #[test]
    fn declares_both_passes() {
        for entry in ["fn vs_main", "fn fs_main", "fn vs_line", "fn fs_line"] {
            assert!(SHADER.contains(entry), "missing {entry}");
        }
    }

    #[test]
    fn global_struct_matches_uniform_fields() {
        let declared = SHADER
            .split("struct GlobalUniform {")
            .nth(1)
            .and_then(|rest| rest.split('}').next())
            .unwrap();
        let fields = declared.lines().filter(|line| line.contains(':')).count();
        assert_eq!(fields, 19);
    }
}
