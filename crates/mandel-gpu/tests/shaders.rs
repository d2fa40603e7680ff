//! Static checks on the WGSL sources: they parse, validate, expose the
//! expected entry points, and lay out the uniform block the way
//! `ViewUniforms` does.

use mandel_gpu::renderer::FULLSCREEN_WGSL;
use mandel_gpu::shader::MANDELBROT_WGSL;

fn parse_and_validate(src: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(src) {
        Ok(module) => module,
        Err(e) => panic!("WGSL parse error:\n{}", e.emit_to_string(src)),
    };
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("WGSL validation error: {e:?}"));
    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|ep| ep.name.as_str()).collect()
}

#[test]
fn mandelbrot_shader_validates() {
    let module = parse_and_validate(MANDELBROT_WGSL);
    let eps = entry_points(&module);
    assert!(eps.contains(&"vs_main"), "{eps:?}");
    assert!(eps.contains(&"fs_main"), "{eps:?}");
}

#[test]
fn fullscreen_shader_validates() {
    let module = parse_and_validate(FULLSCREEN_WGSL);
    let eps = entry_points(&module);
    assert!(eps.contains(&"vs_main"), "{eps:?}");
    assert!(eps.contains(&"fs_main"), "{eps:?}");
}

#[test]
fn uniform_block_matches_rust_layout() {
    let module = parse_and_validate(MANDELBROT_WGSL);

    let members = module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(name), naga::TypeInner::Struct { members, .. }) if name == "ViewUniforms" => {
                Some(members.clone())
            }
            _ => None,
        })
        .expect("ViewUniforms struct in mandelbrot.wgsl");

    let layout: Vec<(String, u32)> = members
        .iter()
        .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
        .collect();

    assert_eq!(
        layout,
        vec![
            ("x_rescale".to_string(), 0),
            ("x_offset".to_string(), 4),
            ("y_rescale".to_string(), 8),
            ("y_offset".to_string(), 12),
            ("max_iterations".to_string(), 16),
        ]
    );
}

#[test]
fn fragments_step_back_to_pixel_corners() {
    let module = parse_and_validate(MANDELBROT_WGSL);

    let (_, corner) = module
        .functions
        .iter()
        .find(|(_, f)| f.name.as_deref() == Some("pixel_corner"))
        .expect("pixel_corner in mandelbrot.wgsl");
    let axes: Vec<_> = corner
        .expressions
        .iter()
        .filter_map(|(_, e)| match e {
            naga::Expression::Derivative { axis, .. } => Some(*axis),
            _ => None,
        })
        .collect();
    assert_eq!(axes, vec![naga::DerivativeAxis::X, naga::DerivativeAxis::Y]);

    let fs_main = module
        .entry_points
        .iter()
        .find(|ep| ep.name == "fs_main")
        .expect("fs_main entry point");
    let calls_corner = fs_main.function.body.iter().any(|stmt| {
        matches!(stmt, naga::Statement::Call { function, .. } if module.functions[*function].name.as_deref() == Some("pixel_corner"))
    });
    assert!(calls_corner, "fs_main must sample at pixel_corner");
}
