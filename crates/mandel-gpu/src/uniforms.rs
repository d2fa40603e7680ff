use mandel_core::View;

/// View parameters for `shaders/mandelbrot.wgsl`, one uniform block.
///
/// The shader reconstructs the world coordinate of a fragment from its clip
/// position `(cx, cy)`:
///
/// ```text
/// world.x =   cx * x_rescale + x_offset
/// world.y = -(cy * y_rescale + y_offset)
/// ```
///
/// so clip `(-1, 1)`, the top-left corner, lands on the view rect position
/// and clip `(1, -1)` on its opposite corner.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniforms {
    pub x_rescale: f32,
    pub x_offset: f32,
    pub y_rescale: f32,
    pub y_offset: f32,
    pub max_iterations: u32,
    pub _pad: [u32; 3], // uniform blocks are sized in 16-byte steps
}

impl ViewUniforms {
    pub fn from_view(view: &View) -> Self {
        let rect = view.rect();
        let half_w = rect.size.w / 2.0;
        let half_h = rect.size.h / 2.0;
        Self {
            x_rescale: half_w as f32,
            x_offset: (half_w + rect.pos.x) as f32,
            y_rescale: half_h as f32,
            y_offset: (-half_h - rect.pos.y) as f32,
            max_iterations: view.iterations(),
            _pad: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, Vec2};
    use mandel_core::view::INITIAL_RECT;
    use mandel_core::{Dimensions, Point, Rect, Screen, World};

    /// CPU rendition of the shader's `world_at`.
    fn world_at(u: &ViewUniforms, clip: Vec2) -> DVec2 {
        DVec2::new(
            (clip.x * u.x_rescale + u.x_offset) as f64,
            -(clip.y * u.y_rescale + u.y_offset) as f64,
        )
    }

    /// Clip-space position of the top-left corner of pixel `p`.
    fn clip_of_pixel(p: Point<Screen>, screen: Dimensions<Screen>) -> Vec2 {
        Vec2::new(
            2.0 * p.x as f32 / screen.w as f32 - 1.0,
            1.0 - 2.0 * p.y as f32 / screen.h as f32,
        )
    }

    fn to_dvec2(p: Point<World>) -> DVec2 {
        DVec2::new(p.x, p.y)
    }

    #[test]
    fn uniforms_for_initial_view() {
        let u = ViewUniforms::from_view(&View::new());
        assert_eq!(u.x_rescale, 1.75);
        assert_eq!(u.x_offset, -0.75);
        assert_eq!(u.y_rescale, 1.0);
        assert_eq!(u.y_offset, 0.0);
        assert_eq!(u.max_iterations, 16);
    }

    #[test]
    fn uniform_block_is_32_bytes() {
        assert_eq!(std::mem::size_of::<ViewUniforms>(), 32);
        assert_eq!(bytemuck::bytes_of(&ViewUniforms::from_view(&View::new())).len(), 32);
    }

    #[test]
    fn clip_corners_map_to_rect_corners() {
        let view = View::with_rect(
            Rect::new(Point::new(-0.8, 0.1), Dimensions::new(0.25, 0.125)),
            64,
        );
        let u = ViewUniforms::from_view(&view);
        let rect = view.rect();

        let top_left = world_at(&u, Vec2::new(-1.0, 1.0));
        let bottom_right = world_at(&u, Vec2::new(1.0, -1.0));
        assert!(top_left.abs_diff_eq(to_dvec2(rect.pos), 1e-6), "{top_left}");
        assert!(bottom_right.abs_diff_eq(to_dvec2(rect.end()), 1e-6), "{bottom_right}");
    }

    #[test]
    fn shader_mapping_agrees_with_cpu_mapping() {
        let view = View::new();
        let screen = Dimensions::<Screen>::new(320, 200);
        let u = ViewUniforms::from_view(&view);

        for (x, y) in [(0, 0), (319, 0), (0, 199), (160, 100), (17, 123), (320, 200)] {
            let p = Point::new(x, y);
            let gpu = world_at(&u, clip_of_pixel(p, screen));
            let cpu = to_dvec2(view.screen_to_world(p, screen));
            assert!(gpu.abs_diff_eq(cpu, 1e-5), "pixel {x},{y}: gpu {gpu} cpu {cpu}");
        }
    }

    #[test]
    fn initial_rect_is_whole_set() {
        let u = ViewUniforms::from_view(&View::new());
        let centre = world_at(&u, Vec2::ZERO);
        let expected = to_dvec2(INITIAL_RECT.pos) + DVec2::new(1.75, 1.0);
        assert!(centre.abs_diff_eq(expected, 1e-6), "{centre}");
    }
}
