pub mod context;
pub mod error;
pub mod presenter;
pub mod renderer;
pub mod shader;
pub mod uniforms;

pub use context::GpuContext;
pub use error::GpuError;
pub use presenter::TexturePresenter;
pub use shader::GpuBackend;
pub use uniforms::ViewUniforms;
