pub mod ascii;
pub mod outputs;
pub mod renderer;
pub mod styles;
pub mod traits;

pub use ascii::*;
pub use outputs::*;
pub use renderer::*;
pub use styles::*;
pub use traits::*;
