mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{
    AnimationConfig, AppearanceConfig, BackendConfig, Config, ContainerStyle, InputStyle,
};
pub use validation::{validate_descriptors, warn_unknown_fields};
