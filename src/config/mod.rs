// Loading request templates from YAML

pub mod templates;
pub mod yml_settings;

pub use templates::{TemplateRegistry, DEFAULT_CONFIG_FILE};
pub use yml_settings::TemplateSettings;
