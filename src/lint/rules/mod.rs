//! Built-in lint rules.

pub mod any_type_variables;
pub mod meta_arguments;
pub mod module_dependencies;
pub mod naming_standards;
pub mod required_tags;

pub use any_type_variables::AnyTypeVariablesRule;
pub use meta_arguments::MetaArgumentsRule;
pub use module_dependencies::ModuleDependenciesRule;
pub use naming_standards::NamingStandardsRule;
pub use required_tags::RequiredTagsRule;
