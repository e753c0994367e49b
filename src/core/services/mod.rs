pub mod editor;
pub mod reconcile;
pub mod template_resolver;
