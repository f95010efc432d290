// Profile recovery services
// Services turn recovered data into output files and load the recovery settings.

pub mod bookmark_export;
pub mod dashboard_renderer;
pub mod markup;
pub mod settings_engine;
