pub mod cli;
pub mod config;
pub mod indexing;
pub mod io;
pub mod logging;
pub mod registry;
pub mod render;
pub mod run;
pub mod types;

pub use config::Settings;
pub use indexing::{ClassifiedEntry, DocModel, GroupResolver, IndexOptions};
pub use registry::{JsonFileSource, RegistryError, RegistrySnapshot, RegistrySource};
pub use render::{CompletionRenderer, CppStubRenderer, HtmlRenderer, Renderer};
pub use run::{GenerateError, RunSummary, Stage, generate, generate_from};
pub use types::*;
