//! One complete generation run.
//!
//! Builds the [`DocModel`] once and runs the enabled output stages in fixed
//! order. A failing stage ends the run; files from earlier stages stay on disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::config::Settings;
use crate::indexing::DocModel;
use crate::io::ExitCode;
use crate::registry::{RegistryError, RegistrySnapshot, RegistrySource};
use crate::render::{
    CompletionRenderer, CppStubRenderer, HtmlRenderer, RenderError, RenderReport, Renderer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Html,
    CppStub,
    CompletionList,
}

impl Stage {
    /// Execution order.
    pub const ALL: [Stage; 3] = [Stage::Html, Stage::CppStub, Stage::CompletionList];

    fn enabled(self, settings: &Settings) -> bool {
        match self {
            Stage::Html => settings.output.html,
            Stage::CppStub => settings.output.cpp_stub,
            Stage::CompletionList => settings.output.completion_list,
        }
    }

    fn renderer(self, settings: &Settings) -> Box<dyn Renderer> {
        match self {
            Stage::Html => Box::new(HtmlRenderer::new(&settings.html.title)),
            Stage::CppStub => Box::new(CppStubRenderer::new(&settings.cpp.root_namespace)),
            Stage::CompletionList => Box::new(CompletionRenderer::new(
                &settings.completion.file_name,
                &settings.completion.header,
            )),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Html => "html",
            Stage::CppStub => "cpp-stub",
            Stage::CompletionList => "completion-list",
        })
    }
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: RenderError,
        /// Stages that finished before the failure.
        completed: Vec<StageReport>,
    },
}

impl GenerateError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            GenerateError::Registry(e) => e.exit_code(),
            GenerateError::OutputDir { .. } | GenerateError::Stage { .. } => ExitCode::GeneralError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub report: RenderReport,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub stages: Vec<StageReport>,
    pub classes: usize,
    pub class_groups: usize,
    pub functions: usize,
    pub elapsed_ms: u128,
}

impl RunSummary {
    pub fn files_written(&self) -> usize {
        self.stages.iter().map(|s| s.report.len()).sum()
    }
}

/// Load the snapshot from `source`, then [`generate`].
pub fn generate_from(
    source: &dyn RegistrySource,
    settings: &Settings,
) -> Result<RunSummary, GenerateError> {
    tracing::info!("[run] loading registry from {}", source.describe());
    let snapshot = source.load()?;
    generate(&snapshot, settings)
}

/// Index `snapshot` and run every enabled stage into `settings.output_dir`.
pub fn generate(
    snapshot: &RegistrySnapshot,
    settings: &Settings,
) -> Result<RunSummary, GenerateError> {
    let start = Instant::now();
    let out_dir = settings.output_dir.as_path();
    ensure_output_dir(out_dir)?;

    let model = DocModel::build(snapshot, settings.index.clone());
    let mut summary = RunSummary {
        output_dir: out_dir.to_path_buf(),
        classes: snapshot.classes().len(),
        class_groups: snapshot.class_groups().len(),
        functions: snapshot.num_function_overloads(),
        ..RunSummary::default()
    };

    for stage in Stage::ALL {
        if !stage.enabled(settings) {
            tracing::debug!("[run] stage '{stage}' disabled");
            continue;
        }
        let renderer = stage.renderer(settings);
        tracing::info!("[run] stage '{stage}' ({}) starting", renderer.name());
        match renderer.render(&model, out_dir) {
            Ok(report) => {
                tracing::info!("[run] stage '{stage}' wrote {} files", report.len());
                summary.stages.push(StageReport { stage, report });
            }
            Err(source) => {
                tracing::error!("[run] stage '{stage}' failed: {source}");
                return Err(GenerateError::Stage {
                    stage,
                    source,
                    completed: summary.stages,
                });
            }
        }
    }

    summary.elapsed_ms = start.elapsed().as_millis();
    Ok(summary)
}

fn ensure_output_dir(path: &Path) -> Result<(), GenerateError> {
    std::fs::create_dir_all(path).map_err(|source| GenerateError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}
