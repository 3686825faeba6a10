mod common;

use std::fs;
use std::path::Path;

use common::fixture;
use regdoc::render::cpp::GLOBAL_FUNCTIONS_FILE;
use regdoc::render::html::{GROUPS_FILE, HIERARCHY_FILE, INDEX_FILE};
use regdoc::{GenerateError, JsonFileSource, RegistryError, Settings, Stage, generate_from};
use tempfile::TempDir;

fn all_formats(out: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.output_dir = out.to_path_buf();
    settings.output.html = true;
    settings.output.cpp_stub = true;
    settings.output.completion_list = true;
    settings
}

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_else(|e| panic!("{file}: {e}"))
}

#[test]
fn test_full_run_writes_every_format() {
    let temp = TempDir::new().unwrap();
    let settings = all_formats(temp.path());

    let summary = generate_from(&JsonFileSource::new(fixture("registry.json")), &settings).unwrap();
    let stages: Vec<Stage> = summary.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, [Stage::Html, Stage::CppStub, Stage::CompletionList]);
    assert_eq!(summary.classes, 5);
    assert_eq!(summary.class_groups, 1);
    assert_eq!(summary.functions, 4);

    for file in [
        HIERARCHY_FILE,
        INDEX_FILE,
        GROUPS_FILE,
        "Grid.html",
        "ApproximationSpace3d.html",
        "ug4.Gridgroup.html",
        "plugin.Electrostaticsgroup.html",
        "group.html",
        "approximationspace.cpp",
        "grid.cpp",
        "electrostaticssolver.cpp",
        GLOBAL_FUNCTIONS_FILE,
        "completion_list.txt",
    ] {
        assert!(temp.path().join(file).is_file(), "missing {file}");
    }
    // group members are only written inside their group file
    assert!(!temp.path().join("approximationspace2d.cpp").exists());
    assert_eq!(
        summary.files_written(),
        summary.stages.iter().map(|s| s.report.files.len()).sum::<usize>()
    );
}

#[test]
fn test_html_pages() {
    let temp = TempDir::new().unwrap();
    generate_from(
        &JsonFileSource::new(fixture("registry.json")),
        &all_formats(temp.path()),
    )
    .unwrap();

    let grid = read(temp.path(), "Grid.html");
    assert!(grid.contains("<h1>Grid Class Reference</h1>"));
    assert!(grid.contains("Functions using Grid"));
    assert!(grid.contains("LoadGrid"));

    let space = read(temp.path(), "ApproximationSpace2d.html");
    assert!(space.contains("<h1>ApproximationSpace Class Reference</h1>"));
    assert!(space.contains("dim=2 algebra=CPU1 "));
    assert!(space.contains("(default implementation of group ApproximationSpace)"));

    let index = read(temp.path(), INDEX_FILE);
    assert!(index.contains("ApproximationSpace"));
    assert!(!index.contains(">ApproximationSpace3d<"));

    let groups = read(temp.path(), GROUPS_FILE);
    let plugin_section = groups.find("Plugin Groups").unwrap();
    let electro = groups.find("plugin.Electrostaticsgroup.html").unwrap();
    assert!(electro > plugin_section);
}

#[test]
fn test_cpp_stubs() {
    let temp = TempDir::new().unwrap();
    generate_from(
        &JsonFileSource::new(fixture("registry.json")),
        &all_formats(temp.path()),
    )
    .unwrap();

    let group = read(temp.path(), "approximationspace.cpp");
    assert!(group.starts_with("namespace regbridge {\nnamespace ug4 {\nnamespace disc {\n"));
    assert!(group.contains("/// \\defgroup approximationspace ApproximationSpace"));
    assert!(group.contains("/// default class is ApproximationSpace2d"));
    assert!(group.contains("class ApproximationSpace3d {"));

    let multigrid = read(temp.path(), "multigrid.cpp");
    assert!(multigrid.contains("class MultiGrid : public Grid {"));
    assert!(multigrid.contains("integer num_levels() const;"));

    let solver = read(temp.path(), "electrostaticssolver.cpp");
    assert!(solver.contains("namespace plugins {\nnamespace electrostatics {"));
    assert!(solver.contains("private:\n/// \\brief Constructor hidden / deactivated"));

    let globals = read(temp.path(), GLOBAL_FUNCTIONS_FILE);
    assert!(globals.contains("bool LoadGrid(Grid* grid, string filename);"));
    assert!(globals.contains("/// \\returns success"));
    assert!(globals.contains("() GridStatistics(const Grid* grid);"));
    assert!(globals.contains("void SolvePoisson(ElectrostaticsSolver* solver, number unnamed);"));
}

#[test]
fn test_completion_list() {
    let temp = TempDir::new().unwrap();
    generate_from(
        &JsonFileSource::new(fixture("registry.json")),
        &all_formats(temp.path()),
    )
    .unwrap();

    let list = read(temp.path(), "completion_list.txt");
    assert!(list.starts_with("REGDOC COMPLETER VERSION 1\n"));
    assert!(list.contains("class\nApproximationSpace\n\n"));
    assert!(list.contains("class\nMultiGrid\nGrid \n"));
    assert!(list.contains("function\nGridStatistics\n()\n() GridStatistics (const Grid* grid)\n"));
}

#[test]
fn test_missing_registry_is_fatal() {
    let temp = TempDir::new().unwrap();
    let settings = all_formats(&temp.path().join("out"));

    let err = generate_from(
        &JsonFileSource::new(temp.path().join("absent.json")),
        &settings,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Registry(RegistryError::NotFound { .. })
    ));
    assert_eq!(i32::from(err.exit_code()), 3);
    assert!(!temp.path().join("out").exists());
}
