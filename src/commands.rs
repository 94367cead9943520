//! Command implementations for the genpkg CLI

use crate::answers::{to_kebab_case, AnswerValue, Answers, KEY_NAME};
use crate::apply;
use crate::cli::Commands;
use crate::error::{GenpkgError, Result};
use crate::fingerprint::fingerprint_file;
use crate::generator::{produce, regenerate, GeneratorRegistry};
use crate::output::Reporter;
use crate::package::GeneratedPackage;
use crate::prompt::{Prompt, StdinPrompt};
use crate::reconcile::reconcile;
use crate::snapshot::Snapshot;
use crate::DEFAULT_TEMPLATES_DIR;
use std::path::{Path, PathBuf};

/// Execute a parsed CLI command
pub fn execute_command(command: Commands, templates: Option<&Path>) -> Result<()> {
    let templates_root = templates
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR));
    let registry = GeneratorRegistry::discover(&templates_root)?;
    let mut prompt = StdinPrompt;

    match command {
        Commands::New {
            generator,
            path,
            answers,
            silent,
        } => new_command(
            &registry,
            &generator,
            path.as_deref(),
            answers.as_deref(),
            silent,
            &mut prompt,
        )
        .map(|_| ()),
        Commands::Upgrade {
            package_path,
            silent,
        } => upgrade_command(&registry, &package_path, silent, &mut prompt),
        Commands::List => {
            Reporter::new(false).print_generator_list(&registry.names());
            Ok(())
        }
    }
}

/// Generate a new package and record its snapshot beside it
pub fn new_command(
    registry: &GeneratorRegistry,
    generator_name: &str,
    path: Option<&Path>,
    answers_json: Option<&str>,
    silent: bool,
    prompt: &mut dyn Prompt,
) -> Result<GeneratedPackage> {
    let generator = registry.get(generator_name)?;
    let reporter = Reporter::new(silent);

    let mut answers = match answers_json {
        Some(json) => Answers::from_json(json)?,
        None => Answers::new(),
    };
    if answers.name().is_none() {
        let name = prompt.ask("Package name")?;
        if name.is_empty() {
            return Err(GenpkgError::invalid_input("A name is required"));
        }
        answers.insert(KEY_NAME, AnswerValue::String(name));
    }

    let destination = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from("packages").join(to_kebab_case(answers.name().unwrap_or_default())),
    };

    let report = produce(generator, &answers, &destination)?;
    reporter.print_generator_report(&report, &destination);

    Ok(GeneratedPackage::from_root(destination))
}

/// Upgrade an existing package against the current version of its template
pub fn upgrade_command(
    registry: &GeneratorRegistry,
    package_path: &Path,
    silent: bool,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let reporter = Reporter::new(silent);
    let package = GeneratedPackage::open(package_path)?;
    let old_snapshot = Snapshot::load(&package.snapshot_dir)?;
    let generator = registry.get(&old_snapshot.config.generator_name)?;

    // Fresh reference tree in the scratch location, with its own snapshot
    regenerate(generator, &old_snapshot.config.answers, &package.scratch_dir)?;
    let new_snapshot = Snapshot::load(&package.scratch_snapshot_dir())?;

    let records = reconcile(
        &old_snapshot.manifest.files,
        &new_snapshot.manifest.files,
        |rel| fingerprint_file(&package.live_path(rel)),
    )?;

    reporter.print_warnings(&records);
    reporter.print_conflict_notices(&records);

    let confirmed = prompt.confirm(
        "Please review any messages above and commit any unsaved changes to \n\
         this package before continuing. Are you ready to start the upgrade?",
    )?;
    if !confirmed {
        reporter.line("Upgrade aborted");
        apply::cleanup_scratch(&package)?;
        return Ok(());
    }

    let plan = apply::build_plan(&package, &records)?;
    apply::apply(&package, &plan)?;

    // All file operations succeeded; only now is the old snapshot replaced
    apply::commit_snapshot(&package)?;
    apply::cleanup_scratch(&package)?;

    reporter.print_upgrade_summary(&package, &plan);
    Ok(())
}
