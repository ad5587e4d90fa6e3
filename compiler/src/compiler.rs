use std::{
    collections::BTreeSet,
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;
use tracing::{debug, info, warn};

use schemacpp_schema::{Definition, SchemaDocument};

use crate::{
    emitter::CppEmitter,
    enums::{extract_enums, EnumDefinition},
    error::{CompileError, Diagnostic},
    options::EmitOptions,
    resolver::{ResolvedDefinition, Resolver},
    verifier::{verify_definition_names, verify_enums},
};

/// Outcome of a run that got past parsing. The artifact has been written in
/// full even when `is_success()` is false.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompileReport {
    pub diagnostics: Vec<Diagnostic>,
    pub definitions: usize,
    pub enums:       usize,
}

impl CompileReport {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_success(&self) -> bool {
        !self.has_errors()
    }
}

/// Everything computed for one definition before it is written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledDefinition {
    pub resolved: ResolvedDefinition,
    pub enums:    Vec<EnumDefinition>,
}

/// Gathers diagnostics across definitions. A cycle is reported by the first
/// definition that runs into it; the other members of the cycle stay quiet.
#[derive(Default)]
struct Collector {
    diagnostics: Vec<Diagnostic>,
    seen_cycles: BTreeSet<Vec<String>>,
}

impl Collector {
    fn extend(&mut self, found: Vec<Diagnostic>) {
        for diagnostic in found {
            if let Diagnostic::CyclicReference { cycle, .. } = &diagnostic {
                if !self.seen_cycles.insert(cycle_key(cycle)) {
                    debug!(%diagnostic, "cycle already reported");
                    continue;
                }
            }
            warn!("{}", diagnostic);
            self.diagnostics.push(diagnostic);
        }
    }
}

/// A closed cycle path (`A, B, A`) with the repeated end dropped and rotated
/// to start at its smallest pointer, so every entry point into the same loop
/// yields the same key while opposite directions stay distinct.
fn cycle_key(cycle: &[String]) -> Vec<String> {
    let open = &cycle[..cycle.len().saturating_sub(1)];
    let start = open
        .iter()
        .enumerate()
        .min_by_key(|(_, pointer)| *pointer)
        .map_or(0, |(index, _)| index);
    open[start..].iter().chain(&open[..start]).cloned().collect()
}

/// Drives the two passes over a parsed document: forward declarations for
/// every definition, then the generated types of each definition in order.
pub struct Compiler<'a> {
    document: &'a SchemaDocument,
    options:  &'a EmitOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(document: &'a SchemaDocument, options: &'a EmitOptions) -> Self {
        Compiler { document, options }
    }

    /// Resolves every definition and extracts its enums without writing
    /// anything. Reports the same diagnostics as [`Compiler::compile`].
    pub fn resolve_all(&self) -> (Vec<CompiledDefinition>, Vec<Diagnostic>) {
        let mut collector = Collector::default();
        self.verify_names(&mut collector);
        let compiled = self
            .document
            .definitions()
            .iter()
            .map(|def| self.compile_definition(def, &mut collector))
            .collect();
        (compiled, collector.diagnostics)
    }

    /// Writes the whole artifact to `out`. Only I/O failures abort; schema
    /// problems end up in the report.
    pub fn compile<W: Write>(&self, out: &mut W) -> Result<CompileReport, CompileError> {
        let mut collector = Collector::default();
        let mut emitter = CppEmitter::new(out, self.options);

        info!(namespace = %self.options.namespace, "writing file header");
        emitter.file_header()?;

        info!(count = self.document.len(), "writing forward declarations");
        self.verify_names(&mut collector);
        emitter.forward_declarations(self.document.definitions().iter().map(|d| d.name.as_str()), 1)?;

        let mut enums = 0;
        for def in self.document.definitions() {
            let compiled = self.compile_definition(def, &mut collector);
            enums += compiled.enums.len();
            emitter.definition(&compiled.enums, 1)?;
        }

        info!("writing file footer");
        emitter.file_footer()?;

        Ok(CompileReport {
            diagnostics: collector.diagnostics,
            definitions: self.document.len(),
            enums,
        })
    }

    fn verify_names(&self, collector: &mut Collector) {
        let mut found = Vec::new();
        verify_definition_names(self.document, &mut found);
        collector.extend(found);
    }

    fn compile_definition(&self, def: &Definition, collector: &mut Collector) -> CompiledDefinition {
        info!(definition = %def.name, "creating definition");
        let mut found = Vec::new();

        let resolved = Resolver::new(self.document).resolve(def, &mut found);
        debug!(properties = resolved.properties.len(), "gathered properties");

        let enums = extract_enums(&resolved, &mut found);
        debug!(enums = enums.len(), "found enums");
        verify_enums(&def.name, &enums, &mut found);

        collector.extend(found);
        CompiledDefinition { resolved, enums }
    }
}

/// Parses `text` and compiles it into `out`.
pub fn compile_str<W: Write>(text: &str, out: &mut W, options: &EmitOptions) -> Result<CompileReport, CompileError> {
    let document = SchemaDocument::parse(text)?;
    Compiler::new(&document, options).compile(out)
}

/// Reads and parses the schema at `input`.
pub fn load_document(input: &Path) -> Result<SchemaDocument, CompileError> {
    let text = fs::read_to_string(input)?;
    Ok(SchemaDocument::parse(&text)?)
}

/// Compiles the schema at `input` into `output`, creating missing parent
/// directories. The input is parsed before the output is touched, so a
/// malformed document leaves any previous artifact in place.
pub fn compile_file(input: &Path, output: &Path, options: &EmitOptions) -> Result<CompileReport, CompileError> {
    let document = load_document(input)?;
    compile_document(&document, output, options)
}

/// Writes the artifact for an already parsed document to `output`.
pub fn compile_document(
    document: &SchemaDocument,
    output: &Path,
    options: &EmitOptions,
) -> Result<CompileReport, CompileError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(fs::File::create(output)?);
    let report = Compiler::new(document, options).compile(&mut writer)?;
    writer.flush()?;
    Ok(report)
}

/// Checks the invocation before the compiler runs: the input must be an
/// existing file and the output must not name a directory.
pub fn check_preconditions(input: &Path, output: &Path) -> Result<(), CompileError> {
    if !input.exists() {
        return Err(CompileError::Precondition(format!(
            "could not locate input file `{}`",
            input.display()
        )));
    }
    if !input.is_file() {
        return Err(CompileError::Precondition(format!(
            "input `{}` is not a file",
            input.display()
        )));
    }
    if output.is_dir() {
        return Err(CompileError::Precondition(format!(
            "output `{}` is a directory",
            output.display()
        )));
    }
    Ok(())
}
