//! Source rewriting
//!
//! A [`FilePlan`] holds everything known about one translation unit after
//! analysis. An [`Instrumentor`] is built from all plans of a project, so it
//! knows which unit holds `main` and which registration functions exist, and
//! then rewrites each unit independently.
//!
//! Nothing inserted contains a line break: counters are prefixes on the
//! statement's own line or comma expressions around controlling
//! expressions, and the per-file prologue is a single line placed before
//! the first file-scope declaration.

mod edit;
mod prologue;

pub use prologue::escape_c_string;
pub(crate) use prologue::{FILE_STRUCT, REGISTER_FN};

use crate::classify::{classify, Classification, SiteKind};
use crate::frontend::{SourceModel, StatementSource};
use crate::ident::derive_id;
use crate::result::{LinecovError, LinecovResult};
use edit::{Insertion, Placement};
use prologue::{hits_symbol, Hook, Prologue, BOOT_FN};

/// One analyzed translation unit
#[derive(Debug, Clone)]
pub struct FilePlan {
    /// Canonical path, as written into the report
    pub path: String,
    /// Symbol suffix for generated identifiers
    pub id: String,
    pub source: String,
    pub model: SourceModel,
    pub classification: Classification,
}

impl FilePlan {
    /// Scan and classify one unit
    pub fn analyze(
        frontend: &impl StatementSource,
        path: impl Into<String>,
        source: impl Into<String>,
    ) -> LinecovResult<Self> {
        let path = path.into();
        let source = source.into();
        let model = frontend.scan(&path, &source)?;
        let classification = classify(&source, &model.statements);
        tracing::debug!(
            path = %path,
            lines = model.line_count,
            countable = classification.mask.count(),
            functions = model.functions.len(),
            "planned"
        );
        Ok(Self {
            id: derive_id(&path),
            path,
            source,
            model,
            classification,
        })
    }

    #[must_use]
    pub fn has_main(&self) -> bool {
        self.model.main_function().is_some()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.model.line_count
    }
}

/// Rewrites units with knowledge of the whole project
#[derive(Debug, Clone)]
pub struct Instrumentor {
    /// Unit ids in plan order
    units: Vec<String>,
    /// No unit defines `main`, so registration runs at load time
    constructors: bool,
}

impl Instrumentor {
    /// Prepare to rewrite `plans`. Fails if more than one defines `main`.
    pub fn for_project(plans: &[FilePlan]) -> LinecovResult<Self> {
        let mains: Vec<String> = plans
            .iter()
            .filter(|p| p.has_main())
            .map(|p| p.path.clone())
            .collect();
        if mains.len() > 1 {
            return Err(LinecovError::MultipleMains { paths: mains });
        }
        Ok(Self {
            units: plans.iter().map(|p| p.id.clone()).collect(),
            constructors: mains.is_empty(),
        })
    }

    /// Whether registration uses load-time constructors
    #[must_use]
    pub fn uses_constructors(&self) -> bool {
        self.constructors
    }

    /// Produce the instrumented text of one unit
    #[must_use]
    pub fn rewrite(&self, plan: &FilePlan) -> String {
        let hits = hits_symbol(&plan.id);
        let mut edits = Vec::with_capacity(plan.classification.sites.len() * 2 + 2);

        for site in &plan.classification.sites {
            let counter = format!("{hits}[{}]++", site.line);
            match &site.kind {
                SiteKind::Prefix {
                    at,
                    wrap_until: None,
                } => edits.push(Insertion::new(*at, Placement::Opening, format!("{counter}; "))),
                SiteKind::Prefix {
                    at,
                    wrap_until: Some(end),
                } => {
                    edits.push(Insertion::new(*at, Placement::Opening, format!("{{ {counter}; ")));
                    edits.push(Insertion::new(*end, Placement::Closing, " }"));
                }
                SiteKind::Condition { range } => {
                    edits.push(Insertion::new(
                        range.start,
                        Placement::Opening,
                        format!("({counter}, ("),
                    ));
                    edits.push(Insertion::new(range.end, Placement::Closing, "))"));
                }
            }
        }

        let hook = if self.constructors {
            Hook::Constructor
        } else if plan.has_main() {
            Hook::Boot(Some(&self.units))
        } else {
            Hook::Boot(None)
        };
        if plan.has_main() {
            for main in plan.model.functions.iter().filter(|f| f.is_main()) {
                edits.push(Insertion::new(
                    main.body_entry(),
                    Placement::Leading,
                    format!("{BOOT_FN}(); "),
                ));
            }
        }

        let prologue = Prologue {
            id: &plan.id,
            path: &plan.path,
            mask: &plan.classification.mask,
            hook,
        }
        .render();

        if let Some(anchor) = plan.model.prologue_anchor {
            edits.push(Insertion::new(anchor, Placement::Leading, prologue));
            edit::apply(&plan.source, edits)
        } else {
            tracing::debug!(path = %plan.path, "no file-scope anchor or free line; prologue placed above #line 1");
            let body = edit::apply(&plan.source, edits);
            format!("{}\n#line 1\n{body}", prologue.trim_end())
        }
    }
}

/// Instrument a single self-contained unit.
///
/// If the unit defines `main` it registers itself from there, otherwise at
/// load time.
pub fn instrument_source(
    frontend: &impl StatementSource,
    path: &str,
    source: &str,
) -> LinecovResult<String> {
    let plan = FilePlan::analyze(frontend, path, source)?;
    let instrumentor = Instrumentor::for_project(std::slice::from_ref(&plan))?;
    Ok(instrumentor.rewrite(&plan))
}
