//! Stored procedure loading.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use super::delegate::{Diagnostic, LoaderDelegate};
use super::{LoadContext, StageEnv};
use crate::filters::PatternFilter;
use crate::metadata::{qualified_name, MetadataResult, ProcedureColumnInfo, ProcedureColumnKind, ProcedureKind};
use crate::model::{DbType, ParameterDirection, Procedure, ProcedureParameter};

/// Name given to an unnamed return value.
pub const RETURN_VALUE_NAME: &str = "_return_value";

/// Load procedures of scopes with procedure rules, then their parameters.
pub(super) fn load_procedures(
    env: &StageEnv<'_>,
    ctx: &mut LoadContext,
    _delegate: &mut dyn LoaderDelegate,
) -> MetadataResult<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    let mut procedures: BTreeMap<String, Procedure> = BTreeMap::new();
    let mut scopes: Vec<(Option<&str>, Option<&str>)> = Vec::new();
    let mut seen = HashSet::new();

    for (catalog, schema) in env.filters.scopes() {
        if matches!(schema.procedures, PatternFilter::IncludeNothing) {
            continue;
        }
        let scope = (catalog.name.as_deref(), schema.name.as_deref());
        if !seen.insert(scope) {
            continue;
        }
        scopes.push(scope);

        for info in env.source.procedures(scope.0, scope.1)? {
            let filter = env
                .filters
                .procedures_filter(info.catalog.as_deref(), info.schema.as_deref())
                .unwrap_or(&schema.procedures);
            if !filter.is_included(&info.name) {
                info!(procedure = %info.name, "Procedure excluded by filters");
                continue;
            }
            let mut procedure = Procedure::new(&info.name, info.catalog.as_deref(), info.schema.as_deref());
            procedure.returning_value = info.kind == ProcedureKind::ReturnsResult;
            procedures.insert(procedure.qualified_name(), procedure);
        }
    }

    if procedures.is_empty() {
        return Ok(diagnostics);
    }

    for (catalog, schema) in scopes {
        for column in env.source.procedure_columns(catalog, schema)? {
            let name = qualified_name(column.catalog.as_deref(), column.schema.as_deref(), &[&column.procedure]);
            let Some(procedure) = procedures.get_mut(&name) else {
                continue;
            };
            if let Some(parameter) = parameter(procedure, column, &mut diagnostics) {
                procedure.parameters.push(parameter);
            }
        }
    }

    info!(count = procedures.len(), "Procedures loaded");
    for procedure in procedures.into_values() {
        ctx.store.add_procedure(procedure);
    }
    Ok(diagnostics)
}

fn parameter(
    procedure: &mut Procedure,
    column: ProcedureColumnInfo,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ProcedureParameter> {
    if column.kind == ProcedureColumnKind::Result {
        debug!(procedure = %procedure.name, column = ?column.name, "Skipping result set column");
        return None;
    }

    let name = match column.name {
        Some(name) => name,
        None if column.kind == ProcedureColumnKind::Return => {
            procedure.returning_value = true;
            RETURN_VALUE_NAME.to_string()
        }
        None => {
            info!(procedure = %procedure.name, "Skipping unnamed parameter");
            diagnostics.push(Diagnostic::ProcedureParameterSkipped {
                procedure: procedure.qualified_name(),
                reason: "unnamed parameter".to_string(),
            });
            return None;
        }
    };

    let db_type = DbType::from_code(column.type_code);
    Some(ProcedureParameter {
        name,
        direction: direction(column.kind),
        db_type,
        max_length: column.length,
        precision: column.scale.filter(|_| db_type.is_some_and(DbType::is_decimal)),
    })
}

fn direction(kind: ProcedureColumnKind) -> Option<ParameterDirection> {
    match kind {
        ProcedureColumnKind::In => Some(ParameterDirection::In),
        ProcedureColumnKind::Out | ProcedureColumnKind::Return => Some(ParameterDirection::Out),
        ProcedureColumnKind::InOut => Some(ParameterDirection::InOut),
        ProcedureColumnKind::Result | ProcedureColumnKind::Unknown => None,
    }
}
