//! Response entity <-> model mapper

use std::collections::BTreeMap;

use viewpoints_core::{
    DomainError, NewResponse, Response, ResponseId, StatementId, StatementTally, Valence,
};

use super::{identity_columns, required_identity};
use crate::models::{ResponseModel, TallyRowModel};

fn parse_choice(choice: &str) -> Result<Valence, DomainError> {
    choice
        .parse()
        .map_err(|e| DomainError::DatabaseError(format!("bad stored choice: {e}")))
}

impl TryFrom<ResponseModel> for Response {
    type Error = DomainError;

    fn try_from(model: ResponseModel) -> Result<Self, Self::Error> {
        Ok(Response {
            id: ResponseId::new(model.id),
            statement_id: StatementId::new(model.statement_id),
            valence: parse_choice(&model.choice)?,
            voter: required_identity("responses", model.id, model.user_id, model.session_id)?,
            created_at: model.created_at,
        })
    }
}

/// Fold `(statement, choice, count)` rows into one tally per statement
///
/// `statement_ids` fixes the output order and makes statements without any
/// reactions show up with zero counts.
pub fn tallies_from_rows(
    statement_ids: &[StatementId],
    rows: Vec<TallyRowModel>,
) -> Result<Vec<StatementTally>, DomainError> {
    let mut by_statement: BTreeMap<StatementId, StatementTally> = statement_ids
        .iter()
        .map(|id| (*id, StatementTally::empty(*id)))
        .collect();

    for row in rows {
        let id = StatementId::new(row.statement_id);
        let valence = parse_choice(&row.choice)?;
        by_statement
            .entry(id)
            .or_insert_with(|| StatementTally::empty(id))
            .add(valence, row.count);
    }

    let mut ordered: Vec<StatementTally> = statement_ids
        .iter()
        .filter_map(|id| by_statement.remove(id))
        .collect();
    ordered.extend(by_statement.into_values());
    Ok(ordered)
}

/// Values for inserting a response
pub struct ResponseInsert<'a> {
    pub statement_id: i64,
    pub user_id: Option<&'a str>,
    pub session_id: Option<&'a str>,
    pub choice: &'static str,
}

impl<'a> ResponseInsert<'a> {
    pub fn new(response: &'a NewResponse) -> Self {
        let (user_id, session_id) = identity_columns(Some(&response.voter));
        Self {
            statement_id: response.statement_id.into_inner(),
            user_id,
            session_id,
            choice: response.valence.as_str(),
        }
    }
}
