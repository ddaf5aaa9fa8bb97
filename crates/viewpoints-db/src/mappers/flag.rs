//! Statement flag entity <-> model mapper

use viewpoints_core::{DomainError, FlagId, NewFlag, StatementFlag, StatementId};

use super::{identity_columns, required_identity};
use crate::models::FlagModel;

impl TryFrom<FlagModel> for StatementFlag {
    type Error = DomainError;

    fn try_from(model: FlagModel) -> Result<Self, Self::Error> {
        Ok(StatementFlag {
            id: FlagId::new(model.id),
            statement_id: StatementId::new(model.statement_id),
            reporter: required_identity(
                "flagged_statements",
                model.id,
                model.user_id,
                model.session_id,
            )?,
            reason: model.reason,
            description: model.description,
            created_at: model.created_at,
        })
    }
}

/// Values for inserting a flag
pub struct FlagInsert<'a> {
    pub statement_id: i64,
    pub user_id: Option<&'a str>,
    pub session_id: Option<&'a str>,
    pub reason: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> FlagInsert<'a> {
    pub fn new(flag: &'a NewFlag) -> Self {
        let (user_id, session_id) = identity_columns(Some(&flag.reporter));
        Self {
            statement_id: flag.statement_id.into_inner(),
            user_id,
            session_id,
            reason: &flag.reason,
            description: flag.description.as_deref(),
        }
    }
}
