//! Statement entity <-> model mapper

use viewpoints_core::{NewStatement, PollId, Statement, StatementId, VoterIdentity};

use super::identity_columns;
use crate::models::StatementModel;

impl From<StatementModel> for Statement {
    fn from(model: StatementModel) -> Self {
        Statement {
            id: StatementId::new(model.id),
            poll_id: PollId::new(model.poll_id),
            author: VoterIdentity::from_columns(model.user_id, model.session_id),
            text: model.text,
            created_at: model.created_at,
        }
    }
}

/// Values for inserting a statement
pub struct StatementInsert<'a> {
    pub poll_id: i64,
    pub user_id: Option<&'a str>,
    pub session_id: Option<&'a str>,
    pub text: &'a str,
}

impl<'a> StatementInsert<'a> {
    pub fn new(statement: &'a NewStatement) -> Self {
        let (user_id, session_id) = identity_columns(statement.author.as_ref());
        Self {
            poll_id: statement.poll_id.into_inner(),
            user_id,
            session_id,
            text: &statement.text,
        }
    }
}
