//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use viewpoints_core::{
    Author, Poll, PollSummary, Response, Statement, StatementFlag, StatementTally,
};

use super::responses::{
    AuthorResponse, FlagResponse, PollResponse, PollSummaryResponse, ResponseResponse,
    StatementResponse, StatementResultResponse, VotingSessionResponse, WriteFailureResponse,
};
use crate::voting::{SessionSnapshot, SessionState, WriteFailure};

// ============================================================================
// Poll Mappers
// ============================================================================

impl From<&Poll> for PollResponse {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id.into_inner(),
            slug: poll.slug.clone(),
            title: poll.title.clone(),
            core_question: poll.core_question.clone(),
            polis_id: poll.polis_id.clone(),
            visibility: poll.visibility,
            owner_id: poll.user_id.clone(),
            created_at: poll.created_at,
            share_url: None,
        }
    }
}

impl From<Poll> for PollResponse {
    fn from(poll: Poll) -> Self {
        Self::from(&poll)
    }
}

impl From<&Author> for AuthorResponse {
    fn from(author: &Author) -> Self {
        Self {
            user_id: author.user_id.clone(),
            name: author.display_name().to_string(),
            avatar_url: author.avatar_url.clone(),
        }
    }
}

impl From<PollSummary> for PollSummaryResponse {
    fn from(summary: PollSummary) -> Self {
        Self {
            poll: PollResponse::from(&summary.poll),
            statement_count: summary.statement_count,
            respondent_count: summary.respondent_count,
            author: summary.author.as_ref().map(AuthorResponse::from),
        }
    }
}

/// Pair a tally with its statement text
pub fn statement_result(tally: &StatementTally, text: String) -> StatementResultResponse {
    StatementResultResponse {
        statement_id: tally.statement_id.into_inner(),
        text,
        agree: tally.agree,
        disagree: tally.disagree,
        skip: tally.skip,
        total: tally.total(),
        agreement: tally.agreement(),
    }
}

// ============================================================================
// Statement Mappers
// ============================================================================

impl From<&Statement> for StatementResponse {
    fn from(statement: &Statement) -> Self {
        Self {
            id: statement.id.into_inner(),
            poll_id: statement.poll_id.into_inner(),
            text: statement.text.clone(),
            author_id: statement
                .author
                .as_ref()
                .and_then(|a| a.user_id())
                .map(String::from),
            created_at: statement.created_at,
        }
    }
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self::from(&statement)
    }
}

impl From<StatementFlag> for FlagResponse {
    fn from(flag: StatementFlag) -> Self {
        Self {
            id: flag.id.into_inner(),
            statement_id: flag.statement_id.into_inner(),
            reason: flag.reason,
            description: flag.description,
            created_at: flag.created_at,
        }
    }
}

impl From<Response> for ResponseResponse {
    fn from(response: Response) -> Self {
        Self {
            id: response.id.into_inner(),
            statement_id: response.statement_id.into_inner(),
            valence: response.valence,
            user_id: response.voter.user_id().map(String::from),
            created_at: response.created_at,
        }
    }
}

// ============================================================================
// Voting Mappers
// ============================================================================

/// Build the session view for `poll_id`
pub fn voting_session_response(poll_id: i64, snapshot: &SessionSnapshot) -> VotingSessionResponse {
    VotingSessionResponse {
        poll_id,
        active: snapshot.active.as_ref().map(StatementResponse::from),
        remaining: snapshot.remaining,
        exhausted: snapshot.state == SessionState::Exhausted,
    }
}

impl From<WriteFailure> for WriteFailureResponse {
    fn from(failure: WriteFailure) -> Self {
        Self {
            statement: StatementResponse::from(&failure.statement),
            valence: failure.valence,
            error: failure.error.to_string(),
        }
    }
}
