//! Poll entity <-> model mapper

use viewpoints_core::{Author, NewPoll, Poll, PollId, PollSummary, PollVisibility};

use crate::models::{PollModel, PollSummaryModel};

impl From<PollModel> for Poll {
    fn from(model: PollModel) -> Self {
        Poll {
            id: PollId::new(model.id),
            user_id: model.user_id,
            slug: model.slug,
            title: model.title,
            core_question: model.core_question,
            polis_id: model.polis_id,
            visibility: PollVisibility::from_db(&model.visibility),
            created_at: model.created_at,
        }
    }
}

impl From<PollSummaryModel> for PollSummary {
    fn from(model: PollSummaryModel) -> Self {
        // LEFT JOIN: owners who never synced a profile have no author row
        let author = model.author_user_id.map(|user_id| Author {
            user_id,
            name: model.author_name,
            avatar_url: model.author_avatar_url,
        });

        PollSummary {
            poll: Poll::from(model.poll),
            statement_count: model.statement_count,
            respondent_count: model.respondent_count,
            author,
        }
    }
}

/// Values for inserting a poll
pub struct PollInsert<'a> {
    pub user_id: &'a str,
    pub slug: &'a str,
    pub title: &'a str,
    pub core_question: &'a str,
    pub polis_id: Option<&'a str>,
    pub visibility: &'static str,
}

impl<'a> PollInsert<'a> {
    pub fn new(poll: &'a NewPoll) -> Self {
        Self {
            user_id: &poll.user_id,
            slug: &poll.slug,
            title: &poll.title,
            core_question: &poll.core_question,
            polis_id: poll.polis_id.as_deref(),
            visibility: poll.visibility.as_str(),
        }
    }
}
