//! Author entity <-> model mapper

use viewpoints_core::Author;

use crate::models::AuthorModel;

impl From<AuthorModel> for Author {
    fn from(model: AuthorModel) -> Self {
        Author {
            user_id: model.user_id,
            name: model.name,
            avatar_url: model.avatar_url,
        }
    }
}

/// Values for upserting an author
pub struct AuthorInsert<'a> {
    pub user_id: &'a str,
    pub name: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
}

impl<'a> AuthorInsert<'a> {
    pub fn new(author: &'a Author) -> Self {
        Self {
            user_id: &author.user_id,
            name: author.name.as_deref(),
            avatar_url: author.avatar_url.as_deref(),
        }
    }
}
