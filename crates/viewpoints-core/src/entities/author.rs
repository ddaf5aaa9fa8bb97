//! Author entity - public profile of a poll owner

/// Author profile, mirrored from the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub user_id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Author {
    /// Name shown next to a poll. Missing names and names that look like
    /// e-mail addresses render as "Anonymous".
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() && !is_email(name) => name,
            _ => "Anonymous",
        }
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.contains(char::is_whitespace)
}
