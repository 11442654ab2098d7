/// A user's role on a project, e.g. `Owner` or `Maintainer`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Role {
    pub role_name: String,
    pub user_name: String,
}
impl Role {
    pub fn new(role_name: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            user_name: user_name.into(),
        }
    }
}
