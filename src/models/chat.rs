use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// What the surface actually shows for an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Display {
    /// Inserted as text, never interpreted as markup.
    Plain(String),
    /// Output of the render-safe transform, already sanitized.
    Markup(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub role: Role,
    pub text: String,
    pub render_as_markdown: bool,
    pub ordinal: usize,
    pub display: Display,
}

impl MessageEntry {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
