#[derive(Debug, Clone, PartialEq)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}
