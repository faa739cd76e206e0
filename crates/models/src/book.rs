use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, Condition, ConnectionTrait, FromJsonQueryResult, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A single review embedded in a book document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub username: String,
    pub text: String,
}

/// Ordered review list stored as one JSONB array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Reviews(pub Vec<Review>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub isbn: i64,
    pub author: String,
    pub title: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub reviews: Reviews,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_isbn(isbn: i64) -> Result<(), ModelError> {
    if isbn < 0 {
        return Err(ModelError::Validation("isbn must be non-negative".into()));
    }
    Ok(())
}

pub fn validate_text_field(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

/// OR-condition over the supplied filters; `None` when nothing was supplied.
pub fn search_condition(isbn: Option<i64>, author: Option<&str>, title: Option<&str>) -> Option<Condition> {
    if isbn.is_none() && author.is_none() && title.is_none() {
        return None;
    }
    let mut cond = Condition::any();
    if let Some(isbn) = isbn {
        cond = cond.add(Column::Isbn.eq(isbn));
    }
    if let Some(author) = author {
        cond = cond.add(Column::Author.eq(author));
    }
    if let Some(title) = title {
        cond = cond.add(Column::Title.eq(title));
    }
    Some(cond)
}

pub async fn create<C: ConnectionTrait>(db: &C, isbn: i64, author: &str, title: &str) -> Result<Model, ModelError> {
    validate_isbn(isbn)?;
    validate_text_field("author", author)?;
    validate_text_field("title", title)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        isbn: Set(isbn),
        author: Set(author.trim().to_string()),
        title: Set(title.trim().to_string()),
        reviews: Set(Reviews::default()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_isbn<C: ConnectionTrait>(db: &C, isbn: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(isbn).one(db).await?)
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Isbn).all(db).await?)
}

pub async fn search<C: ConnectionTrait>(
    db: &C,
    isbn: Option<i64>,
    author: Option<&str>,
    title: Option<&str>,
) -> Result<Vec<Model>, ModelError> {
    let Some(cond) = search_condition(isbn, author, title) else {
        return Ok(Vec::new());
    };
    Ok(Entity::find().filter(cond).order_by_asc(Column::Isbn).all(db).await?)
}

/// Replace the review list if the stored version still equals `expected_version`.
///
/// Returns `None` when the book is gone or was written by someone else in between.
pub async fn save_reviews<C: ConnectionTrait>(
    db: &C,
    isbn: i64,
    expected_version: i32,
    reviews: Reviews,
) -> Result<Option<Model>, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut updated = Entity::update_many()
        .col_expr(Column::Reviews, Expr::value(reviews))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Isbn.eq(isbn))
        .filter(Column::Version.eq(expected_version))
        .exec_with_returning(db)
        .await?;
    Ok(updated.pop())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn validate_rejects_negative_isbn() {
        assert!(validate_isbn(-1).is_err());
        assert!(validate_isbn(0).is_ok());
        assert!(validate_isbn(9780131103627).is_ok());
    }

    #[test]
    fn validate_rejects_blank_text() {
        assert!(validate_text_field("title", "  ").is_err());
        assert!(validate_text_field("title", "Dune").is_ok());
    }

    #[test]
    fn search_without_filters_has_no_condition() {
        assert!(search_condition(None, None, None).is_none());
    }

    #[test]
    fn search_condition_ors_only_supplied_fields() {
        let cond = search_condition(Some(42), None, Some("Dune")).unwrap();
        let sql = Entity::find().filter(cond).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""book"."isbn" = 42"#), "{sql}");
        assert!(sql.contains(r#""book"."title" = 'Dune'"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(!sql.contains(r#""book"."author" ="#), "{sql}");
    }

    #[test]
    fn reviews_serialize_as_plain_array() {
        let reviews = Reviews(vec![Review { username: "ann".into(), text: "great".into() }]);
        let json = serde_json::to_value(&reviews).unwrap();
        assert_eq!(json, serde_json::json!([{"username": "ann", "text": "great"}]));
    }
}
