use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::{
    error::ApiError,
    model::{message::Message, user::User},
};

const MESSAGE_COLUMNS: &str =
    "id, sender_id, sender_name, receiver_id, receiver_name, subject, body, date";

pub async fn send(
    pool: &SqlitePool,
    sender: &User,
    receiver: &User,
    subject: &str,
    body: &str,
    date: NaiveDate,
) -> Result<Message, ApiError> {
    if subject.trim().is_empty() {
        return Err(ApiError::invalid_input("subject cannot be empty"));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO messages (sender_id, sender_name, receiver_id, receiver_name, subject, body, date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(sender.id)
    .bind(&sender.name)
    .bind(receiver.id)
    .bind(&receiver.name)
    .bind(subject.trim())
    .bind(body)
    .bind(date)
    .execute(pool)
    .await?;

    let message = sqlx::query_as::<_, Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?"
    ))
    .bind(result.last_insert_rowid())
    .fetch_one(pool)
    .await?;
    Ok(message)
}

/// Messages addressed to `receiver_id`, newest first.
pub async fn inbox(pool: &SqlitePool, receiver_id: i64) -> Result<Vec<Message>, ApiError> {
    let messages = sqlx::query_as::<_, Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages WHERE receiver_id = ? ORDER BY date DESC, id DESC"
    ))
    .bind(receiver_id)
    .fetch_all(pool)
    .await?;
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::init_db,
        model::role::Role,
        store::credentials::{self, tests::new_user},
    };

    #[actix_web::test]
    async fn inbox_only_holds_messages_for_the_receiver() {
        let pool = init_db("sqlite::memory:").await.unwrap();
        let a = credentials::create(&pool, &new_user("E1", "a@x.io", Role::Employee)).await.unwrap();
        let b = credentials::create(&pool, &new_user("E2", "b@x.io", Role::Employee)).await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        let sent = send(&pool, &a, &b, "Hello", "Lunch?", day).await.unwrap();
        assert_eq!(sent.sender_name, a.name);
        assert_eq!(sent.receiver_name, b.name);

        assert_eq!(inbox(&pool, b.id).await.unwrap().len(), 1);
        assert!(inbox(&pool, a.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn blank_subject_is_rejected() {
        let pool = init_db("sqlite::memory:").await.unwrap();
        let a = credentials::create(&pool, &new_user("E1", "a@x.io", Role::Employee)).await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        let err = send(&pool, &a, &a, "  ", "x", day).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
