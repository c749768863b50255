use crate::Database;
use crate::models::{SessionRow, UserRow, ValentineRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

const USER_COLUMNS: &str = "user_id, email, name, picture, created_at";

const VALENTINE_COLUMNS: &str = "valentine_id, user_id, template_id, from_name, to_name, message, \
     emoji_style, background_theme, unique_link, payment_status, payment_id, response, \
     response_at, created_at";

impl Database {
    // -- Users --

    /// Insert a user keyed by email, or refresh name/picture if the email is
    /// already known. The existing `user_id` always wins over `new_user_id`.
    /// Returns the stored row and whether it was newly created.
    pub fn upsert_user(
        &self,
        new_user_id: &str,
        email: &str,
        name: &str,
        picture: Option<&str>,
        created_at: &str,
    ) -> Result<(UserRow, bool)> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (user_id, email, name, picture, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(email) DO UPDATE SET name = excluded.name, picture = excluded.picture",
                rusqlite::params![new_user_id, email, name, picture, created_at],
            )?;

            let user = query_user(conn, "email", email)?
                .ok_or_else(|| anyhow::anyhow!("User vanished after upsert: {}", email))?;
            let created = user.user_id == new_user_id;
            Ok((user, created))
        })
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "user_id", user_id))
    }

    // -- Sessions --

    /// Store a session. Re-issuing a known token rebinds it and resets its expiry.
    pub fn create_session(
        &self,
        session_token: &str,
        user_id: &str,
        expires_at: &str,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO user_sessions (session_token, user_id, expires_at, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(session_token) DO UPDATE SET
                    user_id = excluded.user_id,
                    expires_at = excluded.expires_at,
                    created_at = excluded.created_at",
                (session_token, user_id, expires_at, created_at),
            )?;
            Ok(())
        })
    }

    pub fn get_session(&self, session_token: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT session_token, user_id, expires_at, created_at
                     FROM user_sessions WHERE session_token = ?1",
                    [session_token],
                    |row| {
                        Ok(SessionRow {
                            session_token: row.get(0)?,
                            user_id: row.get(1)?,
                            expires_at: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Returns the number of rows removed (0 when the token was unknown).
    pub fn delete_session(&self, session_token: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM user_sessions WHERE session_token = ?1",
                [session_token],
            )?;
            Ok(n)
        })
    }

    // -- Valentines --

    pub fn insert_valentine(&self, v: &ValentineRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO valentines ({VALENTINE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                rusqlite::params![
                    v.valentine_id,
                    v.user_id,
                    v.template_id,
                    v.from_name,
                    v.to_name,
                    v.message,
                    v.emoji_style,
                    v.background_theme,
                    v.unique_link,
                    v.payment_status,
                    v.payment_id,
                    v.response,
                    v.response_at,
                    v.created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_valentine(&self, valentine_id: &str) -> Result<Option<ValentineRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {VALENTINE_COLUMNS} FROM valentines WHERE valentine_id = ?1"),
                    [valentine_id],
                    map_valentine,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_valentines_by_user(&self, user_id: &str) -> Result<Vec<ValentineRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {VALENTINE_COLUMNS} FROM valentines WHERE user_id = ?1 ORDER BY rowid"
            ))?;
            let rows = stmt
                .query_map([user_id], map_valentine)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Overwrites any earlier answer. Returns rows touched.
    pub fn set_valentine_response(
        &self,
        valentine_id: &str,
        response: &str,
        response_at: &str,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE valentines SET response = ?2, response_at = ?3 WHERE valentine_id = ?1",
                (valentine_id, response, response_at),
            )?;
            Ok(n)
        })
    }

    /// Unconditional `payment_status = 'completed'`. Returns rows touched,
    /// which is 0 for an unknown id.
    pub fn mark_valentine_paid(&self, valentine_id: &str, payment_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE valentines SET payment_status = 'completed', payment_id = ?2
                 WHERE valentine_id = ?1",
                (valentine_id, payment_id),
            )?;
            Ok(n)
        })
    }
}

/// `column` is always one of our own constants, never user input.
fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                user_id: row.get(0)?,
                email: row.get(1)?,
                name: row.get(2)?,
                picture: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn map_valentine(row: &Row<'_>) -> rusqlite::Result<ValentineRow> {
    Ok(ValentineRow {
        valentine_id: row.get(0)?,
        user_id: row.get(1)?,
        template_id: row.get(2)?,
        from_name: row.get(3)?,
        to_name: row.get(4)?,
        message: row.get(5)?,
        emoji_style: row.get(6)?,
        background_theme: row.get(7)?,
        unique_link: row.get(8)?,
        payment_status: row.get(9)?,
        payment_id: row.get(10)?,
        response: row.get(11)?,
        response_at: row.get(12)?,
        created_at: row.get(13)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2025-02-10T12:00:00.000000Z";

    fn seed_user(db: &Database, id: &str, email: &str) {
        db.upsert_user(id, email, "Sam", None, NOW).unwrap();
    }

    fn valentine(id: &str, owner: &str) -> ValentineRow {
        ValentineRow {
            valentine_id: id.into(),
            user_id: owner.into(),
            template_id: "guilt_trip".into(),
            from_name: "Sam".into(),
            to_name: "Kai".into(),
            message: "be mine".into(),
            emoji_style: "cute".into(),
            background_theme: "pink".into(),
            unique_link: id.into(),
            payment_status: "pending".into(),
            payment_id: None,
            response: None,
            response_at: None,
            created_at: NOW.into(),
        }
    }

    #[test]
    fn upsert_keeps_user_id_and_refreshes_profile() {
        let db = Database::open_in_memory().unwrap();

        let (first, created) = db
            .upsert_user("user_a", "sam@example.com", "Sam", None, NOW)
            .unwrap();
        assert!(created);
        assert_eq!(first.user_id, "user_a");

        let (second, created) = db
            .upsert_user("user_b", "sam@example.com", "Samuel", Some("pic.png"), NOW)
            .unwrap();
        assert!(!created);
        assert_eq!(second.user_id, "user_a");
        assert_eq!(second.name, "Samuel");
        assert_eq!(second.picture.as_deref(), Some("pic.png"));
        assert!(db.get_user_by_id("user_b").unwrap().is_none());
    }

    #[test]
    fn sessions_insert_lookup_delete() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "user_a", "a@example.com");

        db.create_session("tok1", "user_a", NOW, NOW).unwrap();
        db.create_session("tok2", "user_a", NOW, NOW).unwrap();

        let s = db.get_session("tok1").unwrap().unwrap();
        assert_eq!(s.user_id, "user_a");
        assert!(db.get_session("tok2").unwrap().is_some());

        assert_eq!(db.delete_session("tok1").unwrap(), 1);
        assert_eq!(db.delete_session("tok1").unwrap(), 0);
        assert!(db.get_session("tok1").unwrap().is_none());
        assert!(db.get_session("tok2").unwrap().is_some());
    }

    #[test]
    fn valentines_listed_per_owner() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "user_a", "a@example.com");
        seed_user(&db, "user_b", "b@example.com");

        db.insert_valentine(&valentine("val_1", "user_a")).unwrap();
        db.insert_valentine(&valentine("val_2", "user_a")).unwrap();
        db.insert_valentine(&valentine("val_3", "user_b")).unwrap();

        let ids: Vec<String> = db
            .list_valentines_by_user("user_a")
            .unwrap()
            .into_iter()
            .map(|v| v.valentine_id)
            .collect();
        assert_eq!(ids, vec!["val_1", "val_2"]);
        assert!(db.list_valentines_by_user("user_c").unwrap().is_empty());
    }

    #[test]
    fn response_and_payment_updates() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "user_a", "a@example.com");
        db.insert_valentine(&valentine("val_1", "user_a")).unwrap();

        assert_eq!(db.set_valentine_response("val_1", "no", NOW).unwrap(), 1);
        assert_eq!(db.set_valentine_response("val_1", "yes", NOW).unwrap(), 1);
        assert_eq!(db.mark_valentine_paid("val_1", "pay_1").unwrap(), 1);
        assert_eq!(db.mark_valentine_paid("val_missing", "pay_1").unwrap(), 0);

        let v = db.get_valentine("val_1").unwrap().unwrap();
        assert_eq!(v.response.as_deref(), Some("yes"));
        assert_eq!(v.response_at.as_deref(), Some(NOW));
        assert_eq!(v.payment_status, "completed");
        assert_eq!(v.payment_id.as_deref(), Some("pay_1"));
    }
}
