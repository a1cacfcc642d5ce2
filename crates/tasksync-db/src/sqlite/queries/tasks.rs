use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tasksync_core::task::{NewTask, Priority, StoredTask};

use super::super::{SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_task(row: &Row) -> rusqlite::Result<StoredTask> {
    let priority_str: String = row.get("priority")?;
    Ok(StoredTask {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: Priority::parse_str(&priority_str).unwrap_or_default(),
        completed: row.get("completed")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
    })
}

fn select_task(conn: &Connection, id: &str) -> Result<StoredTask, DbError> {
    conn.query_row(
        "SELECT * FROM tasks WHERE id = ?1",
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("task {id}")),
        other => DbError::Internal(other.to_string()),
    })
}

impl SqliteDatabase {
    pub fn insert_task_sync(&self, input: &NewTask) -> Result<StoredTask, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now().timestamp_millis();

            conn.execute(
                "INSERT INTO tasks (id, title, description, priority, completed, due_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
                params![
                    id,
                    input.title,
                    input.description,
                    input.priority.as_str(),
                    input.due_date,
                    now,
                ],
            )
            .to_db()?;

            select_task(conn, &id)
        })
    }

    pub fn get_task_sync(&self, id: &str) -> Result<StoredTask, DbError> {
        self.with_conn(|conn| select_task(conn, id))
    }

    /// Newest first. Rows created in the same millisecond fall back to
    /// insertion order, still newest first.
    pub fn list_tasks_sync(&self) -> Result<Vec<StoredTask>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM tasks ORDER BY created_at DESC, rowid DESC")
                .to_db()?;
            let tasks = stmt
                .query_map([], row_to_task)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(tasks)
        })
    }

    pub fn toggle_task_sync(&self, id: &str) -> Result<StoredTask, DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE tasks SET completed = NOT completed WHERE id = ?1",
                    params![id],
                )
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }
            select_task(conn, id)
        })
    }

    pub fn delete_task_sync(&self, id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let deleted = conn
                .execute("DELETE FROM tasks WHERE id = ?1", params![id])
                .to_db()?;
            Ok(deleted > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: 1_717_200_000_000,
        }
    }

    fn set_created_at(db: &SqliteDatabase, id: &str, created_at: i64) {
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET created_at = ?1 WHERE id = ?2",
                params![created_at, id],
            )
            .to_db()
        })
        .unwrap();
    }

    #[test]
    fn insert_assigns_identity() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let before = Utc::now().timestamp_millis();
        let a = db.insert_task_sync(&new_task("a")).unwrap();
        let b = db.insert_task_sync(&new_task("b")).unwrap();

        assert_ne!(a.id, b.id);
        assert!(!a.completed);
        assert!(a.created_at >= before);
        assert_eq!(a.due_date, Some(1_717_200_000_000));
    }

    #[test]
    fn list_is_newest_first() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let old = db.insert_task_sync(&new_task("old")).unwrap();
        let new = db.insert_task_sync(&new_task("new")).unwrap();
        set_created_at(&db, &old.id, 1_000);
        set_created_at(&db, &new.id, 2_000);

        let titles: Vec<String> = db
            .list_tasks_sync()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["new", "old"]);
    }

    #[test]
    fn same_millisecond_ties_break_by_insertion() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let first = db.insert_task_sync(&new_task("first")).unwrap();
        let second = db.insert_task_sync(&new_task("second")).unwrap();
        set_created_at(&db, &first.id, 5_000);
        set_created_at(&db, &second.id, 5_000);

        let list = db.list_tasks_sync().unwrap();
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[test]
    fn toggle_flips_and_keeps_created_at() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let task = db.insert_task_sync(&new_task("t")).unwrap();

        let once = db.toggle_task_sync(&task.id).unwrap();
        assert!(once.completed);
        assert_eq!(once.created_at, task.created_at);

        let twice = db.toggle_task_sync(&task.id).unwrap();
        assert!(!twice.completed);
    }

    #[test]
    fn toggle_missing_is_not_found() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let err = db.toggle_task_sync("nope").unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn delete_reports_whether_row_existed() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let task = db.insert_task_sync(&new_task("t")).unwrap();

        assert!(db.delete_task_sync(&task.id).unwrap());
        assert!(!db.delete_task_sync(&task.id).unwrap());
        assert!(matches!(
            db.get_task_sync(&task.id),
            Err(DbError::NotFound(_))
        ));
    }
}
